use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Urgency of a ticket as reported by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Lifecycle state of a ticket. The only transition is `Open` → `Resolved`;
/// there is no reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Open,
    Resolved,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Pure ticket model for inter-module communication (no serde).
///
/// Invariant: `resolved_at` is Some exactly when `status == Resolved`,
/// and `resolved_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Data for submitting a new ticket.
///
/// `priority` is the raw wire value; the domain service validates it against
/// the enumerated set and applies the `medium` default when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub priority: Option<String>,
}

/// Partial update data for a ticket.
///
/// `status` is the raw wire value, validated by the domain service.
/// `resolved_at` is carried for wire compatibility with clients that send it,
/// but the server clock is the only authority on resolution time; the value
/// is never applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketPatch {
    pub status: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// An append-only annotation on a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Data for appending a new note to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
}

/// Staff account record. Present in the storage contract only; there is no
/// login flow and no REST surface for users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// Data for creating a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Aggregate counters over the whole ticket set.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketStats {
    pub total_tickets: usize,
    pub live_tickets: usize,
    pub resolved_tickets: usize,
    /// Mean of (resolved_at - created_at) in milliseconds over resolved
    /// tickets; 0.0 when none are resolved.
    pub avg_response_time_ms: f64,
}

/// One entry in a ticket's merged timeline view: its notes, newest first,
/// followed by a single synthetic creation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    Note(Note),
    Created { at: DateTime<Utc>, name: String },
}
