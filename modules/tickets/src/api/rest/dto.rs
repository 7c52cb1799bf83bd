use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{
    NewNote, NewTicket, Note, Priority, Status, Ticket, TicketPatch, TicketStats, TimelineEntry,
};

/// Wire representation of ticket priority (lowercase on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityDto {
    Low,
    Medium,
    High,
    Urgent,
}

/// Wire representation of ticket status (lowercase on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusDto {
    Open,
    Resolved,
}

/// REST DTO for ticket representation. `timeOpen` / `resolutionTime` are
/// derived read-path fields, only present on the views that compute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub priority: PriorityDto,
    pub status: StatusDto,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_time: Option<String>,
}

/// REST DTO for submitting a ticket. Missing fields collapse to empty strings
/// and are rejected by domain validation, so a partial body yields a 400 with
/// field detail rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// REST DTO for updating a ticket (partial)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketReq {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// REST DTO for note representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// REST DTO for appending a note
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteReq {
    #[serde(default)]
    pub content: String,
}

/// REST DTO for the aggregate statistics object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatsDto {
    pub total_tickets: usize,
    pub live_tickets: usize,
    pub resolved_tickets: usize,
    pub avg_response_time_ms: f64,
}

/// REST DTO for one timeline entry, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelineEntryDto {
    #[serde(rename_all = "camelCase")]
    Note {
        id: Uuid,
        ticket_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Created { at: DateTime<Utc>, name: String },
}

// Conversion implementations between REST DTOs and contract models

impl From<Priority> for PriorityDto {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Low => Self::Low,
            Priority::Medium => Self::Medium,
            Priority::High => Self::High,
            Priority::Urgent => Self::Urgent,
        }
    }
}

impl From<Status> for StatusDto {
    fn from(s: Status) -> Self {
        match s {
            Status::Open => Self::Open,
            Status::Resolved => Self::Resolved,
        }
    }
}

impl From<Ticket> for TicketDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            name: ticket.name,
            email: ticket.email,
            subject: ticket.subject,
            description: ticket.description,
            priority: ticket.priority.into(),
            status: ticket.status.into(),
            created_at: ticket.created_at,
            resolved_at: ticket.resolved_at,
            time_open: None,
            resolution_time: None,
        }
    }
}

impl From<CreateTicketReq> for NewTicket {
    fn from(req: CreateTicketReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            subject: req.subject,
            description: req.description,
            priority: req.priority,
        }
    }
}

impl From<UpdateTicketReq> for TicketPatch {
    fn from(req: UpdateTicketReq) -> Self {
        Self {
            status: req.status,
            resolved_at: req.resolved_at,
        }
    }
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            ticket_id: note.ticket_id,
            content: note.content,
            created_at: note.created_at,
        }
    }
}

impl From<CreateNoteReq> for NewNote {
    fn from(req: CreateNoteReq) -> Self {
        Self {
            content: req.content,
        }
    }
}

impl From<TicketStats> for TicketStatsDto {
    fn from(stats: TicketStats) -> Self {
        Self {
            total_tickets: stats.total_tickets,
            live_tickets: stats.live_tickets,
            resolved_tickets: stats.resolved_tickets,
            avg_response_time_ms: stats.avg_response_time_ms,
        }
    }
}

impl From<TimelineEntry> for TimelineEntryDto {
    fn from(entry: TimelineEntry) -> Self {
        match entry {
            TimelineEntry::Note(note) => Self::Note {
                id: note.id,
                ticket_id: note.ticket_id,
                content: note.content,
                created_at: note.created_at,
            },
            TimelineEntry::Created { at, name } => Self::Created { at, name },
        }
    }
}
