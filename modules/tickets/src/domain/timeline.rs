//! Read-time composition of a ticket's timeline: persisted notes, newest
//! first, closed by one synthetic entry for the ticket's creation.

use crate::contract::model::{Note, Ticket, TimelineEntry};

/// Assemble the merged timeline view for a ticket.
///
/// The creation entry is always present and always last, carrying the
/// ticket's `created_at` and submitter name. Notes are ordered newest first
/// regardless of the input order.
pub fn assemble(ticket: &Ticket, mut notes: Vec<Note>) -> Vec<TimelineEntry> {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut entries: Vec<TimelineEntry> = notes.into_iter().map(TimelineEntry::Note).collect();
    entries.push(TimelineEntry::Created {
        at: ticket.created_at,
        name: ticket.name.clone(),
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{Priority, Status};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn sample_ticket() -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            subject: "S".into(),
            description: "D".into(),
            priority: Priority::Medium,
            status: Status::Open,
            created_at: Utc::now() - Duration::hours(2),
            resolved_at: None,
        }
    }

    fn note(ticket_id: Uuid, minutes_ago: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            ticket_id,
            content: format!("note from {minutes_ago}m ago"),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn creation_entry_is_always_present_and_last() {
        let ticket = sample_ticket();

        let entries = assemble(&ticket, vec![]);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            TimelineEntry::Created { at, name } => {
                assert_eq!(*at, ticket.created_at);
                assert_eq!(name, "Alice");
            }
            other => panic!("expected creation entry, got {other:?}"),
        }
    }

    #[test]
    fn notes_come_newest_first_before_creation() {
        let ticket = sample_ticket();
        let older = note(ticket.id, 30);
        let newer = note(ticket.id, 5);

        // Pass them oldest-first to prove the aggregator owns the ordering.
        let entries = assemble(&ticket, vec![older.clone(), newer.clone()]);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], TimelineEntry::Note(newer));
        assert_eq!(entries[1], TimelineEntry::Note(older));
        assert!(matches!(entries[2], TimelineEntry::Created { .. }));
    }
}
