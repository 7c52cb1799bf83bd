use anyhow::{anyhow, Result};

use crate::contract::model::{Note, Priority, Status, Ticket, User};
use crate::infra::storage::entity;

/// Convert a ticket row to the contract model. Fails on enum values the
/// schema should have prevented, so a corrupt row surfaces as a storage
/// error instead of a silently defaulted ticket.
pub fn ticket_to_contract(m: entity::ticket::Model) -> Result<Ticket> {
    let priority = Priority::from_str(&m.priority)
        .ok_or_else(|| anyhow!("unknown priority '{}' in ticket {}", m.priority, m.id))?;
    let status = Status::from_str(&m.status)
        .ok_or_else(|| anyhow!("unknown status '{}' in ticket {}", m.status, m.id))?;

    Ok(Ticket {
        id: m.id,
        name: m.name,
        email: m.email,
        subject: m.subject,
        description: m.description,
        priority,
        status,
        created_at: m.created_at,
        resolved_at: m.resolved_at,
    })
}

pub fn note_to_contract(m: entity::note::Model) -> Note {
    Note {
        id: m.id,
        ticket_id: m.ticket_id,
        content: m.content,
        created_at: m.created_at,
    }
}

pub fn user_to_contract(m: entity::user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        password: m.password,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn row(priority: &str, status: &str) -> entity::ticket::Model {
        entity::ticket::Model {
            id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            subject: "S".into(),
            description: "D".into(),
            priority: priority.into(),
            status: status.into(),
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn maps_known_enum_values() {
        let ticket = ticket_to_contract(row("urgent", "open")).unwrap();
        assert_eq!(ticket.priority, Priority::Urgent);
        assert_eq!(ticket.status, Status::Open);
    }

    #[test]
    fn rejects_corrupt_enum_values() {
        assert!(ticket_to_contract(row("asap", "open")).is_err());
        assert!(ticket_to_contract(row("low", "closed")).is_err());
    }
}
