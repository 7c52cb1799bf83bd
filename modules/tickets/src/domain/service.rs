use std::sync::Arc;

use crate::contract::model::{
    NewNote, NewTicket, Note, Priority, Status, Ticket, TicketPatch, TicketStats, TimelineEntry,
};
use crate::domain::error::DomainError;
use crate::domain::repo::TicketsRepository;
use crate::domain::{derived, timeline};
use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Domain service enforcing the ticket lifecycle.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn TicketsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_subject_length: usize,
    pub max_description_length: usize,
    pub max_note_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_subject_length: 200,
            max_description_length: 5000,
            max_note_length: 2000,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn TicketsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "tickets.service.get_ticket", skip(self), fields(ticket_id = %id))]
    pub async fn get_ticket(&self, id: Uuid) -> Result<Ticket, DomainError> {
        debug!("Getting ticket by id");
        self.load_ticket(id).await
    }

    #[instrument(name = "tickets.service.list_tickets", skip(self))]
    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, DomainError> {
        debug!("Listing all tickets");
        self.repo
            .list_tickets()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Open tickets, newest created first.
    #[instrument(name = "tickets.service.live_tickets", skip(self))]
    pub async fn live_tickets(&self) -> Result<Vec<Ticket>, DomainError> {
        Ok(derived::live_view(self.list_tickets().await?))
    }

    /// Resolved tickets, newest resolved first.
    #[instrument(name = "tickets.service.past_tickets", skip(self))]
    pub async fn past_tickets(&self) -> Result<Vec<Ticket>, DomainError> {
        Ok(derived::past_view(self.list_tickets().await?))
    }

    /// Aggregate counters over the whole ticket set.
    #[instrument(name = "tickets.service.stats", skip(self))]
    pub async fn stats(&self) -> Result<TicketStats, DomainError> {
        Ok(derived::compute_stats(&self.list_tickets().await?))
    }

    #[instrument(
        name = "tickets.service.create_ticket",
        skip(self, new_ticket),
        fields(subject = %new_ticket.subject)
    )]
    pub async fn create_ticket(&self, new_ticket: NewTicket) -> Result<Ticket, DomainError> {
        info!("Creating new ticket");

        let priority = self.validate_new_ticket(&new_ticket)?;

        let ticket = Ticket {
            id: Uuid::new_v4(),
            name: new_ticket.name,
            email: new_ticket.email,
            subject: new_ticket.subject,
            description: new_ticket.description,
            priority,
            status: Status::Open,
            created_at: Utc::now(),
            resolved_at: None,
        };

        self.repo
            .insert_ticket(ticket.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created ticket with id={}", ticket.id);
        Ok(ticket)
    }

    /// Resolve an open ticket, stamping the resolution time from the server
    /// clock. First resolve wins: a ticket that is already resolved is
    /// returned unchanged and its `resolved_at` is never re-stamped.
    #[instrument(name = "tickets.service.resolve_ticket", skip(self), fields(ticket_id = %id))]
    pub async fn resolve_ticket(&self, id: Uuid) -> Result<Ticket, DomainError> {
        info!("Resolving ticket");
        let current = self.load_ticket(id).await?;
        self.apply_resolution(current).await
    }

    /// Apply a partial update. A patch to `resolved` behaves exactly like
    /// `resolve_ticket`; the lifecycle is one-way, so a patch attempting
    /// resolved → open is rejected. Any client-supplied `resolved_at` is
    /// discarded: the server clock is the only authority on resolution time.
    #[instrument(name = "tickets.service.update_ticket", skip(self, patch), fields(ticket_id = %id))]
    pub async fn update_ticket(&self, id: Uuid, patch: TicketPatch) -> Result<Ticket, DomainError> {
        info!("Updating ticket");

        let status = match patch.status.as_deref() {
            None => None,
            Some(raw) => Some(Status::from_str(raw).ok_or_else(|| {
                DomainError::validation("status", "must be one of: open, resolved")
            })?),
        };

        let current = self.load_ticket(id).await?;

        match status {
            None => Ok(current),
            Some(Status::Resolved) => self.apply_resolution(current).await,
            Some(Status::Open) if current.status == Status::Resolved => Err(
                DomainError::validation("status", "a resolved ticket cannot be reopened"),
            ),
            Some(Status::Open) => Ok(current),
        }
    }

    /// Delete a ticket and all of its notes. Terminal: afterwards the id
    /// yields not-found everywhere.
    #[instrument(name = "tickets.service.delete_ticket", skip(self), fields(ticket_id = %id))]
    pub async fn delete_ticket(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting ticket");

        let deleted = self
            .repo
            .delete_ticket(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::ticket_not_found(id));
        }

        info!("Successfully deleted ticket");
        Ok(())
    }

    /// Append a note. The ticket must exist (checked before any write).
    #[instrument(name = "tickets.service.add_note", skip(self, new_note), fields(ticket_id = %ticket_id))]
    pub async fn add_note(&self, ticket_id: Uuid, new_note: NewNote) -> Result<Note, DomainError> {
        info!("Adding note to ticket");

        self.validate_note(&new_note)?;
        self.load_ticket(ticket_id).await?;

        let note = Note {
            id: Uuid::new_v4(),
            ticket_id,
            content: new_note.content,
            created_at: Utc::now(),
        };

        self.repo
            .insert_note(note.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully added note with id={}", note.id);
        Ok(note)
    }

    /// Notes for a ticket, newest first.
    #[instrument(name = "tickets.service.notes", skip(self), fields(ticket_id = %ticket_id))]
    pub async fn notes(&self, ticket_id: Uuid) -> Result<Vec<Note>, DomainError> {
        self.load_ticket(ticket_id).await?;
        self.repo
            .notes_for_ticket(ticket_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Merged timeline: notes newest first plus the creation entry.
    #[instrument(name = "tickets.service.timeline", skip(self), fields(ticket_id = %ticket_id))]
    pub async fn timeline(&self, ticket_id: Uuid) -> Result<Vec<TimelineEntry>, DomainError> {
        let ticket = self.load_ticket(ticket_id).await?;
        let notes = self
            .repo
            .notes_for_ticket(ticket_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(timeline::assemble(&ticket, notes))
    }

    // --- internal helpers ---

    async fn load_ticket(&self, id: Uuid) -> Result<Ticket, DomainError> {
        self.repo
            .find_ticket(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::ticket_not_found(id))
    }

    async fn apply_resolution(&self, mut ticket: Ticket) -> Result<Ticket, DomainError> {
        if ticket.status == Status::Resolved {
            debug!("Ticket already resolved, returning stored record");
            return Ok(ticket);
        }

        ticket.status = Status::Resolved;
        ticket.resolved_at = Some(Utc::now());

        self.repo
            .update_ticket(ticket.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully resolved ticket");
        Ok(ticket)
    }

    // --- validation helpers ---

    fn validate_new_ticket(&self, new_ticket: &NewTicket) -> Result<Priority, DomainError> {
        require_non_empty("name", &new_ticket.name)?;
        require_non_empty("email", &new_ticket.email)?;
        validate_email(&new_ticket.email)?;
        require_non_empty("subject", &new_ticket.subject)?;
        require_max_length(
            "subject",
            &new_ticket.subject,
            self.config.max_subject_length,
        )?;
        require_non_empty("description", &new_ticket.description)?;
        require_max_length(
            "description",
            &new_ticket.description,
            self.config.max_description_length,
        )?;

        match new_ticket.priority.as_deref() {
            None => Ok(Priority::default()),
            Some(raw) => Priority::from_str(raw).ok_or_else(|| {
                DomainError::validation("priority", "must be one of: low, medium, high, urgent")
            }),
        }
    }

    fn validate_note(&self, new_note: &NewNote) -> Result<(), DomainError> {
        require_non_empty("content", &new_note.content)?;
        require_max_length("content", &new_note.content, self.config.max_note_length)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_max_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.len() > max {
        return Err(DomainError::validation(
            field,
            format!("too long: {} characters (max: {})", value.len(), max),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if !email.contains('@') || !email.contains('.') {
        return Err(DomainError::validation("email", "is not a valid address"));
    }
    Ok(())
}
