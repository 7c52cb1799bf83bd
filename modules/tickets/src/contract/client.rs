use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{
    NewNote, NewTicket, Note, Ticket, TicketPatch, TicketStats, TimelineEntry,
};

/// Public API trait for the tickets module that other modules can use
#[async_trait]
pub trait TicketsApi: Send + Sync {
    /// Get a ticket by ID
    async fn get_ticket(&self, id: Uuid) -> anyhow::Result<Ticket>;

    /// List all tickets (no ordering guarantee)
    async fn list_tickets(&self) -> anyhow::Result<Vec<Ticket>>;

    /// Open tickets, newest created first
    async fn live_tickets(&self) -> anyhow::Result<Vec<Ticket>>;

    /// Resolved tickets, newest resolved first
    async fn past_tickets(&self) -> anyhow::Result<Vec<Ticket>>;

    /// Aggregate counters over all tickets
    async fn stats(&self) -> anyhow::Result<TicketStats>;

    /// Submit a new ticket
    async fn create_ticket(&self, new_ticket: NewTicket) -> anyhow::Result<Ticket>;

    /// Resolve an open ticket; resolving twice returns the stored record
    /// unchanged (first resolve wins)
    async fn resolve_ticket(&self, id: Uuid) -> anyhow::Result<Ticket>;

    /// Apply a partial update to a ticket
    async fn update_ticket(&self, id: Uuid, patch: TicketPatch) -> anyhow::Result<Ticket>;

    /// Delete a ticket and its notes
    async fn delete_ticket(&self, id: Uuid) -> anyhow::Result<()>;

    /// Append a note to a ticket
    async fn add_note(&self, ticket_id: Uuid, new_note: NewNote) -> anyhow::Result<Note>;

    /// Notes for a ticket, newest first
    async fn notes(&self, ticket_id: Uuid) -> anyhow::Result<Vec<Note>>;

    /// Merged timeline: notes newest first plus the creation entry
    async fn timeline(&self, ticket_id: Uuid) -> anyhow::Result<Vec<TimelineEntry>>;
}
