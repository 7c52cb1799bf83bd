use crate::contract::model::{Note, Ticket, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Implementations hand out owned snapshots; callers never receive aliases
/// into stored state.
#[async_trait]
pub trait TicketsRepository: Send + Sync {
    /// All tickets, no ordering guarantee.
    async fn list_tickets(&self) -> anyhow::Result<Vec<Ticket>>;
    /// Load a ticket by id.
    async fn find_ticket(&self, id: Uuid) -> anyhow::Result<Option<Ticket>>;
    /// Insert a fully-formed ticket.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert_ticket(&self, t: Ticket) -> anyhow::Result<()>;
    /// Update an existing ticket (by primary key in `t.id`).
    async fn update_ticket(&self, t: Ticket) -> anyhow::Result<()>;
    /// Delete a ticket and all of its notes as one atomic unit.
    /// Returns true if the ticket existed.
    async fn delete_ticket(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Notes belonging to a ticket, newest first by created_at.
    async fn notes_for_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Vec<Note>>;
    /// Insert a fully-formed note.
    async fn insert_note(&self, n: Note) -> anyhow::Result<()>;

    /// Load a user by id.
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Load a user by unique username.
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Insert a fully-formed user.
    async fn insert_user(&self, u: User) -> anyhow::Result<()>;
}
