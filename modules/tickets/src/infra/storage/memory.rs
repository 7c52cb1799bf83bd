//! In-memory repository: the test double and the `--mock` backend.
//!
//! Plain maps behind parking_lot locks; never fails beyond not-found
//! semantics. Values are cloned in and out, so callers only ever see
//! snapshots of stored state.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::model::{Note, Ticket, User};
use crate::domain::repo::TicketsRepository;

#[derive(Default)]
pub struct InMemoryTicketsRepository {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
    notes: RwLock<HashMap<Uuid, Note>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryTicketsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketsRepository for InMemoryTicketsRepository {
    async fn list_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
        Ok(self.tickets.read().values().cloned().collect())
    }

    async fn find_ticket(&self, id: Uuid) -> anyhow::Result<Option<Ticket>> {
        Ok(self.tickets.read().get(&id).cloned())
    }

    async fn insert_ticket(&self, t: Ticket) -> anyhow::Result<()> {
        self.tickets.write().insert(t.id, t);
        Ok(())
    }

    async fn update_ticket(&self, t: Ticket) -> anyhow::Result<()> {
        self.tickets.write().insert(t.id, t);
        Ok(())
    }

    async fn delete_ticket(&self, id: Uuid) -> anyhow::Result<bool> {
        // The tickets lock is held across the note sweep so the cascade is
        // atomic with respect to readers.
        let mut tickets = self.tickets.write();
        if tickets.remove(&id).is_none() {
            return Ok(false);
        }
        self.notes.write().retain(|_, n| n.ticket_id != id);
        Ok(true)
    }

    async fn notes_for_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .read()
            .values()
            .filter(|n| n.ticket_id == ticket_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert_note(&self, n: Note) -> anyhow::Result<()> {
        self.notes.write().insert(n.id, n);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_user(&self, u: User) -> anyhow::Result<()> {
        self.users.write().insert(u.id, u);
        Ok(())
    }
}
