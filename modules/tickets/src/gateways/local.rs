use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::TicketsApi,
    error::TicketsError,
    model::{NewNote, NewTicket, Note, Ticket, TicketPatch, TicketStats, TimelineEntry},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the TicketsApi trait that delegates to the domain service
pub struct TicketsLocalClient {
    service: Arc<Service>,
}

impl TicketsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TicketsApi for TicketsLocalClient {
    async fn get_ticket(&self, id: Uuid) -> anyhow::Result<Ticket> {
        self.service
            .get_ticket(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn list_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
        self.service
            .list_tickets()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn live_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
        self.service
            .live_tickets()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn past_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
        self.service
            .past_tickets()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn stats(&self) -> anyhow::Result<TicketStats> {
        self.service
            .stats()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn create_ticket(&self, new_ticket: NewTicket) -> anyhow::Result<Ticket> {
        self.service
            .create_ticket(new_ticket)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn resolve_ticket(&self, id: Uuid) -> anyhow::Result<Ticket> {
        self.service
            .resolve_ticket(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_ticket(&self, id: Uuid, patch: TicketPatch) -> anyhow::Result<Ticket> {
        self.service
            .update_ticket(id, patch)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn delete_ticket(&self, id: Uuid) -> anyhow::Result<()> {
        self.service
            .delete_ticket(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn add_note(&self, ticket_id: Uuid, new_note: NewNote) -> anyhow::Result<Note> {
        self.service
            .add_note(ticket_id, new_note)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn notes(&self, ticket_id: Uuid) -> anyhow::Result<Vec<Note>> {
        self.service
            .notes(ticket_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn timeline(&self, ticket_id: Uuid) -> anyhow::Result<Vec<TimelineEntry>> {
        self.service
            .timeline(ticket_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::TicketNotFound { id } => TicketsError::not_found(id),
        DomainError::Validation { field, message } => {
            TicketsError::validation(format!("{}: {}", field, message))
        }
        DomainError::Database { .. } => TicketsError::internal(),
    };

    anyhow::Error::new(contract_error)
}
