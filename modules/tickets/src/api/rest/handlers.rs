use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateNoteReq, CreateTicketReq, NoteDto, TicketDto, TicketStatsDto, TimelineEntryDto,
    UpdateTicketReq,
};
use crate::api::rest::error::ApiError;
use crate::contract::model::{Status, Ticket};
use crate::domain::derived;
use crate::domain::service::Service;

/// Fill the derived read-path field appropriate for the ticket's state:
/// open tickets get `timeOpen`, resolved tickets get `resolutionTime`.
fn enrich(ticket: Ticket, now: DateTime<Utc>) -> TicketDto {
    let status = ticket.status;
    let created_at = ticket.created_at;
    let resolved_at = ticket.resolved_at;

    let mut dto = TicketDto::from(ticket);
    match status {
        Status::Open => dto.time_open = Some(derived::time_open(created_at, now)),
        Status::Resolved => {
            dto.resolution_time = resolved_at.map(|r| derived::resolution_time(created_at, r));
        }
    }
    dto
}

/// List all tickets
pub async fn list_tickets(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<TicketDto>>, ApiError> {
    info!("Listing all tickets");

    let tickets = svc.list_tickets().await?;
    Ok(Json(tickets.into_iter().map(TicketDto::from).collect()))
}

/// List open tickets, newest created first, with time-open
pub async fn live_tickets(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<TicketDto>>, ApiError> {
    info!("Listing live tickets");

    let now = Utc::now();
    let tickets = svc.live_tickets().await?;
    Ok(Json(tickets.into_iter().map(|t| enrich(t, now)).collect()))
}

/// List resolved tickets, newest resolved first, with resolution-time
pub async fn past_tickets(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<TicketDto>>, ApiError> {
    info!("Listing past tickets");

    let now = Utc::now();
    let tickets = svc.past_tickets().await?;
    Ok(Json(tickets.into_iter().map(|t| enrich(t, now)).collect()))
}

/// Aggregate ticket statistics
pub async fn ticket_stats(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<TicketStatsDto>, ApiError> {
    info!("Computing ticket statistics");

    let stats = svc.stats().await?;
    Ok(Json(stats.into()))
}

/// Get a specific ticket by ID
pub async fn get_ticket(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDto>, ApiError> {
    info!("Getting ticket {}", id);

    let ticket = svc.get_ticket(id).await?;
    Ok(Json(enrich(ticket, Utc::now())))
}

/// Submit a new ticket
pub async fn create_ticket(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<CreateTicketReq>,
) -> Result<(StatusCode, Json<TicketDto>), ApiError> {
    info!("Creating ticket");

    let ticket = svc.create_ticket(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// Resolve a ticket
pub async fn resolve_ticket(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDto>, ApiError> {
    info!("Resolving ticket {}", id);

    let ticket = svc.resolve_ticket(id).await?;
    Ok(Json(ticket.into()))
}

/// Update a ticket with partial data
pub async fn update_ticket(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTicketReq>,
) -> Result<Json<TicketDto>, ApiError> {
    info!("Updating ticket {}", id);

    let ticket = svc.update_ticket(id, req.into()).await?;
    Ok(Json(ticket.into()))
}

/// Delete a ticket and its notes
pub async fn delete_ticket(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting ticket {}", id);

    svc.delete_ticket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a note to a ticket
pub async fn create_note(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateNoteReq>,
) -> Result<(StatusCode, Json<NoteDto>), ApiError> {
    info!("Adding note to ticket {}", id);

    let note = svc.add_note(id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// List a ticket's notes, newest first
pub async fn list_notes(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<NoteDto>>, ApiError> {
    info!("Listing notes for ticket {}", id);

    let notes = svc.notes(id).await?;
    Ok(Json(notes.into_iter().map(NoteDto::from).collect()))
}

/// Merged timeline for a ticket: notes newest first plus the creation entry
pub async fn get_timeline(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TimelineEntryDto>>, ApiError> {
    info!("Assembling timeline for ticket {}", id);

    let entries = svc.timeline(id).await?;
    Ok(Json(entries.into_iter().map(TimelineEntryDto::from).collect()))
}
