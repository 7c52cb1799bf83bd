//! SeaORM-backed repository implementation for the domain port.
//!
//! Holds a pooled `DatabaseConnection`; the delete-with-cascade runs in a
//! transaction so a ticket and its notes disappear as one atomic unit.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Note, Ticket, User};
use crate::domain::repo::TicketsRepository;
use crate::infra::storage::entity::{note, ticket, user};
use crate::infra::storage::mapper;

pub struct SeaOrmTicketsRepository {
    conn: DatabaseConnection,
}

impl SeaOrmTicketsRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TicketsRepository for SeaOrmTicketsRepository {
    async fn list_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
        let rows = ticket::Entity::find()
            .all(&self.conn)
            .await
            .context("list_tickets failed")?;
        rows.into_iter().map(mapper::ticket_to_contract).collect()
    }

    async fn find_ticket(&self, id: Uuid) -> anyhow::Result<Option<Ticket>> {
        let found = ticket::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_ticket failed")?;
        found.map(mapper::ticket_to_contract).transpose()
    }

    async fn insert_ticket(&self, t: Ticket) -> anyhow::Result<()> {
        let m = ticket::ActiveModel {
            id: Set(t.id),
            name: Set(t.name),
            email: Set(t.email),
            subject: Set(t.subject),
            description: Set(t.description),
            priority: Set(t.priority.as_str().to_string()),
            status: Set(t.status.as_str().to_string()),
            created_at: Set(t.created_at),
            resolved_at: Set(t.resolved_at),
        };
        let _ = m.insert(&self.conn).await.context("insert_ticket failed")?;
        Ok(())
    }

    async fn update_ticket(&self, t: Ticket) -> anyhow::Result<()> {
        let m = ticket::ActiveModel {
            id: Set(t.id),
            name: Set(t.name),
            email: Set(t.email),
            subject: Set(t.subject),
            description: Set(t.description),
            priority: Set(t.priority.as_str().to_string()),
            status: Set(t.status.as_str().to_string()),
            created_at: Set(t.created_at),
            resolved_at: Set(t.resolved_at),
        };
        let _ = m.update(&self.conn).await.context("update_ticket failed")?;
        Ok(())
    }

    async fn delete_ticket(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("begin delete transaction failed")?;

        note::Entity::delete_many()
            .filter(note::Column::TicketId.eq(id))
            .exec(&txn)
            .await
            .context("cascade note delete failed")?;

        let res = ticket::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete_ticket failed")?;

        txn.commit()
            .await
            .context("commit delete transaction failed")?;

        Ok(res.rows_affected > 0)
    }

    async fn notes_for_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Vec<Note>> {
        let rows = note::Entity::find()
            .filter(note::Column::TicketId.eq(ticket_id))
            .order_by_desc(note::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("notes_for_ticket failed")?;
        Ok(rows.into_iter().map(mapper::note_to_contract).collect())
    }

    async fn insert_note(&self, n: Note) -> anyhow::Result<()> {
        let m = note::ActiveModel {
            id: Set(n.id),
            ticket_id: Set(n.ticket_id),
            content: Set(n.content),
            created_at: Set(n.created_at),
        };
        let _ = m.insert(&self.conn).await.context("insert_note failed")?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_user failed")?;
        Ok(found.map(mapper::user_to_contract))
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_user_by_username failed")?;
        Ok(found.map(mapper::user_to_contract))
    }

    async fn insert_user(&self, u: User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            password: Set(u.password),
        };
        let _ = m.insert(&self.conn).await.context("insert_user failed")?;
        Ok(())
    }
}
