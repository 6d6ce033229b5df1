//! PostgreSQL-backed ticket storage.

use async_trait::async_trait;
use deskrail_application::{ScopeFilter, TicketRepository};
use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{CompanyId, Ticket, TicketId, TicketStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::postgres_user_repository::scope_binds;

type TicketRow = (Uuid, Uuid, Uuid, Option<Uuid>, String, String, Uuid);

/// PostgreSQL-backed ticket repository.
#[derive(Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn ticket_from_row(row: TicketRow) -> AppResult<Ticket> {
    let (id, organization_id, department_id, company_id, subject, status, requester_id) = row;
    Ok(Ticket {
        id: TicketId::from_uuid(id),
        organization_id: OrganizationId::from_uuid(organization_id),
        department_id: DepartmentId::from_uuid(department_id),
        company_id: company_id.map(CompanyId::from_uuid),
        subject,
        status: TicketStatus::parse(status.as_str())?,
        requester_id,
    })
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn list_tickets(&self, filter: &ScopeFilter) -> AppResult<Vec<Ticket>> {
        let (organizations, home_organization, departments) = scope_binds(filter);

        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, organization_id, department_id, company_id, subject, status, requester_id
            FROM tickets
            WHERE ($1::uuid[] IS NULL OR organization_id = ANY($1))
              AND ($2::uuid IS NULL
                   OR organization_id <> $2
                   OR department_id = ANY($3))
            ORDER BY created_at DESC
            "#,
        )
        .bind(organizations)
        .bind(home_organization)
        .bind(departments)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to list tickets: {error}")))?;

        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn find_ticket(&self, id: TicketId) -> AppResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, organization_id, department_id, company_id, subject, status, requester_id
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to load ticket: {error}")))?;

        row.map(ticket_from_row).transpose()
    }

    async fn create_ticket(&self, ticket: Ticket) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, organization_id, department_id, company_id, subject, status, requester_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.organization_id.as_uuid())
        .bind(ticket.department_id.as_uuid())
        .bind(ticket.company_id.map(|id| id.as_uuid()))
        .bind(ticket.subject)
        .bind(ticket.status.as_str())
        .bind(ticket.requester_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create ticket: {error}")))?;

        Ok(())
    }
}
