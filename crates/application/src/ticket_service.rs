//! Ticket reads and creation under tenant scoping.
//!
//! Tickets are the reference tenant-owned resource: every read goes through
//! the scoped query filter and every write is admitted against the caller's
//! reach before it touches storage.

use std::sync::Arc;

use deskrail_core::{AppError, AppResult, NonEmptyString};
use deskrail_domain::{Principal, Ticket, TicketId, TicketStatus};

use crate::directory_ports::DirectoryRepository;
use crate::scope_filter::ScopedEntity;
use crate::tenant_scope_service::TenantScopeService;
use crate::ticket_ports::{CreateTicketInput, TicketRepository};

/// Ticket use cases.
#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
    directory: Arc<dyn DirectoryRepository>,
    scopes: TenantScopeService,
}

impl TicketService {
    /// Creates a service over the ticket and directory ports.
    #[must_use]
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        directory: Arc<dyn DirectoryRepository>,
        scopes: TenantScopeService,
    ) -> Self {
        Self {
            tickets,
            directory,
            scopes,
        }
    }

    /// Lists the tickets the caller may see.
    pub async fn list_tickets(&self, principal: &Principal) -> AppResult<Vec<Ticket>> {
        let filter = self
            .scopes
            .scope_filter(principal, ScopedEntity::Tickets)
            .await?;
        self.tickets.list_tickets(&filter).await
    }

    /// Fetches one ticket, enforcing reach.
    pub async fn get_ticket(&self, principal: &Principal, id: TicketId) -> AppResult<Ticket> {
        let Some(ticket) = self.tickets.find_ticket(id).await? else {
            return Err(AppError::NotFound(format!("ticket '{id}' not found")));
        };

        let filter = self
            .scopes
            .scope_filter(principal, ScopedEntity::Tickets)
            .await?;
        if filter.permits(ticket.organization_id, Some(ticket.department_id)) {
            return Ok(ticket);
        }

        let organization_reachable = self
            .scopes
            .can_access_organization(principal, ticket.organization_id)
            .await?;
        if organization_reachable {
            return Err(AppError::DepartmentScopeDenied(format!(
                "ticket '{id}' is outside your department scope"
            )));
        }
        Err(AppError::OrganizationScopeDenied(format!(
            "ticket '{id}' is outside your organization scope"
        )))
    }

    /// Creates a ticket in a department the caller can reach.
    ///
    /// The target department must belong to the target organization; new
    /// tickets always start in the open state with the caller as requester.
    pub async fn create_ticket(
        &self,
        principal: &Principal,
        input: CreateTicketInput,
    ) -> AppResult<Ticket> {
        let subject: String = NonEmptyString::new(input.subject)?.into();

        self.scopes
            .ensure_department_access(principal, input.department_id)
            .await?;
        let Some(department) = self.directory.find_department(input.department_id).await? else {
            return Err(AppError::NotFound(format!(
                "department '{}' not found",
                input.department_id
            )));
        };
        if department.organization_id != input.organization_id {
            return Err(AppError::Validation(format!(
                "department '{}' does not belong to organization '{}'",
                input.department_id, input.organization_id
            )));
        }

        let ticket = Ticket {
            id: TicketId::new(),
            organization_id: input.organization_id,
            department_id: input.department_id,
            company_id: input.company_id,
            subject,
            status: TicketStatus::Open,
            requester_id: principal.user_id(),
        };
        self.tickets.create_ticket(ticket.clone()).await?;
        Ok(ticket)
    }
}
