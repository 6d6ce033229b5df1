use async_trait::async_trait;
use deskrail_core::{AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{CompanyId, Ticket, TicketId};

use crate::scope_filter::ScopeFilter;

/// Input for ticket creation. Lifecycle and SLA handling are outside this
/// core; tickets start in the open state.
#[derive(Debug, Clone)]
pub struct CreateTicketInput {
    /// Organization the ticket belongs to.
    pub organization_id: OrganizationId,
    /// Department the ticket is routed to.
    pub department_id: DepartmentId,
    /// Requester's company, when known.
    pub company_id: Option<CompanyId>,
    /// Short summary line.
    pub subject: String,
}

/// Repository port for ticket storage.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Lists tickets admitted by the scope filter.
    async fn list_tickets(&self, filter: &ScopeFilter) -> AppResult<Vec<Ticket>>;

    /// Finds one ticket by id, unscoped; callers apply the scope filter.
    async fn find_ticket(&self, id: TicketId) -> AppResult<Option<Ticket>>;

    /// Persists a new ticket.
    async fn create_ticket(&self, ticket: Ticket) -> AppResult<()>;
}
