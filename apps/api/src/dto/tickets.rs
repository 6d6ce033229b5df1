use deskrail_domain::Ticket;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for ticket creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-ticket-request.ts"
)]
pub struct CreateTicketRequest {
    pub organization_id: String,
    pub department_id: String,
    pub company_id: Option<String>,
    pub subject: String,
}

/// API representation of a ticket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ticket-response.ts"
)]
pub struct TicketResponse {
    pub id: String,
    pub organization_id: String,
    pub department_id: String,
    pub company_id: Option<String>,
    pub subject: String,
    pub status: String,
    pub requester_id: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            organization_id: ticket.organization_id.to_string(),
            department_id: ticket.department_id.to_string(),
            company_id: ticket.company_id.map(|id| id.to_string()),
            subject: ticket.subject,
            status: ticket.status.as_str().to_owned(),
            requester_id: ticket.requester_id.to_string(),
        }
    }
}
