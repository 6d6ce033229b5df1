use std::fmt::{Display, Formatter};

use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::company::CompanyId;

/// Unique identifier for a ticket record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random ticket identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ticket identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TicketId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Coarse ticket state. Lifecycle transitions and SLA tracking live outside
/// this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly created, awaiting triage.
    Open,
    /// Waiting on the requester.
    Pending,
    /// Resolution proposed.
    Resolved,
    /// Terminal state.
    Closed,
}

impl TicketStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parses a storage value into a ticket status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown ticket status '{value}'"
            ))),
        }
    }
}

/// A support ticket, always nested under an organization and department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Stable ticket identifier.
    pub id: TicketId,
    /// Owning organization; the tenancy partition key.
    pub organization_id: OrganizationId,
    /// Department the ticket is routed to.
    pub department_id: DepartmentId,
    /// Company the requester belongs to, when known.
    pub company_id: Option<CompanyId>,
    /// Short summary line.
    pub subject: String,
    /// Coarse state.
    pub status: TicketStatus,
    /// User that opened the ticket.
    pub requester_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::TicketStatus;

    #[test]
    fn status_roundtrip_storage_value() {
        let parsed = TicketStatus::parse(TicketStatus::Pending.as_str());
        assert_eq!(parsed.ok(), Some(TicketStatus::Pending));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(TicketStatus::parse("reopened").is_err());
    }
}
