use std::fmt::{Display, Formatter};

use deskrail_core::{AppError, AppResult, OrganizationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(Uuid);

impl CompanyId {
    /// Creates a new random company identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a company identifier from an existing UUID value.
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

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CompanyId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Service tier attached to a company account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaTier {
    /// Default tier.
    Standard,
    /// Shorter response targets.
    Priority,
    /// Contractual targets with a dedicated hour bank.
    Enterprise,
}

impl SlaTier {
    /// Returns a stable storage value for this tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Priority => "priority",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parses a storage value into an SLA tier.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "standard" => Ok(Self::Standard),
            "priority" => Ok(Self::Priority),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(AppError::Validation(format!("unknown SLA tier '{value}'"))),
        }
    }
}

/// Support hour-bank counters for a company, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBank {
    /// Minutes purchased for the current period.
    pub purchased_minutes: i64,
    /// Minutes consumed against the purchase.
    pub consumed_minutes: i64,
}

impl HourBank {
    /// Returns the remaining balance; negative when overdrawn.
    #[must_use]
    pub fn remaining_minutes(&self) -> i64 {
        self.purchased_minutes - self.consumed_minutes
    }
}

/// A client-facing sub-account inside a client organization.
///
/// Distinct from [`crate::Organization`]: the organization is the platform
/// tenancy/billing boundary; a company is a business entity the organization
/// manages on behalf of its customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Stable company identifier.
    pub id: CompanyId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Email/web domain used to associate inbound requesters.
    pub domain: String,
    /// Service tier.
    pub sla_tier: SlaTier,
    /// Soft-deactivation flag.
    pub is_active: bool,
    /// Support hour-bank counters.
    pub hour_bank: HourBank,
}

#[cfg(test)]
mod tests {
    use super::{HourBank, SlaTier};

    #[test]
    fn sla_tier_roundtrip_storage_value() {
        let parsed = SlaTier::parse(SlaTier::Enterprise.as_str());
        assert_eq!(parsed.ok(), Some(SlaTier::Enterprise));
    }

    #[test]
    fn unknown_sla_tier_is_rejected() {
        assert!(SlaTier::parse("platinum").is_err());
    }

    #[test]
    fn hour_bank_balance_can_go_negative() {
        let bank = HourBank {
            purchased_minutes: 600,
            consumed_minutes: 720,
        };
        assert_eq!(bank.remaining_minutes(), -120);
    }
}
