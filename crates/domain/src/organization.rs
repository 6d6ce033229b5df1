use deskrail_core::{AppError, AppResult, OrganizationId};
use serde::{Deserialize, Serialize};

/// Whether an organization is the platform operator or a client.
///
/// Exactly one `system_owner` organization exists per deployment; this is a
/// design invariant enforced by the bootstrap path, not by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    /// The platform operator.
    SystemOwner,
    /// A client organization managing its own departments and companies.
    ClientCompany,
}

impl OrganizationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemOwner => "system_owner",
            Self::ClientCompany => "client_company",
        }
    }

    /// Parses a storage value into an organization kind.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "system_owner" => Ok(Self::SystemOwner),
            "client_company" => Ok(Self::ClientCompany),
            _ => Err(AppError::Validation(format!(
                "unknown organization kind '{value}'"
            ))),
        }
    }
}

/// Root tenant unit owning departments, users, and companies.
///
/// Organizations are soft-deactivated, never hard-deleted, so ticket history
/// keeps valid references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Stable organization identifier.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Operator or client.
    pub kind: OrganizationKind,
    /// Soft-deactivation flag.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::OrganizationKind;

    #[test]
    fn kind_roundtrip_storage_value() {
        let parsed = OrganizationKind::parse(OrganizationKind::SystemOwner.as_str());
        assert_eq!(parsed.ok(), Some(OrganizationKind::SystemOwner));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(OrganizationKind::parse("franchise").is_err());
    }
}
