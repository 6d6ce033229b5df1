//! User account types and validation rules.

use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::CapabilityFlags;
use crate::security::UserRole;

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one
    /// `@`, local part and domain are non-empty, domain contains at least one
    /// `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.splitn(2, '@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// A user account as stored in the directory.
///
/// A user belongs to exactly one home organization at a time; switching
/// organization is a controlled mutation, not multi-homing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable user identifier.
    pub id: Uuid,
    /// Login email.
    pub email: EmailAddress,
    /// Display name.
    pub display_name: String,
    /// Home organization, required.
    pub organization_id: OrganizationId,
    /// Home department, optional.
    pub department_id: Option<DepartmentId>,
    /// Role from the fixed enumeration.
    pub role: UserRole,
    /// Capability flags as stored.
    pub capabilities: CapabilityFlags,
    /// Soft-deactivation flag.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::EmailAddress;

    #[test]
    fn valid_email_is_accepted_and_lowercased() {
        let email = EmailAddress::new("AGENT@Example.COM");
        assert!(email.is_ok());
        assert_eq!(
            email.map(|value| String::from(value)).unwrap_or_default(),
            "agent@example.com"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("agent@nodot").is_err());
    }

    #[test]
    fn empty_email_is_rejected() {
        assert!(EmailAddress::new("").is_err());
    }
}
