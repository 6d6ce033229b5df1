//! Permission grants, the closed resource/action registry, and role names.
//!
//! Permission tokens are free-form `resource:action` strings in storage, but
//! every token is validated against the registry below when a role is created
//! or loaded, so a typo surfaces as a validation error instead of a silent
//! authorization bypass.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use deskrail_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Closed registry of known resources and the actions defined on each.
const REGISTRY: &[(&str, &[&str])] = &[
    ("tickets", &["list", "read", "create", "update", "delete", "assign"]),
    ("users", &["list", "read", "create", "update", "deactivate"]),
    ("departments", &["list", "read", "create", "update", "deactivate"]),
    ("companies", &["list", "read", "create", "update", "deactivate"]),
    ("organizations", &["list", "read", "create", "update", "deactivate"]),
    ("roles", &["list", "read", "manage"]),
];

/// Returns all resource names in the registry.
#[must_use]
pub fn known_resources() -> Vec<&'static str> {
    REGISTRY.iter().map(|(resource, _)| *resource).collect()
}

/// Returns the actions defined for a resource, if the resource is known.
#[must_use]
pub fn known_actions(resource: &str) -> Option<&'static [&'static str]> {
    REGISTRY
        .iter()
        .find(|(known, _)| *known == resource)
        .map(|(_, actions)| *actions)
}

/// A single validated permission token.
///
/// Three forms exist: `*` (everything), `resource:*` (all actions on one
/// resource), and `resource:action`. All three are equivalent grants; there
/// is no deny form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PermissionGrant {
    /// Grants every action on every resource.
    Universal,
    /// Grants every action on one resource.
    Resource(String),
    /// Grants one action on one resource.
    Action(String, String),
}

impl PermissionGrant {
    /// Parses and validates a permission token against the registry.
    pub fn parse(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed == "*" {
            return Ok(Self::Universal);
        }

        let Some((resource, action)) = trimmed.split_once(':') else {
            return Err(AppError::Validation(format!(
                "permission '{trimmed}' must be '*' or 'resource:action'"
            )));
        };

        let Some(actions) = known_actions(resource) else {
            return Err(AppError::Validation(format!(
                "unknown permission resource '{resource}'"
            )));
        };

        if action == "*" {
            return Ok(Self::Resource(resource.to_owned()));
        }

        if !actions.contains(&action) {
            return Err(AppError::Validation(format!(
                "unknown action '{action}' for resource '{resource}'"
            )));
        }

        Ok(Self::Action(resource.to_owned(), action.to_owned()))
    }

    /// Returns the stable storage token for this grant.
    #[must_use]
    pub fn as_token(&self) -> String {
        match self {
            Self::Universal => "*".to_owned(),
            Self::Resource(resource) => format!("{resource}:*"),
            Self::Action(resource, action) => format!("{resource}:{action}"),
        }
    }
}

impl Display for PermissionGrant {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_token())
    }
}

impl FromStr for PermissionGrant {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PermissionGrant {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<PermissionGrant> for String {
    fn from(value: PermissionGrant) -> Self {
        value.as_token()
    }
}

/// Immutable set of permission grants resolved for one principal.
///
/// Union-only: adding a grant never revokes another, and no grant can negate
/// one. Absence of a matching grant is the only form of denial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    grants: BTreeSet<PermissionGrant>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the universal permission set.
    #[must_use]
    pub fn universal() -> Self {
        Self {
            grants: BTreeSet::from([PermissionGrant::Universal]),
        }
    }

    /// Creates a set from validated grants.
    #[must_use]
    pub fn from_grants(grants: impl IntoIterator<Item = PermissionGrant>) -> Self {
        Self {
            grants: grants.into_iter().collect(),
        }
    }

    /// Parses and validates a list of storage tokens into a set.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> AppResult<Self> {
        let grants = tokens
            .iter()
            .map(|token| PermissionGrant::parse(token.as_ref()))
            .collect::<AppResult<BTreeSet<_>>>()?;

        Ok(Self { grants })
    }

    /// Merges another set into this one.
    pub fn extend(&mut self, other: Self) {
        self.grants.extend(other.grants);
    }

    /// Returns whether the set grants the given resource/action pair.
    #[must_use]
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.grants.iter().any(|grant| match grant {
            PermissionGrant::Universal => true,
            PermissionGrant::Resource(granted) => granted == resource,
            PermissionGrant::Action(granted_resource, granted_action) => {
                granted_resource == resource && granted_action == action
            }
        })
    }

    /// Returns whether the set contains no grants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Returns the storage tokens for every grant in the set.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        self.grants.iter().map(PermissionGrant::as_token).collect()
    }

    /// Iterates over the grants in the set.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionGrant> {
        self.grants.iter()
    }
}

/// Fixed role enumeration for user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator staff.
    SystemAdmin,
    /// Administrator of a client organization.
    CompanyAdmin,
    /// Agent working tickets inside a client organization.
    CompanyAgent,
    /// End customer of a managed company.
    Customer,
}

impl UserRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::CompanyAdmin => "company_admin",
            Self::CompanyAgent => "company_agent",
            Self::Customer => "customer",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system_admin" => Ok(Self::SystemAdmin),
            "company_admin" => Ok(Self::CompanyAdmin),
            "company_agent" => Ok(Self::CompanyAgent),
            "customer" => Ok(Self::Customer),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{PermissionGrant, PermissionSet, UserRole, known_actions, known_resources};

    #[test]
    fn universal_token_parses() {
        assert_eq!(
            PermissionGrant::parse("*").ok(),
            Some(PermissionGrant::Universal)
        );
    }

    #[test]
    fn resource_wildcard_parses_for_known_resource() {
        assert_eq!(
            PermissionGrant::parse("tickets:*").ok(),
            Some(PermissionGrant::Resource("tickets".to_owned()))
        );
    }

    #[test]
    fn unknown_resource_is_rejected() {
        assert!(PermissionGrant::parse("invoices:read").is_err());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(PermissionGrant::parse("tickets:approve").is_err());
    }

    #[test]
    fn token_without_separator_is_rejected() {
        assert!(PermissionGrant::parse("tickets").is_err());
    }

    #[test]
    fn grant_roundtrip_storage_token() {
        let grant = PermissionGrant::parse("tickets:assign");
        assert!(grant.is_ok());
        let token = grant.map(|value| value.as_token()).unwrap_or_default();
        assert_eq!(token, "tickets:assign");
    }

    #[test]
    fn exact_grant_allows_only_its_pair() {
        let set = PermissionSet::parse_all(&["tickets:list"]).unwrap_or_default();
        assert!(set.allows("tickets", "list"));
        assert!(!set.allows("tickets", "delete"));
        assert!(!set.allows("users", "list"));
    }

    #[test]
    fn resource_wildcard_allows_every_action() {
        let set = PermissionSet::parse_all(&["tickets:*"]).unwrap_or_default();
        assert!(set.allows("tickets", "delete"));
        assert!(!set.allows("users", "list"));
    }

    #[test]
    fn universal_allows_everything() {
        let set = PermissionSet::universal();
        assert!(set.allows("tickets", "delete"));
        assert!(set.allows("roles", "manage"));
    }

    #[test]
    fn every_registry_pair_parses() {
        for resource in known_resources() {
            let actions = known_actions(resource).unwrap_or(&[]);
            assert!(!actions.is_empty());
            for action in actions {
                assert!(PermissionGrant::parse(&format!("{resource}:{action}")).is_ok());
            }
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::from_str("manager").is_err());
    }

    fn arbitrary_grant() -> impl Strategy<Value = PermissionGrant> {
        let pairs: Vec<(String, String)> = known_resources()
            .into_iter()
            .flat_map(|resource| {
                known_actions(resource)
                    .unwrap_or(&[])
                    .iter()
                    .map(move |action| (resource.to_owned(), (*action).to_owned()))
            })
            .collect();

        prop::sample::select(pairs)
            .prop_map(|(resource, action)| PermissionGrant::Action(resource, action))
    }

    proptest! {
        // Adding a grant never revokes an existing grant.
        #[test]
        fn grants_are_monotonic(
            base in prop::collection::btree_set(arbitrary_grant(), 0..8),
            extra in arbitrary_grant(),
            resource in prop::sample::select(known_resources()),
        ) {
            let actions = known_actions(resource).unwrap_or(&[]);
            let before = PermissionSet::from_grants(base.clone());
            let mut after_grants = base;
            after_grants.insert(extra);
            let after = PermissionSet::from_grants(after_grants);

            for action in actions {
                if before.allows(resource, action) {
                    prop_assert!(after.allows(resource, action));
                }
            }
        }
    }
}
