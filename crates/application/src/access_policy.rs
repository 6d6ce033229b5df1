//! Declarative per-route access requirements.
//!
//! A route declares what it needs — authentication, a reachable target
//! scope, permissions — as an [`AccessPolicy`] value attached to the route.
//! The gate middleware evaluates the policy once per request; evaluation is
//! read-only and has no side effect beyond short-circuiting.

use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{known_actions, known_resources};

/// Which level of the tenant hierarchy a route targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The route addresses an organization.
    Organization,
    /// The route addresses a department.
    Department,
}

/// A declared target scope, resolved from a named path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRequirement {
    /// Hierarchy level being addressed.
    pub kind: ScopeKind,
    /// Path parameter carrying the target id.
    pub param: &'static str,
}

/// A declared resource/action requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPermission {
    /// Registry resource name.
    pub resource: &'static str,
    /// Registry action name.
    pub action: &'static str,
}

/// The per-route gate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    requires_auth: bool,
    required_scope: Option<ScopeRequirement>,
    required_permissions: Vec<RequiredPermission>,
}

impl AccessPolicy {
    /// A policy that only requires an authenticated principal.
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            required_scope: None,
            required_permissions: Vec::new(),
        }
    }

    /// Adds an organization-scope requirement read from a path parameter.
    #[must_use]
    pub fn with_organization_scope(mut self, param: &'static str) -> Self {
        self.required_scope = Some(ScopeRequirement {
            kind: ScopeKind::Organization,
            param,
        });
        self
    }

    /// Adds a department-scope requirement read from a path parameter.
    #[must_use]
    pub fn with_department_scope(mut self, param: &'static str) -> Self {
        self.required_scope = Some(ScopeRequirement {
            kind: ScopeKind::Department,
            param,
        });
        self
    }

    /// Adds a permission requirement. Multiple requirements are matched with
    /// any-of semantics.
    #[must_use]
    pub fn with_permission(mut self, resource: &'static str, action: &'static str) -> Self {
        self.required_permissions
            .push(RequiredPermission { resource, action });
        self
    }

    /// Validates the declared permissions against the registry.
    ///
    /// Called while the router is built, so a typo in a route declaration is
    /// a startup error rather than a runtime bypass.
    pub fn validated(self) -> AppResult<Self> {
        for required in &self.required_permissions {
            let Some(actions) = known_actions(required.resource) else {
                return Err(AppError::Validation(format!(
                    "route policy names unknown resource '{}' (known: {})",
                    required.resource,
                    known_resources().join(", ")
                )));
            };
            if !actions.contains(&required.action) {
                return Err(AppError::Validation(format!(
                    "route policy names unknown action '{}' for resource '{}'",
                    required.action, required.resource
                )));
            }
        }

        Ok(self)
    }

    /// Whether the route requires an authenticated principal.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// The declared target scope, if any.
    #[must_use]
    pub fn required_scope(&self) -> Option<&ScopeRequirement> {
        self.required_scope.as_ref()
    }

    /// The declared permission requirements.
    #[must_use]
    pub fn required_permissions(&self) -> &[RequiredPermission] {
        &self.required_permissions
    }
}

/// The concrete target ids the gate resolved from the request path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeTarget {
    /// Target organization, when the route declares one.
    pub organization_id: Option<OrganizationId>,
    /// Target department, when the route declares one.
    pub department_id: Option<DepartmentId>,
}

#[cfg(test)]
mod tests {
    use super::AccessPolicy;

    #[test]
    fn known_permissions_validate() {
        let policy = AccessPolicy::authenticated()
            .with_permission("tickets", "list")
            .with_permission("tickets", "create")
            .validated();
        assert!(policy.is_ok());
    }

    #[test]
    fn unknown_resource_fails_validation() {
        let policy = AccessPolicy::authenticated()
            .with_permission("invoices", "list")
            .validated();
        assert!(policy.is_err());
    }

    #[test]
    fn unknown_action_fails_validation() {
        let policy = AccessPolicy::authenticated()
            .with_permission("tickets", "escalate")
            .validated();
        assert!(policy.is_err());
    }
}
