//! The authenticated principal and its typed scope reaches.
//!
//! The three stored capability booleans are collapsed into explicit reach
//! values exactly once, here, when the principal is constructed. Downstream
//! code matches on `OrganizationReach`/`DepartmentReach` and never re-derives
//! bypass logic from raw flags.

use deskrail_core::{DepartmentId, OrganizationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::security::{PermissionSet, UserRole};

/// How far a principal's organization scope reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationReach {
    /// Only the home organization.
    Home,
    /// Every organization in the deployment.
    Global,
}

/// How far a principal's department scope reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentReach {
    /// Only the home department, within the home organization.
    Home,
    /// Every department of the home organization.
    OrganizationWide,
    /// Every department of every reachable organization.
    Global,
}

/// Raw capability flags as stored on the user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    /// Unconditional access to all organizations, departments, permissions.
    pub is_super_user: bool,
    /// Organization scope beyond the home organization.
    pub can_cross_organizations: bool,
    /// Department scope beyond the home department.
    pub can_cross_departments: bool,
}

/// The immutable identity evaluated for every access decision.
///
/// Constructed once per request by the identity context and passed explicitly
/// to downstream calls; nothing here changes for the request's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: Uuid,
    organization_id: OrganizationId,
    department_id: Option<DepartmentId>,
    role: UserRole,
    is_super_user: bool,
    organization_reach: OrganizationReach,
    department_reach: DepartmentReach,
    permissions: PermissionSet,
}

impl Principal {
    /// Creates a principal, computing reaches from the capability flags.
    ///
    /// A super-user implicitly has both cross flags regardless of stored
    /// value, and receives the universal permission set.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
        role: UserRole,
        flags: CapabilityFlags,
        permissions: PermissionSet,
    ) -> Self {
        let organization_reach = if flags.is_super_user || flags.can_cross_organizations {
            OrganizationReach::Global
        } else {
            OrganizationReach::Home
        };

        let department_reach = if flags.is_super_user {
            DepartmentReach::Global
        } else if flags.can_cross_departments {
            DepartmentReach::OrganizationWide
        } else {
            DepartmentReach::Home
        };

        let permissions = if flags.is_super_user {
            PermissionSet::universal()
        } else {
            permissions
        };

        Self {
            user_id,
            organization_id,
            department_id,
            role,
            is_super_user: flags.is_super_user,
            organization_reach,
            department_reach,
            permissions,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the home organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the home department, if any.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the principal's role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Returns whether the principal is a super-user.
    #[must_use]
    pub fn is_super_user(&self) -> bool {
        self.is_super_user
    }

    /// Returns the organization scope reach.
    #[must_use]
    pub fn organization_reach(&self) -> OrganizationReach {
        self.organization_reach
    }

    /// Returns the department scope reach.
    #[must_use]
    pub fn department_reach(&self) -> DepartmentReach {
        self.department_reach
    }

    /// Returns the resolved permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the principal may perform `action` on `resource`.
    ///
    /// True for super-users, or when the permission set contains `*`,
    /// `resource:*`, or `resource:action`. There is no deny form that can
    /// override a grant.
    #[must_use]
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.is_super_user || self.permissions.allows(resource, action)
    }

    /// Returns whether any of the resource/action pairs is granted.
    #[must_use]
    pub fn has_any_permission(&self, pairs: &[(&str, &str)]) -> bool {
        pairs
            .iter()
            .any(|(resource, action)| self.has_permission(resource, action))
    }
}

#[cfg(test)]
mod tests {
    use deskrail_core::{DepartmentId, OrganizationId};
    use uuid::Uuid;

    use super::{CapabilityFlags, DepartmentReach, OrganizationReach, Principal};
    use crate::security::{PermissionSet, UserRole};

    fn principal_with(flags: CapabilityFlags, permissions: PermissionSet) -> Principal {
        Principal::new(
            Uuid::new_v4(),
            OrganizationId::new(),
            Some(DepartmentId::new()),
            UserRole::CompanyAgent,
            flags,
            permissions,
        )
    }

    #[test]
    fn plain_principal_has_home_reaches() {
        let principal = principal_with(CapabilityFlags::default(), PermissionSet::new());
        assert_eq!(principal.organization_reach(), OrganizationReach::Home);
        assert_eq!(principal.department_reach(), DepartmentReach::Home);
    }

    #[test]
    fn super_user_overrides_stored_cross_flags() {
        let principal = principal_with(
            CapabilityFlags {
                is_super_user: true,
                can_cross_organizations: false,
                can_cross_departments: false,
            },
            PermissionSet::new(),
        );
        assert_eq!(principal.organization_reach(), OrganizationReach::Global);
        assert_eq!(principal.department_reach(), DepartmentReach::Global);
        assert!(principal.has_permission("tickets", "delete"));
    }

    #[test]
    fn cross_flags_are_independent_axes() {
        let cross_organizations = principal_with(
            CapabilityFlags {
                can_cross_organizations: true,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );
        assert_eq!(
            cross_organizations.organization_reach(),
            OrganizationReach::Global
        );
        assert_eq!(cross_organizations.department_reach(), DepartmentReach::Home);

        let cross_departments = principal_with(
            CapabilityFlags {
                can_cross_departments: true,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );
        assert_eq!(
            cross_departments.organization_reach(),
            OrganizationReach::Home
        );
        assert_eq!(
            cross_departments.department_reach(),
            DepartmentReach::OrganizationWide
        );
    }

    #[test]
    fn permission_check_honors_wildcards_and_exact_grants() {
        let set = PermissionSet::parse_all(&["tickets:list", "tickets:create"])
            .unwrap_or_default();
        let principal = principal_with(CapabilityFlags::default(), set);

        assert!(principal.has_permission("tickets", "list"));
        assert!(!principal.has_permission("tickets", "delete"));
        assert!(principal.has_any_permission(&[("tickets", "delete"), ("tickets", "create")]));
        assert!(!principal.has_any_permission(&[("users", "list"), ("roles", "manage")]));
    }
}
