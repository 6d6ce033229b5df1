use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DepartmentId, OrganizationId};

/// User information persisted in the authenticated session.
///
/// Capability flags are captured at login and never re-derived from mutable
/// request state; the identity context turns them into typed reach values
/// once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    user_id: Uuid,
    organization_id: OrganizationId,
    department_id: Option<DepartmentId>,
    role: String,
    is_super_user: bool,
    can_cross_organizations: bool,
    can_cross_departments: bool,
}

impl SessionUser {
    /// Creates a session identity from authentication and tenancy data.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
        role: impl Into<String>,
        is_super_user: bool,
        can_cross_organizations: bool,
        can_cross_departments: bool,
    ) -> Self {
        Self {
            user_id,
            organization_id,
            department_id,
            role: role.into(),
            is_super_user,
            can_cross_organizations,
            can_cross_departments,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the home organization linked to the identity.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the home department, if the user has one.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the stored role name.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns whether the user is a super-user.
    #[must_use]
    pub fn is_super_user(&self) -> bool {
        self.is_super_user
    }

    /// Returns the stored cross-organization flag.
    #[must_use]
    pub fn can_cross_organizations(&self) -> bool {
        self.can_cross_organizations
    }

    /// Returns the stored cross-department flag.
    #[must_use]
    pub fn can_cross_departments(&self) -> bool {
        self.can_cross_departments
    }
}
