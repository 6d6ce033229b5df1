use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskrail_core::{AppResult, OrganizationId};
use deskrail_domain::PermissionSet;
use uuid::Uuid;

/// A role definition: a name plus validated permission grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role id.
    pub role_id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Validated grants carried by the role.
    pub permissions: PermissionSet,
    /// Built-in roles cannot be deleted.
    pub is_system: bool,
}

/// A role assignment row for one user.
///
/// Assignments are soft-revoked (`is_active = false`) rather than removed,
/// preserving an auditable history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Stable assignment id.
    pub assignment_id: Uuid,
    /// User the role is granted to.
    pub user_id: Uuid,
    /// Name of the granted role.
    pub role_name: String,
    /// `None` for a system-wide assignment, otherwise the organization the
    /// assignment is scoped to.
    pub organization_scope: Option<OrganizationId>,
    /// Inactive assignments contribute no permissions.
    pub is_active: bool,
    /// When the assignment was granted.
    pub assigned_at: DateTime<Utc>,
}

/// An active grant resolved for identity-context construction: the role's
/// permissions plus the assignment's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoleGrant {
    /// Name of the granted role.
    pub role_name: String,
    /// Assignment scope; `None` means system-wide.
    pub organization_scope: Option<OrganizationId>,
    /// The role's permission grants.
    pub permissions: PermissionSet,
}

/// Input for custom role creation. Permission tokens are validated against
/// the registry by the service before this reaches storage.
#[derive(Debug, Clone)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Permission tokens in `resource:action` form.
    pub permissions: Vec<String>,
}

/// Repository port for role definitions and assignments.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every role definition.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Finds a role definition by name.
    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>>;

    /// Persists a new role definition.
    async fn create_role(&self, role: RoleDefinition) -> AppResult<()>;

    /// Returns the active grants contributing permissions to a user,
    /// joining assignments with their role definitions.
    async fn active_grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<ActiveRoleGrant>>;

    /// Lists every assignment for a user, active and revoked.
    async fn list_assignments_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>>;

    /// Persists a new assignment.
    async fn create_assignment(&self, assignment: RoleAssignment) -> AppResult<()>;

    /// Soft-revokes an assignment by flipping `is_active` off.
    async fn revoke_assignment(&self, assignment_id: Uuid) -> AppResult<()>;
}
