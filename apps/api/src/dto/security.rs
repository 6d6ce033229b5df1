use deskrail_application::{RoleAssignment, RoleDefinition};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub permissions: Vec<String>,
}

/// API representation of a role definition.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub is_system: bool,
    pub permissions: Vec<String>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(role: RoleDefinition) -> Self {
        Self {
            role_id: role.role_id.to_string(),
            name: role.name,
            is_system: role.is_system,
            permissions: role.permissions.to_tokens(),
        }
    }
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role_name: String,
    pub organization_scope: Option<String>,
}

/// Incoming payload for role revocation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/revoke-role-assignment-request.ts"
)]
pub struct RevokeRoleAssignmentRequest {
    pub assignment_id: String,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub assignment_id: String,
    pub user_id: String,
    pub role_name: String,
    pub organization_scope: Option<String>,
    pub is_active: bool,
    pub assigned_at: String,
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(assignment: RoleAssignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id.to_string(),
            user_id: assignment.user_id.to_string(),
            role_name: assignment.role_name,
            organization_scope: assignment.organization_scope.map(|id| id.to_string()),
            is_active: assignment.is_active,
            assigned_at: assignment.assigned_at.to_rfc3339(),
        }
    }
}
