use deskrail_domain::{DepartmentReach, OrganizationReach, Principal};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the caller's resolved identity context.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/principal-response.ts"
)]
pub struct PrincipalResponse {
    pub user_id: String,
    pub organization_id: String,
    pub department_id: Option<String>,
    pub role: String,
    pub is_super_user: bool,
    pub organization_reach: String,
    pub department_reach: String,
    pub permissions: Vec<String>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        let organization_reach = match principal.organization_reach() {
            OrganizationReach::Home => "home",
            OrganizationReach::Global => "global",
        };
        let department_reach = match principal.department_reach() {
            DepartmentReach::Home => "home",
            DepartmentReach::OrganizationWide => "organization_wide",
            DepartmentReach::Global => "global",
        };

        Self {
            user_id: principal.user_id().to_string(),
            organization_id: principal.organization_id().to_string(),
            department_id: principal.department_id().map(|id| id.to_string()),
            role: principal.role().as_str().to_owned(),
            is_super_user: principal.is_super_user(),
            organization_reach: organization_reach.to_owned(),
            department_reach: department_reach.to_owned(),
            permissions: principal.permissions().to_tokens(),
        }
    }
}
