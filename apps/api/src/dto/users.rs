use deskrail_domain::UserAccount;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a user account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub organization_id: String,
    pub department_id: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl From<UserAccount> for UserResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_owned(),
            display_name: account.display_name,
            organization_id: account.organization_id.to_string(),
            department_id: account.department_id.map(|id| id.to_string()),
            role: account.role.as_str().to_owned(),
            is_active: account.is_active,
        }
    }
}

/// Incoming payload for moving a user to a new home organization.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/move-user-request.ts"
)]
pub struct MoveUserRequest {
    pub organization_id: String,
    pub department_id: Option<String>,
}
