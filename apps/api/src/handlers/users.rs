use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskrail_core::{DepartmentId, OrganizationId};
use deskrail_domain::Principal;
use uuid::Uuid;

use crate::dto::{MoveUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::handlers::parse_uuid;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_admin_service
        .list_users(&principal)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let account = state.user_admin_service.get_user(&principal, user_id).await?;
    Ok(Json(UserResponse::from(account)))
}

pub async fn move_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<MoveUserRequest>,
) -> ApiResult<StatusCode> {
    let organization_id =
        OrganizationId::from_uuid(parse_uuid(payload.organization_id.as_str(), "organization_id")?);
    let department_id = payload
        .department_id
        .as_deref()
        .map(|value| parse_uuid(value, "department_id").map(DepartmentId::from_uuid))
        .transpose()?;

    state
        .user_admin_service
        .move_user(&principal, user_id, organization_id, department_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
