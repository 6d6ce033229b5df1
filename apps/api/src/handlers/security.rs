use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use deskrail_application::CreateRoleInput;
use deskrail_core::OrganizationId;
use uuid::Uuid;

use crate::dto::{
    AssignRoleRequest, CreateRoleRequest, RevokeRoleAssignmentRequest, RoleAssignmentResponse,
    RoleResponse,
};
use crate::error::ApiResult;
use crate::handlers::parse_uuid;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .get_role(role_name.as_str())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(CreateRoleInput {
            name: payload.name,
            permissions: payload.permissions,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_assignments(user_id)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleAssignmentResponse>)> {
    let user_id = parse_uuid(payload.user_id.as_str(), "user_id")?;
    let organization_scope = payload
        .organization_scope
        .as_deref()
        .map(|value| parse_uuid(value, "organization_scope").map(OrganizationId::from_uuid))
        .transpose()?;

    let assignment = state
        .security_admin_service
        .assign_role(user_id, payload.role_name.as_str(), organization_scope)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleAssignmentResponse::from(assignment)),
    ))
}

pub async fn revoke_role_assignment_handler(
    State(state): State<AppState>,
    Json(payload): Json<RevokeRoleAssignmentRequest>,
) -> ApiResult<StatusCode> {
    let assignment_id = parse_uuid(payload.assignment_id.as_str(), "assignment_id")?;
    state
        .security_admin_service
        .revoke_assignment(assignment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
