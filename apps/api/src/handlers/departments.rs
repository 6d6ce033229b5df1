use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskrail_core::DepartmentId;
use deskrail_domain::Principal;
use uuid::Uuid;

use crate::dto::DepartmentResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_department_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(department_id): Path<Uuid>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .directory_admin_service
        .get_department(&principal, DepartmentId::from_uuid(department_id))
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn deactivate_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .directory_admin_service
        .deactivate_department(DepartmentId::from_uuid(department_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
