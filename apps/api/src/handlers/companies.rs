use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskrail_domain::{CompanyId, Principal};
use uuid::Uuid;

use crate::dto::CompanyResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_company_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = state
        .directory_admin_service
        .get_company(&principal, CompanyId::from_uuid(company_id))
        .await?;

    Ok(Json(CompanyResponse::from(company)))
}

pub async fn deactivate_company_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .directory_admin_service
        .deactivate_company(&principal, CompanyId::from_uuid(company_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
