use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskrail_application::{
    CreateCompanyInput, CreateDepartmentInput, CreateOrganizationInput,
};
use deskrail_core::OrganizationId;
use deskrail_domain::{OrganizationKind, Principal};
use uuid::Uuid;

use crate::dto::{
    CompanyResponse, CreateCompanyRequest, CreateDepartmentRequest, CreateOrganizationRequest,
    DepartmentResponse, OrganizationResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .directory_admin_service
        .list_organizations(&principal)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let kind = OrganizationKind::parse(payload.kind.as_str())?;
    let organization = state
        .directory_admin_service
        .create_organization(CreateOrganizationInput {
            name: payload.name,
            kind,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(OrganizationResponse::from(organization))))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .directory_admin_service
        .get_organization(&principal, OrganizationId::from_uuid(organization_id))
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn deactivate_organization_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .directory_admin_service
        .deactivate_organization(OrganizationId::from_uuid(organization_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .directory_admin_service
        .list_departments(&principal, OrganizationId::from_uuid(organization_id))
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .directory_admin_service
        .create_department(CreateDepartmentInput {
            organization_id: OrganizationId::from_uuid(organization_id),
            name: payload.name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

pub async fn list_companies_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CompanyResponse>>> {
    let companies = state
        .directory_admin_service
        .list_companies(&principal, OrganizationId::from_uuid(organization_id))
        .await?
        .into_iter()
        .map(CompanyResponse::from)
        .collect();

    Ok(Json(companies))
}

pub async fn create_company_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let company = state
        .directory_admin_service
        .create_company(CreateCompanyInput {
            organization_id: OrganizationId::from_uuid(organization_id),
            name: payload.name,
            domain: payload.domain,
            sla_tier: payload.sla_tier,
            purchased_minutes: payload.purchased_minutes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}
