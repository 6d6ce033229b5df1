use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskrail_application::CreateTicketInput;
use deskrail_core::{DepartmentId, OrganizationId};
use deskrail_domain::{CompanyId, Principal, TicketId};
use uuid::Uuid;

use crate::dto::{CreateTicketRequest, TicketResponse};
use crate::error::ApiResult;
use crate::handlers::parse_uuid;
use crate::state::AppState;

pub async fn list_tickets_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let tickets = state
        .ticket_service
        .list_tickets(&principal)
        .await?
        .into_iter()
        .map(TicketResponse::from)
        .collect();

    Ok(Json(tickets))
}

pub async fn get_ticket_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = state
        .ticket_service
        .get_ticket(&principal, TicketId::from_uuid(ticket_id))
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

pub async fn create_ticket_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let organization_id =
        OrganizationId::from_uuid(parse_uuid(payload.organization_id.as_str(), "organization_id")?);
    let department_id =
        DepartmentId::from_uuid(parse_uuid(payload.department_id.as_str(), "department_id")?);
    let company_id = payload
        .company_id
        .as_deref()
        .map(|value| parse_uuid(value, "company_id").map(CompanyId::from_uuid))
        .transpose()?;

    let ticket = state
        .ticket_service
        .create_ticket(
            &principal,
            CreateTicketInput {
                organization_id,
                department_id,
                company_id,
                subject: payload.subject,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}
