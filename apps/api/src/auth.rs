//! Session-based authentication handlers.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use deskrail_core::AppError;
use deskrail_domain::Principal;
use tower_sessions::Session;

use crate::dto::{LoginRequest, PrincipalResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session key holding the authenticated session identity.
pub const SESSION_USER_KEY: &str = "session_user";

/// POST /auth/login - Verify credentials and establish a session.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<PrincipalResponse>> {
    let session_user = state
        .identity_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    // OWASP Session Management: regenerate session ID on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &session_user)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    let principal = state.identity_service.resolve_principal(&session_user).await?;
    Ok(Json(PrincipalResponse::from(&principal)))
}

/// POST /auth/logout - Destroy the session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Return the caller's resolved identity context.
pub async fn me_handler(
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<PrincipalResponse>> {
    Ok(Json(PrincipalResponse::from(&principal)))
}
