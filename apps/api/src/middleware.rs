use axum::extract::{RawPathParams, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use deskrail_application::{AccessPolicy, ScopeKind, ScopeTarget};
use deskrail_core::auth::SessionUser;
use deskrail_core::{AppError, DepartmentId, OrganizationId};
use deskrail_domain::Principal;
use tower_sessions::Session;
use uuid::Uuid;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session into a [`Principal`] and stores it on the request.
///
/// Role grants are re-read here on every request, so a revocation takes
/// effect on the next request rather than at next login.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let session_user = session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthenticated("authentication required".to_owned()))?;

    let principal = state
        .identity_service
        .resolve_principal(&session_user)
        .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Per-method access policies attached to one route path.
///
/// Built while the router is assembled; every policy passes registry
/// validation before it is attached.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicies {
    entries: Vec<(Method, AccessPolicy)>,
}

impl RoutePolicies {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, method: Method, policy: AccessPolicy) -> Self {
        self.entries.push((method, policy));
        self
    }

    fn for_method(&self, method: &Method) -> Option<&AccessPolicy> {
        self.entries
            .iter()
            .find(|(declared, _)| declared == method)
            .map(|(_, policy)| policy)
    }
}

/// Evaluates the route's declared [`AccessPolicy`] before the handler runs.
///
/// Policies are attached to the route as a [`RoutePolicies`] extension; a
/// protected route without one for the request method is a wiring bug and
/// fails closed.
pub async fn enforce_access_policy(
    State(state): State<AppState>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(policy) = request
        .extensions()
        .get::<RoutePolicies>()
        .and_then(|policies| policies.for_method(request.method()))
        .cloned()
    else {
        return Err(AppError::Internal("route is missing its access policy".to_owned()).into());
    };
    let principal = request.extensions().get::<Principal>().cloned();

    let target = resolve_scope_target(&policy, &params)?;
    state
        .tenant_scope_service
        .enforce_policy(principal.as_ref(), &policy, target)
        .await?;

    Ok(next.run(request).await)
}

fn resolve_scope_target(policy: &AccessPolicy, params: &RawPathParams) -> ApiResult<ScopeTarget> {
    let Some(requirement) = policy.required_scope() else {
        return Ok(ScopeTarget::default());
    };

    let raw = params
        .iter()
        .find(|(name, _)| *name == requirement.param)
        .map(|(_, value)| value)
        .ok_or_else(|| {
            AppError::Internal(format!(
                "route declares scope parameter '{}' but the path does not carry it",
                requirement.param
            ))
        })?;
    let id = Uuid::parse_str(raw).map_err(|error| {
        AppError::Validation(format!("invalid '{}': {error}", requirement.param))
    })?;

    let target = match requirement.kind {
        ScopeKind::Organization => ScopeTarget {
            organization_id: Some(OrganizationId::from_uuid(id)),
            department_id: None,
        },
        ScopeKind::Department => ScopeTarget {
            organization_id: None,
            department_id: Some(DepartmentId::from_uuid(id)),
        },
    };
    Ok(target)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(
                    AppError::Unauthenticated("cross-site request blocked".to_owned()).into(),
                );
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(
                AppError::Unauthenticated("origin validation failed".to_owned()).into(),
            );
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
