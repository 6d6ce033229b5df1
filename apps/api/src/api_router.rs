//! Route table and per-route access policy wiring.
//!
//! Every protected route declares its requirements as an [`AccessPolicy`]
//! attached next to the route; the gate middleware evaluates it before the
//! handler runs. Policies are validated against the permission registry
//! while the router is built, so an unknown permission token is a startup
//! failure.

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{MethodRouter, get, post};
use deskrail_application::AccessPolicy;
use deskrail_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::middleware::RoutePolicies;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

fn guarded(
    app_state: &AppState,
    path: &str,
    method_router: MethodRouter<AppState>,
    policies: RoutePolicies,
) -> Router<AppState> {
    Router::new()
        .route(path, method_router)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::enforce_access_policy,
        ))
        .layer(axum::Extension(policies))
}

fn directory_routes(app_state: &AppState) -> Result<Router<AppState>, AppError> {
    let organizations = guarded(
        app_state,
        "/api/organizations",
        get(handlers::organizations::list_organizations_handler)
            .post(handlers::organizations::create_organization_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_permission("organizations", "list")
                    .validated()?,
            )
            .on(
                Method::POST,
                AccessPolicy::authenticated()
                    .with_permission("organizations", "create")
                    .validated()?,
            ),
    );

    let organization = guarded(
        app_state,
        "/api/organizations/{organization_id}",
        get(handlers::organizations::get_organization_handler)
            .delete(handlers::organizations::deactivate_organization_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("organizations", "read")
                    .validated()?,
            )
            .on(
                Method::DELETE,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("organizations", "deactivate")
                    .validated()?,
            ),
    );

    let departments = guarded(
        app_state,
        "/api/organizations/{organization_id}/departments",
        get(handlers::organizations::list_departments_handler)
            .post(handlers::organizations::create_department_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("departments", "list")
                    .validated()?,
            )
            .on(
                Method::POST,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("departments", "create")
                    .validated()?,
            ),
    );

    let companies = guarded(
        app_state,
        "/api/organizations/{organization_id}/companies",
        get(handlers::organizations::list_companies_handler)
            .post(handlers::organizations::create_company_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("companies", "list")
                    .validated()?,
            )
            .on(
                Method::POST,
                AccessPolicy::authenticated()
                    .with_organization_scope("organization_id")
                    .with_permission("companies", "create")
                    .validated()?,
            ),
    );

    let department = guarded(
        app_state,
        "/api/departments/{department_id}",
        get(handlers::departments::get_department_handler)
            .delete(handlers::departments::deactivate_department_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_department_scope("department_id")
                    .with_permission("departments", "read")
                    .validated()?,
            )
            .on(
                Method::DELETE,
                AccessPolicy::authenticated()
                    .with_department_scope("department_id")
                    .with_permission("departments", "deactivate")
                    .validated()?,
            ),
    );

    let company = guarded(
        app_state,
        "/api/companies/{company_id}",
        get(handlers::companies::get_company_handler)
            .delete(handlers::companies::deactivate_company_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_permission("companies", "read")
                    .validated()?,
            )
            .on(
                Method::DELETE,
                AccessPolicy::authenticated()
                    .with_permission("companies", "deactivate")
                    .validated()?,
            ),
    );

    Ok(Router::new()
        .merge(organizations)
        .merge(organization)
        .merge(departments)
        .merge(companies)
        .merge(department)
        .merge(company))
}

fn user_routes(app_state: &AppState) -> Result<Router<AppState>, AppError> {
    let users = guarded(
        app_state,
        "/api/users",
        get(handlers::users::list_users_handler),
        RoutePolicies::new().on(
            Method::GET,
            AccessPolicy::authenticated()
                .with_permission("users", "list")
                .validated()?,
        ),
    );

    let user = guarded(
        app_state,
        "/api/users/{user_id}",
        get(handlers::users::get_user_handler).put(handlers::users::move_user_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_permission("users", "read")
                    .validated()?,
            )
            .on(
                Method::PUT,
                AccessPolicy::authenticated()
                    .with_permission("users", "update")
                    .validated()?,
            ),
    );

    let assignments = guarded(
        app_state,
        "/api/users/{user_id}/role-assignments",
        get(handlers::security::list_role_assignments_handler),
        RoutePolicies::new().on(
            Method::GET,
            AccessPolicy::authenticated()
                .with_permission("roles", "list")
                .validated()?,
        ),
    );

    Ok(Router::new().merge(users).merge(user).merge(assignments))
}

fn ticket_routes(app_state: &AppState) -> Result<Router<AppState>, AppError> {
    let tickets = guarded(
        app_state,
        "/api/tickets",
        get(handlers::tickets::list_tickets_handler)
            .post(handlers::tickets::create_ticket_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_permission("tickets", "list")
                    .validated()?,
            )
            .on(
                Method::POST,
                AccessPolicy::authenticated()
                    .with_permission("tickets", "create")
                    .validated()?,
            ),
    );

    let ticket = guarded(
        app_state,
        "/api/tickets/{ticket_id}",
        get(handlers::tickets::get_ticket_handler),
        RoutePolicies::new().on(
            Method::GET,
            AccessPolicy::authenticated()
                .with_permission("tickets", "read")
                .validated()?,
        ),
    );

    Ok(Router::new().merge(tickets).merge(ticket))
}

fn security_routes(app_state: &AppState) -> Result<Router<AppState>, AppError> {
    let roles = guarded(
        app_state,
        "/api/security/roles",
        get(handlers::security::list_roles_handler)
            .post(handlers::security::create_role_handler),
        RoutePolicies::new()
            .on(
                Method::GET,
                AccessPolicy::authenticated()
                    .with_permission("roles", "list")
                    .validated()?,
            )
            .on(
                Method::POST,
                AccessPolicy::authenticated()
                    .with_permission("roles", "manage")
                    .validated()?,
            ),
    );

    let role = guarded(
        app_state,
        "/api/security/roles/{role_name}",
        get(handlers::security::get_role_handler),
        RoutePolicies::new().on(
            Method::GET,
            AccessPolicy::authenticated()
                .with_permission("roles", "read")
                .validated()?,
        ),
    );

    let assign = guarded(
        app_state,
        "/api/security/role-assignments",
        post(handlers::security::assign_role_handler),
        RoutePolicies::new().on(
            Method::POST,
            AccessPolicy::authenticated()
                .with_permission("roles", "manage")
                .validated()?,
        ),
    );

    let revoke = guarded(
        app_state,
        "/api/security/role-unassignments",
        post(handlers::security::revoke_role_assignment_handler),
        RoutePolicies::new().on(
            Method::POST,
            AccessPolicy::authenticated()
                .with_permission("roles", "manage")
                .validated()?,
        ),
    );

    Ok(Router::new()
        .merge(roles)
        .merge(role)
        .merge(assign)
        .merge(revoke))
}

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .merge(directory_routes(&app_state)?)
        .merge(user_routes(&app_state)?)
        .merge(ticket_routes(&app_state)?)
        .merge(security_routes(&app_state)?)
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(session_layer)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
