use deskrail_application::{
    DirectoryAdminService, IdentityService, SecurityAdminService, TenantScopeService,
    TicketService, UserAdminService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub tenant_scope_service: TenantScopeService,
    pub directory_admin_service: DirectoryAdminService,
    pub security_admin_service: SecurityAdminService,
    pub user_admin_service: UserAdminService,
    pub ticket_service: TicketService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
