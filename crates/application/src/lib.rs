//! Application services and ports.

#![forbid(unsafe_code)]

mod access_policy;
mod directory_admin_service;
mod directory_ports;
mod identity_service;
mod role_ports;
mod scope_filter;
mod security_admin_service;
mod tenant_scope_service;
mod ticket_ports;
mod ticket_service;
mod user_admin_service;
mod user_ports;

pub use access_policy::{AccessPolicy, RequiredPermission, ScopeKind, ScopeRequirement, ScopeTarget};
pub use directory_admin_service::{
    CreateCompanyInput, CreateDepartmentInput, CreateOrganizationInput, DirectoryAdminService,
};
pub use directory_ports::DirectoryRepository;
pub use identity_service::IdentityService;
pub use role_ports::{ActiveRoleGrant, CreateRoleInput, RoleAssignment, RoleDefinition, RoleRepository};
pub use scope_filter::{OrganizationSelection, ScopeFilter, ScopedEntity};
pub use security_admin_service::SecurityAdminService;
pub use tenant_scope_service::TenantScopeService;
pub use ticket_ports::{CreateTicketInput, TicketRepository};
pub use ticket_service::TicketService;
pub use user_admin_service::UserAdminService;
pub use user_ports::{CredentialVerifier, UserRepository};
