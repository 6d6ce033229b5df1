//! Transport types exchanged with the frontend.

mod auth;
mod directory;
mod security;
mod tickets;
mod users;

pub use auth::{LoginRequest, PrincipalResponse};
pub use directory::{
    CompanyResponse, CreateCompanyRequest, CreateDepartmentRequest, CreateOrganizationRequest,
    DepartmentResponse, OrganizationResponse,
};
pub use security::{
    AssignRoleRequest, CreateRoleRequest, RevokeRoleAssignmentRequest, RoleAssignmentResponse,
    RoleResponse,
};
pub use tickets::{CreateTicketRequest, TicketResponse};
pub use users::{MoveUserRequest, UserResponse};
