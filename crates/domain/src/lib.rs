//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod company;
mod department;
mod organization;
mod principal;
mod security;
mod ticket;
mod user;

pub use company::{Company, CompanyId, HourBank, SlaTier};
pub use department::Department;
pub use organization::{Organization, OrganizationKind};
pub use principal::{CapabilityFlags, DepartmentReach, OrganizationReach, Principal};
pub use security::{PermissionGrant, PermissionSet, UserRole, known_actions, known_resources};
pub use ticket::{Ticket, TicketId, TicketStatus};
pub use user::{EmailAddress, UserAccount};
