use deskrail_core::{DepartmentId, OrganizationId};
use serde::{Deserialize, Serialize};

/// Sub-unit of exactly one organization, used for ticket routing and
/// finer-grained scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Stable department identifier.
    pub id: DepartmentId,
    /// Owning organization; immutable after creation.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Soft-deactivation flag.
    pub is_active: bool,
}
