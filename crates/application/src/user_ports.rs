use async_trait::async_trait;
use deskrail_core::{AppResult, DepartmentId, OrganizationId};
use deskrail_domain::UserAccount;
use uuid::Uuid;

use crate::scope_filter::ScopeFilter;

/// Port for user directory lookups and controlled account mutations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds one user account by id.
    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>>;

    /// Lists user accounts admitted by the scope filter.
    async fn list_users(&self, filter: &ScopeFilter) -> AppResult<Vec<UserAccount>>;

    /// Moves a user to a new home organization and department.
    ///
    /// A user belongs to exactly one home organization; this is the only way
    /// that link changes.
    async fn set_home_organization(
        &self,
        user_id: Uuid,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> AppResult<()>;
}

/// Port for external credential verification.
///
/// The scoping core treats credential checking as a black box that either
/// yields the authenticated user id or nothing; secrets never cross this
/// boundary in the other direction.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verifies an email/password pair, returning the user id on success.
    async fn verify(&self, email: &str, password: &str) -> AppResult<Option<Uuid>>;
}
