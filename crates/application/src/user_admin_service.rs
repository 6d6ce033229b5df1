//! User directory reads and the controlled home-organization move.

use std::sync::Arc;

use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{Principal, UserAccount};
use uuid::Uuid;

use crate::directory_ports::DirectoryRepository;
use crate::scope_filter::ScopedEntity;
use crate::tenant_scope_service::TenantScopeService;
use crate::user_ports::UserRepository;

/// User administration use cases.
#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    directory: Arc<dyn DirectoryRepository>,
    scopes: TenantScopeService,
}

impl UserAdminService {
    /// Creates a service over the user and directory ports.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        directory: Arc<dyn DirectoryRepository>,
        scopes: TenantScopeService,
    ) -> Self {
        Self {
            users,
            directory,
            scopes,
        }
    }

    /// Lists the user accounts the caller may see.
    pub async fn list_users(&self, principal: &Principal) -> AppResult<Vec<UserAccount>> {
        let filter = self.scopes.scope_filter(principal, ScopedEntity::Users).await?;
        self.users.list_users(&filter).await
    }

    /// Fetches one user account, enforcing reach.
    ///
    /// An account outside the caller's organization reach is reported as a
    /// scope denial; an account in a sibling department under a
    /// department-restricted caller is a department denial.
    pub async fn get_user(&self, principal: &Principal, user_id: Uuid) -> AppResult<UserAccount> {
        let Some(account) = self.users.find_user(user_id).await? else {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        };

        let filter = self.scopes.scope_filter(principal, ScopedEntity::Users).await?;
        if filter.permits(account.organization_id, account.department_id) {
            return Ok(account);
        }

        let organization_reachable = self
            .scopes
            .can_access_organization(principal, account.organization_id)
            .await?;
        if organization_reachable {
            return Err(AppError::DepartmentScopeDenied(format!(
                "user '{user_id}' is outside your department scope"
            )));
        }
        Err(AppError::OrganizationScopeDenied(format!(
            "user '{user_id}' is outside your organization scope"
        )))
    }

    /// Moves a user to a new home organization and department.
    ///
    /// Re-homing crosses a tenancy boundary, so the caller must have
    /// organization reach over both the user's current organization and the
    /// target one. The target organization must exist, and the target
    /// department (when given) must belong to it. After the move,
    /// organization-scoped role assignments pointing at the old home stop
    /// contributing permissions on the user's next request.
    pub async fn move_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> AppResult<()> {
        let Some(account) = self.users.find_user(user_id).await? else {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        };
        self.scopes
            .ensure_organization_access(principal, account.organization_id)
            .await
            .map_err(|error| match error {
                AppError::OrganizationScopeDenied(_) => AppError::OrganizationScopeDenied(
                    format!("user '{user_id}' is outside your organization scope"),
                ),
                other => other,
            })?;
        if self
            .directory
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "organization '{organization_id}' not found"
            )));
        }
        self.scopes
            .ensure_organization_access(principal, organization_id)
            .await?;
        if let Some(department_id) = department_id {
            let Some(department) = self.directory.find_department(department_id).await? else {
                return Err(AppError::NotFound(format!(
                    "department '{department_id}' not found"
                )));
            };
            if department.organization_id != organization_id {
                return Err(AppError::Validation(format!(
                    "department '{department_id}' does not belong to organization '{organization_id}'"
                )));
            }
        }

        self.users
            .set_home_organization(user_id, organization_id, department_id)
            .await
    }
}
