//! Role and assignment administration.
//!
//! Permission tokens entering the system through this service are parsed
//! against the closed registry before anything is persisted, so storage never
//! holds a token the evaluator would not recognize.

use std::sync::Arc;

use chrono::Utc;
use deskrail_core::{AppError, AppResult, NonEmptyString, OrganizationId};
use deskrail_domain::PermissionSet;
use uuid::Uuid;

use crate::directory_ports::DirectoryRepository;
use crate::role_ports::{CreateRoleInput, RoleAssignment, RoleDefinition, RoleRepository};

/// Role definition and assignment use cases.
#[derive(Clone)]
pub struct SecurityAdminService {
    roles: Arc<dyn RoleRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl SecurityAdminService {
    /// Creates a service over the role and directory ports.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleRepository>, directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { roles, directory }
    }

    /// Lists every role definition.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.roles.list_roles().await
    }

    /// Fetches one role definition by name.
    pub async fn get_role(&self, name: &str) -> AppResult<RoleDefinition> {
        let Some(role) = self.roles.find_role(name).await? else {
            return Err(AppError::NotFound(format!("role '{name}' not found")));
        };
        Ok(role)
    }

    /// Creates a custom role after validating its permission tokens against
    /// the registry.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let name: String = NonEmptyString::new(input.name)?.into();
        if self.roles.find_role(name.as_str()).await?.is_some() {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let tokens: Vec<&str> = input.permissions.iter().map(String::as_str).collect();
        let permissions = PermissionSet::parse_all(&tokens)?;

        let role = RoleDefinition {
            role_id: Uuid::new_v4(),
            name,
            permissions,
            is_system: false,
        };
        self.roles.create_role(role.clone()).await?;
        Ok(role)
    }

    /// Lists every assignment for a user, active and revoked.
    pub async fn list_assignments(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>> {
        self.roles.list_assignments_for_user(user_id).await
    }

    /// Grants a role to a user, optionally scoped to one organization.
    ///
    /// A `None` scope makes the grant system-wide; a scoped grant only
    /// contributes permissions while the organization is the user's home.
    pub async fn assign_role(
        &self,
        user_id: Uuid,
        role_name: &str,
        organization_scope: Option<OrganizationId>,
    ) -> AppResult<RoleAssignment> {
        if self.roles.find_role(role_name).await?.is_none() {
            return Err(AppError::NotFound(format!("role '{role_name}' not found")));
        }
        if let Some(organization_id) = organization_scope {
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
        }

        let assignment = RoleAssignment {
            assignment_id: Uuid::new_v4(),
            user_id,
            role_name: role_name.to_owned(),
            organization_scope,
            is_active: true,
            assigned_at: Utc::now(),
        };
        self.roles.create_assignment(assignment.clone()).await?;
        Ok(assignment)
    }

    /// Soft-revokes an assignment. Revoked assignments stay listed but stop
    /// contributing permissions.
    pub async fn revoke_assignment(&self, assignment_id: Uuid) -> AppResult<()> {
        self.roles.revoke_assignment(assignment_id).await
    }
}
