//! Login and per-request identity-context construction.

use std::sync::Arc;

use deskrail_core::auth::SessionUser;
use deskrail_core::{AppError, AppResult};
use deskrail_domain::{CapabilityFlags, PermissionSet, Principal, UserAccount, UserRole};

use crate::role_ports::RoleRepository;
use crate::user_ports::{CredentialVerifier, UserRepository};

/// Authenticates credentials into a session identity and resolves that
/// identity into a [`Principal`] on each request.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl IdentityService {
    /// Creates a service over its ports.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            users,
            roles,
            verifier,
        }
    }

    /// Verifies credentials and returns the session identity to persist.
    ///
    /// Wrong credentials and deactivated accounts both fail with the same
    /// authentication error, so a caller cannot probe which accounts exist.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<SessionUser> {
        let Some(user_id) = self.verifier.verify(email, password).await? else {
            return Err(AppError::Unauthenticated(
                "invalid email or password".to_owned(),
            ));
        };

        let Some(account) = self.users.find_user(user_id).await? else {
            return Err(AppError::Unauthenticated(
                "invalid email or password".to_owned(),
            ));
        };
        if !account.is_active {
            return Err(AppError::Unauthenticated(
                "invalid email or password".to_owned(),
            ));
        }

        Ok(session_user_for(&account))
    }

    /// Builds the identity context for one request from the stored session.
    ///
    /// Permissions are the union of the grants from every active role
    /// assignment that applies system-wide or to the home organization;
    /// assignments scoped to other organizations contribute nothing.
    pub async fn resolve_principal(&self, session: &SessionUser) -> AppResult<Principal> {
        let Some(account) = self.users.find_user(session.user_id()).await? else {
            return Err(AppError::Unauthenticated(
                "session refers to an unknown user".to_owned(),
            ));
        };
        if !account.is_active {
            return Err(AppError::Unauthenticated(
                "account has been deactivated".to_owned(),
            ));
        }

        let role: UserRole = session.role().parse().map_err(|_: AppError| {
            AppError::Unauthenticated("session carries an unknown role".to_owned())
        })?;

        let mut permissions = PermissionSet::new();
        for grant in self.roles.active_grants_for_user(session.user_id()).await? {
            let applies = match grant.organization_scope {
                None => true,
                Some(organization_id) => organization_id == session.organization_id(),
            };
            if applies {
                permissions.extend(grant.permissions);
            }
        }

        Ok(Principal::new(
            session.user_id(),
            session.organization_id(),
            session.department_id(),
            role,
            CapabilityFlags {
                is_super_user: session.is_super_user(),
                can_cross_organizations: session.can_cross_organizations(),
                can_cross_departments: session.can_cross_departments(),
            },
            permissions,
        ))
    }
}

fn session_user_for(account: &UserAccount) -> SessionUser {
    SessionUser::new(
        account.id,
        account.organization_id,
        account.department_id,
        account.role.as_str(),
        account.capabilities.is_super_user,
        account.capabilities.can_cross_organizations,
        account.capabilities.can_cross_departments,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
    use deskrail_domain::{
        CapabilityFlags, EmailAddress, PermissionSet, UserAccount, UserRole,
    };
    use uuid::Uuid;

    use crate::role_ports::{
        ActiveRoleGrant, RoleAssignment, RoleDefinition, RoleRepository,
    };
    use crate::scope_filter::ScopeFilter;
    use crate::user_ports::{CredentialVerifier, UserRepository};

    use super::IdentityService;

    struct FakeUserRepository {
        accounts: Vec<UserAccount>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
            Ok(self.accounts.iter().find(|account| account.id == id).cloned())
        }

        async fn list_users(&self, _filter: &ScopeFilter) -> AppResult<Vec<UserAccount>> {
            Ok(self.accounts.clone())
        }

        async fn set_home_organization(
            &self,
            _user_id: Uuid,
            _organization_id: OrganizationId,
            _department_id: Option<DepartmentId>,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    struct FakeRoleRepository {
        grants: Vec<ActiveRoleGrant>,
    }

    #[async_trait]
    impl RoleRepository for FakeRoleRepository {
        async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
            Ok(Vec::new())
        }

        async fn find_role(&self, _name: &str) -> AppResult<Option<RoleDefinition>> {
            Ok(None)
        }

        async fn create_role(&self, _role: RoleDefinition) -> AppResult<()> {
            Ok(())
        }

        async fn active_grants_for_user(
            &self,
            _user_id: Uuid,
        ) -> AppResult<Vec<ActiveRoleGrant>> {
            Ok(self.grants.clone())
        }

        async fn list_assignments_for_user(
            &self,
            _user_id: Uuid,
        ) -> AppResult<Vec<RoleAssignment>> {
            Ok(Vec::new())
        }

        async fn create_assignment(&self, _assignment: RoleAssignment) -> AppResult<()> {
            Ok(())
        }

        async fn revoke_assignment(&self, _assignment_id: Uuid) -> AppResult<()> {
            Ok(())
        }
    }

    struct FakeVerifier {
        accepts: Option<Uuid>,
    }

    #[async_trait]
    impl CredentialVerifier for FakeVerifier {
        async fn verify(&self, _email: &str, _password: &str) -> AppResult<Option<Uuid>> {
            Ok(self.accepts)
        }
    }

    fn account(organization_id: OrganizationId, is_active: bool) -> UserAccount {
        let email = EmailAddress::new("agent@example.com");
        let Ok(email) = email else {
            panic!("fixture email must be valid");
        };
        UserAccount {
            id: Uuid::new_v4(),
            email,
            display_name: "Agent".to_owned(),
            organization_id,
            department_id: Some(DepartmentId::new()),
            role: UserRole::CompanyAgent,
            capabilities: CapabilityFlags::default(),
            is_active,
        }
    }

    fn service(
        accounts: Vec<UserAccount>,
        grants: Vec<ActiveRoleGrant>,
        accepts: Option<Uuid>,
    ) -> IdentityService {
        IdentityService::new(
            Arc::new(FakeUserRepository { accounts }),
            Arc::new(FakeRoleRepository { grants }),
            Arc::new(FakeVerifier { accepts }),
        )
    }

    #[tokio::test]
    async fn successful_login_captures_tenancy_and_flags() {
        let account = account(OrganizationId::new(), true);
        let service = service(vec![account.clone()], Vec::new(), Some(account.id));

        let session = service.authenticate("agent@example.com", "hunter2").await;
        let Ok(session) = session else {
            panic!("login should succeed");
        };
        assert_eq!(session.user_id(), account.id);
        assert_eq!(session.organization_id(), account.organization_id);
        assert_eq!(session.role(), "company_agent");
        assert!(!session.is_super_user());
    }

    #[tokio::test]
    async fn wrong_credentials_fail_without_revealing_accounts() {
        let account = account(OrganizationId::new(), true);
        let service = service(vec![account], Vec::new(), None);

        let result = service.authenticate("agent@example.com", "wrong").await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn deactivated_account_cannot_log_in() {
        let account = account(OrganizationId::new(), false);
        let service = service(vec![account.clone()], Vec::new(), Some(account.id));

        let result = service.authenticate("agent@example.com", "hunter2").await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn principal_unions_system_wide_and_home_scoped_grants() {
        let organization_id = OrganizationId::new();
        let account = account(organization_id, true);
        let grants = vec![
            ActiveRoleGrant {
                role_name: "agent".to_owned(),
                organization_scope: None,
                permissions: PermissionSet::parse_all(&["tickets:list"]).unwrap_or_default(),
            },
            ActiveRoleGrant {
                role_name: "home-extra".to_owned(),
                organization_scope: Some(organization_id),
                permissions: PermissionSet::parse_all(&["tickets:create"]).unwrap_or_default(),
            },
            ActiveRoleGrant {
                role_name: "elsewhere".to_owned(),
                organization_scope: Some(OrganizationId::new()),
                permissions: PermissionSet::parse_all(&["tickets:delete"]).unwrap_or_default(),
            },
        ];
        let service = service(vec![account.clone()], grants, Some(account.id));

        let session = service.authenticate("agent@example.com", "hunter2").await;
        let Ok(session) = session else {
            panic!("login should succeed");
        };
        let principal = service.resolve_principal(&session).await;
        let Ok(principal) = principal else {
            panic!("principal resolution should succeed");
        };

        assert!(principal.has_permission("tickets", "list"));
        assert!(principal.has_permission("tickets", "create"));
        // The grant scoped to another organization contributes nothing.
        assert!(!principal.has_permission("tickets", "delete"));
    }

    #[tokio::test]
    async fn revoking_one_of_two_overlapping_assignments_keeps_the_shared_grant() {
        let organization_id = OrganizationId::new();
        let account = account(organization_id, true);
        let surviving = ActiveRoleGrant {
            role_name: "reader".to_owned(),
            organization_scope: None,
            permissions: PermissionSet::parse_all(&["tickets:list"]).unwrap_or_default(),
        };
        let revoked = ActiveRoleGrant {
            role_name: "editor".to_owned(),
            organization_scope: None,
            permissions: PermissionSet::parse_all(&["tickets:list", "tickets:update"])
                .unwrap_or_default(),
        };

        let service_before = service(
            vec![account.clone()],
            vec![surviving.clone(), revoked],
            Some(account.id),
        );
        let session = service_before.authenticate("agent@example.com", "hunter2").await;
        let Ok(session) = session else {
            panic!("login should succeed");
        };
        let principal = service_before.resolve_principal(&session).await;
        let Ok(principal) = principal else {
            panic!("principal resolution should succeed");
        };
        assert!(principal.has_permission("tickets", "list"));
        assert!(principal.has_permission("tickets", "update"));

        // Soft-revoking the editor assignment drops it from the active grant
        // set; the shared permission is still carried by the reader.
        let service_after = service(vec![account.clone()], vec![surviving], Some(account.id));
        let principal = service_after.resolve_principal(&session).await;
        let Ok(principal) = principal else {
            panic!("principal resolution should succeed");
        };
        assert!(principal.has_permission("tickets", "list"));
        assert!(!principal.has_permission("tickets", "update"));
    }

    #[tokio::test]
    async fn deactivation_invalidates_an_existing_session() {
        let organization_id = OrganizationId::new();
        let mut account = account(organization_id, true);
        let service_before = service(vec![account.clone()], Vec::new(), Some(account.id));

        let session = service_before.authenticate("agent@example.com", "hunter2").await;
        let Ok(session) = session else {
            panic!("login should succeed");
        };

        account.is_active = false;
        let service_after = service(vec![account.clone()], Vec::new(), Some(account.id));
        let result = service_after.resolve_principal(&session).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
