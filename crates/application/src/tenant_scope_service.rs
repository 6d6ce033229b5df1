//! The tenant hierarchy resolver and the request-admission checks built on
//! it.
//!
//! Every decision here is a pure function of the principal and the directory
//! snapshot: nothing is mutated, concurrent evaluations are independent, and
//! the same inputs always produce the same answer.

use std::collections::BTreeSet;
use std::sync::Arc;

use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{DepartmentReach, OrganizationReach, Principal};

use crate::access_policy::{AccessPolicy, ScopeKind, ScopeTarget};
use crate::directory_ports::DirectoryRepository;
use crate::scope_filter::{OrganizationSelection, ScopeFilter, ScopedEntity};

/// Resolves which organizations and departments a principal may reach, and
/// enforces declarative route policies against that reach.
#[derive(Clone)]
pub struct TenantScopeService {
    directory: Arc<dyn DirectoryRepository>,
}

impl TenantScopeService {
    /// Creates a service over a directory repository.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { directory }
    }

    /// Returns every organization the principal may reach.
    ///
    /// Never empty for a valid principal: the home organization is always
    /// included, even when the directory read returns nothing.
    pub async fn accessible_organizations(
        &self,
        principal: &Principal,
    ) -> AppResult<BTreeSet<OrganizationId>> {
        match principal.organization_reach() {
            OrganizationReach::Home => Ok(BTreeSet::from([principal.organization_id()])),
            OrganizationReach::Global => {
                let mut organizations: BTreeSet<OrganizationId> = self
                    .directory
                    .list_organizations()
                    .await?
                    .into_iter()
                    .map(|organization| organization.id)
                    .collect();
                organizations.insert(principal.organization_id());
                Ok(organizations)
            }
        }
    }

    /// Returns every department of `organization_id` the principal may
    /// reach, failing with an organization-scope denial when the
    /// organization itself is out of reach.
    ///
    /// The cross-department restriction binds only within the home
    /// organization: a principal visiting another reachable organization
    /// sees all of its departments.
    pub async fn accessible_departments(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<BTreeSet<DepartmentId>> {
        self.ensure_organization_access(principal, organization_id)
            .await?;

        let sees_all = match principal.department_reach() {
            DepartmentReach::Global | DepartmentReach::OrganizationWide => true,
            DepartmentReach::Home => organization_id != principal.organization_id(),
        };

        if sees_all {
            let departments = self
                .directory
                .list_departments(organization_id)
                .await?
                .into_iter()
                .map(|department| department.id)
                .collect();
            return Ok(departments);
        }

        Ok(principal.department_id().into_iter().collect())
    }

    /// Returns whether the principal may reach the organization.
    pub async fn can_access_organization(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<bool> {
        Ok(self
            .accessible_organizations(principal)
            .await?
            .contains(&organization_id))
    }

    /// Returns whether the principal may reach the department.
    pub async fn can_access_department(
        &self,
        principal: &Principal,
        department_id: DepartmentId,
    ) -> AppResult<bool> {
        match self.ensure_department_access(principal, department_id).await {
            Ok(()) => Ok(true),
            Err(
                AppError::OrganizationScopeDenied(_)
                | AppError::DepartmentScopeDenied(_)
                | AppError::NotFound(_),
            ) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Fails with an organization-scope denial when the organization is out
    /// of reach.
    pub async fn ensure_organization_access(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        if self
            .accessible_organizations(principal)
            .await?
            .contains(&organization_id)
        {
            return Ok(());
        }

        Err(AppError::OrganizationScopeDenied(format!(
            "organization '{organization_id}' is outside your organization scope"
        )))
    }

    /// Fails with the appropriate scope denial when the department is out of
    /// reach.
    ///
    /// A department in an unreachable organization yields an
    /// organization-scope denial rather than a not-found, so callers cannot
    /// confirm the existence of another tenant's departments.
    pub async fn ensure_department_access(
        &self,
        principal: &Principal,
        department_id: DepartmentId,
    ) -> AppResult<()> {
        let Some(department) = self.directory.find_department(department_id).await? else {
            return Err(AppError::NotFound(format!(
                "department '{department_id}' not found"
            )));
        };

        let accessible = self
            .accessible_organizations(principal)
            .await?
            .contains(&department.organization_id);
        if !accessible {
            return Err(AppError::OrganizationScopeDenied(format!(
                "department '{department_id}' is outside your organization scope"
            )));
        }

        let departments = self
            .accessible_departments(principal, department.organization_id)
            .await?;
        if !departments.contains(&department_id) {
            return Err(AppError::DepartmentScopeDenied(format!(
                "department '{department_id}' is outside your department scope"
            )));
        }

        Ok(())
    }

    /// Builds the data-access predicate for one tenant-owned entity family.
    ///
    /// The unrestricted predicate is produced only for a true super-user;
    /// every other principal gets a materialized organization id set.
    pub async fn scope_filter(
        &self,
        principal: &Principal,
        entity: ScopedEntity,
    ) -> AppResult<ScopeFilter> {
        if principal.is_super_user() {
            return Ok(ScopeFilter::new(
                entity,
                OrganizationSelection::All,
                principal.organization_id(),
                None,
            ));
        }

        let organizations = self.accessible_organizations(principal).await?;
        let home_departments = match principal.department_reach() {
            DepartmentReach::Home => Some(principal.department_id().into_iter().collect()),
            DepartmentReach::OrganizationWide | DepartmentReach::Global => None,
        };

        Ok(ScopeFilter::new(
            entity,
            OrganizationSelection::Only(organizations),
            principal.organization_id(),
            home_departments,
        ))
    }

    /// Evaluates a route's declared policy: identity, then target scope,
    /// then permissions, each short-circuiting on failure.
    pub async fn enforce_policy(
        &self,
        principal: Option<&Principal>,
        policy: &AccessPolicy,
        target: ScopeTarget,
    ) -> AppResult<()> {
        if !policy.requires_auth() {
            return Ok(());
        }

        let Some(principal) = principal else {
            return Err(AppError::Unauthenticated(
                "authentication required".to_owned(),
            ));
        };

        if let Some(requirement) = policy.required_scope() {
            match requirement.kind {
                ScopeKind::Organization => {
                    let organization_id = target.organization_id.ok_or_else(|| {
                        AppError::Validation(format!(
                            "route declares organization scope but parameter '{}' was not resolved",
                            requirement.param
                        ))
                    })?;
                    self.ensure_organization_access(principal, organization_id)
                        .await?;
                }
                ScopeKind::Department => {
                    let department_id = target.department_id.ok_or_else(|| {
                        AppError::Validation(format!(
                            "route declares department scope but parameter '{}' was not resolved",
                            requirement.param
                        ))
                    })?;
                    self.ensure_department_access(principal, department_id)
                        .await?;
                }
            }
        }

        let required = policy.required_permissions();
        if !required.is_empty() {
            let pairs: Vec<(&str, &str)> = required
                .iter()
                .map(|permission| (permission.resource, permission.action))
                .collect();
            if !principal.has_any_permission(&pairs) {
                let wanted = required
                    .iter()
                    .map(|permission| format!("{}:{}", permission.resource, permission.action))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(AppError::PermissionDenied(format!(
                    "none of the required permissions ({wanted}) are granted"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use deskrail_core::{AppResult, DepartmentId, OrganizationId};
    use deskrail_domain::{
        CapabilityFlags, Company, CompanyId, Department, Organization, OrganizationKind,
        PermissionSet, Principal, UserRole,
    };
    use uuid::Uuid;

    use crate::access_policy::{AccessPolicy, ScopeTarget};
    use crate::directory_ports::DirectoryRepository;
    use crate::scope_filter::ScopedEntity;

    use super::TenantScopeService;

    struct FakeDirectoryRepository {
        organizations: Vec<Organization>,
        departments: Vec<Department>,
    }

    #[async_trait]
    impl DirectoryRepository for FakeDirectoryRepository {
        async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
            Ok(self.organizations.clone())
        }

        async fn find_organization(
            &self,
            id: OrganizationId,
        ) -> AppResult<Option<Organization>> {
            Ok(self
                .organizations
                .iter()
                .find(|organization| organization.id == id)
                .cloned())
        }

        async fn create_organization(&self, _organization: Organization) -> AppResult<()> {
            Ok(())
        }

        async fn set_organization_active(
            &self,
            _id: OrganizationId,
            _is_active: bool,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn list_departments(
            &self,
            organization_id: OrganizationId,
        ) -> AppResult<Vec<Department>> {
            Ok(self
                .departments
                .iter()
                .filter(|department| department.organization_id == organization_id)
                .cloned()
                .collect())
        }

        async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>> {
            Ok(self
                .departments
                .iter()
                .find(|department| department.id == id)
                .cloned())
        }

        async fn create_department(&self, _department: Department) -> AppResult<()> {
            Ok(())
        }

        async fn set_department_active(
            &self,
            _id: DepartmentId,
            _is_active: bool,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn list_companies(
            &self,
            _organization_id: OrganizationId,
        ) -> AppResult<Vec<Company>> {
            Ok(Vec::new())
        }

        async fn find_company(&self, _id: CompanyId) -> AppResult<Option<Company>> {
            Ok(None)
        }

        async fn create_company(&self, _company: Company) -> AppResult<()> {
            Ok(())
        }

        async fn set_company_active(&self, _id: CompanyId, _is_active: bool) -> AppResult<()> {
            Ok(())
        }
    }

    struct Fixture {
        service: TenantScopeService,
        home_organization: OrganizationId,
        other_organization: OrganizationId,
        home_department: DepartmentId,
        sibling_department: DepartmentId,
        other_departments: Vec<DepartmentId>,
    }

    fn organization(id: OrganizationId, kind: OrganizationKind) -> Organization {
        Organization {
            id,
            name: "org".to_owned(),
            kind,
            is_active: true,
        }
    }

    fn department(id: DepartmentId, organization_id: OrganizationId) -> Department {
        Department {
            id,
            organization_id,
            name: "dept".to_owned(),
            is_active: true,
        }
    }

    fn fixture() -> Fixture {
        let home_organization = OrganizationId::new();
        let other_organization = OrganizationId::new();
        let home_department = DepartmentId::new();
        let sibling_department = DepartmentId::new();
        let other_departments = vec![DepartmentId::new(), DepartmentId::new()];

        let mut departments = vec![
            department(home_department, home_organization),
            department(sibling_department, home_organization),
        ];
        departments.extend(
            other_departments
                .iter()
                .map(|id| department(*id, other_organization)),
        );

        let repository = FakeDirectoryRepository {
            organizations: vec![
                organization(home_organization, OrganizationKind::SystemOwner),
                organization(other_organization, OrganizationKind::ClientCompany),
            ],
            departments,
        };

        Fixture {
            service: TenantScopeService::new(Arc::new(repository)),
            home_organization,
            other_organization,
            home_department,
            sibling_department,
            other_departments,
        }
    }

    fn principal(
        fixture: &Fixture,
        flags: CapabilityFlags,
        permissions: PermissionSet,
    ) -> Principal {
        Principal::new(
            Uuid::new_v4(),
            fixture.home_organization,
            Some(fixture.home_department),
            UserRole::CompanyAgent,
            flags,
            permissions,
        )
    }

    #[tokio::test]
    async fn plain_principal_sees_only_home_organization() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let organizations = fixture
            .service
            .accessible_organizations(&principal)
            .await
            .unwrap_or_default();
        assert_eq!(
            organizations,
            BTreeSet::from([fixture.home_organization])
        );
    }

    #[tokio::test]
    async fn super_user_sees_every_organization_regardless_of_stored_flags() {
        let fixture = fixture();
        let principal = principal(
            &fixture,
            CapabilityFlags {
                is_super_user: true,
                can_cross_organizations: false,
                can_cross_departments: false,
            },
            PermissionSet::new(),
        );

        let organizations = fixture
            .service
            .accessible_organizations(&principal)
            .await
            .unwrap_or_default();
        assert!(organizations.contains(&fixture.other_organization));
        assert_eq!(organizations.len(), 2);
    }

    #[tokio::test]
    async fn plain_principal_sees_only_home_department() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let departments = fixture
            .service
            .accessible_departments(&principal, fixture.home_organization)
            .await
            .unwrap_or_default();
        assert_eq!(departments, BTreeSet::from([fixture.home_department]));
    }

    #[tokio::test]
    async fn cross_department_principal_sees_sibling_departments() {
        let fixture = fixture();
        let principal = principal(
            &fixture,
            CapabilityFlags {
                can_cross_departments: true,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );

        let departments = fixture
            .service
            .accessible_departments(&principal, fixture.home_organization)
            .await
            .unwrap_or_default();
        assert!(departments.contains(&fixture.sibling_department));
        assert_eq!(departments.len(), 2);
    }

    #[tokio::test]
    async fn department_lookup_in_foreign_organization_is_denied_not_listed() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let result = fixture
            .service
            .accessible_departments(&principal, fixture.other_organization)
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::OrganizationScopeDenied(_))
        ));
    }

    #[tokio::test]
    async fn cross_org_without_cross_department_sees_all_foreign_departments() {
        let fixture = fixture();
        let principal = principal(
            &fixture,
            CapabilityFlags {
                can_cross_organizations: true,
                can_cross_departments: false,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );

        // The department restriction binds only within the home organization.
        let foreign = fixture
            .service
            .accessible_departments(&principal, fixture.other_organization)
            .await
            .unwrap_or_default();
        assert_eq!(
            foreign,
            fixture.other_departments.iter().copied().collect()
        );

        let home = fixture
            .service
            .accessible_departments(&principal, fixture.home_organization)
            .await
            .unwrap_or_default();
        assert_eq!(home, BTreeSet::from([fixture.home_department]));
    }

    #[tokio::test]
    async fn department_access_implies_organization_access() {
        let fixture = fixture();
        let principals = [
            principal(&fixture, CapabilityFlags::default(), PermissionSet::new()),
            principal(
                &fixture,
                CapabilityFlags {
                    can_cross_departments: true,
                    ..CapabilityFlags::default()
                },
                PermissionSet::new(),
            ),
            principal(
                &fixture,
                CapabilityFlags {
                    can_cross_organizations: true,
                    ..CapabilityFlags::default()
                },
                PermissionSet::new(),
            ),
        ];

        let mut all_departments = vec![fixture.home_department, fixture.sibling_department];
        all_departments.extend(fixture.other_departments.iter().copied());

        for principal in &principals {
            for department_id in &all_departments {
                let department_ok = fixture
                    .service
                    .can_access_department(principal, *department_id)
                    .await
                    .unwrap_or(false);
                if department_ok {
                    let organization_id = if *department_id == fixture.home_department
                        || *department_id == fixture.sibling_department
                    {
                        fixture.home_organization
                    } else {
                        fixture.other_organization
                    };
                    let organization_ok = fixture
                        .service
                        .can_access_organization(principal, organization_id)
                        .await
                        .unwrap_or(false);
                    assert!(organization_ok);
                }
            }
        }
    }

    #[tokio::test]
    async fn unknown_department_is_not_found() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let result = fixture
            .service
            .ensure_department_access(&principal, DepartmentId::new())
            .await;
        assert!(matches!(result, Err(deskrail_core::AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn foreign_department_yields_scope_denial_not_not_found() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let result = fixture
            .service
            .ensure_department_access(&principal, fixture.other_departments[0])
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::OrganizationScopeDenied(_))
        ));
    }

    #[tokio::test]
    async fn sibling_department_yields_department_scope_denial() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let result = fixture
            .service
            .ensure_department_access(&principal, fixture.sibling_department)
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::DepartmentScopeDenied(_))
        ));
    }

    #[tokio::test]
    async fn scope_filter_is_unrestricted_only_for_super_users() {
        let fixture = fixture();

        let super_user = principal(
            &fixture,
            CapabilityFlags {
                is_super_user: true,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );
        let filter = fixture
            .service
            .scope_filter(&super_user, ScopedEntity::Tickets)
            .await;
        assert!(filter.map(|value| value.is_unrestricted()).unwrap_or(false));

        let cross_everything = principal(
            &fixture,
            CapabilityFlags {
                can_cross_organizations: true,
                can_cross_departments: true,
                ..CapabilityFlags::default()
            },
            PermissionSet::new(),
        );
        let filter = fixture
            .service
            .scope_filter(&cross_everything, ScopedEntity::Tickets)
            .await;
        assert!(!filter.map(|value| value.is_unrestricted()).unwrap_or(true));
    }

    #[tokio::test]
    async fn scope_filter_never_admits_foreign_rows_for_plain_principals() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());

        let filter = fixture
            .service
            .scope_filter(&principal, ScopedEntity::Tickets)
            .await;
        let Ok(filter) = filter else {
            panic!("scope filter construction failed");
        };

        assert!(filter.permits(fixture.home_organization, Some(fixture.home_department)));
        assert!(!filter.permits(fixture.home_organization, Some(fixture.sibling_department)));
        assert!(!filter.permits(fixture.other_organization, Some(fixture.other_departments[0])));
    }

    #[tokio::test]
    async fn company_agent_scenario_from_the_product_brief() {
        let fixture = fixture();
        let permissions =
            PermissionSet::parse_all(&["tickets:list", "tickets:create"]).unwrap_or_default();
        let agent = principal(&fixture, CapabilityFlags::default(), permissions);

        let organizations = fixture
            .service
            .accessible_organizations(&agent)
            .await
            .unwrap_or_default();
        assert_eq!(organizations, BTreeSet::from([fixture.home_organization]));

        let departments = fixture
            .service
            .accessible_departments(&agent, fixture.home_organization)
            .await
            .unwrap_or_default();
        assert_eq!(departments, BTreeSet::from([fixture.home_department]));

        assert!(agent.has_permission("tickets", "list"));
        assert!(!agent.has_permission("tickets", "delete"));
    }

    #[tokio::test]
    async fn policy_without_principal_is_unauthenticated() {
        let fixture = fixture();
        let policy = AccessPolicy::authenticated();

        let result = fixture
            .service
            .enforce_policy(None, &policy, ScopeTarget::default())
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn policy_scope_check_runs_before_permission_check() {
        let fixture = fixture();
        let principal = principal(&fixture, CapabilityFlags::default(), PermissionSet::new());
        let policy = AccessPolicy::authenticated()
            .with_organization_scope("organization_id")
            .with_permission("tickets", "list");

        // Even though the permission is missing too, the scope denial wins.
        let result = fixture
            .service
            .enforce_policy(
                Some(&principal),
                &policy,
                ScopeTarget {
                    organization_id: Some(fixture.other_organization),
                    department_id: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::OrganizationScopeDenied(_))
        ));
    }

    #[tokio::test]
    async fn policy_permission_check_uses_any_of_semantics() {
        let fixture = fixture();
        let permissions = PermissionSet::parse_all(&["tickets:create"]).unwrap_or_default();
        let principal = principal(&fixture, CapabilityFlags::default(), permissions);
        let policy = AccessPolicy::authenticated()
            .with_permission("tickets", "delete")
            .with_permission("tickets", "create");

        let result = fixture
            .service
            .enforce_policy(Some(&principal), &policy, ScopeTarget::default())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn policy_denies_when_no_permission_matches() {
        let fixture = fixture();
        let permissions = PermissionSet::parse_all(&["tickets:list"]).unwrap_or_default();
        let principal = principal(&fixture, CapabilityFlags::default(), permissions);
        let policy = AccessPolicy::authenticated().with_permission("roles", "manage");

        let result = fixture
            .service
            .enforce_policy(Some(&principal), &policy, ScopeTarget::default())
            .await;
        assert!(matches!(
            result,
            Err(deskrail_core::AppError::PermissionDenied(_))
        ));
    }
}
