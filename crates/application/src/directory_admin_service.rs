//! Administration of the tenancy directory: organizations, departments and
//! companies.
//!
//! Every read is filtered through the caller's reach, and every lookup of a
//! concrete id distinguishes "does not exist" from "exists but is outside
//! your scope" the same way the hierarchy resolver does.

use std::sync::Arc;

use deskrail_core::{AppError, AppResult, DepartmentId, NonEmptyString, OrganizationId};
use deskrail_domain::{
    Company, CompanyId, Department, HourBank, Organization, OrganizationKind, Principal, SlaTier,
};

use crate::directory_ports::DirectoryRepository;
use crate::tenant_scope_service::TenantScopeService;

/// Input for organization creation.
#[derive(Debug, Clone)]
pub struct CreateOrganizationInput {
    /// Display name.
    pub name: String,
    /// System-owner or client-company tenancy kind.
    pub kind: OrganizationKind,
}

/// Input for department creation.
#[derive(Debug, Clone)]
pub struct CreateDepartmentInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
}

/// Input for company creation.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Email/web domain used to associate inbound requesters.
    pub domain: String,
    /// Service tier as a storage value.
    pub sla_tier: String,
    /// Support minutes purchased up front.
    pub purchased_minutes: i64,
}

/// Directory administration use cases.
#[derive(Clone)]
pub struct DirectoryAdminService {
    directory: Arc<dyn DirectoryRepository>,
    scopes: TenantScopeService,
}

impl DirectoryAdminService {
    /// Creates a service over the directory port and the hierarchy resolver.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryRepository>, scopes: TenantScopeService) -> Self {
        Self { directory, scopes }
    }

    /// Lists the organizations the caller may reach.
    pub async fn list_organizations(&self, principal: &Principal) -> AppResult<Vec<Organization>> {
        let reachable = self.scopes.accessible_organizations(principal).await?;
        let organizations = self
            .directory
            .list_organizations()
            .await?
            .into_iter()
            .filter(|organization| reachable.contains(&organization.id))
            .collect();
        Ok(organizations)
    }

    /// Fetches one organization, enforcing reach.
    pub async fn get_organization(
        &self,
        principal: &Principal,
        id: OrganizationId,
    ) -> AppResult<Organization> {
        let Some(organization) = self.directory.find_organization(id).await? else {
            return Err(AppError::NotFound(format!("organization '{id}' not found")));
        };
        self.scopes.ensure_organization_access(principal, id).await?;
        Ok(organization)
    }

    /// Creates a new organization.
    pub async fn create_organization(
        &self,
        input: CreateOrganizationInput,
    ) -> AppResult<Organization> {
        let name = NonEmptyString::new(input.name)?;
        let organization = Organization {
            id: OrganizationId::new(),
            name: name.into(),
            kind: input.kind,
            is_active: true,
        };
        self.directory.create_organization(organization.clone()).await?;
        Ok(organization)
    }

    /// Soft-deactivates an organization.
    pub async fn deactivate_organization(&self, id: OrganizationId) -> AppResult<()> {
        if self.directory.find_organization(id).await?.is_none() {
            return Err(AppError::NotFound(format!("organization '{id}' not found")));
        }
        self.directory.set_organization_active(id, false).await
    }

    /// Lists the departments of one organization the caller may reach.
    pub async fn list_departments(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Department>> {
        let reachable = self
            .scopes
            .accessible_departments(principal, organization_id)
            .await?;
        let departments = self
            .directory
            .list_departments(organization_id)
            .await?
            .into_iter()
            .filter(|department| reachable.contains(&department.id))
            .collect();
        Ok(departments)
    }

    /// Fetches one department, enforcing reach.
    pub async fn get_department(
        &self,
        principal: &Principal,
        id: DepartmentId,
    ) -> AppResult<Department> {
        self.scopes.ensure_department_access(principal, id).await?;
        let Some(department) = self.directory.find_department(id).await? else {
            return Err(AppError::NotFound(format!("department '{id}' not found")));
        };
        Ok(department)
    }

    /// Creates a department under an existing organization.
    pub async fn create_department(
        &self,
        input: CreateDepartmentInput,
    ) -> AppResult<Department> {
        let name = NonEmptyString::new(input.name)?;
        if self
            .directory
            .find_organization(input.organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                input.organization_id
            )));
        }

        let department = Department {
            id: DepartmentId::new(),
            organization_id: input.organization_id,
            name: name.into(),
            is_active: true,
        };
        self.directory.create_department(department.clone()).await?;
        Ok(department)
    }

    /// Soft-deactivates a department.
    pub async fn deactivate_department(&self, id: DepartmentId) -> AppResult<()> {
        if self.directory.find_department(id).await?.is_none() {
            return Err(AppError::NotFound(format!("department '{id}' not found")));
        }
        self.directory.set_department_active(id, false).await
    }

    /// Lists the companies of one organization the caller may reach.
    pub async fn list_companies(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Company>> {
        self.scopes
            .ensure_organization_access(principal, organization_id)
            .await?;
        self.directory.list_companies(organization_id).await
    }

    /// Fetches one company, enforcing reach on its owning organization.
    pub async fn get_company(&self, principal: &Principal, id: CompanyId) -> AppResult<Company> {
        let Some(company) = self.directory.find_company(id).await? else {
            return Err(AppError::NotFound(format!("company '{id}' not found")));
        };
        self.scopes
            .ensure_organization_access(principal, company.organization_id)
            .await
            .map_err(|error| match error {
                AppError::OrganizationScopeDenied(_) => AppError::OrganizationScopeDenied(
                    format!("company '{id}' is outside your organization scope"),
                ),
                other => other,
            })?;
        Ok(company)
    }

    /// Creates a company under an existing organization.
    pub async fn create_company(&self, input: CreateCompanyInput) -> AppResult<Company> {
        let name = NonEmptyString::new(input.name)?;
        let domain = NonEmptyString::new(input.domain)?;
        let sla_tier = SlaTier::parse(input.sla_tier.as_str())?;
        if input.purchased_minutes < 0 {
            return Err(AppError::Validation(
                "purchased minutes must not be negative".to_owned(),
            ));
        }
        if self
            .directory
            .find_organization(input.organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                input.organization_id
            )));
        }

        let company = Company {
            id: CompanyId::new(),
            organization_id: input.organization_id,
            name: name.into(),
            domain: domain.into(),
            sla_tier,
            is_active: true,
            hour_bank: HourBank {
                purchased_minutes: input.purchased_minutes,
                consumed_minutes: 0,
            },
        };
        self.directory.create_company(company.clone()).await?;
        Ok(company)
    }

    /// Soft-deactivates a company, enforcing reach on its owning
    /// organization.
    pub async fn deactivate_company(&self, principal: &Principal, id: CompanyId) -> AppResult<()> {
        let Some(company) = self.directory.find_company(id).await? else {
            return Err(AppError::NotFound(format!("company '{id}' not found")));
        };
        self.scopes
            .ensure_organization_access(principal, company.organization_id)
            .await
            .map_err(|error| match error {
                AppError::OrganizationScopeDenied(_) => AppError::OrganizationScopeDenied(
                    format!("company '{id}' is outside your organization scope"),
                ),
                other => other,
            })?;
        self.directory.set_company_active(id, false).await
    }
}
