use async_trait::async_trait;
use deskrail_core::{AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{Company, CompanyId, Department, Organization};

/// Port for the tenancy directory: organizations, departments, companies.
///
/// Reads back the hierarchy snapshot the scoping core evaluates against.
/// Implementations map storage failures to `AppError::Unavailable` so callers
/// can distinguish retryable reads from authorization denials.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Lists every organization, active or not.
    async fn list_organizations(&self) -> AppResult<Vec<Organization>>;

    /// Finds one organization by id.
    async fn find_organization(&self, id: OrganizationId) -> AppResult<Option<Organization>>;

    /// Persists a new organization.
    async fn create_organization(&self, organization: Organization) -> AppResult<()>;

    /// Flips the soft-deactivation flag on an organization.
    async fn set_organization_active(&self, id: OrganizationId, is_active: bool) -> AppResult<()>;

    /// Lists the departments of one organization.
    async fn list_departments(&self, organization_id: OrganizationId)
    -> AppResult<Vec<Department>>;

    /// Finds one department by id.
    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>>;

    /// Persists a new department under its owning organization.
    async fn create_department(&self, department: Department) -> AppResult<()>;

    /// Flips the soft-deactivation flag on a department.
    async fn set_department_active(&self, id: DepartmentId, is_active: bool) -> AppResult<()>;

    /// Lists the companies managed by one organization.
    async fn list_companies(&self, organization_id: OrganizationId) -> AppResult<Vec<Company>>;

    /// Finds one company by id.
    async fn find_company(&self, id: CompanyId) -> AppResult<Option<Company>>;

    /// Persists a new company under its owning organization.
    async fn create_company(&self, company: Company) -> AppResult<()>;

    /// Flips the soft-deactivation flag on a company.
    async fn set_company_active(&self, id: CompanyId, is_active: bool) -> AppResult<()>;
}
