use deskrail_domain::{Company, Department, Organization};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for organization creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-organization-request.ts"
)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub kind: String,
}

/// API representation of an organization.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-response.ts"
)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
}

impl From<Organization> for OrganizationResponse {
    fn from(organization: Organization) -> Self {
        Self {
            id: organization.id.to_string(),
            name: organization.name,
            kind: organization.kind.as_str().to_owned(),
            is_active: organization.is_active,
        }
    }
}

/// Incoming payload for department creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-department-request.ts"
)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/department-response.ts"
)]
pub struct DepartmentResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub is_active: bool,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.to_string(),
            organization_id: department.organization_id.to_string(),
            name: department.name,
            is_active: department.is_active,
        }
    }
}

/// Incoming payload for company creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-company-request.ts"
)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub domain: String,
    pub sla_tier: String,
    pub purchased_minutes: i64,
}

/// API representation of a company.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/company-response.ts"
)]
pub struct CompanyResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub domain: String,
    pub sla_tier: String,
    pub is_active: bool,
    pub purchased_minutes: i64,
    pub consumed_minutes: i64,
    pub remaining_minutes: i64,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            organization_id: company.organization_id.to_string(),
            name: company.name,
            domain: company.domain,
            sla_tier: company.sla_tier.as_str().to_owned(),
            is_active: company.is_active,
            purchased_minutes: company.hour_bank.purchased_minutes,
            consumed_minutes: company.hour_bank.consumed_minutes,
            remaining_minutes: company.hour_bank.remaining_minutes(),
        }
    }
}
