//! PostgreSQL-backed tenancy directory.

use async_trait::async_trait;
use deskrail_application::DirectoryRepository;
use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{
    Company, CompanyId, Department, HourBank, Organization, OrganizationKind, SlaTier,
};
use sqlx::PgPool;
use uuid::Uuid;

type OrganizationRow = (Uuid, String, String, bool);
type DepartmentRow = (Uuid, Uuid, String, bool);
type CompanyRow = (Uuid, Uuid, String, String, String, bool, i64, i64);

/// PostgreSQL-backed directory repository.
///
/// Read failures surface as `AppError::Unavailable`: a request that cannot
/// load the hierarchy must fail closed rather than degrade to an unscoped
/// answer.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn organization_from_row(row: OrganizationRow) -> AppResult<Organization> {
    let (id, name, kind, is_active) = row;
    Ok(Organization {
        id: OrganizationId::from_uuid(id),
        name,
        kind: OrganizationKind::parse(kind.as_str())?,
        is_active,
    })
}

fn department_from_row(row: DepartmentRow) -> Department {
    let (id, organization_id, name, is_active) = row;
    Department {
        id: DepartmentId::from_uuid(id),
        organization_id: OrganizationId::from_uuid(organization_id),
        name,
        is_active,
    }
}

fn company_from_row(row: CompanyRow) -> AppResult<Company> {
    let (id, organization_id, name, domain, sla_tier, is_active, purchased, consumed) = row;
    Ok(Company {
        id: CompanyId::from_uuid(id),
        organization_id: OrganizationId::from_uuid(organization_id),
        name,
        domain,
        sla_tier: SlaTier::parse(sla_tier.as_str())?,
        is_active,
        hour_bank: HourBank {
            purchased_minutes: purchased,
            consumed_minutes: consumed,
        },
    })
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, kind, is_active
            FROM organizations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list organizations: {error}"))
        })?;

        rows.into_iter().map(organization_from_row).collect()
    }

    async fn find_organization(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, kind, is_active
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to load organization: {error}"))
        })?;

        row.map(organization_from_row).transpose()
    }

    async fn create_organization(&self, organization: Organization) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, kind, is_active)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(organization.id.as_uuid())
        .bind(organization.name)
        .bind(organization.kind.as_str())
        .bind(organization.is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create organization: {error}")))?;

        Ok(())
    }

    async fn set_organization_active(&self, id: OrganizationId, is_active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET is_active = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update organization: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("organization '{id}' not found")));
        }
        Ok(())
    }

    async fn list_departments(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, organization_id, name, is_active
            FROM departments
            WHERE organization_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list departments: {error}"))
        })?;

        Ok(rows.into_iter().map(department_from_row).collect())
    }

    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, organization_id, name, is_active
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to load department: {error}")))?;

        Ok(row.map(department_from_row))
    }

    async fn create_department(&self, department: Department) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, organization_id, name, is_active)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(department.id.as_uuid())
        .bind(department.organization_id.as_uuid())
        .bind(department.name)
        .bind(department.is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create department: {error}")))?;

        Ok(())
    }

    async fn set_department_active(&self, id: DepartmentId, is_active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE departments
            SET is_active = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update department: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("department '{id}' not found")));
        }
        Ok(())
    }

    async fn list_companies(&self, organization_id: OrganizationId) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, organization_id, name, domain, sla_tier, is_active,
                   purchased_minutes, consumed_minutes
            FROM companies
            WHERE organization_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to list companies: {error}")))?;

        rows.into_iter().map(company_from_row).collect()
    }

    async fn find_company(&self, id: CompanyId) -> AppResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, organization_id, name, domain, sla_tier, is_active,
                   purchased_minutes, consumed_minutes
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to load company: {error}")))?;

        row.map(company_from_row).transpose()
    }

    async fn create_company(&self, company: Company) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (
                id, organization_id, name, domain, sla_tier, is_active,
                purchased_minutes, consumed_minutes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(company.id.as_uuid())
        .bind(company.organization_id.as_uuid())
        .bind(company.name)
        .bind(company.domain)
        .bind(company.sla_tier.as_str())
        .bind(company.is_active)
        .bind(company.hour_bank.purchased_minutes)
        .bind(company.hour_bank.consumed_minutes)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create company: {error}")))?;

        Ok(())
    }

    async fn set_company_active(&self, id: CompanyId, is_active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET is_active = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update company: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("company '{id}' not found")));
        }
        Ok(())
    }
}
