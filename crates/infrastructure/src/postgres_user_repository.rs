//! PostgreSQL-backed user directory.

use async_trait::async_trait;
use deskrail_application::{OrganizationSelection, ScopeFilter, UserRepository};
use deskrail_core::{AppError, AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{CapabilityFlags, EmailAddress, UserAccount, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

type UserRow = (
    Uuid,
    String,
    String,
    Uuid,
    Option<Uuid>,
    String,
    bool,
    bool,
    bool,
    bool,
);

/// PostgreSQL-backed user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: UserRow) -> AppResult<UserAccount> {
    let (
        id,
        email,
        display_name,
        organization_id,
        department_id,
        role,
        is_super_user,
        can_cross_organizations,
        can_cross_departments,
        is_active,
    ) = row;

    Ok(UserAccount {
        id,
        email: EmailAddress::new(email)
            .map_err(|error| AppError::Internal(format!("stored email is invalid: {error}")))?,
        display_name,
        organization_id: OrganizationId::from_uuid(organization_id),
        department_id: department_id.map(DepartmentId::from_uuid),
        role: role
            .parse::<UserRole>()
            .map_err(|error| AppError::Internal(format!("stored role is invalid: {error}")))?,
        capabilities: CapabilityFlags {
            is_super_user,
            can_cross_organizations,
            can_cross_departments,
        },
        is_active,
    })
}

/// Renders a [`ScopeFilter`] into the three bind values used by scoped
/// queries: an optional organization allow-list, the home organization when
/// a department restriction is active, and the allowed department ids.
pub(crate) fn scope_binds(
    filter: &ScopeFilter,
) -> (Option<Vec<Uuid>>, Option<Uuid>, Vec<Uuid>) {
    let organizations = match filter.organizations() {
        OrganizationSelection::All => None,
        OrganizationSelection::Only(ids) => {
            Some(ids.iter().map(|id| id.as_uuid()).collect())
        }
    };

    match filter.home_departments() {
        Some(departments) => (
            organizations,
            Some(filter.home_organization().as_uuid()),
            departments.iter().map(|id| id.as_uuid()).collect(),
        ),
        None => (organizations, None, Vec::new()),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, organization_id, department_id, role,
                   is_super_user, can_cross_organizations, can_cross_departments, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to load user: {error}")))?;

        row.map(user_from_row).transpose()
    }

    async fn list_users(&self, filter: &ScopeFilter) -> AppResult<Vec<UserAccount>> {
        let (organizations, home_organization, departments) = scope_binds(filter);

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, organization_id, department_id, role,
                   is_super_user, can_cross_organizations, can_cross_departments, is_active
            FROM users
            WHERE ($1::uuid[] IS NULL OR organization_id = ANY($1))
              AND ($2::uuid IS NULL
                   OR organization_id <> $2
                   OR department_id = ANY($3))
            ORDER BY display_name
            "#,
        )
        .bind(organizations)
        .bind(home_organization)
        .bind(departments)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to list users: {error}")))?;

        rows.into_iter().map(user_from_row).collect()
    }

    async fn set_home_organization(
        &self,
        user_id: Uuid,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET organization_id = $2, department_id = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(organization_id.as_uuid())
        .bind(department_id.map(|id| id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to move user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }
        Ok(())
    }
}
