//! PostgreSQL-backed role definitions and assignments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskrail_application::{ActiveRoleGrant, RoleAssignment, RoleDefinition, RoleRepository};
use deskrail_core::{AppError, AppResult, OrganizationId};
use deskrail_domain::PermissionSet;
use sqlx::PgPool;
use uuid::Uuid;

type RoleRow = (Uuid, String, Vec<String>, bool);
type AssignmentRow = (Uuid, Uuid, String, Option<Uuid>, bool, DateTime<Utc>);
type GrantRow = (String, Option<Uuid>, Vec<String>);

/// PostgreSQL-backed role repository.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn permissions_from_tokens(tokens: &[String]) -> AppResult<PermissionSet> {
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    // Tokens were validated against the registry before storage; a failure
    // here means the registry shrank underneath persisted data.
    PermissionSet::parse_all(&tokens)
        .map_err(|error| AppError::Internal(format!("stored role is invalid: {error}")))
}

fn role_from_row(row: RoleRow) -> AppResult<RoleDefinition> {
    let (role_id, name, tokens, is_system) = row;
    Ok(RoleDefinition {
        role_id,
        name,
        permissions: permissions_from_tokens(&tokens)?,
        is_system,
    })
}

fn assignment_from_row(row: AssignmentRow) -> RoleAssignment {
    let (assignment_id, user_id, role_name, organization_scope, is_active, assigned_at) = row;
    RoleAssignment {
        assignment_id,
        user_id,
        role_name,
        organization_scope: organization_scope.map(OrganizationId::from_uuid),
        is_active,
        assigned_at,
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, permissions, is_system
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(role_from_row).collect()
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, permissions, is_system
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to load role: {error}")))?;

        row.map(role_from_row).transpose()
    }

    async fn create_role(&self, role: RoleDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, permissions, is_system)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role.role_id)
        .bind(role.name)
        .bind(role.permissions.to_tokens())
        .bind(role.is_system)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create role: {error}")))?;

        Ok(())
    }

    async fn active_grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<ActiveRoleGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT r.name, a.organization_scope, r.permissions
            FROM role_assignments a
            JOIN roles r ON r.name = a.role_name
            WHERE a.user_id = $1
              AND a.is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to load role grants: {error}"))
        })?;

        rows.into_iter()
            .map(|(role_name, organization_scope, tokens)| {
                Ok(ActiveRoleGrant {
                    role_name,
                    organization_scope: organization_scope.map(OrganizationId::from_uuid),
                    permissions: permissions_from_tokens(&tokens)?,
                })
            })
            .collect()
    }

    async fn list_assignments_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, user_id, role_name, organization_scope, is_active, assigned_at
            FROM role_assignments
            WHERE user_id = $1
            ORDER BY assigned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list role assignments: {error}"))
        })?;

        Ok(rows.into_iter().map(assignment_from_row).collect())
    }

    async fn create_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_assignments (
                id, user_id, role_name, organization_scope, is_active, assigned_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(assignment.assignment_id)
        .bind(assignment.user_id)
        .bind(assignment.role_name)
        .bind(assignment.organization_scope.map(|id| id.as_uuid()))
        .bind(assignment.is_active)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create role assignment: {error}"))
        })?;

        Ok(())
    }

    async fn revoke_assignment(&self, assignment_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE role_assignments
            SET is_active = FALSE
            WHERE id = $1
            "#,
        )
        .bind(assignment_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to revoke role assignment: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role assignment '{assignment_id}' not found"
            )));
        }
        Ok(())
    }
}
