//! The scoped query filter: the projection of hierarchy decisions into
//! data-access predicates.
//!
//! Every list/read path for tenant-owned data passes through a
//! [`ScopeFilter`]. It is the last line of defense against cross-tenant
//! leakage even when a route's admission gate was misconfigured, so it is
//! deliberately dumb: a materialized organization id set plus an optional
//! home-organization department restriction, evaluated the same way in memory
//! and in SQL.

use std::collections::BTreeSet;

use deskrail_core::{DepartmentId, OrganizationId};

/// Tenant-owned entity families the filter knows how to scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedEntity {
    /// Tickets; department granularity applies.
    Tickets,
    /// User accounts; department granularity applies.
    Users,
    /// Departments; the row's own id is the department key.
    Departments,
    /// Companies; organization granularity only.
    Companies,
}

impl ScopedEntity {
    /// Whether rows of this entity are additionally keyed by department.
    #[must_use]
    pub fn has_department_granularity(&self) -> bool {
        matches!(self, Self::Tickets | Self::Users | Self::Departments)
    }
}

/// Which organizations a query may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationSelection {
    /// No restriction. Produced only for a true super-user.
    All,
    /// Only rows in these organizations.
    Only(BTreeSet<OrganizationId>),
}

/// A pure, deterministic predicate restricting queries to a principal's
/// reachable tenant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    entity: ScopedEntity,
    organizations: OrganizationSelection,
    home_organization: OrganizationId,
    /// When present, rows inside the home organization must also be in one
    /// of these departments. The restriction binds only within the home
    /// organization; rows in other reachable organizations are not
    /// department-restricted.
    home_departments: Option<BTreeSet<DepartmentId>>,
}

impl ScopeFilter {
    /// Creates a filter. Used by [`crate::TenantScopeService`]; handlers
    /// never construct one directly.
    #[must_use]
    pub fn new(
        entity: ScopedEntity,
        organizations: OrganizationSelection,
        home_organization: OrganizationId,
        home_departments: Option<BTreeSet<DepartmentId>>,
    ) -> Self {
        let home_departments = if entity.has_department_granularity() {
            home_departments
        } else {
            None
        };

        Self {
            entity,
            organizations,
            home_organization,
            home_departments,
        }
    }

    /// Returns the entity family this filter applies to.
    #[must_use]
    pub fn entity(&self) -> ScopedEntity {
        self.entity
    }

    /// Returns the organization selection.
    #[must_use]
    pub fn organizations(&self) -> &OrganizationSelection {
        &self.organizations
    }

    /// Returns the home organization the department restriction binds to.
    #[must_use]
    pub fn home_organization(&self) -> OrganizationId {
        self.home_organization
    }

    /// Returns the home-organization department restriction, if any.
    #[must_use]
    pub fn home_departments(&self) -> Option<&BTreeSet<DepartmentId>> {
        self.home_departments.as_ref()
    }

    /// Whether the filter admits every row. True only for a super-user.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.organizations, OrganizationSelection::All) && self.home_departments.is_none()
    }

    /// Evaluates the predicate for one row.
    ///
    /// Rows without a department value are rejected under an active
    /// department restriction: a row that cannot prove it is in scope is out
    /// of scope.
    #[must_use]
    pub fn permits(
        &self,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> bool {
        match &self.organizations {
            OrganizationSelection::All => {}
            OrganizationSelection::Only(allowed) => {
                if !allowed.contains(&organization_id) {
                    return false;
                }
            }
        }

        if organization_id == self.home_organization {
            if let Some(allowed) = &self.home_departments {
                return department_id.is_some_and(|department| allowed.contains(&department));
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use deskrail_core::{DepartmentId, OrganizationId};

    use super::{OrganizationSelection, ScopeFilter, ScopedEntity};

    #[test]
    fn organization_restriction_rejects_foreign_rows() {
        let home = OrganizationId::new();
        let other = OrganizationId::new();
        let filter = ScopeFilter::new(
            ScopedEntity::Tickets,
            OrganizationSelection::Only(BTreeSet::from([home])),
            home,
            None,
        );

        assert!(filter.permits(home, Some(DepartmentId::new())));
        assert!(!filter.permits(other, Some(DepartmentId::new())));
    }

    #[test]
    fn department_restriction_binds_only_in_home_organization() {
        let home = OrganizationId::new();
        let other = OrganizationId::new();
        let home_department = DepartmentId::new();
        let filter = ScopeFilter::new(
            ScopedEntity::Tickets,
            OrganizationSelection::Only(BTreeSet::from([home, other])),
            home,
            Some(BTreeSet::from([home_department])),
        );

        assert!(filter.permits(home, Some(home_department)));
        assert!(!filter.permits(home, Some(DepartmentId::new())));
        // Rows in other reachable organizations are not department-restricted.
        assert!(filter.permits(other, Some(DepartmentId::new())));
    }

    #[test]
    fn row_without_department_fails_an_active_restriction() {
        let home = OrganizationId::new();
        let filter = ScopeFilter::new(
            ScopedEntity::Users,
            OrganizationSelection::Only(BTreeSet::from([home])),
            home,
            Some(BTreeSet::from([DepartmentId::new()])),
        );

        assert!(!filter.permits(home, None));
    }

    #[test]
    fn department_restriction_is_dropped_for_organization_level_entities() {
        let home = OrganizationId::new();
        let filter = ScopeFilter::new(
            ScopedEntity::Companies,
            OrganizationSelection::Only(BTreeSet::from([home])),
            home,
            Some(BTreeSet::from([DepartmentId::new()])),
        );

        assert!(filter.permits(home, None));
        assert!(filter.home_departments().is_none());
    }

    #[test]
    fn unrestricted_filter_admits_everything() {
        let filter = ScopeFilter::new(
            ScopedEntity::Tickets,
            OrganizationSelection::All,
            OrganizationId::new(),
            None,
        );

        assert!(filter.is_unrestricted());
        assert!(filter.permits(OrganizationId::new(), None));
    }
}
