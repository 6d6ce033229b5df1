//! Read-through cache for the tenancy directory.
//!
//! The hierarchy changes rarely but is consulted on every request, so the
//! two hot reads (the organization list and each organization's department
//! list) are cached in process with a short TTL. Mutations write through to
//! the backing store and drop the affected cache entries, so a follow-up
//! read on the same instance sees its own write; other instances converge
//! within one TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deskrail_application::DirectoryRepository;
use deskrail_core::{AppResult, DepartmentId, OrganizationId};
use deskrail_domain::{Company, CompanyId, Department, Organization};
use tokio::sync::RwLock;
use tokio::time::Instant;

const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct CachedValue<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> CachedValue<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.stored_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// Caching decorator over a [`DirectoryRepository`].
pub struct CachedDirectoryRepository {
    inner: Arc<dyn DirectoryRepository>,
    ttl: Duration,
    organizations: RwLock<Option<CachedValue<Vec<Organization>>>>,
    departments: RwLock<HashMap<OrganizationId, CachedValue<Vec<Department>>>>,
}

impl CachedDirectoryRepository {
    /// Wraps a repository with the default 30 second TTL.
    #[must_use]
    pub fn new(inner: Arc<dyn DirectoryRepository>) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    /// Wraps a repository with an explicit TTL.
    #[must_use]
    pub fn with_ttl(inner: Arc<dyn DirectoryRepository>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            organizations: RwLock::new(None),
            departments: RwLock::new(HashMap::new()),
        }
    }

    async fn invalidate_organizations(&self) {
        *self.organizations.write().await = None;
    }

    async fn invalidate_departments(&self, organization_id: OrganizationId) {
        self.departments.write().await.remove(&organization_id);
    }
}

#[async_trait]
impl DirectoryRepository for CachedDirectoryRepository {
    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        if let Some(cached) = self.organizations.read().await.as_ref() {
            if let Some(value) = cached.fresh(self.ttl) {
                return Ok(value);
            }
        }

        let value = self.inner.list_organizations().await?;
        tracing::debug!(count = value.len(), "refreshed organization cache");
        *self.organizations.write().await = Some(CachedValue {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    async fn find_organization(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
        self.inner.find_organization(id).await
    }

    async fn create_organization(&self, organization: Organization) -> AppResult<()> {
        self.inner.create_organization(organization).await?;
        self.invalidate_organizations().await;
        Ok(())
    }

    async fn set_organization_active(&self, id: OrganizationId, is_active: bool) -> AppResult<()> {
        self.inner.set_organization_active(id, is_active).await?;
        self.invalidate_organizations().await;
        Ok(())
    }

    async fn list_departments(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Department>> {
        if let Some(cached) = self.departments.read().await.get(&organization_id) {
            if let Some(value) = cached.fresh(self.ttl) {
                return Ok(value);
            }
        }

        let value = self.inner.list_departments(organization_id).await?;
        tracing::debug!(%organization_id, count = value.len(), "refreshed department cache");
        self.departments.write().await.insert(
            organization_id,
            CachedValue {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>> {
        self.inner.find_department(id).await
    }

    async fn create_department(&self, department: Department) -> AppResult<()> {
        let organization_id = department.organization_id;
        self.inner.create_department(department).await?;
        self.invalidate_departments(organization_id).await;
        Ok(())
    }

    async fn set_department_active(&self, id: DepartmentId, is_active: bool) -> AppResult<()> {
        self.inner.set_department_active(id, is_active).await?;
        // The department's owner is not known here; drop every entry.
        self.departments.write().await.clear();
        Ok(())
    }

    async fn list_companies(&self, organization_id: OrganizationId) -> AppResult<Vec<Company>> {
        self.inner.list_companies(organization_id).await
    }

    async fn find_company(&self, id: CompanyId) -> AppResult<Option<Company>> {
        self.inner.find_company(id).await
    }

    async fn create_company(&self, company: Company) -> AppResult<()> {
        self.inner.create_company(company).await
    }

    async fn set_company_active(&self, id: CompanyId, is_active: bool) -> AppResult<()> {
        self.inner.set_company_active(id, is_active).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use deskrail_application::DirectoryRepository;
    use deskrail_core::{AppResult, DepartmentId, OrganizationId};
    use deskrail_domain::{
        Company, CompanyId, Department, Organization, OrganizationKind,
    };
    use tokio::sync::Mutex;

    use super::CachedDirectoryRepository;

    #[derive(Default)]
    struct CountingDirectory {
        organizations: Mutex<Vec<Organization>>,
        departments: Mutex<Vec<Department>>,
        organization_reads: AtomicUsize,
        department_reads: AtomicUsize,
    }

    #[async_trait]
    impl DirectoryRepository for CountingDirectory {
        async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
            self.organization_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.organizations.lock().await.clone())
        }

        async fn find_organization(
            &self,
            id: OrganizationId,
        ) -> AppResult<Option<Organization>> {
            Ok(self
                .organizations
                .lock()
                .await
                .iter()
                .find(|organization| organization.id == id)
                .cloned())
        }

        async fn create_organization(&self, organization: Organization) -> AppResult<()> {
            self.organizations.lock().await.push(organization);
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
            self.department_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .departments
                .lock()
                .await
                .iter()
                .filter(|department| department.organization_id == organization_id)
                .cloned()
                .collect())
        }

        async fn find_department(&self, _id: DepartmentId) -> AppResult<Option<Department>> {
            Ok(None)
        }

        async fn create_department(&self, department: Department) -> AppResult<()> {
            self.departments.lock().await.push(department);
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

    fn organization() -> Organization {
        Organization {
            id: OrganizationId::new(),
            name: "org".to_owned(),
            kind: OrganizationKind::ClientCompany,
            is_active: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_reads_within_the_ttl_hit_the_cache() {
        let inner = Arc::new(CountingDirectory::default());
        inner.organizations.lock().await.push(organization());
        let cached = CachedDirectoryRepository::with_ttl(inner.clone(), Duration::from_secs(30));

        for _ in 0..5 {
            let listed = cached.list_organizations().await.unwrap_or_default();
            assert_eq!(listed.len(), 1);
        }
        assert_eq!(inner.organization_reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_the_ttl() {
        let inner = Arc::new(CountingDirectory::default());
        let cached = CachedDirectoryRepository::with_ttl(inner.clone(), Duration::from_secs(30));

        let _ = cached.list_organizations().await;
        tokio::time::advance(Duration::from_secs(31)).await;
        let _ = cached.list_organizations().await;
        assert_eq!(inner.organization_reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_invalidate_so_the_writer_sees_its_own_write() {
        let inner = Arc::new(CountingDirectory::default());
        let cached = CachedDirectoryRepository::with_ttl(inner.clone(), Duration::from_secs(30));

        assert!(cached.list_organizations().await.unwrap_or_default().is_empty());

        let result = cached.create_organization(organization()).await;
        assert!(result.is_ok());

        let listed = cached.list_organizations().await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn department_caches_are_kept_per_organization() {
        let inner = Arc::new(CountingDirectory::default());
        let first = OrganizationId::new();
        let second = OrganizationId::new();
        inner.departments.lock().await.push(Department {
            id: DepartmentId::new(),
            organization_id: first,
            name: "Tier 1".to_owned(),
            is_active: true,
        });
        let cached = CachedDirectoryRepository::with_ttl(inner.clone(), Duration::from_secs(30));

        let _ = cached.list_departments(first).await;
        let _ = cached.list_departments(second).await;
        let _ = cached.list_departments(first).await;
        assert_eq!(inner.department_reads.load(Ordering::SeqCst), 2);

        // A write under one organization leaves the other entry intact.
        let result = cached
            .create_department(Department {
                id: DepartmentId::new(),
                organization_id: second,
                name: "Tier 2".to_owned(),
                is_active: true,
            })
            .await;
        assert!(result.is_ok());

        let _ = cached.list_departments(first).await;
        assert_eq!(inner.department_reads.load(Ordering::SeqCst), 2);
        let listed = cached.list_departments(second).await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
    }
}
