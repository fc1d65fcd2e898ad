//! Catalog interface (§6, read-only).

use async_trait::async_trait;
use soulbrowser_core_types::TestCase;
use tokio::sync::RwLock;

use crate::errors::CatalogError;
use crate::types::ModuleQuery;

#[async_trait]
pub trait TestCatalog: Send + Sync {
    async fn fetch_test_case(&self, id: &str) -> Result<Option<TestCase>, CatalogError>;

    /// Ordered ascending by creation time, filtered to `query.user_id` /
    /// `query.project_id` when present.
    async fn fetch_by_module_ids(
        &self,
        query: &ModuleQuery,
    ) -> Result<Vec<TestCase>, CatalogError>;
}

struct CatalogEntry {
    test_case: TestCase,
    module_id: Option<String>,
    user_id: Option<String>,
    project_id: Option<String>,
    created_at: u64,
}

/// In-memory stand-in for the catalog store. Keeps insertion-order
/// bookkeeping via a monotonic counter so `fetch_by_module_ids` can sort
/// ascending by creation time without depending on wall-clock time (which
/// this workspace's tests must not call).
#[derive(Default)]
pub struct InMemoryTestCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl InMemoryTestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a test case under `module_id`, `user_id`, `project_id`.
    /// `created_at` is an explicit monotonic ordinal, not a timestamp — the
    /// caller owns time.
    pub async fn insert(
        &self,
        test_case: TestCase,
        module_id: Option<String>,
        user_id: Option<String>,
        project_id: Option<String>,
        created_at: u64,
    ) {
        self.entries.write().await.push(CatalogEntry {
            test_case,
            module_id,
            user_id,
            project_id,
            created_at,
        });
    }
}

#[async_trait]
impl TestCatalog for InMemoryTestCatalog {
    async fn fetch_test_case(&self, id: &str) -> Result<Option<TestCase>, CatalogError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|entry| entry.test_case.id == id)
            .map(|entry| entry.test_case.clone()))
    }

    async fn fetch_by_module_ids(
        &self,
        query: &ModuleQuery,
    ) -> Result<Vec<TestCase>, CatalogError> {
        let entries = self.entries.read().await;
        let mut matched: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|entry| {
                entry
                    .module_id
                    .as_deref()
                    .map(|id| query.module_ids.iter().any(|wanted| wanted == id))
                    .unwrap_or(false)
            })
            .filter(|entry| {
                query
                    .user_id
                    .as_deref()
                    .map_or(true, |wanted| entry.user_id.as_deref() == Some(wanted))
            })
            .filter(|entry| {
                query
                    .project_id
                    .as_deref()
                    .map_or(true, |wanted| entry.project_id.as_deref() == Some(wanted))
            })
            .collect();
        matched.sort_by_key(|entry| entry.created_at);
        Ok(matched.into_iter().map(|entry| entry.test_case.clone()).collect())
    }
}
