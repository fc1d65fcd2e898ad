//! Persistence interface (§6, write-only): upsert the latest result per
//! test case, append a run-history entry linking to it.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::errors::StoreError;
use crate::types::TestResultRecord;

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save_test_results(&self, record: TestResultRecord) -> Result<(), StoreError>;
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub test_case: String,
    pub record: TestResultRecord,
}

/// In-memory stand-in: `latest` holds one row per `test_case` (the
/// upsert), `history` is the append-only log.
#[derive(Default)]
pub struct InMemoryResultStore {
    latest: RwLock<Vec<TestResultRecord>>,
    history: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest_for(&self, test_case: &str) -> Option<TestResultRecord> {
        self.latest
            .read()
            .await
            .iter()
            .find(|record| record.test_case == test_case)
            .cloned()
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save_test_results(&self, record: TestResultRecord) -> Result<(), StoreError> {
        {
            let mut latest = self.latest.write().await;
            if let Some(existing) = latest.iter_mut().find(|r| r.test_case == record.test_case) {
                *existing = record.clone();
            } else {
                latest.push(record.clone());
            }
        }
        self.history.write().await.push(HistoryEntry {
            test_case: record.test_case.clone(),
            record,
        });
        Ok(())
    }
}

/// No-op store: accepted per §9 ("a no-op implementation must be
/// acceptable and must not change observable behavior other than absence
/// of stored records"). Logs and discards.
#[derive(Default)]
pub struct NoopResultStore;

#[async_trait]
impl ResultStore for NoopResultStore {
    async fn save_test_results(&self, record: TestResultRecord) -> Result<(), StoreError> {
        warn!(test_case = %record.test_case, "persistence disabled, discarding result");
        Ok(())
    }
}
