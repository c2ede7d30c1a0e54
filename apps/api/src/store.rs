use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::analysis::AnalysisResult;

/// Keyed storage for completed analyses.
///
/// The API only inserts and reads: a result is immutable once written and
/// lives for the rest of the process. A persistent backend can be swapped in
/// behind this trait without touching the handlers.
///
/// Carried in `AppState` as `Arc<dyn ResultStore>`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn insert(&self, result: AnalysisResult);
    async fn get(&self, id: &str) -> Option<AnalysisResult>;
}

/// Default backend: an unbounded in-process map. Does not survive restart
/// and does not scale across instances.
#[derive(Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<String, AnalysisResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn insert(&self, result: AnalysisResult) {
        self.results
            .write()
            .await
            .insert(result.id.clone(), result);
    }

    async fn get(&self, id: &str) -> Option<AnalysisResult> {
        self.results.read().await.get(id).cloned()
    }
}
