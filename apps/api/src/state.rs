use std::sync::Arc;

use crate::analysis::analyzer::MockAnalyzer;
use crate::config::Config;
use crate::store::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completed analyses keyed by id. In-memory by default; swap the
    /// backend behind `ResultStore` if durability is ever needed.
    pub store: Arc<dyn ResultStore>,
    pub analyzer: MockAnalyzer,
    pub config: Config,
}
