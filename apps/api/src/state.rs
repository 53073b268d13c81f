use std::sync::Arc;

use sqlx::SqlitePool;

use crate::analysis::analyzer::SpeechAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Pluggable analysis backend. Default: PlaceholderAnalyzer.
    pub analyzer: Arc<dyn SpeechAnalyzer>,
}
