//! Speech analysis: pluggable, trait-based capability that turns a stored
//! video into a `SpeechAnalysis`.
//!
//! Default: `PlaceholderAnalyzer` (fixed values, no media processing).
//! `AppState` holds an `Arc<dyn SpeechAnalyzer>`, chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::video::VideoRow;

/// Speech-quality metrics for one video, stored as JSON in `analysis_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    pub clarity_score: u32, // 0 – 100
    pub words_per_minute: u32,
    pub filler_words: u32,
    pub feedback: String,
}

impl SpeechAnalysis {
    /// Parses a stored analysis blob. Empty, malformed, or partial JSON is
    /// treated as "no analysis yet".
    pub fn from_stored(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str(raw).ok()
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analyzer failed: {0}")]
    Backend(String),
}

/// Implement this to swap analysis backends without touching handlers.
#[async_trait]
pub trait SpeechAnalyzer: Send + Sync {
    async fn analyze(&self, video: &VideoRow) -> Result<SpeechAnalysis, AnalysisError>;

    /// Short backend name, for logs.
    fn name(&self) -> &'static str;
}

pub const PLACEHOLDER_FEEDBACK: &str =
    "Your speech was clear overall. Try to reduce filler words.";

/// Returns the same fixed metrics for every video.
pub struct PlaceholderAnalyzer;

#[async_trait]
impl SpeechAnalyzer for PlaceholderAnalyzer {
    async fn analyze(&self, video: &VideoRow) -> Result<SpeechAnalysis, AnalysisError> {
        tracing::debug!("Placeholder analysis for video {} ({})", video.id, video.filepath);
        Ok(SpeechAnalysis {
            clarity_score: 85,
            words_per_minute: 120,
            filler_words: 12,
            feedback: PLACEHOLDER_FEEDBACK.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}
