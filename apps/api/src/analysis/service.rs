use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::analysis::analyzer::{SpeechAnalysis, SpeechAnalyzer};
use crate::errors::AppError;
use crate::models::video::VideoRow;
use crate::videos::repository::{get_video, replace_analysis};

pub struct AnalysisOutcome {
    pub video: VideoRow,
    pub analysis: SpeechAnalysis,
    /// True when this call ran the analyzer and persisted its result.
    pub computed: bool,
}

/// Returns the stored analysis for a video, computing and persisting it
/// first if the stored blob is absent or unparsable.
///
/// A missing video is `NotFound`; every other failure is `AnalysisFailed`.
/// Concurrent first views converge on whichever result was stored first.
pub async fn load_or_compute(
    pool: &SqlitePool,
    analyzer: &dyn SpeechAnalyzer,
    video_id: i64,
) -> Result<AnalysisOutcome, AppError> {
    let mut video = get_video(pool, video_id)
        .await
        .map_err(analysis_failed)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if let Some(analysis) = SpeechAnalysis::from_stored(&video.analysis_data) {
        return Ok(AnalysisOutcome {
            video,
            analysis,
            computed: false,
        });
    }

    let analysis = analyzer.analyze(&video).await.map_err(analysis_failed)?;
    let json = serde_json::to_string(&analysis).map_err(analysis_failed)?;

    let won = replace_analysis(pool, video_id, &video.analysis_data, &json)
        .await
        .map_err(analysis_failed)?;

    if won {
        info!("Stored {} analysis for video {video_id}", analyzer.name());
        video.analysis_data = json;
        return Ok(AnalysisOutcome {
            video,
            analysis,
            computed: true,
        });
    }

    // Another request stored a result between our read and write.
    debug!("Analysis for video {video_id} already stored by a concurrent request");
    let current = get_video(pool, video_id)
        .await
        .map_err(analysis_failed)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    match SpeechAnalysis::from_stored(&current.analysis_data) {
        Some(stored) => Ok(AnalysisOutcome {
            video: current,
            analysis: stored,
            computed: false,
        }),
        None => Ok(AnalysisOutcome {
            video: current,
            analysis,
            computed: true,
        }),
    }
}

fn analysis_failed(e: impl std::fmt::Display) -> AppError {
    AppError::AnalysisFailed(e.to_string())
}
