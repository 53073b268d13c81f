use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::debug;

use crate::analysis::service::load_or_compute;
use crate::errors::AppError;
use crate::render::pages;
use crate::state::AppState;

/// GET /analysis/:id
///
/// Shows the analysis for a video, computing it on first view.
pub async fn handle_view_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let outcome = load_or_compute(&state.db, state.analyzer.as_ref(), video_id).await?;
    debug!(
        "Analysis page for video {video_id} (freshly computed: {})",
        outcome.computed
    );
    Ok(Html(pages::analysis_page(&outcome.video, &outcome.analysis)))
}
