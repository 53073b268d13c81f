pub mod health;

use axum::{extract::DefaultBodyLimit, response::Html, routing::get, Router};
use tower_http::services::ServeDir;

use crate::analysis::handlers as analysis;
use crate::render::pages;
use crate::state::AppState;
use crate::videos::handlers as videos;

/// GET /page-test
async fn landing_page() -> Html<String> {
    Html(pages::landing_page())
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/page-test", get(landing_page))
        .route(
            "/upload",
            get(videos::handle_upload_page)
                .post(videos::handle_upload)
                .layer(upload_limit),
        )
        .route("/videos", get(videos::handle_list_videos))
        .route("/video/:id", get(videos::handle_view_video))
        .route("/analysis/:id", get(analysis::handle_view_analysis))
        .route(
            "/notes/:id",
            get(videos::handle_view_notes).post(videos::handle_save_notes),
        )
        .nest_service("/uploads", uploads)
        .with_state(state)
}
