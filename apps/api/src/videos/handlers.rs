use axum::{
    extract::{Multipart, Path, State},
    response::Html,
    Form, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::render::pages;
use crate::state::AppState;
use crate::videos::repository::{get_video, list_videos, update_notes};
use crate::videos::upload::{store_upload, validate_filename, UploadResponse};

#[derive(Debug, Deserialize)]
pub struct NotesForm {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct NotesSavedResponse {
    pub status: &'static str,
    pub video_id: i64,
}

/// GET /upload
pub async fn handle_upload_page() -> Html<String> {
    Html(pages::upload_page())
}

/// POST /upload
///
/// Multipart form with a single `file` field. The extension is checked
/// before any bytes touch the disk.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }
        let declared = field.file_name().unwrap_or_default().to_string();
        let filename = validate_filename(&declared)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("Missing required 'file' field".into()))?;

    let response = store_upload(&state.db, &state.config.upload_dir, &filename, data).await?;
    Ok(Json(response))
}

/// GET /videos
pub async fn handle_list_videos(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let videos = list_videos(&state.db).await?;
    Ok(Html(pages::videos_page(&videos)))
}

/// GET /video/:id
pub async fn handle_view_video(
    State(state): State<AppState>,
    Path(video_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let video = get_video(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    Ok(Html(pages::video_page(&video)))
}

/// GET /notes/:id
pub async fn handle_view_notes(
    State(state): State<AppState>,
    Path(video_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let video = get_video(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    Ok(Html(pages::notes_page(&video)))
}

/// POST /notes/:id
///
/// Overwrites the notes unconditionally (last write wins). An unknown id is
/// acknowledged like any other.
pub async fn handle_save_notes(
    State(state): State<AppState>,
    Path(video_id): Path<i64>,
    Form(form): Form<NotesForm>,
) -> Result<Json<NotesSavedResponse>, AppError> {
    let touched = update_notes(&state.db, video_id, &form.notes).await?;
    if touched == 0 {
        debug!("Notes submitted for unknown video {video_id}");
    } else {
        info!("Saved notes for video {video_id} ({} bytes)", form.notes.len());
    }
    Ok(Json(NotesSavedResponse {
        status: "updated",
        video_id,
    }))
}
