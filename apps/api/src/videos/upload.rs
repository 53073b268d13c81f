use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::video::NewVideo;
use crate::videos::repository::{delete_video, insert_video};

/// Accepted video extensions, lowercase, without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    pub size: i64,
    pub status: &'static str,
}

/// Reduces a client-declared filename to its final path component and checks
/// the extension. Returns the name the file will be stored under.
pub fn validate_filename(declared: &str) -> Result<String, AppError> {
    // Browsers on Windows may send backslash-separated paths.
    let normalized = declared.replace('\\', "/");
    let name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Missing file name".to_string()))?;

    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::Validation("Invalid file type".to_string()));
    }

    Ok(name.to_string())
}

/// Writes an accepted upload to `upload_dir/filename` and records its row.
///
/// Bytes are staged in a temp file next to the destination, the row is
/// committed, then the temp file is renamed into place. If the rename fails
/// the row is removed again and the temp file is unlinked on drop, so no
/// half-written file or orphan row remains. An existing file at the
/// destination is only replaced once its new row is durable.
pub async fn store_upload(
    pool: &SqlitePool,
    upload_dir: &Path,
    filename: &str,
    data: Bytes,
) -> Result<UploadResponse, AppError> {
    let destination = upload_dir.join(filename);
    let filesize = data.len() as i64;

    let staged = stage_bytes(upload_dir.to_path_buf(), data).await?;

    let id = insert_video(
        pool,
        &NewVideo {
            filename: filename.to_string(),
            filepath: destination.to_string_lossy().into_owned(),
            filesize,
            upload_date: Utc::now(),
        },
    )
    .await?;

    if let Err(e) = persist_staged(staged, destination.clone()).await {
        if let Err(cleanup) = delete_video(pool, id).await {
            warn!("Could not remove row for failed upload {id}: {cleanup}");
        }
        return Err(e);
    }

    info!(
        "Stored upload {filename} ({filesize} bytes) as video {id} at {}",
        destination.display()
    );

    Ok(UploadResponse {
        id,
        filename: filename.to_string(),
        size: filesize,
        status: "uploaded",
    })
}

async fn stage_bytes(dir: PathBuf, data: Bytes) -> Result<NamedTempFile, AppError> {
    let staged = tokio::task::spawn_blocking(move || -> anyhow::Result<NamedTempFile> {
        let mut file = NamedTempFile::new_in(&dir)
            .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
        file.write_all(&data)?;
        file.as_file().sync_all()?;
        Ok(file)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;
    Ok(staged)
}

async fn persist_staged(staged: NamedTempFile, destination: PathBuf) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        if destination.exists() {
            warn!(
                "Overwriting existing upload at {}; earlier rows now point at new bytes",
                destination.display()
            );
        }
        staged
            .persist(&destination)
            .map_err(|e| e.error)
            .with_context(|| format!("cannot move upload into {}", destination.display()))?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::videos::repository::{get_video, list_videos};

    #[test]
    fn test_allowed_extensions_any_case() {
        for name in ["a.mp4", "b.MOV", "c.Avi", "d.webm", "talk.final.MP4"] {
            assert_eq!(validate_filename(name).unwrap(), name);
        }
    }

    #[test]
    fn test_rejected_extensions() {
        for name in ["notes.txt", "video", "archive.mp4.zip", ".mp4", "clip.mkv"] {
            assert!(
                matches!(validate_filename(name), Err(AppError::Validation(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_directory_components_stripped() {
        assert_eq!(validate_filename("../../etc/talk.mp4").unwrap(), "talk.mp4");
        assert_eq!(validate_filename(r"C:\Users\me\talk.webm").unwrap(), "talk.webm");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("uploads/").is_err());
    }

    #[tokio::test]
    async fn test_store_upload_writes_file_and_row() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let data = Bytes::from_static(b"\x00\x00\x00\x18ftypmp42 fake video");

        let response = store_upload(&pool, dir.path(), "talk.mp4", data.clone())
            .await
            .unwrap();
        assert_eq!(response.filename, "talk.mp4");
        assert_eq!(response.size, data.len() as i64);
        assert_eq!(response.status, "uploaded");

        let on_disk = std::fs::read(dir.path().join("talk.mp4")).unwrap();
        assert_eq!(on_disk, data.to_vec());

        let row = get_video(&pool, response.id).await.unwrap().unwrap();
        assert_eq!(row.filesize, data.len() as i64);
        assert_eq!(row.filepath, dir.path().join("talk.mp4").to_string_lossy());
    }

    #[tokio::test]
    async fn test_same_name_overwrites_file_but_keeps_both_rows() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();

        store_upload(&pool, dir.path(), "talk.mp4", Bytes::from_static(b"first"))
            .await
            .unwrap();
        store_upload(&pool, dir.path(), "talk.mp4", Bytes::from_static(b"second!"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("talk.mp4")).unwrap(), b"second!");
        assert_eq!(list_videos(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_directory_fails_without_row() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = store_upload(&pool, &missing, "talk.mp4", Bytes::from_static(b"data"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(list_videos(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_row_and_temp_file() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the destination makes the rename fail.
        std::fs::create_dir_all(dir.path().join("talk.mp4").join("occupied")).unwrap();

        let err = store_upload(&pool, dir.path(), "talk.mp4", Bytes::from_static(b"data"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(list_videos(&pool).await.unwrap().is_empty());

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["talk.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();

        store_upload(&pool, dir.path(), "talk.webm", Bytes::from_static(b"webm"))
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["talk.webm".to_string()]);
    }
}
