//! SQL access for the `videos` table.
//!
//! Functions take any `SqliteExecutor`, so callers choose between a pooled
//! connection (`&SqlitePool`) and an open transaction (`&mut *tx`).

use sqlx::SqliteExecutor;

use crate::models::video::{NewVideo, VideoRow};

/// Inserts a metadata row and returns the assigned id.
pub async fn insert_video<'e, E>(executor: E, video: &NewVideo) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO videos (filename, filepath, filesize, upload_date) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&video.filename)
    .bind(&video.filepath)
    .bind(video.filesize)
    .bind(video.upload_date_string())
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All videos, most recent upload first.
pub async fn list_videos<'e, E>(executor: E) -> Result<Vec<VideoRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, VideoRow>("SELECT * FROM videos ORDER BY upload_date DESC, id DESC")
        .fetch_all(executor)
        .await
}

pub async fn get_video<'e, E>(executor: E, id: i64) -> Result<Option<VideoRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, VideoRow>("SELECT * FROM videos WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Overwrites the notes of a video. Returns the number of rows touched
/// (0 when the id does not exist).
pub async fn update_notes<'e, E>(executor: E, id: i64, notes: &str) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE videos SET notes = ?1 WHERE id = ?2")
        .bind(notes)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Removes a row whose upload could not be moved into place.
pub async fn delete_video<'e, E>(executor: E, id: i64) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM videos WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Compare-and-set on `analysis_data`: only writes when the stored value is
/// still `expected`. Returns true if this call won.
pub async fn replace_analysis<'e, E>(
    executor: E,
    id: i64,
    expected: &str,
    analysis_json: &str,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result =
        sqlx::query("UPDATE videos SET analysis_data = ?1 WHERE id = ?2 AND analysis_data IS ?3")
            .bind(analysis_json)
            .bind(id)
            .bind(expected)
            .execute(executor)
            .await?;
    Ok(result.rows_affected() == 1)
}
