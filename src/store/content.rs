// subtreerestore/src/store/content.rs
use sqlx::PgExecutor;

pub const OBJECT_STATUS_DRAFT: i32 = 0;
pub const OBJECT_STATUS_PUBLISHED: i32 = 1;
pub const OBJECT_STATUS_ARCHIVED: i32 = 2;

pub const VERSION_STATUS_DRAFT: i32 = 0;
pub const VERSION_STATUS_PUBLISHED: i32 = 1;
#[allow(dead_code)]
pub const VERSION_STATUS_PENDING: i32 = 2;
#[allow(dead_code)]
pub const VERSION_STATUS_ARCHIVED: i32 = 3;
#[allow(dead_code)]
pub const VERSION_STATUS_REJECTED: i32 = 4;

/// The logical content entity a trashed node belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentObjectRow {
    pub name: String,
    pub class_id: i64,
    pub current_version: i32,
    pub status: i32,
}

pub async fn fetch_object(
    ex: impl PgExecutor<'_>,
    object_id: i64,
) -> Result<Option<ContentObjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ContentObjectRow>(
        "SELECT name, class_id, current_version, status FROM content_object WHERE id = $1",
    )
    .bind(object_id)
    .fetch_optional(ex)
    .await
}

pub async fn set_object_status(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    status: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE content_object SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(object_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn set_version_status(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
    status: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE content_version SET status = $1 WHERE object_id = $2 AND version = $3")
        .bind(status)
        .bind(object_id)
        .bind(version)
        .execute(ex)
        .await?;
    Ok(())
}

/// Marks `version` as the published current version of the object.
pub async fn mark_object_published(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE content_object SET status = $1, current_version = $2 WHERE id = $3")
        .bind(OBJECT_STATUS_PUBLISHED)
        .bind(version)
        .bind(object_id)
        .execute(ex)
        .await?;
    Ok(())
}
