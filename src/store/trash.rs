// subtreerestore/src/store/trash.rs
use sqlx::PgExecutor;

/// A soft-deleted row, one per node the subtree had when it was trashed.
/// Carries everything needed to put the node back where it was.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrashRecord {
    pub node_id: i64,
    pub object_id: i64,
    pub parent_node_id: i64,
    pub path_string: String,
    pub is_hidden: bool,
    pub is_invisible: bool,
    pub priority: i32,
    pub sort_field: i32,
    pub sort_order: i32,
}

const TRASH_COLUMNS: &str = "node_id, object_id, parent_node_id, path_string, \
     is_hidden, is_invisible, priority, sort_field, sort_order";

pub async fn fetch_by_node_id(
    ex: impl PgExecutor<'_>,
    node_id: i64,
) -> Result<Option<TrashRecord>, sqlx::Error> {
    let sql = format!("SELECT {} FROM content_trash WHERE node_id = $1", TRASH_COLUMNS);
    sqlx::query_as::<_, TrashRecord>(&sql)
        .bind(node_id)
        .fetch_optional(ex)
        .await
}

/// All trash records whose original path falls under `path_prefix`, parents
/// before children. Depth ordering is what lets the restore loop assume a
/// record's parent is already live by the time the record comes up.
pub async fn list_under_path(
    ex: impl PgExecutor<'_>,
    path_prefix: &str,
) -> Result<Vec<TrashRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM content_trash WHERE path_string LIKE $1 ORDER BY depth, node_id",
        TRASH_COLUMNS
    );
    sqlx::query_as::<_, TrashRecord>(&sql)
        .bind(escape_like_prefix(path_prefix))
        .fetch_all(ex)
        .await
}

/// Removes every trash record for `object_id`. Called once the object is
/// live again; rerunning the command will no longer see it.
pub async fn purge_for_object(ex: impl PgExecutor<'_>, object_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM content_trash WHERE object_id = $1")
        .bind(object_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Escapes LIKE metacharacters in `prefix` and appends the trailing
/// wildcard, so a path containing a literal `%` or `_` only matches itself.
pub fn escape_like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_prefix_plain_path() {
        assert_eq!(escape_like_prefix("/1/10/50/"), "/1/10/50/%");
    }

    #[test]
    fn test_escape_like_prefix_escapes_metacharacters() {
        assert_eq!(escape_like_prefix("/a%b/"), "/a\\%b/%");
        assert_eq!(escape_like_prefix("/a_b/"), "/a\\_b/%");
        assert_eq!(escape_like_prefix("/a\\b/"), "/a\\\\b/%");
    }
}
