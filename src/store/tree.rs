// subtreerestore/src/store/tree.rs
use sqlx::PgExecutor;

/// The slice of a live hierarchy row the tool reads.
///
/// `path_string` is the slash-delimited chain of ancestor node ids, always
/// ending with this row's own id (`/1/10/50/` for node 50 under 10 under 1).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TreeNodeRow {
    pub node_id: i64,
    pub parent_node_id: i64,
    pub path_string: String,
    pub depth: i32,
}

const TREE_COLUMNS: &str = "node_id, parent_node_id, path_string, depth";

pub async fn fetch_node(
    ex: impl PgExecutor<'_>,
    node_id: i64,
) -> Result<Option<TreeNodeRow>, sqlx::Error> {
    let sql = format!("SELECT {} FROM content_tree WHERE node_id = $1", TREE_COLUMNS);
    sqlx::query_as::<_, TreeNodeRow>(&sql)
        .bind(node_id)
        .fetch_optional(ex)
        .await
}

pub async fn node_exists(ex: impl PgExecutor<'_>, node_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM content_tree WHERE node_id = $1)")
        .bind(node_id)
        .fetch_one(ex)
        .await
}

/// Main node id recorded on an object's placements, if the object has any.
/// Every live row of an object carries the same `main_node_id`.
pub async fn fetch_main_node_id(
    ex: impl PgExecutor<'_>,
    object_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT main_node_id FROM content_tree WHERE object_id = $1 LIMIT 1")
        .bind(object_id)
        .fetch_optional(ex)
        .await
}

/// Writes the saved display and sort attributes back onto a node.
pub async fn update_display_attributes(
    ex: impl PgExecutor<'_>,
    node_id: i64,
    is_hidden: bool,
    is_invisible: bool,
    priority: i32,
    sort_field: i32,
    sort_order: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE content_tree \
         SET is_hidden = $1, is_invisible = $2, priority = $3, sort_field = $4, sort_order = $5 \
         WHERE node_id = $6",
    )
    .bind(is_hidden)
    .bind(is_invisible)
    .bind(priority)
    .bind(sort_field)
    .bind(sort_order)
    .bind(node_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Path string of a child placed directly under `parent_path`.
pub fn child_path(parent_path: &str, node_id: i64) -> String {
    format!("{}{}/", parent_path, node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path_appends_one_segment() {
        assert_eq!(child_path("/1/10/", 50), "/1/10/50/");
        assert_eq!(child_path("/1/", 2), "/1/2/");
    }
}
