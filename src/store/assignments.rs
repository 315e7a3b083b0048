// subtreerestore/src/store/assignments.rs
use sqlx::PgExecutor;

// Assignment intent codes. The low bit marks an assignment the publish step
// has already picked up ("updated"); masking it off yields the base intent.
pub const OP_CODE_NOP: i32 = 0;
pub const OP_CODE_CREATE_NOP: i32 = 2;
pub const OP_CODE_CREATE: i32 = 3;
#[allow(dead_code)]
pub const OP_CODE_MOVE_NOP: i32 = 4;
#[allow(dead_code)]
pub const OP_CODE_MOVE: i32 = 5;
#[allow(dead_code)]
pub const OP_CODE_REMOVE_NOP: i32 = 6;
#[allow(dead_code)]
pub const OP_CODE_REMOVE: i32 = 7;
#[allow(dead_code)]
pub const OP_CODE_SET_NOP: i32 = 8;
#[allow(dead_code)]
pub const OP_CODE_SET: i32 = 9;

/// A candidate (version, parent node) placement with an intent code.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssignmentRow {
    pub object_id: i64,
    pub version: i32,
    pub parent_node_id: i64,
    pub is_main: bool,
    pub op_code: i32,
}

/// Only assignments that create a node, or do nothing, can be restored.
/// The "updated" bit is ignored when deciding.
pub fn is_restorable_op_code(op_code: i32) -> bool {
    let base = op_code & !1;
    base == OP_CODE_NOP || base == OP_CODE_CREATE_NOP
}

/// An assignment the publish step should turn into a live node.
pub fn is_create_op_code(op_code: i32) -> bool {
    op_code & !1 == OP_CODE_CREATE_NOP
}

pub async fn fetch_for_parent(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
    parent_node_id: i64,
) -> Result<Option<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(
        "SELECT object_id, version, parent_node_id, is_main, op_code FROM node_assignment \
         WHERE object_id = $1 AND version = $2 AND parent_node_id = $3",
    )
    .bind(object_id)
    .bind(version)
    .bind(parent_node_id)
    .fetch_optional(ex)
    .await
}

pub async fn list_for_version(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
) -> Result<Vec<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(
        "SELECT object_id, version, parent_node_id, is_main, op_code FROM node_assignment \
         WHERE object_id = $1 AND version = $2 ORDER BY parent_node_id",
    )
    .bind(object_id)
    .bind(version)
    .fetch_all(ex)
    .await
}

/// Drops every assignment the version has accumulated, so that the single
/// fresh one written next is the only placement publish will act on.
pub async fn purge_for_version(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM node_assignment WHERE object_id = $1 AND version = $2")
        .bind(object_id)
        .bind(version)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
    parent_node_id: i64,
    is_main: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO node_assignment (object_id, version, parent_node_id, is_main, op_code) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(object_id)
    .bind(version)
    .bind(parent_node_id)
    .bind(is_main)
    .bind(OP_CODE_CREATE)
    .execute(ex)
    .await?;
    Ok(())
}

/// Downgrades an assignment to a no-op once its node has been created.
pub async fn mark_executed(
    ex: impl PgExecutor<'_>,
    object_id: i64,
    version: i32,
    parent_node_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE node_assignment SET op_code = $1 \
         WHERE object_id = $2 AND version = $3 AND parent_node_id = $4",
    )
    .bind(OP_CODE_NOP)
    .bind(object_id)
    .bind(version)
    .bind(parent_node_id)
    .execute(ex)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restorable_op_codes_ignore_the_updated_bit() {
        assert!(is_restorable_op_code(OP_CODE_NOP));
        assert!(is_restorable_op_code(OP_CODE_NOP | 1));
        assert!(is_restorable_op_code(OP_CODE_CREATE_NOP));
        assert!(is_restorable_op_code(OP_CODE_CREATE));
    }

    #[test]
    fn test_move_remove_and_set_are_not_restorable() {
        for op_code in [
            OP_CODE_MOVE_NOP,
            OP_CODE_MOVE,
            OP_CODE_REMOVE_NOP,
            OP_CODE_REMOVE,
            OP_CODE_SET_NOP,
            OP_CODE_SET,
        ] {
            assert!(!is_restorable_op_code(op_code), "op code {}", op_code);
        }
    }

    #[test]
    fn test_create_detection() {
        assert!(is_create_op_code(OP_CODE_CREATE));
        assert!(is_create_op_code(OP_CODE_CREATE_NOP));
        assert!(!is_create_op_code(OP_CODE_NOP));
        assert!(!is_create_op_code(OP_CODE_MOVE));
    }
}
