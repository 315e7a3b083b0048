// subtreerestore/src/utils/sequence_reset.rs
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::timeout;

/// Sequence feeding node ids to new tree rows.
pub const NODE_ID_SEQUENCE: &str = "content_tree_node_id_seq";

/// Pushes the node id sequence past the largest live node id.
///
/// Reclaimed ids can exceed the sequence's last value, and the next publish
/// would otherwise collide with them.
pub async fn reset_node_sequence(pool: &PgPool) -> Result<()> {
    println!("🔄 Resetting node id sequence...");

    let max_node_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(node_id), 0) FROM content_tree")
        .fetch_one(pool)
        .await
        .context("Failed to read the maximum live node id")?;
    let next_val = max_node_id + 1;

    sqlx::query("SELECT setval($1::regclass, $2, false)")
        .bind(NODE_ID_SEQUENCE)
        .bind(next_val)
        .execute(pool)
        .await
        .context("Failed to reset the node id sequence")?;

    println!("✓ Node id sequence reset to {}", next_val);
    Ok(())
}

/// Ensures the sequence reset cannot hang the end of a run.
pub async fn reset_node_sequence_with_timeout(pool: &PgPool) -> Result<()> {
    let timeout_duration = Duration::from_secs(30);

    match timeout(timeout_duration, reset_node_sequence(pool)).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "Node id sequence reset timed out after {} seconds",
            timeout_duration.as_secs()
        )),
    }
}
