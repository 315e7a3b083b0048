// subtreerestore/src/restore/logic.rs
use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Local;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::restore::item::{self, ItemOutcome};
use crate::restore::node_id;
use crate::restore::verification;
use crate::store::trash;
use crate::store::tree;
use crate::utils::sequence_reset;
use crate::workflow::ContentWorkflow;

/// Orchestrates the whole restore run.
///
/// 1. Resolves the subtree's path prefix from trash or from a live node.
/// 2. Enumerates matching trash records, parents before children.
/// 3. Restores them one at a time, each in its own transaction; a failed
///    item is reported and skipped, never fatal.
/// 4. Verifies what was restored and pushes the node id sequence forward.
pub(crate) async fn perform_restore_orchestration(
    pool: &PgPool,
    config: &AppConfig,
    workflow: &dyn ContentWorkflow,
    node_id: i64,
    replace_id: Option<i64>,
) -> Result<()> {
    println!(
        "🔄 Subtree restore started at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let path_prefix = resolve_top_path(pool, node_id, replace_id).await?;

    let trash_list = trash::list_under_path(pool, &path_prefix)
        .await
        .context("Failed to enumerate trash records under the subtree")?;
    println!("Found {} nodes to restore", trash_list.len());

    let mut checked_parents: HashMap<i64, bool> = HashMap::new();
    let mut restored_nodes: Vec<i64> = Vec::new();
    let mut skipped: usize = 0;

    for trash_item in &trash_list {
        match item::restore_item(pool, workflow, config, trash_item, &mut checked_parents).await {
            ItemOutcome::Restored { node_id } => {
                println!("✓ Restored at node {}", node_id);
                restored_nodes.push(node_id);
            }
            ItemOutcome::Skipped { object_id, reason } => {
                eprintln!("⚠️ Object {} skipped: {}", object_id, reason);
                skipped += 1;
            }
        }
    }

    println!(
        "✅ Restore completed: {} restored, {} skipped",
        restored_nodes.len(),
        skipped
    );

    if !restored_nodes.is_empty() {
        verification::verify_restored_nodes(pool, &restored_nodes).await?;
        if config.reset_node_sequence {
            sequence_reset::reset_node_sequence_with_timeout(pool).await?;
        }
    }

    Ok(())
}

/// Determines the path prefix of the subtree to restore.
///
/// A trashed top node wins; otherwise an existing live node is used,
/// optionally after renaming the node at `replace_id` into the wanted id.
/// Without either, the run aborts before touching any trash record.
async fn resolve_top_path(
    pool: &PgPool,
    node_id: i64,
    replace_id: Option<i64>,
) -> Result<String> {
    println!("🔍 Searching for node {} in trash", node_id);
    if let Some(record) = trash::fetch_by_node_id(pool, node_id)
        .await
        .context("Failed to look up the top node in trash")?
    {
        println!("Restoring top node from trash");
        return Ok(record.path_string);
    }

    if let Some(replace) = replace_id {
        println!("Renaming live node {} to {}", replace, node_id);
        let mut tx = pool.begin().await?;
        node_id::change_node_id(&mut tx, replace, node_id).await?;
        tx.commit().await?;
    }

    match tree::fetch_node(pool, node_id)
        .await
        .context("Failed to look up the top node in the tree")?
    {
        Some(node) => Ok(node.path_string),
        None => Err(AppError::TopNodeUnresolved(node_id).into()),
    }
}
