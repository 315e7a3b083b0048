// subtreerestore/src/restore/verification.rs
use anyhow::Result;
use sqlx::PgPool;

use crate::store::tree;

/// Re-reads every restored node and checks the tree invariants the restore
/// is supposed to uphold: the node is live, its parent is live, its path is
/// the parent's path plus its own id, and its depth is the parent's plus
/// one. Problems are reported as warnings, not errors; the data is already
/// committed and a rerun will not bring these rows back.
pub(crate) async fn verify_restored_nodes(pool: &PgPool, node_ids: &[i64]) -> Result<()> {
    println!("Verifying {} restored nodes...", node_ids.len());
    let mut issues: usize = 0;

    for &node_id in node_ids {
        let Some(node) = tree::fetch_node(pool, node_id).await? else {
            eprintln!("⚠️ Restored node {} is missing from the tree", node_id);
            issues += 1;
            continue;
        };
        let Some(parent) = tree::fetch_node(pool, node.parent_node_id).await? else {
            eprintln!(
                "⚠️ Parent {} of restored node {} is missing from the tree",
                node.parent_node_id, node_id
            );
            issues += 1;
            continue;
        };

        let expected_path = tree::child_path(&parent.path_string, node_id);
        if node.path_string != expected_path {
            eprintln!(
                "⚠️ Node {} has path {} but its parent implies {}",
                node_id, node.path_string, expected_path
            );
            issues += 1;
        }
        if node.depth != parent.depth + 1 {
            eprintln!(
                "⚠️ Node {} has depth {} but its parent has depth {}",
                node_id, node.depth, parent.depth
            );
            issues += 1;
        }
    }

    if issues == 0 {
        println!("✓ Restore verification passed");
    } else {
        println!("⚠️ Restore verification found {} issue(s)", issues);
    }
    Ok(())
}
