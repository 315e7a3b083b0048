// subtreerestore/src/restore/item.rs
use std::collections::HashMap;
use std::fmt;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::restore::node_id;
use crate::store::assignments;
use crate::store::content;
use crate::store::trash::{self, TrashRecord};
use crate::store::tree;
use crate::workflow::ContentWorkflow;

/// Why an item was left in the trash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The content object behind the trash record no longer exists.
    ObjectMissing,
    /// The object is not in the archived state a restore starts from.
    NotArchived,
    /// The original parent node is not live.
    ParentMissing,
    /// The version's assignment to the parent carries a non-create intent.
    NotRestorable,
    /// The restore transaction itself failed and was rolled back.
    RestoreFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ObjectMissing => write!(f, "ObjectMissing"),
            SkipReason::NotArchived => write!(f, "NotArchived"),
            SkipReason::ParentMissing => write!(f, "ParentMissing"),
            SkipReason::NotRestorable => write!(f, "NotRestorable"),
            SkipReason::RestoreFailed(message) => write!(f, "RestoreFailed: {}", message),
        }
    }
}

#[derive(Debug)]
pub enum ItemOutcome {
    Restored { node_id: i64 },
    Skipped { object_id: i64, reason: SkipReason },
}

/// Restores a single trash record. Never fails the run: every error,
/// validation or transactional, comes back as [`ItemOutcome::Skipped`] so
/// the loop can move on to the next record.
pub(crate) async fn restore_item(
    pool: &PgPool,
    workflow: &dyn ContentWorkflow,
    config: &AppConfig,
    trash_item: &TrashRecord,
    checked_parents: &mut HashMap<i64, bool>,
) -> ItemOutcome {
    match try_restore(pool, workflow, config, trash_item, checked_parents).await {
        Ok(outcome) => outcome,
        Err(e) => skip(trash_item.object_id, SkipReason::RestoreFailed(e.to_string())),
    }
}

async fn try_restore(
    pool: &PgPool,
    workflow: &dyn ContentWorkflow,
    config: &AppConfig,
    trash_item: &TrashRecord,
    checked_parents: &mut HashMap<i64, bool>,
) -> Result<ItemOutcome> {
    let object_id = trash_item.object_id;

    // The object behind the record must still exist.
    let object = match content::fetch_object(pool, object_id).await? {
        Some(object) => object,
        None => return Ok(skip(object_id, SkipReason::ObjectMissing)),
    };
    println!("Restoring object {}, \"{}\"", object_id, object.name);

    // Only archived objects can be restored.
    if object.status != content::OBJECT_STATUS_ARCHIVED {
        return Ok(skip(object_id, SkipReason::NotArchived));
    }

    // The original parent must be live. Results are cached per parent id
    // for the whole run; depth ordering makes the cache safe, a parent is
    // committed before any of its children are looked at.
    let parent_live = match checked_parents.get(&trash_item.parent_node_id) {
        Some(known) => *known,
        None => {
            let live = tree::node_exists(pool, trash_item.parent_node_id).await?;
            checked_parents.insert(trash_item.parent_node_id, live);
            live
        }
    };
    if !parent_live {
        return Ok(skip(object_id, SkipReason::ParentMissing));
    }

    // The current version's assignment to this parent must carry a
    // create-or-no-op intent.
    let assignment = assignments::fetch_for_parent(
        pool,
        object_id,
        object.current_version,
        trash_item.parent_node_id,
    )
    .await?;
    match assignment {
        Some(a) if assignments::is_restorable_op_code(a.op_code) => {}
        _ => return Ok(skip(object_id, SkipReason::NotRestorable)),
    }

    let mut tx = pool.begin().await?;

    // Only the fresh assignment written here may survive into publish.
    assignments::purge_for_version(&mut *tx, object_id, object.current_version).await?;
    assignments::create(
        &mut *tx,
        object_id,
        object.current_version,
        trash_item.parent_node_id,
        true,
    )
    .await?;

    content::set_object_status(&mut *tx, object_id, content::OBJECT_STATUS_DRAFT).await?;
    content::set_version_status(
        &mut *tx,
        object_id,
        object.current_version,
        content::VERSION_STATUS_DRAFT,
    )
    .await?;

    // Publish allocates a fresh node id for the placement; only afterwards
    // can that id be swapped back to the archived original.
    let outcome = workflow
        .publish(&mut tx, object_id, object.current_version)
        .await?;
    let main_node_id = tree::fetch_main_node_id(&mut *tx, object_id)
        .await?
        .ok_or_else(|| {
            AppError::Publish(format!("object {} has no main node after publish", object_id))
        })?;
    if main_node_id != outcome.main_node_id {
        return Err(AppError::Publish(format!(
            "main node mismatch after publish of object {} ({} vs {})",
            object_id, outcome.main_node_id, main_node_id
        )));
    }

    node_id::change_node_id(&mut tx, main_node_id, trash_item.node_id).await?;

    tree::update_display_attributes(
        &mut *tx,
        trash_item.node_id,
        trash_item.is_hidden,
        trash_item.is_invisible,
        trash_item.priority,
        trash_item.sort_field,
        trash_item.sort_order,
    )
    .await?;

    trash::purge_for_object(&mut *tx, object_id).await?;

    if object.class_id == config.user_class_id {
        workflow.invalidate_user_cache(&mut tx, object_id).await?;
    }
    workflow.fix_reverse_relations(&mut tx, object_id).await?;

    tx.commit().await?;

    Ok(ItemOutcome::Restored {
        node_id: trash_item.node_id,
    })
}

fn skip(object_id: i64, reason: SkipReason) -> ItemOutcome {
    ItemOutcome::Skipped { object_id, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reasons_render_as_stable_tokens() {
        assert_eq!(SkipReason::ObjectMissing.to_string(), "ObjectMissing");
        assert_eq!(SkipReason::NotArchived.to_string(), "NotArchived");
        assert_eq!(SkipReason::ParentMissing.to_string(), "ParentMissing");
        assert_eq!(SkipReason::NotRestorable.to_string(), "NotRestorable");
        assert_eq!(
            SkipReason::RestoreFailed("boom".to_string()).to_string(),
            "RestoreFailed: boom"
        );
    }
}
