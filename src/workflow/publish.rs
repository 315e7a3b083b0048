// subtreerestore/src/workflow/publish.rs
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::store::assignments;
use crate::store::content;
use crate::store::tree;
use crate::workflow::{ContentWorkflow, PublishOutcome};

// Relation rows targeting a trashed object are suspended, not deleted, so a
// later restore can re-activate them in place.
const RELATION_OP_ACTIVE: i32 = 0;

/// Production [`ContentWorkflow`] running plain SQL against the content
/// schema, within the transaction handed to it.
pub struct SqlContentWorkflow;

#[async_trait]
impl ContentWorkflow for SqlContentWorkflow {
    async fn publish(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        object_id: i64,
        version: i32,
    ) -> Result<PublishOutcome> {
        let all = assignments::list_for_version(&mut **tx, object_id, version).await?;
        let create: Vec<_> = all
            .into_iter()
            .filter(|a| assignments::is_create_op_code(a.op_code))
            .collect();
        if create.is_empty() {
            return Err(AppError::Publish(format!(
                "object {} version {} has no create assignment",
                object_id, version
            )));
        }

        let mut main_node_id: Option<i64> = None;
        for assignment in &create {
            let parent = tree::fetch_node(&mut **tx, assignment.parent_node_id)
                .await?
                .ok_or_else(|| {
                    AppError::Publish(format!(
                        "parent node {} vanished while publishing object {}",
                        assignment.parent_node_id, object_id
                    ))
                })?;

            // The node id comes from the tree sequence here; reclaiming the
            // archived id is the caller's follow-up step.
            let remote_id = Uuid::new_v4().simple().to_string();
            let node_id: i64 = sqlx::query_scalar(
                "INSERT INTO content_tree \
                 (parent_node_id, path_string, depth, object_id, main_node_id, remote_id, \
                  is_hidden, is_invisible, priority, sort_field, sort_order) \
                 VALUES ($1, '', $2, $3, 0, $4, false, false, 0, 1, 1) \
                 RETURNING node_id",
            )
            .bind(parent.node_id)
            .bind(parent.depth + 1)
            .bind(object_id)
            .bind(&remote_id)
            .fetch_one(&mut **tx)
            .await?;

            let path_string = tree::child_path(&parent.path_string, node_id);
            sqlx::query("UPDATE content_tree SET path_string = $1 WHERE node_id = $2")
                .bind(&path_string)
                .bind(node_id)
                .execute(&mut **tx)
                .await?;

            assignments::mark_executed(
                &mut **tx,
                assignment.object_id,
                assignment.version,
                assignment.parent_node_id,
            )
            .await?;

            if assignment.is_main || main_node_id.is_none() {
                main_node_id = Some(node_id);
            }
        }

        let main_node_id = main_node_id.ok_or_else(|| {
            AppError::Publish(format!("object {} produced no main node", object_id))
        })?;
        sqlx::query("UPDATE content_tree SET main_node_id = $1 WHERE object_id = $2")
            .bind(main_node_id)
            .bind(object_id)
            .execute(&mut **tx)
            .await?;

        content::set_version_status(&mut **tx, object_id, version, content::VERSION_STATUS_PUBLISHED)
            .await?;
        content::mark_object_published(&mut **tx, object_id, version).await?;

        Ok(PublishOutcome { main_node_id })
    }

    async fn invalidate_user_cache(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
    ) -> Result<()> {
        sqlx::query("DELETE FROM user_session WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn fix_reverse_relations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        object_id: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE content_relation SET op_code = $1 \
             WHERE to_object_id = $2 AND op_code <> $1",
        )
        .bind(RELATION_OP_ACTIVE)
        .bind(object_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
