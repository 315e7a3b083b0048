// subtreerestore/src/workflow/mod.rs
pub(crate) mod publish;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::errors::Result;

pub use publish::SqlContentWorkflow;

/// Outcome of a publish invocation.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Node id of the main placement created for the published version.
    pub main_node_id: i64,
}

/// The content-management side effects a restore depends on, kept behind a
/// narrow seam so the restore loop never reaches into publish internals
/// and so tests can substitute a failing implementation.
#[async_trait]
pub trait ContentWorkflow: Send + Sync {
    /// Publishes `version` of `object_id`: turns the version's pending
    /// create assignments into live tree nodes and republishes the object
    /// and version rows. Runs inside the caller's transaction.
    async fn publish(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        object_id: i64,
        version: i32,
    ) -> Result<PublishOutcome>;

    /// Drops cached user state after a user object reappears in the tree.
    async fn invalidate_user_cache(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
    ) -> Result<()>;

    /// Re-activates relations from other objects that point at `object_id`,
    /// suspended while the object sat in the trash.
    async fn fix_reverse_relations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        object_id: i64,
    ) -> Result<()>;
}
