// subtreerestore/src/restore/mod.rs
pub(crate) mod item;
mod logic;
pub(crate) mod node_id;
pub(crate) mod verification;

use anyhow::Result;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::workflow::SqlContentWorkflow;

/// Public entry point for the subtree restore process.
pub async fn run_restore_flow(
    pool: &PgPool,
    config: &AppConfig,
    node_id: i64,
    replace_id: Option<i64>,
) -> Result<()> {
    let workflow = SqlContentWorkflow;
    logic::perform_restore_orchestration(pool, config, &workflow, node_id, replace_id).await
}
