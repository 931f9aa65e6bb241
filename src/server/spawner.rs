// src/server/spawner.rs

//! Spawns all of the server's long-running background tasks.

use super::context::ServerContext;
use crate::core::tasks::catalog_refresh::CatalogRefreshTask;
use crate::core::tasks::feedback::FeedbackTask;
use anyhow::{Result, anyhow};

/// Spawns all critical background tasks into the context's JoinSet.
pub fn spawn_all(ctx: &mut ServerContext) -> Result<()> {
    let feedback_rx = ctx
        .feedback_rx
        .take()
        .ok_or_else(|| anyhow!("Background tasks were already spawned"))?;

    let feedback_task = FeedbackTask::new(ctx.state.clone(), feedback_rx);
    let shutdown_rx_feedback = ctx.shutdown_tx.subscribe();
    ctx.background_tasks.spawn(async move {
        feedback_task.run(shutdown_rx_feedback).await;
        Ok(())
    });

    let refresh_task = CatalogRefreshTask::new(ctx.state.clone(), ctx.catalog_source.clone());
    let shutdown_rx_refresh = ctx.shutdown_tx.subscribe();
    ctx.background_tasks.spawn(async move {
        refresh_task.run(shutdown_rx_refresh).await;
        Ok(())
    });

    Ok(())
}
