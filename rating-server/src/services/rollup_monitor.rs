//! Periodic rollup monitor
//!
//! Re-runs the trimester rollup over all stored ratings on a timer and logs
//! the result per staff member. Read-and-log only; nothing is written back.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::core::{BackgroundTasks, ServerState, TaskKind};
use crate::db::models::RatingRecord;
use crate::db::repository::RatingRepository;
use crate::rollup::{self, BucketSpan};
use crate::utils::AppResult;

/// Register the monitor on the task registry.
pub fn spawn(tasks: &mut BackgroundTasks, state: ServerState) {
    let token = tasks.shutdown_token();

    tasks.spawn("rollup_monitor", TaskKind::Periodic, async move {
        let interval_secs = state.config.rollup_log_interval_secs.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = log_rollups(&state).await {
                        tracing::warn!(error = %e, "Rollup monitor pass failed");
                    }
                }
            }
        }
    });
}

async fn log_rollups(state: &ServerState) -> AppResult<()> {
    let repo = RatingRepository::new(state.db.clone());
    let ratings = repo.find_all().await?;

    let mut by_staff: BTreeMap<String, Vec<RatingRecord>> = BTreeMap::new();
    for rating in ratings {
        by_staff
            .entry(rating.staff.to_string())
            .or_default()
            .push(rating);
    }

    for (staff, records) in &by_staff {
        let report = rollup::aggregate(records, BucketSpan::Trimester, None);
        tracing::info!(
            target: "rollup",
            staff = %staff,
            buckets = report.buckets.len(),
            overall_average = report.overall_average,
            net_growth = report.net_growth,
            "Trimester rollup"
        );
    }

    tracing::debug!(staff_count = by_staff.len(), "Rollup monitor pass complete");
    Ok(())
}
