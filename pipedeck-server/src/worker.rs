//! Execution worker
//!
//! Polls for executions whose persisted fire time has passed and moves them
//! one lifecycle step. Fire times live in the database, so executions left
//! mid-flight by a restart are picked up on the next poll.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pipedeck_core::lifecycle::{LifecycleTiming, OutcomeSource};
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::service::execution_service;

/// Background task driving the simulated execution lifecycle
pub struct ExecutionWorker {
    pool: PgPool,
    timing: LifecycleTiming,
    outcomes: Arc<dyn OutcomeSource>,
    poll_interval: Duration,
    batch_size: i64,
}

impl ExecutionWorker {
    /// Creates a new worker
    pub fn new(
        pool: PgPool,
        timing: LifecycleTiming,
        outcomes: Arc<dyn OutcomeSource>,
        poll_interval: Duration,
        batch_size: i64,
    ) -> Self {
        Self {
            pool,
            timing,
            outcomes,
            poll_interval,
            batch_size,
        }
    }

    /// Runs the polling loop until `shutdown` flips to true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting execution worker (interval: {:?}, batch: {})",
            self.poll_interval, self.batch_size
        );

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.poll_once().await;
                }
            }
        }

        info!("Execution worker stopped");
    }

    /// Performs a single poll cycle
    async fn poll_once(&self) {
        match execution_service::advance_due_executions(
            &self.pool,
            &self.timing,
            self.outcomes.as_ref(),
            Utc::now(),
            self.batch_size,
        )
        .await
        {
            Ok(0) => debug!("No executions due"),
            Ok(advanced) => debug!("Advanced {} execution(s) this cycle", advanced),
            Err(e) => error!("Error during worker poll cycle: {:?}", e),
        }
    }
}
