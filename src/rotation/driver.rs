//! Rotation timer
//!
//! Idle until `start` arms a repeating timer. Every tick submits a new
//! rotation pass to the background tasks under a fresh UUID, so passes never
//! replace each other. `shutdown` disarms the timer and aborts every pass.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use uuid::Uuid;

use super::{RotationCursor, run_rotation_pass};
use crate::context::{ConfigError, RotationContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Active,
}

pub struct RotationDriver {
    ctx: RotationContext,
    cursor: Arc<RotationCursor>,
    timer: Option<JoinHandle<()>>,
}

impl RotationDriver {
    pub fn new(ctx: RotationContext) -> Self {
        Self {
            ctx,
            cursor: Arc::new(RotationCursor::new()),
            timer: None,
        }
    }

    pub fn state(&self) -> DriverState {
        match &self.timer {
            Some(handle) if !handle.is_finished() => DriverState::Active,
            _ => DriverState::Idle,
        }
    }

    /// Current sequential index
    pub fn cursor(&self) -> usize {
        self.cursor.current()
    }

    /// Arm the repeating timer. The first pass runs one full interval later.
    ///
    /// Returns false if the driver was already active. Nothing is armed
    /// when the configured interval cannot drive a timer.
    pub fn start(&mut self) -> Result<bool, ConfigError> {
        if self.state() == DriverState::Active {
            return Ok(false);
        }

        let period = self.ctx.config.rotation_interval()?;
        let ctx = self.ctx.clone();
        let cursor = Arc::clone(&self.cursor);

        tracing::info!(
            interval_secs = period.as_secs_f32(),
            random = ctx.config.equip_random_gear_set,
            gear_sets = ctx.config.gear_sets.len(),
            "Gear rotation armed"
        );

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                submit_pass(&ctx, &cursor).await;
            }
        }));
        Ok(true)
    }

    /// Submit one pass right away. Returns the task name it runs under.
    pub async fn rotate_now(&self) -> String {
        submit_pass(&self.ctx, &self.cursor).await
    }

    /// Disarm the timer and abort every running pass.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
            tracing::info!("Gear rotation stopped");
        }
        self.ctx.tasks.lock().await.stop_all();
    }
}

async fn submit_pass(ctx: &RotationContext, cursor: &Arc<RotationCursor>) -> String {
    let name = Uuid::new_v4().to_string();
    let pass_ctx = ctx.clone();
    let pass_cursor = Arc::clone(cursor);
    let task_name = name.clone();

    ctx.tasks.lock().await.start(name.clone(), async move {
        let summary = run_rotation_pass(&pass_ctx, &pass_cursor).await;
        tracing::debug!(
            task = %task_name,
            equipped = summary.equipped,
            failed = summary.failed,
            skipped = summary.skipped,
            cursor = pass_cursor.current(),
            "Rotation pass complete"
        );
    });

    name
}
