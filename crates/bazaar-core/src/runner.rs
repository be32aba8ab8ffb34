//! Shop loop runner.
//!
//! This module provides [`run_shop`], the top-level async function that
//! drives the step loop with support for:
//!
//! - **Bounded runs**: stop after `max_days` closed days or `max_ticks` steps
//! - **Real-time pacing**: sleep `tick_interval_ms` between steps
//! - **Observation**: a [`StepCallback`] sees every step
//!
//! The runner wraps the single-step [`run_step`] function and adds the
//! control plane around it.
//!
//! [`run_step`]: crate::tick::run_step

use bazaar_types::DaySummary;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ShopConfig;
use crate::input::InputSource;
use crate::rules::STEP_SECS;
use crate::tick::{self, ShopState, StepSummary, TickError};

/// Errors that can occur during the run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A step failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying step error.
        #[from]
        source: TickError,
    },
}

/// When the run stops and how fast it goes.
///
/// A bound of 0 means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Stop once this many days have closed.
    pub max_days: u32,
    /// Stop once this many steps have run.
    pub max_ticks: u64,
    /// Real-time milliseconds between steps.
    pub tick_interval_ms: u64,
}

impl RunBounds {
    /// Bounds taken from the configuration.
    pub const fn from_config(config: &ShopConfig) -> Self {
        Self {
            max_days: config.bounds.max_days,
            max_ticks: config.bounds.max_ticks,
            tick_interval_ms: config.world.tick_interval_ms,
        }
    }

    const fn days_reached(&self, days_closed: u32) -> bool {
        self.max_days > 0 && days_closed >= self.max_days
    }

    const fn ticks_reached(&self, tick: u64) -> bool {
        self.max_ticks > 0 && tick >= self.max_ticks
    }
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The configured number of days closed.
    MaxDaysReached,
    /// The configured number of steps ran.
    MaxTicksReached,
}

/// Result of the run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: EndReason,
    /// Total number of steps executed.
    pub total_ticks: u64,
    /// Days closed during the run.
    pub days_closed: u32,
    /// Money on hand at the end.
    pub final_money: Decimal,
    /// Reputation at the end.
    pub final_reputation: i64,
    /// Summary of every closed day, oldest first.
    pub summaries: Vec<DaySummary>,
}

/// Callback invoked after each step completes.
///
/// Implementations can use this to redraw, log day summaries, etc.
pub trait StepCallback: Send {
    /// Called after a step completes successfully.
    fn on_step(&mut self, summary: &StepSummary, state: &ShopState);
}

/// A no-op step callback for testing.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _summary: &StepSummary, _state: &ShopState) {}
}

/// Run the shop until a bound is reached.
///
/// Each iteration asks `input` for a key, runs one step of
/// [`STEP_SECS`], notifies `callback`, then sleeps for the tick interval.
///
/// # Errors
///
/// Returns [`RunnerError`] if a step fails unrecoverably.
pub async fn run_shop(
    state: &mut ShopState,
    input: &mut dyn InputSource,
    bounds: &RunBounds,
    callback: &mut dyn StepCallback,
) -> Result<RunResult, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut days_closed: u32 = 0;

    info!(
        max_days = bounds.max_days,
        max_ticks = bounds.max_ticks,
        tick_interval_ms = bounds.tick_interval_ms,
        "Shop run starting"
    );

    loop {
        let snapshot = state.snapshot();
        let key = input.next_key(snapshot.tick, &snapshot);

        let summary = tick::run_step(state, key, STEP_SECS)?;
        total_ticks = total_ticks.saturating_add(1);
        if summary.closed_day.is_some() {
            days_closed = days_closed.saturating_add(1);
        }

        callback.on_step(&summary, state);

        let end_reason = if bounds.days_reached(days_closed) {
            Some(EndReason::MaxDaysReached)
        } else if bounds.ticks_reached(summary.tick) {
            Some(EndReason::MaxTicksReached)
        } else {
            None
        };
        if let Some(end_reason) = end_reason {
            info!(tick = summary.tick, reason = ?end_reason, "Run bound reached");
            return Ok(RunResult {
                end_reason,
                total_ticks,
                days_closed,
                final_money: state.ledger.money(),
                final_reputation: state.ledger.reputation(),
                summaries: state.ledger.summaries().to_vec(),
            });
        }

        if bounds.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(bounds.tick_interval_ms)).await;
        }
    }
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        days_closed = result.days_closed,
        final_money = %result.final_money,
        final_reputation = result.final_reputation,
        "Shop run ended"
    );

    if result.summaries.is_empty() {
        warn!("Run ended before any day closed");
    }
    for summary in &result.summaries {
        info!(
            day = summary.day,
            sales = summary.sales_made,
            earned = %summary.money_earned,
            interest = %summary.interest_paid,
            net = %summary.net_profit,
            "Day summary"
        );
    }
}
