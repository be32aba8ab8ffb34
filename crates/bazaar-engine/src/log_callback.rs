//! Step callback that reports the run through `tracing`.
//!
//! Sales and haggle results go out at `debug`, day summaries at `info`.
//! When a day closes, the full render snapshot is emitted as JSON at
//! `debug` so a log reader can replay the end-of-day screen.

use bazaar_core::runner::StepCallback;
use bazaar_core::sale::{HaggleResolution, SaleOutcome};
use bazaar_core::tick::{ShopState, StepSummary};
use tracing::{debug, info, warn};

/// Callback that logs what each step did.
#[derive(Debug, Default)]
pub struct LogCallback {
    sales: u64,
    haggles_lost: u64,
}

impl LogCallback {
    /// Create a new logging callback.
    pub const fn new() -> Self {
        Self {
            sales: 0,
            haggles_lost: 0,
        }
    }

    /// Sales completed over the whole run.
    pub const fn sales(&self) -> u64 {
        self.sales
    }

    /// Haggles lost over the whole run.
    pub const fn haggles_lost(&self) -> u64 {
        self.haggles_lost
    }
}

impl StepCallback for LogCallback {
    fn on_step(&mut self, summary: &StepSummary, state: &ShopState) {
        if let Some(outcome) = &summary.sale {
            if matches!(outcome, SaleOutcome::Sold { .. }) {
                self.sales = self.sales.saturating_add(1);
            }
            debug!(tick = summary.tick, outcome = ?outcome, "Sale attempt");
        }

        match summary.haggle {
            Some(HaggleResolution::Won { .. }) => self.sales = self.sales.saturating_add(1),
            Some(HaggleResolution::Lost { .. }) => {
                self.haggles_lost = self.haggles_lost.saturating_add(1);
            }
            _ => {}
        }
        if let Some(resolution) = summary
            .haggle
            .filter(|h| !matches!(h, HaggleResolution::Pending { .. }))
        {
            debug!(tick = summary.tick, resolution = ?resolution, "Haggle step");
        }

        let Some(day) = &summary.closed_day else {
            return;
        };
        info!(
            day = day.day,
            sales = day.sales_made,
            earned = %day.money_earned,
            interest = %day.interest_paid,
            served = day.customers_served,
            failed = day.customers_failed,
            net = %day.net_profit,
            money = %state.ledger.money(),
            reputation = state.ledger.reputation(),
            "Day closed"
        );
        match serde_json::to_string(&state.snapshot()) {
            Ok(json) => debug!(tick = summary.tick, snapshot = %json, "End-of-day snapshot"),
            Err(e) => warn!(error = %e, "failed to serialize snapshot"),
        }
    }
}
