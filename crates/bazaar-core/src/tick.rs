//! The step cycle that drives the shop.
//!
//! Each call to [`run_step`] runs one fixed-rate step through these phases:
//!
//! 1. **Input** -- apply at most one key press. A running haggle is fed
//!    every step (its timer runs with or without a key); haggle letters
//!    only matter while a haggle is running.
//!
//! 2. **Clock** -- advance the trading-day clock.
//!
//! 3. **Floor** -- while trading: spawn, advance the line, and run the
//!    movement pass. Abandonments count as failed customers.
//!
//! 4. **Close** -- when the trading window ends this step, clear the floor
//!    and close the day in the ledger.
//!
//! 5. **Effects** -- decay the flash indicators.
//!
//! The step is deterministic given the same seed and the same key presses.

use bazaar_customers::{StockError, StockKeeper};
use bazaar_ledger::{Economy, LedgerError, ShopLedger};
use bazaar_types::{CustomerId, DaySummary, InputKey, Item, ShopSnapshot, TradingPhase};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::TradingDay;
use crate::config::ShopConfig;
use crate::effects::FlashBoard;
use crate::queue::CustomerQueue;
use crate::sale::{HaggleResolution, SaleDesk, SaleOutcome};
use crate::snapshot;

/// Errors that can occur during step execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },

    /// Closing the day in the ledger failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// Summary of a single step's execution.
#[derive(Debug, Clone)]
pub struct StepSummary {
    /// The step number that was executed.
    pub tick: u64,
    /// Day during this step.
    pub day: u32,
    /// Phase at the end of this step.
    pub phase: TradingPhase,
    /// Key applied this step.
    pub key: Option<InputKey>,
    /// Customer admitted this step.
    pub spawned: Option<CustomerId>,
    /// Customers whose patience ran out this step.
    pub abandoned: Vec<CustomerId>,
    /// Customers that left the shop this step.
    pub removed: Vec<CustomerId>,
    /// Result of a SPACE press.
    pub sale: Option<SaleOutcome>,
    /// Result of feeding the running haggle.
    pub haggle: Option<HaggleResolution>,
    /// Summary of the day that closed this step.
    pub closed_day: Option<DaySummary>,
    /// Customers in the shop at the end of the step.
    pub queue_len: usize,
}

/// The mutable shop state passed through the step cycle.
#[derive(Debug)]
pub struct ShopState {
    /// The trading-day clock.
    pub clock: TradingDay,
    /// Customers on the shop floor.
    pub queue: CustomerQueue,
    /// Money, reputation, debt, and the entry log.
    pub ledger: ShopLedger,
    /// The shelves.
    pub stock: Box<dyn StockKeeper>,
    /// UI flash indicators.
    pub flashes: FlashBoard,
    /// Item the shopkeeper has selected.
    pub selected_item: Option<Item>,
    /// The single source of randomness.
    pub rng: StdRng,
    /// Summary shown while the day is over.
    pub last_summary: Option<DaySummary>,
}

impl ShopState {
    /// A fresh shop on day 1, trading, with the given seed and shelves.
    pub fn new(seed: u64, stock: Box<dyn StockKeeper>) -> Self {
        Self {
            clock: TradingDay::new(),
            queue: CustomerQueue::new(),
            ledger: ShopLedger::new(),
            stock,
            flashes: FlashBoard::new(),
            selected_item: None,
            rng: StdRng::seed_from_u64(seed),
            last_summary: None,
        }
    }

    /// Build the shop a configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`StockError`] if the starting stock does not fit.
    pub fn from_config(config: &ShopConfig) -> Result<Self, StockError> {
        let stock = config.inventory.build()?;
        Ok(Self::new(config.world.seed, stock))
    }

    /// The render snapshot for the current state.
    pub fn snapshot(&self) -> ShopSnapshot {
        snapshot::build_snapshot(self)
    }
}

/// What the input phase produced.
#[derive(Default)]
struct InputResult {
    sale: Option<SaleOutcome>,
    haggle: Option<HaggleResolution>,
}

/// Execute one step of `dt` seconds with an optional key press.
pub fn run_step(
    state: &mut ShopState,
    key: Option<InputKey>,
    dt: f64,
) -> Result<StepSummary, TickError> {
    // --- Phase 1: Input ---
    let input = phase_input(state, key, dt)?;

    // --- Phase 2: Clock ---
    let advance = state.clock.advance(dt)?;

    // --- Phase 3: Floor ---
    let mut spawned = None;
    let mut abandoned = Vec::new();
    let mut removed = Vec::new();
    if state.clock.is_trading() {
        spawned = state.queue.tick_spawner(&mut state.rng, dt);
        state.queue.advance_line();
        let report = state.queue.update(dt);
        for id in &report.abandoned {
            info!(customer = %id, "customer ran out of patience");
            state.ledger.record_failed_customer();
        }
        abandoned = report.abandoned;
        removed = report.removed;
    }

    // --- Phase 4: Close ---
    let mut closed_day = None;
    if advance.trading_ended {
        state.queue.clear();
        state.selected_item = None;
        let summary = state.ledger.close_day()?;
        state.last_summary = Some(summary.clone());
        closed_day = Some(summary);
    }

    // --- Phase 5: Effects ---
    state.flashes.decay(dt);

    Ok(StepSummary {
        tick: advance.tick,
        day: state.clock.day(),
        phase: state.clock.phase(),
        key,
        spawned,
        abandoned,
        removed,
        sale: input.sale,
        haggle: input.haggle,
        closed_day,
        queue_len: state.queue.len(),
    })
}

/// Phase 1: apply the key press and feed any running haggle.
fn phase_input(
    state: &mut ShopState,
    key: Option<InputKey>,
    dt: f64,
) -> Result<InputResult, TickError> {
    let mut result = InputResult::default();

    if state.queue.haggling().is_some() {
        let letter = match key {
            Some(InputKey::Haggle(letter)) => Some(letter),
            _ => None,
        };
        let mut desk = SaleDesk {
            economy: &mut state.ledger,
            stock: state.stock.as_mut(),
            flashes: &mut state.flashes,
        };
        result.haggle = Some(desk.resolve_haggle(&mut state.queue, letter, dt, &mut state.rng));
    }

    match key {
        None | Some(InputKey::Haggle(_)) => {}
        Some(InputKey::Digit(digit)) => {
            if let Some(item) = Item::from_digit(digit) {
                debug!(item = %item, "item selected");
                state.selected_item = Some(item);
            }
        }
        Some(InputKey::Esc) => state.selected_item = None,
        Some(InputKey::Tab) => {
            if let Some(id) = state.queue.cycle_active() {
                debug!(customer = %id, "active customer cycled");
            }
        }
        Some(InputKey::Space) => {
            if state.clock.is_trading() {
                let mut desk = SaleDesk {
                    economy: &mut state.ledger,
                    stock: state.stock.as_mut(),
                    flashes: &mut state.flashes,
                };
                result.sale = Some(desk.attempt_sale(
                    &mut state.queue,
                    state.selected_item,
                    &mut state.rng,
                ));
            }
        }
        Some(InputKey::Enter) => press_enter(state)?,
    }

    Ok(result)
}

/// ENTER opens the shop in `Preparation` and moves on from `EndOfDay`.
fn press_enter(state: &mut ShopState) -> Result<(), TickError> {
    match state.clock.phase() {
        TradingPhase::Preparation => {
            if state.clock.start_trading() {
                let day = state.clock.day();
                state.ledger.begin_day(day);
                state.queue.reset_spawn_timer();
                state.last_summary = None;
                info!(day, "shop opened");
            }
        }
        TradingPhase::EndOfDay => {
            if let Some(day) = state.clock.next_day()? {
                info!(day, "preparing next day");
            }
        }
        TradingPhase::Trading => {}
    }
    Ok(())
}
