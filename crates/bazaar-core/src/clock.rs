//! The trading-day clock.
//!
//! [`TradingDay`] is the single source of truth for simulated time: the step
//! counter, the day number, the phase of the day, and the seconds elapsed in
//! the trading window.
//!
//! ```text
//! Preparation --ENTER--> Trading --60 s--> EndOfDay --ENTER--> Preparation (day + 1)
//! ```
//!
//! The first day opens directly in `Trading`.
//!
//! All counter arithmetic is checked.

use bazaar_types::TradingPhase;

use crate::rules::TRADING_DAY_SECS;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Step counter would overflow.
    #[error("step counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u32::MAX")]
    DayOverflow,
}

/// What happened when the clock advanced one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockAdvance {
    /// Step number that just ran (1-based).
    pub tick: u64,
    /// Whether the trading window closed on this step.
    pub trading_ended: bool,
}

/// Day counter, phase, and trading-window timer.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingDay {
    /// Steps executed so far.
    tick: u64,
    /// Current day (1-based).
    day: u32,
    /// Current phase.
    phase: TradingPhase,
    /// Seconds elapsed in the trading window.
    elapsed: f64,
    /// Length of the trading window in seconds.
    limit: f64,
}

impl TradingDay {
    /// Day 1, already trading, with the standard window.
    pub const fn new() -> Self {
        Self::with_limit(TRADING_DAY_SECS)
    }

    /// Day 1, already trading, with a custom window length.
    pub const fn with_limit(limit: f64) -> Self {
        Self {
            tick: 0,
            day: 1,
            phase: TradingPhase::Trading,
            elapsed: 0.0,
            limit,
        }
    }

    /// Steps executed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current day number.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Current phase.
    pub const fn phase(&self) -> TradingPhase {
        self.phase
    }

    /// Whether customers are being served.
    pub const fn is_trading(&self) -> bool {
        matches!(self.phase, TradingPhase::Trading)
    }

    /// Seconds left in the trading window.
    pub fn time_remaining(&self) -> f64 {
        match self.phase {
            TradingPhase::Preparation => self.limit,
            TradingPhase::Trading => (self.limit - self.elapsed).max(0.0),
            TradingPhase::EndOfDay => 0.0,
        }
    }

    /// Time left formatted as `m:ss`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn time_display(&self) -> String {
        // Remaining time is clamped non-negative and bounded by the window.
        let whole = self.time_remaining().floor() as u64;
        let minutes = whole / 60;
        let seconds = whole % 60;
        format!("{minutes}:{seconds:02}")
    }

    /// Advance one step of `dt` seconds.
    ///
    /// The trading timer only runs during `Trading`. When it reaches the
    /// window length the phase moves to `EndOfDay` and the returned
    /// [`ClockAdvance`] reports `trading_ended`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the step counter overflows.
    pub fn advance(&mut self, dt: f64) -> Result<ClockAdvance, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let mut trading_ended = false;
        if self.is_trading() {
            self.elapsed += dt;
            if self.elapsed >= self.limit {
                self.phase = TradingPhase::EndOfDay;
                trading_ended = true;
            }
        }
        Ok(ClockAdvance {
            tick: self.tick,
            trading_ended,
        })
    }

    /// Open the shop for the day. Returns `false` outside `Preparation`.
    pub const fn start_trading(&mut self) -> bool {
        if !matches!(self.phase, TradingPhase::Preparation) {
            return false;
        }
        self.phase = TradingPhase::Trading;
        self.elapsed = 0.0;
        true
    }

    /// Move from `EndOfDay` to the next day's `Preparation`.
    ///
    /// Returns `Ok(None)` outside `EndOfDay`, otherwise the new day number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the day counter overflows.
    pub fn next_day(&mut self) -> Result<Option<u32>, ClockError> {
        if !matches!(self.phase, TradingPhase::EndOfDay) {
            return Ok(None);
        }
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        self.phase = TradingPhase::Preparation;
        self.elapsed = 0.0;
        Ok(Some(self.day))
    }
}

impl Default for TradingDay {
    fn default() -> Self {
        Self::new()
    }
}
