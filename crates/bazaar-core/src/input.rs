//! Input source trait and its simple implementations.
//!
//! Each step the runner asks an [`InputSource`] for at most one
//! [`InputKey`]. The source sees the same [`ShopSnapshot`] the renderer
//! does, so it could be a keyboard reader, a scripted replay, an autopilot,
//! or a test stub.
//!
//! [`NoInput`] never presses anything. [`ScriptedInput`] replays a fixed
//! list of `(tick, key)` events, which is how the scenario tests drive the
//! shop.

use std::collections::VecDeque;

use bazaar_types::{InputKey, ShopSnapshot};

/// A source of key presses.
pub trait InputSource: Send {
    /// The key pressed before step `tick` runs, if any.
    ///
    /// `snapshot` is the state the player was looking at.
    fn next_key(&mut self, tick: u64, snapshot: &ShopSnapshot) -> Option<InputKey>;
}

/// A source that never presses a key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn next_key(&mut self, _tick: u64, _snapshot: &ShopSnapshot) -> Option<InputKey> {
        None
    }
}

/// Replays a fixed script of key presses.
///
/// Events are delivered in order, one per step, no earlier than their tick.
/// Two events scheduled for the same tick land on consecutive steps.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<(u64, InputKey)>,
}

impl ScriptedInput {
    /// Build a script from `(tick, key)` pairs, sorted by tick.
    pub fn new(events: impl IntoIterator<Item = (u64, InputKey)>) -> Self {
        let mut sorted: Vec<_> = events.into_iter().collect();
        sorted.sort_by_key(|&(tick, _)| tick);
        Self {
            events: sorted.into(),
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_key(&mut self, tick: u64, _snapshot: &ShopSnapshot) -> Option<InputKey> {
        let &(due, _) = self.events.front()?;
        if tick < due {
            return None;
        }
        self.events.pop_front().map(|(_, key)| key)
    }
}

#[cfg(test)]
mod tests {
    use bazaar_types::TradingPhase;
    use rust_decimal::Decimal;

    use super::*;

    fn snapshot() -> ShopSnapshot {
        ShopSnapshot {
            tick: 0,
            customers: Vec::new(),
            active_index: None,
            selected_item: None,
            money: Decimal::ZERO,
            day: 1,
            reputation: 50,
            time_display: String::from("1:00"),
            phase: TradingPhase::Trading,
            stock: Vec::new(),
            flashes: Vec::new(),
            last_summary: None,
        }
    }

    #[test]
    fn no_input_is_silent() {
        let mut source = NoInput;
        assert_eq!(source.next_key(5, &snapshot()), None);
    }

    #[test]
    fn script_waits_for_its_tick() {
        let mut source = ScriptedInput::new([(3, InputKey::Space), (1, InputKey::Digit(2))]);
        let snap = snapshot();
        assert_eq!(source.next_key(0, &snap), None);
        assert_eq!(source.next_key(1, &snap), Some(InputKey::Digit(2)));
        assert_eq!(source.next_key(2, &snap), None);
        assert_eq!(source.next_key(3, &snap), Some(InputKey::Space));
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn same_tick_events_spill_over() {
        let mut source = ScriptedInput::new([(1, InputKey::Digit(1)), (1, InputKey::Space)]);
        let snap = snapshot();
        assert_eq!(source.next_key(1, &snap), Some(InputKey::Digit(1)));
        assert_eq!(source.next_key(2, &snap), Some(InputKey::Space));
    }
}
