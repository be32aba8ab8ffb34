//! A headless shopkeeper.
//!
//! [`Autopilot`] plays the shop from the render snapshot alone, the way a
//! player at the keyboard would: it opens the shop, selects whatever the
//! customer at the counter asks for, sells, and answers haggle rounds. It
//! waits `reaction_ticks` steps after every key press and fumbles a haggle
//! key with probability `miss_chance`.

use bazaar_core::input::InputSource;
use bazaar_types::{HaggleKey, InputKey, ShopSnapshot, TradingPhase};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration for the autopilot, loaded from `bazaar-config.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AutopilotConfig {
    /// Probability of pressing the wrong haggle key.
    #[serde(default = "default_miss_chance")]
    pub miss_chance: f64,

    /// Steps to wait after each key press.
    #[serde(default = "default_reaction_ticks")]
    pub reaction_ticks: u64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            miss_chance: default_miss_chance(),
            reaction_ticks: default_reaction_ticks(),
        }
    }
}

const fn default_miss_chance() -> f64 {
    0.15
}

const fn default_reaction_ticks() -> u64 {
    6
}

// -----------------------------------------------------------------------
// Autopilot
// -----------------------------------------------------------------------

/// An [`InputSource`] that plays the shop by itself.
#[derive(Debug)]
pub struct Autopilot {
    config: AutopilotConfig,
    rng: SmallRng,
    ready_at: u64,
}

impl Autopilot {
    /// Create an autopilot with its own seeded RNG.
    pub fn new(config: AutopilotConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            ready_at: 0,
        }
    }

    /// Decide on a key for this snapshot, ignoring reaction time.
    fn choose(&mut self, snapshot: &ShopSnapshot) -> Option<InputKey> {
        match snapshot.phase {
            TradingPhase::Preparation | TradingPhase::EndOfDay => return Some(InputKey::Enter),
            TradingPhase::Trading => {}
        }

        if let Some(required) = snapshot.customers.iter().find_map(|c| c.haggle_key) {
            let key = if self.rng.random_bool(self.config.miss_chance.clamp(0.0, 1.0)) {
                wrong_key(required)
            } else {
                required
            };
            return Some(InputKey::Haggle(key));
        }

        let customer = snapshot
            .customers
            .iter()
            .find(|c| !c.is_departing && c.is_at_counter)?;
        if snapshot.selected_item == Some(customer.desired_item) {
            Some(InputKey::Space)
        } else {
            Some(InputKey::Digit(customer.desired_item.digit()))
        }
    }
}

impl InputSource for Autopilot {
    fn next_key(&mut self, tick: u64, snapshot: &ShopSnapshot) -> Option<InputKey> {
        if tick < self.ready_at {
            return None;
        }
        let key = self.choose(snapshot)?;
        self.ready_at = tick.saturating_add(self.config.reaction_ticks);
        Some(key)
    }
}

/// The haggle key after `key`, wrapping around.
fn wrong_key(key: HaggleKey) -> HaggleKey {
    let position = HaggleKey::ALL.iter().position(|k| *k == key).unwrap_or(0);
    HaggleKey::ALL
        .iter()
        .cycle()
        .nth(position.saturating_add(1))
        .copied()
        .unwrap_or(HaggleKey::Z)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::rules::COUNTER_POSITION;
    use bazaar_types::{ColorClass, CustomerId, CustomerKind, CustomerView, Item, MessageTone};
    use rust_decimal::Decimal;

    use super::*;

    fn view(item: Item, at_counter: bool, haggle_key: Option<HaggleKey>) -> CustomerView {
        CustomerView {
            id: CustomerId::new(),
            kind: CustomerKind::Blob,
            position: COUNTER_POSITION,
            display_symbol: 'B',
            color_class: ColorClass::Green,
            is_departing: false,
            is_at_counter: at_counter,
            desired_item: item,
            message: String::new(),
            message_tone: MessageTone::Neutral,
            patience_fraction: 1.0,
            patience_color: ColorClass::Green,
            haggle_key,
            haggle_time_left: haggle_key.map(|_| 2.0),
        }
    }

    fn snapshot(
        phase: TradingPhase,
        customers: Vec<CustomerView>,
        selected: Option<Item>,
    ) -> ShopSnapshot {
        ShopSnapshot {
            tick: 0,
            customers,
            active_index: None,
            selected_item: selected,
            money: Decimal::ZERO,
            day: 1,
            reputation: 50,
            time_display: String::from("1:00"),
            phase,
            stock: Vec::new(),
            flashes: Vec::new(),
            last_summary: None,
        }
    }

    fn careful() -> Autopilot {
        Autopilot::new(
            AutopilotConfig {
                miss_chance: 0.0,
                reaction_ticks: 3,
            },
            1,
        )
    }

    #[test]
    fn presses_enter_between_days() {
        let mut pilot = careful();
        let snap = snapshot(TradingPhase::EndOfDay, Vec::new(), None);
        assert_eq!(pilot.next_key(0, &snap), Some(InputKey::Enter));
    }

    #[test]
    fn selects_then_sells() {
        let mut pilot = careful();
        let customers = vec![view(Item::QuantumDice, true, None)];
        let snap = snapshot(TradingPhase::Trading, customers.clone(), None);
        assert_eq!(pilot.next_key(0, &snap), Some(InputKey::Digit(3)));

        let snap = snapshot(TradingPhase::Trading, customers, Some(Item::QuantumDice));
        assert_eq!(pilot.next_key(1, &snap), None);
        assert_eq!(pilot.next_key(3, &snap), Some(InputKey::Space));
    }

    #[test]
    fn waits_for_customer_at_counter() {
        let mut pilot = careful();
        let snap = snapshot(
            TradingPhase::Trading,
            vec![view(Item::FakeId, false, None)],
            Some(Item::FakeId),
        );
        assert_eq!(pilot.next_key(0, &snap), None);
    }

    #[test]
    fn answers_haggle_rounds() {
        let mut pilot = careful();
        let snap = snapshot(
            TradingPhase::Trading,
            vec![view(Item::FakeId, true, Some(HaggleKey::V))],
            Some(Item::FakeId),
        );
        assert_eq!(pilot.next_key(0, &snap), Some(InputKey::Haggle(HaggleKey::V)));
    }

    #[test]
    fn clumsy_pilot_misses() {
        let mut pilot = Autopilot::new(
            AutopilotConfig {
                miss_chance: 1.0,
                reaction_ticks: 0,
            },
            2,
        );
        let snap = snapshot(
            TradingPhase::Trading,
            vec![view(Item::FakeId, true, Some(HaggleKey::B))],
            None,
        );
        assert_eq!(pilot.next_key(0, &snap), Some(InputKey::Haggle(HaggleKey::Z)));
    }

    #[test]
    fn config_defaults() {
        let config: AutopilotConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, AutopilotConfig::default());
        assert_eq!(config.reaction_ticks, 6);
    }
}
