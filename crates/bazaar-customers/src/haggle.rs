//! The haggle mini-game protocol.
//!
//! A negotiation is a sequence of timed key-match rounds layered on top of
//! a candidate sale:
//!
//! ```text
//! Idle -> RoundActive -> RoundActive   (match, rounds remain)
//!                     -> Won           (match, no rounds remain)
//!                     -> Lost          (mismatch or timeout)
//! ```
//!
//! `Won` and `Lost` are terminal for the encounter. Each round redraws its
//! key and runs its own countdown. The state itself lives on the
//! [`Customer`](crate::Customer); this module holds the result type, round
//! construction, and the flavour text.
//!
//! # Timeout
//!
//! A round whose countdown reaches zero without any key press is lost
//! exactly as if the wrong key had been pressed: the price is cut, the
//! remaining rounds are forced to zero, and the result carries
//! `timed_out: true`. A key delivered on the same step the timer expires
//! is still judged on its merits.

use bazaar_types::{HaggleChallenge, HaggleKey};
use rand::Rng;

use crate::rules::{HAGGLE_PRICE_CUT, HAGGLE_TIME_LIMIT_SECS};

/// Outcome of feeding one step of input into a running haggle round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HaggleResult {
    /// No key this step and time remains; only the timer moved.
    Pending,
    /// Correct key; a fresh round has already started.
    Continue {
        /// Rounds still to play, including the one just started.
        remaining_rounds: u32,
        /// Key required by the new round.
        next_key: HaggleKey,
    },
    /// Correct key on the final round; the sale goes through.
    Won {
        /// Multiplier to apply to the base price (unchanged by the win).
        price_multiplier: f64,
    },
    /// Wrong key or timeout; negotiation over, no sale.
    Lost {
        /// Multiplier after the price cut.
        price_multiplier: f64,
        /// Whether the round expired rather than being answered wrongly.
        timed_out: bool,
    },
}

impl HaggleResult {
    /// Whether this result ends the encounter.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Won { .. } | Self::Lost { .. })
    }
}

/// Position of a round within the negotiation, used to pick flavour text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPosition {
    /// No rounds played yet.
    First,
    /// At least one round won, more than one left.
    Middle,
    /// Exactly one round left.
    Final,
}

impl RoundPosition {
    /// Classify a round from the customer's round counters.
    ///
    /// The first-round check wins over the final-round check, so a
    /// single-round negotiation opens with a "first offer".
    pub const fn classify(remaining: u32, total: u32) -> Self {
        if remaining == total {
            Self::First
        } else if remaining == 1 {
            Self::Final
        } else {
            Self::Middle
        }
    }
}

/// Draw a fresh round with a uniformly random key.
pub fn draw_challenge(rng: &mut impl Rng) -> HaggleChallenge {
    let idx = rng.random_range(0..HaggleKey::ALL.len());
    let required_key = HaggleKey::ALL.get(idx).copied().unwrap_or(HaggleKey::Z);
    HaggleChallenge {
        required_key,
        time_limit: HAGGLE_TIME_LIMIT_SECS,
        time_left: HAGGLE_TIME_LIMIT_SECS,
        price_cut_fraction: HAGGLE_PRICE_CUT,
    }
}

/// Pick the customer's line for a new round.
pub fn round_message(rng: &mut impl Rng, position: RoundPosition, key: HaggleKey) -> String {
    let options = match position {
        RoundPosition::First => [
            format!("First offer: [{key}]"),
            format!("That's too high! [{key}]"),
        ],
        RoundPosition::Middle => [
            format!("Still too high! [{key}]"),
            format!("Not good enough! [{key}]"),
        ],
        RoundPosition::Final => [
            format!("Final offer! [{key}]"),
            format!("Last chance! [{key}]"),
        ],
    };
    let [a, b] = options;
    if rng.random_bool(0.5) { a } else { b }
}

/// Line spoken when the final round is won.
pub const WON_MESSAGE: &str = "Fine, deal!";

/// Line spoken when a round is lost.
pub const LOST_MESSAGE: &str = "Ha! I knew you'd cave!";

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn single_round_negotiation_opens_as_first() {
        assert_eq!(RoundPosition::classify(1, 1), RoundPosition::First);
    }

    #[test]
    fn classify_positions() {
        assert_eq!(RoundPosition::classify(3, 3), RoundPosition::First);
        assert_eq!(RoundPosition::classify(2, 3), RoundPosition::Middle);
        assert_eq!(RoundPosition::classify(1, 3), RoundPosition::Final);
        assert_eq!(RoundPosition::classify(1, 2), RoundPosition::Final);
    }

    #[test]
    fn challenge_uses_fixed_timing() {
        let mut rng = SmallRng::seed_from_u64(7);
        let challenge = draw_challenge(&mut rng);
        assert!((challenge.time_limit - 2.0).abs() < f64::EPSILON);
        assert!((challenge.time_left - challenge.time_limit).abs() < f64::EPSILON);
        assert!((challenge.price_cut_fraction - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn every_key_is_eventually_drawn() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.insert(draw_challenge(&mut rng).required_key);
        }
        assert_eq!(seen.len(), HaggleKey::ALL.len());
    }

    #[test]
    fn round_message_mentions_key() {
        let mut rng = SmallRng::seed_from_u64(3);
        let msg = round_message(&mut rng, RoundPosition::Final, HaggleKey::V);
        assert!(msg.contains("[V]"));
    }

    #[test]
    fn terminal_results() {
        assert!(!HaggleResult::Pending.is_terminal());
        assert!(
            HaggleResult::Won {
                price_multiplier: 1.0
            }
            .is_terminal()
        );
        assert!(
            HaggleResult::Lost {
                price_multiplier: 0.8,
                timed_out: false
            }
            .is_terminal()
        );
    }
}
