//! The customer entity: arrival, patience, haggling, and departure.
//!
//! A [`Customer`] is a self-contained state machine. The queue controller
//! owns customers and drives them exclusively through the operations in
//! this module; nothing outside the crate mutates customer fields.
//!
//! # Lifecycle
//!
//! ```text
//! Waiting --(sale attempt, haggle drawn)--> Haggling
//! Waiting --(sale / patience exhausted)--> Departing
//! Haggling --(Won / Lost)----------------> Departing
//! ```
//!
//! Departure is one-way and fires at most once. A departing customer walks
//! to [`EXIT_POSITION`] and is removed by the queue once it arrives.

use bazaar_types::{
    ColorClass, CustomerId, CustomerKind, CustomerView, HaggleChallenge, HaggleKey, Item,
    MessageTone, Position,
};
use rand::Rng;
use tracing::debug;

use crate::error::CustomerError;
use crate::haggle::{self, HaggleResult, LOST_MESSAGE, RoundPosition, WON_MESSAGE};
use crate::rules::{
    BASE_PRICE, COVERT_CHANCE, EXIT_POSITION, MAX_HAGGLE_ROUNDS, MIN_HAGGLE_ROUNDS,
    PATIENCE_MAX_SECS, PATIENCE_MIN_SECS, WALK_SPEED, WARNING_FLASH_SECS,
    WRONG_ITEM_PATIENCE_FACTOR,
};

/// Message shown when a customer gives up waiting.
pub const ABANDON_MESSAGE: &str = "I'm out of here!";

/// Message shown when a sale completes without haggling.
pub const SOLD_MESSAGE: &str = "Pleasure doing business.";

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The fields fixed when a customer is created.
///
/// Separated from [`Customer`] so tests can build customers with chosen
/// values instead of rolled ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerProfile {
    /// Visual and behavioural variant.
    pub kind: CustomerKind,
    /// Seconds of waiting the customer will tolerate.
    pub patience_limit: f64,
    /// Probability in `[0, 1)` that a legal sale triggers haggling.
    pub haggle_propensity: f64,
    /// Undercover agent flag. Narrative only.
    pub is_covert: bool,
    /// Haggle rounds this customer demands, `1..=3`.
    pub haggle_rounds: u32,
}

impl CustomerProfile {
    /// Draw a profile from the creation distributions.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let kind_idx = rng.random_range(0..CustomerKind::ALL.len());
        Self {
            kind: CustomerKind::ALL
                .get(kind_idx)
                .copied()
                .unwrap_or(CustomerKind::Tentacle),
            patience_limit: rng.random_range(PATIENCE_MIN_SECS..PATIENCE_MAX_SECS),
            haggle_propensity: rng.random::<f64>(),
            is_covert: rng.random_bool(COVERT_CHANCE),
            haggle_rounds: rng.random_range(MIN_HAGGLE_ROUNDS..=MAX_HAGGLE_ROUNDS),
        }
    }
}

/// Signal returned by [`Customer::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still waiting (or haggling) at its slot.
    Waiting,
    /// Patience ran out on this step; the customer just started leaving.
    Abandoned,
    /// Already on the way out.
    Departing,
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// One customer in the shop.
#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    kind: CustomerKind,
    desired_item: Item,
    patience_limit: f64,
    elapsed_wait: f64,
    haggle_propensity: f64,
    is_covert: bool,
    position: Position,
    target: Position,
    is_departing: bool,
    remaining_haggle_rounds: u32,
    total_haggle_rounds: u32,
    challenge: Option<HaggleChallenge>,
    price_multiplier: f64,
    message: String,
    message_tone: MessageTone,
    warning_timer: f64,
}

impl Customer {
    /// Create a customer with freshly rolled traits.
    ///
    /// The customer appears at `spawn` and walks toward `target`. Its
    /// opening line names the desired item.
    pub fn create(
        rng: &mut impl Rng,
        desired_item: Item,
        spawn: Position,
        target: Position,
    ) -> Self {
        let profile = CustomerProfile::roll(rng);
        let mut customer = Self::from_profile(profile, desired_item, spawn, target);
        customer.message = spawn_message(rng, desired_item);
        customer
    }

    /// Create a customer from an explicit profile.
    pub fn from_profile(
        profile: CustomerProfile,
        desired_item: Item,
        spawn: Position,
        target: Position,
    ) -> Self {
        Self {
            id: CustomerId::new(),
            kind: profile.kind,
            desired_item,
            patience_limit: profile.patience_limit,
            elapsed_wait: 0.0,
            haggle_propensity: profile.haggle_propensity,
            is_covert: profile.is_covert,
            position: spawn,
            target,
            is_departing: false,
            remaining_haggle_rounds: profile.haggle_rounds,
            total_haggle_rounds: profile.haggle_rounds,
            challenge: None,
            price_multiplier: 1.0,
            message: format!("Looking for {desired_item}..."),
            message_tone: MessageTone::Neutral,
            warning_timer: 0.0,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Customer handle.
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Variant of the customer.
    pub const fn kind(&self) -> CustomerKind {
        self.kind
    }

    /// The only item this customer accepts.
    pub const fn desired_item(&self) -> Item {
        self.desired_item
    }

    /// Current patience limit in seconds.
    pub const fn patience_limit(&self) -> f64 {
        self.patience_limit
    }

    /// Seconds of waiting accumulated so far.
    pub const fn elapsed_wait(&self) -> f64 {
        self.elapsed_wait
    }

    /// Probability that a legal sale triggers haggling.
    pub const fn haggle_propensity(&self) -> f64 {
        self.haggle_propensity
    }

    /// Whether the customer is an undercover agent.
    pub const fn is_covert(&self) -> bool {
        self.is_covert
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Position the customer is walking toward.
    pub const fn target(&self) -> Position {
        self.target
    }

    /// Whether the customer is on the way out.
    pub const fn is_departing(&self) -> bool {
        self.is_departing
    }

    /// Haggle rounds left.
    pub const fn remaining_haggle_rounds(&self) -> u32 {
        self.remaining_haggle_rounds
    }

    /// Haggle rounds demanded at creation.
    pub const fn total_haggle_rounds(&self) -> u32 {
        self.total_haggle_rounds
    }

    /// The running haggle round, if any.
    pub const fn challenge(&self) -> Option<&HaggleChallenge> {
        self.challenge.as_ref()
    }

    /// Whether a haggle round is running.
    pub const fn is_haggling(&self) -> bool {
        self.challenge.is_some()
    }

    /// Current price multiplier in `(0, 1]`.
    pub const fn price_multiplier(&self) -> f64 {
        self.price_multiplier
    }

    /// Speech bubble text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tone of the speech bubble.
    pub const fn message_tone(&self) -> MessageTone {
        self.message_tone
    }

    // -- derived values -----------------------------------------------------

    /// Patience left, `1 - elapsed / limit`, clamped to `[0, 1]`.
    pub fn patience_fraction(&self) -> f64 {
        if self.patience_limit <= 0.0 {
            return 0.0;
        }
        (1.0 - self.elapsed_wait / self.patience_limit).clamp(0.0, 1.0)
    }

    /// Colour band of the patience bar.
    pub fn patience_color(&self) -> ColorClass {
        let fraction = self.patience_fraction();
        if fraction > 0.6 {
            ColorClass::Green
        } else if fraction > 0.3 {
            ColorClass::Yellow
        } else {
            ColorClass::Red
        }
    }

    /// Glyph to draw for this customer.
    pub const fn display_symbol(&self) -> char {
        self.kind.symbol()
    }

    /// Colour of the glyph. Covert customers flash red while warned.
    pub fn color_class(&self) -> ColorClass {
        if self.is_covert && self.warning_timer > 0.0 {
            ColorClass::Red
        } else {
            self.kind.color()
        }
    }

    /// Price this customer would pay right now, rounded down.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn negotiated_price(&self) -> u32 {
        let raw = (f64::from(BASE_PRICE) * self.price_multiplier).floor();
        // Multiplier is kept in (0, 1], so the product fits in u32.
        raw.clamp(0.0, f64::from(BASE_PRICE)) as u32
    }

    /// Horizontal distance from `x`.
    pub fn x_distance_to(&self, x: f64) -> f64 {
        (self.position.x - x).abs()
    }

    /// Distance from the current position to the current target.
    pub fn distance_to_target(&self) -> f64 {
        self.position.distance_to(self.target)
    }

    // -- per-step behaviour -------------------------------------------------

    /// Advance the customer by `dt` seconds.
    ///
    /// Accumulates waiting time, walks toward the target at
    /// [`WALK_SPEED`], and decays the warning flash. Forces departure the
    /// first time the patience limit is reached.
    pub fn step(&mut self, dt: f64) -> StepOutcome {
        self.elapsed_wait += dt.max(0.0);
        self.warning_timer = (self.warning_timer - dt).max(0.0);
        self.position = self.position.step_toward(self.target, WALK_SPEED * dt.max(0.0));

        if self.is_departing {
            return StepOutcome::Departing;
        }

        if self.elapsed_wait >= self.patience_limit {
            self.depart(ABANDON_MESSAGE, MessageTone::Negative);
            debug!(
                customer = %self.id,
                elapsed = self.elapsed_wait,
                limit = self.patience_limit,
                "customer ran out of patience"
            );
            return StepOutcome::Abandoned;
        }

        StepOutcome::Waiting
    }

    /// Move toward the target by at most `max_step`.
    pub fn walk_toward(&mut self, max_step: f64) {
        self.position = self.position.step_toward(self.target, max_step.max(0.0));
    }

    /// Place the customer exactly on its target.
    pub const fn snap_to_target(&mut self) {
        self.position = self.target;
    }

    /// Assign a new queue slot. Ignored once departing.
    pub const fn retarget(&mut self, target: Position) {
        if !self.is_departing {
            self.target = target;
        }
    }

    /// Start walking out. Returns `false` if already departing.
    ///
    /// Any running haggle round is abandoned.
    pub fn depart(&mut self, message: &str, tone: MessageTone) -> bool {
        if self.is_departing {
            return false;
        }
        self.is_departing = true;
        self.target = EXIT_POSITION;
        self.challenge = None;
        self.message = String::from(message);
        self.message_tone = tone;
        true
    }

    /// Leave satisfied after a completed sale.
    ///
    /// A customer that just won a haggle keeps its closing line.
    pub fn mark_sold(&mut self) -> bool {
        let message = if self.message_tone == MessageTone::Positive {
            self.message.clone()
        } else {
            String::from(SOLD_MESSAGE)
        };
        self.depart(&message, MessageTone::Positive)
    }

    /// Apply the wrong-item penalty: patience limit halved, warning flash.
    pub fn penalize_wrong_item(&mut self) {
        self.patience_limit *= WRONG_ITEM_PATIENCE_FACTOR;
        self.warning_timer = WARNING_FLASH_SECS;
    }

    // -- haggling -----------------------------------------------------------

    /// Start a haggle round with a freshly drawn key.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::Departing`] for a departing customer and
    /// [`CustomerError::NoHaggleRoundsLeft`] once the rounds are spent.
    pub fn begin_haggle_round(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<&HaggleChallenge, CustomerError> {
        if self.is_departing {
            return Err(CustomerError::Departing { customer: self.id });
        }
        if self.remaining_haggle_rounds == 0 {
            return Err(CustomerError::NoHaggleRoundsLeft { customer: self.id });
        }

        let challenge = haggle::draw_challenge(rng);
        let position =
            RoundPosition::classify(self.remaining_haggle_rounds, self.total_haggle_rounds);
        self.message = haggle::round_message(rng, position, challenge.required_key);
        self.message_tone = MessageTone::Haggle;

        debug!(
            customer = %self.id,
            key = %challenge.required_key,
            remaining = self.remaining_haggle_rounds,
            "haggle round started"
        );

        Ok(&*self.challenge.insert(challenge))
    }

    /// Feed one step of haggle input into the running round.
    ///
    /// The round timer always drops by `dt`. A key is judged before the
    /// timer, so a correct answer on the expiring step still counts.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::NoActiveChallenge`] when no round is
    /// running.
    pub fn resolve_haggle_input(
        &mut self,
        rng: &mut impl Rng,
        dt: f64,
        key: Option<HaggleKey>,
    ) -> Result<HaggleResult, CustomerError> {
        let Some(challenge) = self.challenge.as_mut() else {
            return Err(CustomerError::NoActiveChallenge { customer: self.id });
        };
        challenge.time_left -= dt;
        let required = challenge.required_key;
        let cut = challenge.price_cut_fraction;
        let expired = challenge.time_left <= 0.0;

        match key {
            Some(pressed) if pressed == required => {
                self.challenge = None;
                self.remaining_haggle_rounds = self.remaining_haggle_rounds.saturating_sub(1);
                if self.remaining_haggle_rounds > 0 {
                    let next = self.begin_haggle_round(rng)?;
                    let next_key = next.required_key;
                    Ok(HaggleResult::Continue {
                        remaining_rounds: self.remaining_haggle_rounds,
                        next_key,
                    })
                } else {
                    self.message = String::from(WON_MESSAGE);
                    self.message_tone = MessageTone::Positive;
                    Ok(HaggleResult::Won {
                        price_multiplier: self.price_multiplier,
                    })
                }
            }
            Some(_) => Ok(self.lose_haggle(cut, false)),
            None if expired => Ok(self.lose_haggle(cut, true)),
            None => Ok(HaggleResult::Pending),
        }
    }

    fn lose_haggle(&mut self, cut: f64, timed_out: bool) -> HaggleResult {
        self.price_multiplier *= 1.0 - cut;
        self.challenge = None;
        self.remaining_haggle_rounds = 0;
        self.message = String::from(LOST_MESSAGE);
        self.message_tone = MessageTone::Negative;
        HaggleResult::Lost {
            price_multiplier: self.price_multiplier,
            timed_out,
        }
    }

    // -- presentation -------------------------------------------------------

    /// Build the renderer's view of this customer.
    pub fn to_view(&self, is_at_counter: bool) -> CustomerView {
        CustomerView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            display_symbol: self.display_symbol(),
            color_class: self.color_class(),
            is_departing: self.is_departing,
            is_at_counter,
            desired_item: self.desired_item,
            message: self.message.clone(),
            message_tone: self.message_tone,
            patience_fraction: self.patience_fraction(),
            patience_color: self.patience_color(),
            haggle_key: self.challenge.map(|c| c.required_key),
            haggle_time_left: self.challenge.map(|c| c.time_left.max(0.0)),
        }
    }
}

/// Pick the opening line for a customer wanting `item`.
pub fn spawn_message(rng: &mut impl Rng, item: Item) -> String {
    match rng.random_range(0..4_u8) {
        0 => format!("Need {item}, quick!"),
        1 => format!("Got any {item}?"),
        2 => format!("{item}, no questions asked..."),
        _ => format!("Looking for {item}..."),
    }
}
