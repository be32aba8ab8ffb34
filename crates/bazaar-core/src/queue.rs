//! The queue controller.
//!
//! [`CustomerQueue`] owns every customer in the shop, in arrival order, and
//! drives them only through their public operations. Each step it:
//!
//! 1. Counts down the spawn timer and admits a new customer when due.
//! 2. Advances the line when the front customer has started leaving.
//! 3. Runs the movement pass, highest index first, so removals never
//!    disturb customers not yet processed.
//!
//! # Slots
//!
//! The front slot is the counter. A newcomer joins two columns behind the
//! rearmost target. When the front customer departs, the line moves up at
//! once: the second customer heads for the counter and everyone behind
//! closes up from [`QUEUE_START_X`]. Nobody waits for the leaver to
//! physically clear the floor.
//!
//! # Patience
//!
//! A waiting customer is only stepped once it stands within
//! [`COUNTER_THRESHOLD`] of its own slot, so patience does not drain while
//! it is still walking in.

use bazaar_customers::{Customer, CustomerProfile, StepOutcome};
use bazaar_types::{CustomerId, Item, Position};
use rand::Rng;
use tracing::debug;

use crate::rules::{
    COUNTER_POSITION, COUNTER_THRESHOLD, EXIT_X, INITIAL_SPAWN_DELAY, QUEUE_CAPACITY,
    QUEUE_MOVE_SPEED, QUEUE_SPACING, QUEUE_START_X, SNAP_THRESHOLD, SPAWN_INTERVAL_MAX,
    SPAWN_INTERVAL_MIN, SPAWN_POSITION,
};

/// What the movement pass did this step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueTickReport {
    /// Customers whose patience ran out this step.
    pub abandoned: Vec<CustomerId>,
    /// Customers that walked out of the shop and were removed.
    pub removed: Vec<CustomerId>,
}

/// Ordered collection of customers plus the active-customer handle.
#[derive(Debug, Clone)]
pub struct CustomerQueue {
    /// Customers in arrival order; index 0 is the front.
    customers: Vec<Customer>,
    /// The customer currently selected for service.
    active: Option<CustomerId>,
    /// Seconds until the next spawn.
    spawn_timer: f64,
}

impl CustomerQueue {
    /// An empty shop floor with the opening spawn delay armed.
    pub const fn new() -> Self {
        Self {
            customers: Vec::new(),
            active: None,
            spawn_timer: INITIAL_SPAWN_DELAY,
        }
    }

    // -- queries ------------------------------------------------------------

    /// Number of customers in the shop.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Whether the shop floor is empty.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Customers in queue order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Look up a customer by handle.
    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id() == id)
    }

    /// Look up a customer by handle, mutably.
    pub fn get_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id() == id)
    }

    /// Queue position of a customer.
    pub fn index_of(&self, id: CustomerId) -> Option<usize> {
        self.customers.iter().position(|c| c.id() == id)
    }

    /// Handle of the active customer.
    pub const fn active(&self) -> Option<CustomerId> {
        self.active
    }

    /// Queue position of the active customer.
    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    /// Select a customer for service.
    pub const fn set_active(&mut self, id: Option<CustomerId>) {
        self.active = id;
    }

    /// The first customer, in queue order, that is not leaving.
    pub fn first_waiting(&self) -> Option<&Customer> {
        self.customers.iter().find(|c| !c.is_departing())
    }

    /// The customer with a running haggle round, if any.
    pub fn haggling(&self) -> Option<&Customer> {
        self.customers.iter().find(|c| c.is_haggling())
    }

    /// Whether `customer` stands close enough to the counter to be served.
    pub fn is_at_counter(customer: &Customer) -> bool {
        !customer.is_departing()
            && customer.x_distance_to(COUNTER_POSITION.x) < COUNTER_THRESHOLD
    }

    /// Seconds until the next spawn.
    pub const fn spawn_timer(&self) -> f64 {
        self.spawn_timer
    }

    /// Re-arm the spawn timer with the opening delay.
    pub const fn reset_spawn_timer(&mut self) {
        self.spawn_timer = INITIAL_SPAWN_DELAY;
    }

    // -- spawning -----------------------------------------------------------

    /// Slot a newcomer should head for.
    ///
    /// Leavers head for the exit, so only waiting customers count toward
    /// the rear of the line.
    pub fn entry_target(&self) -> Position {
        self.customers
            .iter()
            .filter(|c| !c.is_departing())
            .map(|c| c.target().x)
            .reduce(f64::max)
            .map_or(COUNTER_POSITION, |rear| {
                Position::new(rear + QUEUE_SPACING, COUNTER_POSITION.y)
            })
    }

    /// Count down the spawn timer and admit a customer when it runs out.
    ///
    /// A full shop leaves the timer expired, so the next free slot is
    /// filled on the following step.
    pub fn tick_spawner(&mut self, rng: &mut impl Rng, dt: f64) -> Option<CustomerId> {
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 || self.customers.len() >= QUEUE_CAPACITY {
            return None;
        }
        let id = self.spawn(rng)?;
        self.spawn_timer = rng.random_range(SPAWN_INTERVAL_MIN..SPAWN_INTERVAL_MAX);
        Some(id)
    }

    /// Create a customer wanting a random catalog item and admit it.
    ///
    /// Returns `None` when the shop is full.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> Option<CustomerId> {
        let idx = rng.random_range(0..Item::ALL.len());
        let item = Item::ALL.get(idx).copied().unwrap_or(Item::CloakingDevice);
        let customer = Customer::create(rng, item, SPAWN_POSITION, self.entry_target());
        self.admit(customer)
    }

    /// Create a customer from an explicit profile and admit it.
    pub fn spawn_with_profile(
        &mut self,
        profile: CustomerProfile,
        item: Item,
    ) -> Option<CustomerId> {
        let customer = Customer::from_profile(profile, item, SPAWN_POSITION, self.entry_target());
        self.admit(customer)
    }

    /// Append a customer at the back of the line.
    ///
    /// Returns `None` (and drops the customer) when the shop is full.
    pub fn admit(&mut self, customer: Customer) -> Option<CustomerId> {
        if self.customers.len() >= QUEUE_CAPACITY {
            return None;
        }
        let id = customer.id();
        debug!(
            customer = %id,
            kind = ?customer.kind(),
            wants = %customer.desired_item(),
            target_x = customer.target().x,
            "customer entered"
        );
        self.customers.push(customer);
        Some(id)
    }

    // -- movement -----------------------------------------------------------

    /// Move the line up if the front customer is leaving.
    pub fn advance_line(&mut self) {
        let front_leaving = self.customers.first().is_some_and(Customer::is_departing);
        if !front_leaving {
            return;
        }
        for (i, customer) in self.customers.iter_mut().enumerate().skip(1) {
            if customer.is_departing() {
                continue;
            }
            let slot = if i == 1 {
                COUNTER_POSITION
            } else {
                #[allow(clippy::cast_precision_loss)]
                let offset = i.saturating_sub(2) as f64 * QUEUE_SPACING;
                Position::new(QUEUE_START_X + offset, COUNTER_POSITION.y)
            };
            customer.retarget(slot);
        }
    }

    /// Run the movement pass for one step of `dt` seconds.
    pub fn update(&mut self, dt: f64) -> QueueTickReport {
        let max_step = QUEUE_MOVE_SPEED * dt;
        let mut report = QueueTickReport::default();
        let mut front_arrived = None;

        for i in (0..self.customers.len()).rev() {
            let Some(customer) = self.customers.get_mut(i) else {
                continue;
            };

            if customer.is_departing() {
                customer.walk_toward(max_step);
                if customer.position().x >= EXIT_X {
                    let gone = self.customers.remove(i);
                    debug!(customer = %gone.id(), "customer left the shop");
                    report.removed.push(gone.id());
                    continue;
                }
                customer.step(dt);
                continue;
            }

            if customer.distance_to_target() > SNAP_THRESHOLD {
                customer.walk_toward(max_step);
            } else {
                customer.snap_to_target();
                if i == 0 && customer.x_distance_to(COUNTER_POSITION.x) < COUNTER_THRESHOLD {
                    front_arrived = Some(customer.id());
                }
            }

            if customer.distance_to_target() < COUNTER_THRESHOLD
                && customer.step(dt) == StepOutcome::Abandoned
            {
                report.abandoned.push(customer.id());
            }
        }

        let before = self.customers.len();
        let mut stragglers = Vec::new();
        self.customers.retain(|c| {
            let inside = c.position().x < EXIT_X;
            if !inside {
                stragglers.push(c.id());
            }
            inside
        });
        if self.customers.len() < before {
            report.removed.extend(stragglers);
        }

        if let Some(id) = front_arrived {
            self.activate_if_free(id);
        }
        if self.active.is_some() && self.active_index().is_none() {
            self.active = None;
        }

        report
    }

    /// Make `id` active unless another waiting customer already is.
    fn activate_if_free(&mut self, id: CustomerId) {
        let holder_waiting = self
            .active
            .and_then(|current| self.get(current))
            .is_some_and(|c| !c.is_departing());
        if !holder_waiting {
            self.active = Some(id);
        }
    }

    /// Promote the first waiting customer if it already stands at the
    /// counter. Returns the promoted handle.
    pub fn promote_next_if_at_counter(&mut self) -> Option<CustomerId> {
        let next = self.first_waiting().filter(|c| Self::is_at_counter(c))?.id();
        self.active = Some(next);
        debug!(customer = %next, "next customer promoted");
        Some(next)
    }

    /// Select the next customer in queue order, wrapping around.
    pub fn cycle_active(&mut self) -> Option<CustomerId> {
        if self.customers.is_empty() {
            return None;
        }
        let next = self
            .active_index()
            .and_then(|i| i.checked_add(1))
            .map_or(0, |i| i.checked_rem(self.customers.len()).unwrap_or(0));
        self.active = self.customers.get(next).map(Customer::id);
        self.active
    }

    /// Empty the shop floor and re-arm the spawn timer.
    pub fn clear(&mut self) {
        self.customers.clear();
        self.active = None;
        self.reset_spawn_timer();
    }
}

impl Default for CustomerQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_types::{CustomerKind, MessageTone};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::rules::STEP_SECS;

    fn patient() -> CustomerProfile {
        CustomerProfile {
            kind: CustomerKind::Crystal,
            patience_limit: 1000.0,
            haggle_propensity: 0.0,
            is_covert: false,
            haggle_rounds: 1,
        }
    }

    fn run(queue: &mut CustomerQueue, seconds: f64) -> QueueTickReport {
        let mut total = QueueTickReport::default();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (seconds / STEP_SECS).round() as u32;
        for _ in 0..steps {
            queue.advance_line();
            let report = queue.update(STEP_SECS);
            total.abandoned.extend(report.abandoned);
            total.removed.extend(report.removed);
        }
        total
    }

    #[test]
    fn first_customer_heads_for_counter() {
        let mut queue = CustomerQueue::new();
        assert_eq!(queue.entry_target(), COUNTER_POSITION);
        let id = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        assert_eq!(queue.get(id).unwrap().target(), COUNTER_POSITION);
        assert_eq!(queue.get(id).unwrap().position(), SPAWN_POSITION);
    }

    #[test]
    fn newcomers_join_behind_rearmost_target() {
        let mut queue = CustomerQueue::new();
        queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let second = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let third = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        assert!((queue.get(second).unwrap().target().x - 38.0).abs() < 1e-9);
        assert!((queue.get(third).unwrap().target().x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn capacity_is_five() {
        let mut queue = CustomerQueue::new();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..5 {
            assert!(queue.spawn(&mut rng).is_some());
        }
        assert!(queue.spawn(&mut rng).is_none());
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn spawner_waits_for_initial_delay() {
        let mut queue = CustomerQueue::new();
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(queue.tick_spawner(&mut rng, 0.15).is_none());
        assert!(queue.tick_spawner(&mut rng, 0.15).is_some());
        let timer = queue.spawn_timer();
        assert!((1.5..1.7).contains(&timer));
    }

    #[test]
    fn spawner_never_exceeds_capacity() {
        let mut queue = CustomerQueue::new();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..3000 {
            queue.tick_spawner(&mut rng, STEP_SECS);
            queue.advance_line();
            queue.update(STEP_SECS);
            assert!(queue.len() <= QUEUE_CAPACITY);
        }
    }

    #[test]
    fn front_customer_arrives_and_becomes_active() {
        let mut queue = CustomerQueue::new();
        let id = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        run(&mut queue, 3.0);
        let customer = queue.get(id).unwrap();
        assert_eq!(customer.position(), COUNTER_POSITION);
        assert!(CustomerQueue::is_at_counter(customer));
        assert_eq!(queue.active(), Some(id));
    }

    #[test]
    fn patience_only_drains_at_slot() {
        let mut queue = CustomerQueue::new();
        let id = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        run(&mut queue, 0.5);
        assert!(queue.get(id).unwrap().elapsed_wait().abs() < f64::EPSILON);
    }

    #[test]
    fn line_advances_when_front_departs() {
        let mut queue = CustomerQueue::new();
        let front = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let second = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let third = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        run(&mut queue, 3.0);

        queue
            .get_mut(front)
            .unwrap()
            .depart("bye", MessageTone::Neutral);
        queue.advance_line();
        assert_eq!(queue.get(second).unwrap().target(), COUNTER_POSITION);
        assert!((queue.get(third).unwrap().target().x - QUEUE_START_X).abs() < 1e-9);
    }

    #[test]
    fn departing_customers_are_removed_at_exit() {
        let mut queue = CustomerQueue::new();
        let id = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        run(&mut queue, 3.0);
        queue
            .get_mut(id)
            .unwrap()
            .depart("bye", MessageTone::Neutral);
        let report = run(&mut queue, 5.0);
        assert_eq!(report.removed, vec![id]);
        assert!(queue.is_empty());
        assert_eq!(queue.active(), None);
    }

    #[test]
    fn impatient_customer_abandons_once() {
        let mut queue = CustomerQueue::new();
        let mut profile = patient();
        profile.patience_limit = 2.0;
        let id = queue.spawn_with_profile(profile, Item::FakeId).unwrap();
        let report = run(&mut queue, 10.0);
        assert_eq!(report.abandoned, vec![id]);
        assert_eq!(report.removed, vec![id]);
    }

    #[test]
    fn promotion_requires_counter_position() {
        let mut queue = CustomerQueue::new();
        let front = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let second = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        run(&mut queue, 3.0);
        queue
            .get_mut(front)
            .unwrap()
            .depart("bye", MessageTone::Neutral);
        assert_eq!(queue.promote_next_if_at_counter(), None);
        run(&mut queue, 0.5);
        assert_eq!(queue.promote_next_if_at_counter(), Some(second));
    }

    #[test]
    fn newcomer_behind_a_leaver_joins_the_line() {
        let mut queue = CustomerQueue::new();
        queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let mut hasty = patient();
        hasty.patience_limit = 0.5;
        let leaver = queue.spawn_with_profile(hasty, Item::FakeId).unwrap();
        let report = run(&mut queue, 2.6);
        assert_eq!(report.abandoned, vec![leaver]);
        assert!(queue.get(leaver).is_some_and(Customer::is_departing));

        let newcomer = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let target = queue.get(newcomer).unwrap().target();
        assert!((target.x - 38.0).abs() < 1e-9);

        let report = run(&mut queue, 1.0);
        assert!(!report.removed.contains(&newcomer));
        let customer = queue.get(newcomer).unwrap();
        assert!(!customer.is_departing());
        assert!(customer.position().x < EXIT_X);
    }

    #[test]
    fn newcomer_heads_for_counter_when_everyone_is_leaving() {
        let mut queue = CustomerQueue::new();
        let front = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        queue
            .get_mut(front)
            .unwrap()
            .depart("bye", MessageTone::Neutral);
        assert_eq!(queue.entry_target(), COUNTER_POSITION);
    }

    #[test]
    fn tab_selection_survives_front_arrival() {
        let mut queue = CustomerQueue::new();
        let front = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let second = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        assert_eq!(queue.cycle_active(), Some(front));
        assert_eq!(queue.cycle_active(), Some(second));

        run(&mut queue, 3.0);
        assert!(CustomerQueue::is_at_counter(queue.get(front).unwrap()));
        assert_eq!(queue.active(), Some(second));
        assert_eq!(queue.active_index(), Some(1));
    }

    #[test]
    fn front_arrival_replaces_a_departed_selection() {
        let mut queue = CustomerQueue::new();
        let front = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let second = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        queue.set_active(Some(second));
        queue
            .get_mut(second)
            .unwrap()
            .depart("bye", MessageTone::Neutral);

        run(&mut queue, 3.0);
        assert_eq!(queue.active(), Some(front));
    }

    #[test]
    fn tab_cycles_through_queue() {
        let mut queue = CustomerQueue::new();
        let a = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        let b = queue.spawn_with_profile(patient(), Item::FakeId).unwrap();
        assert_eq!(queue.cycle_active(), Some(a));
        assert_eq!(queue.cycle_active(), Some(b));
        assert_eq!(queue.cycle_active(), Some(a));
    }

    #[test]
    fn clear_resets_everything() {
        let mut queue = CustomerQueue::new();
        let mut rng = SmallRng::seed_from_u64(4);
        queue.spawn(&mut rng);
        queue.cycle_active();
        queue.tick_spawner(&mut rng, 5.0);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.active(), None);
        assert!((queue.spawn_timer() - INITIAL_SPAWN_DELAY).abs() < f64::EPSILON);
    }
}
