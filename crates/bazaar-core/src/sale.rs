//! The sale resolver.
//!
//! [`SaleDesk`] turns a SPACE press (or a haggle key) into economic
//! consequences. It borrows the economy, the shelves, and the flash board
//! for the duration of one call and reports what happened as a
//! [`SaleOutcome`] or [`HaggleResolution`]. Nothing here is an error:
//! rejected sales are ordinary outcomes.
//!
//! # Attempt order
//!
//! 1. The first waiting customer becomes active.
//! 2. It must stand at the counter.
//! 3. The offered item must be the one it wants (else a penalty).
//! 4. The item must be on the shelf.
//! 5. With more than half its patience left, a haggle may start instead.
//! 6. Otherwise the sale completes at the negotiated price.
//!
//! After every resolution the next customer is promoted if it already
//! stands at the counter.

use bazaar_customers::{HaggleResult, LOST_MESSAGE, StockKeeper};
use bazaar_ledger::Economy;
use bazaar_types::{ColorClass, CustomerId, FlashTarget, HaggleKey, Item, MessageTone};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::effects::FlashBoard;
use crate::queue::CustomerQueue;
use crate::rules::{
    COUNTER_POSITION, COUNTER_THRESHOLD, FAILED_HAGGLE_REPUTATION, HAGGLE_PATIENCE_GATE,
    SALE_REPUTATION, WRONG_ITEM_REPUTATION,
};

/// Result of one sale attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    /// Nobody is waiting to be served.
    NoCustomer,
    /// No item is selected.
    NoItemSelected {
        /// The customer that would have been served.
        customer: CustomerId,
    },
    /// A haggle is already running; the attempt is ignored.
    HaggleInProgress {
        /// The customer haggling.
        customer: CustomerId,
    },
    /// The customer has not reached the counter yet.
    NotAtCounter {
        /// The customer still walking in.
        customer: CustomerId,
        /// Horizontal distance from the counter.
        distance: f64,
    },
    /// The customer was offered the wrong item and penalised.
    WrongItem {
        /// The customer offered the item.
        customer: CustomerId,
        /// What was offered.
        offered: Item,
        /// What the customer wants.
        wanted: Item,
    },
    /// The right item, but none on the shelf.
    OutOfStock {
        /// The customer left waiting.
        customer: CustomerId,
        /// The missing item.
        item: Item,
    },
    /// The customer wants to haggle first.
    HaggleStarted {
        /// The customer haggling.
        customer: CustomerId,
        /// Key required by the opening round.
        key: HaggleKey,
        /// Rounds to play.
        rounds: u32,
    },
    /// The sale completed.
    Sold {
        /// The customer served.
        customer: CustomerId,
        /// The item sold.
        item: Item,
        /// Price credited.
        price: u32,
    },
}

/// Result of feeding one step into the running haggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HaggleResolution {
    /// No haggle is running.
    Idle,
    /// No decision yet; the round timer moved.
    Pending {
        /// The customer haggling.
        customer: CustomerId,
    },
    /// Round won, another begins.
    Continued {
        /// The customer haggling.
        customer: CustomerId,
        /// Rounds still to play.
        remaining_rounds: u32,
        /// Key required by the new round.
        next_key: HaggleKey,
    },
    /// Haggle won; the sale completed.
    Won {
        /// The customer served.
        customer: CustomerId,
        /// Price credited.
        price: u32,
    },
    /// Haggle lost; the customer leaves without buying.
    Lost {
        /// The customer leaving.
        customer: CustomerId,
        /// Whether the round ran out of time.
        timed_out: bool,
    },
}

/// Borrowed view of everything a sale touches.
pub struct SaleDesk<'a> {
    /// Money and reputation.
    pub economy: &'a mut dyn Economy,
    /// The shelves.
    pub stock: &'a mut dyn StockKeeper,
    /// UI flash indicators.
    pub flashes: &'a mut FlashBoard,
}

impl SaleDesk<'_> {
    /// Try to sell `selected` to the first waiting customer.
    pub fn attempt_sale(
        &mut self,
        queue: &mut CustomerQueue,
        selected: Option<Item>,
        rng: &mut impl Rng,
    ) -> SaleOutcome {
        if let Some(haggler) = queue.haggling() {
            return SaleOutcome::HaggleInProgress {
                customer: haggler.id(),
            };
        }
        let Some(id) = queue.first_waiting().map(bazaar_customers::Customer::id) else {
            return SaleOutcome::NoCustomer;
        };
        queue.set_active(Some(id));

        let Some(offered) = selected else {
            return SaleOutcome::NoItemSelected { customer: id };
        };
        let Some(customer) = queue.get_mut(id) else {
            return SaleOutcome::NoCustomer;
        };

        let distance = customer.x_distance_to(COUNTER_POSITION.x);
        if distance > COUNTER_THRESHOLD {
            debug!(customer = %id, distance, "sale blocked: customer not at counter");
            return SaleOutcome::NotAtCounter {
                customer: id,
                distance,
            };
        }

        let wanted = customer.desired_item();
        if offered != wanted {
            customer.penalize_wrong_item();
            self.economy
                .adjust_reputation(WRONG_ITEM_REPUTATION, "wrong item offered");
            self.flashes.flash(FlashTarget::Reputation, ColorClass::Red);
            debug!(customer = %id, offered = %offered, wanted = %wanted, "sale blocked: wrong item");
            queue.promote_next_if_at_counter();
            return SaleOutcome::WrongItem {
                customer: id,
                offered,
                wanted,
            };
        }

        if !self.stock.has_stock(offered) {
            debug!(customer = %id, item = %offered, "sale blocked: out of stock");
            return SaleOutcome::OutOfStock {
                customer: id,
                item: offered,
            };
        }

        let wants_haggle = customer.patience_fraction() > HAGGLE_PATIENCE_GATE
            && !customer.is_haggling()
            && rng.random::<f64>() < customer.haggle_propensity()
            && customer.remaining_haggle_rounds() > 0;
        if wants_haggle {
            let rounds = customer.remaining_haggle_rounds();
            match customer.begin_haggle_round(rng) {
                Ok(challenge) => {
                    let key = challenge.required_key;
                    info!(customer = %id, key = %key, rounds, "haggle started");
                    return SaleOutcome::HaggleStarted {
                        customer: id,
                        key,
                        rounds,
                    };
                }
                Err(err) => warn!(customer = %id, error = %err, "haggle could not start"),
            }
        }

        let price = self.complete_sale(queue, id, offered);
        SaleOutcome::Sold {
            customer: id,
            item: offered,
            price,
        }
    }

    /// Feed this step's haggle key (or none) into the running haggle.
    pub fn resolve_haggle(
        &mut self,
        queue: &mut CustomerQueue,
        key: Option<HaggleKey>,
        dt: f64,
        rng: &mut impl Rng,
    ) -> HaggleResolution {
        let Some(id) = queue.haggling().map(bazaar_customers::Customer::id) else {
            return HaggleResolution::Idle;
        };
        let Some(customer) = queue.get_mut(id) else {
            return HaggleResolution::Idle;
        };
        let item = customer.desired_item();

        match customer.resolve_haggle_input(rng, dt, key) {
            Ok(HaggleResult::Pending) => HaggleResolution::Pending { customer: id },
            Ok(HaggleResult::Continue {
                remaining_rounds,
                next_key,
            }) => {
                debug!(customer = %id, remaining_rounds, next_key = %next_key, "haggle round won");
                HaggleResolution::Continued {
                    customer: id,
                    remaining_rounds,
                    next_key,
                }
            }
            Ok(HaggleResult::Won { price_multiplier }) => {
                info!(customer = %id, price_multiplier, "haggle won");
                let price = self.complete_sale(queue, id, item);
                HaggleResolution::Won {
                    customer: id,
                    price,
                }
            }
            Ok(HaggleResult::Lost {
                price_multiplier,
                timed_out,
            }) => {
                info!(customer = %id, price_multiplier, timed_out, "haggle lost");
                self.fail_sale(queue, id);
                HaggleResolution::Lost {
                    customer: id,
                    timed_out,
                }
            }
            Err(err) => {
                warn!(customer = %id, error = %err, "haggle input rejected");
                HaggleResolution::Idle
            }
        }
    }

    /// Credit the sale, send the customer off happy, promote the next one.
    fn complete_sale(&mut self, queue: &mut CustomerQueue, id: CustomerId, item: Item) -> u32 {
        let Some(customer) = queue.get_mut(id) else {
            return 0;
        };
        let price = customer.negotiated_price();
        customer.mark_sold();

        if let Err(err) = self.stock.consume(item) {
            warn!(customer = %id, item = %item, error = %err, "stock not deducted");
        }
        if let Err(err) = self.economy.credit(item, price) {
            warn!(customer = %id, item = %item, price, error = %err, "sale not credited");
        }
        self.economy.adjust_reputation(SALE_REPUTATION, "sale");
        self.flashes.flash(FlashTarget::Money, ColorClass::Green);
        self.flashes.flash(FlashTarget::Reputation, ColorClass::Green);

        info!(customer = %id, item = %item, price, "sale completed");
        queue.promote_next_if_at_counter();
        price
    }

    /// Penalise the failed haggle and send the customer away.
    fn fail_sale(&mut self, queue: &mut CustomerQueue, id: CustomerId) {
        if let Some(customer) = queue.get_mut(id) {
            customer.depart(LOST_MESSAGE, MessageTone::Negative);
        }
        self.economy
            .adjust_reputation(FAILED_HAGGLE_REPUTATION, "failed haggle");
        self.economy.record_failed_customer();
        self.flashes.flash(FlashTarget::Reputation, ColorClass::Red);
        self.flashes.flash(FlashTarget::Screen, ColorClass::Red);
        queue.promote_next_if_at_counter();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_customers::{CustomerProfile, ShopInventory, UnlimitedStock};
    use bazaar_ledger::ShopLedger;
    use bazaar_types::CustomerKind;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rust_decimal::Decimal;

    use super::*;
    use crate::rules::STEP_SECS;

    fn profile(propensity: f64, rounds: u32) -> CustomerProfile {
        CustomerProfile {
            kind: CustomerKind::Tentacle,
            patience_limit: 1000.0,
            haggle_propensity: propensity,
            is_covert: false,
            haggle_rounds: rounds,
        }
    }

    fn settle(queue: &mut CustomerQueue) {
        for _ in 0..90 {
            queue.advance_line();
            queue.update(STEP_SECS);
        }
    }

    fn queue_with(propensity: f64, rounds: u32, item: Item) -> (CustomerQueue, CustomerId) {
        let mut queue = CustomerQueue::new();
        let id = queue.spawn_with_profile(profile(propensity, rounds), item).unwrap();
        settle(&mut queue);
        (queue, id)
    }

    #[test]
    fn empty_shop_has_no_customer() {
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut desk = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        };
        let mut queue = CustomerQueue::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            desk.attempt_sale(&mut queue, Some(Item::FakeId), &mut rng),
            SaleOutcome::NoCustomer
        );
    }

    #[test]
    fn customer_walking_in_cannot_buy() {
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut queue = CustomerQueue::new();
        let id = queue
            .spawn_with_profile(profile(0.0, 1), Item::FakeId)
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        let outcome = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, Some(Item::FakeId), &mut rng);
        assert!(matches!(outcome, SaleOutcome::NotAtCounter { customer, .. } if customer == id));
        assert_eq!(ledger.money(), Decimal::from(1000));
    }

    #[test]
    fn plain_sale_credits_full_price_once() {
        let (mut queue, id) = queue_with(0.0, 1, Item::CloakingDevice);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, Some(Item::CloakingDevice), &mut rng);
        assert_eq!(
            outcome,
            SaleOutcome::Sold {
                customer: id,
                item: Item::CloakingDevice,
                price: 100
            }
        );
        assert_eq!(ledger.money(), Decimal::from(1100));
        assert_eq!(ledger.reputation(), 51);
        assert!(queue.get(id).unwrap().is_departing());
        assert_eq!(flashes.color_of(FlashTarget::Money), Some(ColorClass::Green));
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let (mut queue, id) = queue_with(0.0, 1, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let outcome = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, None, &mut rng);
        assert_eq!(outcome, SaleOutcome::NoItemSelected { customer: id });
        assert!(!queue.get(id).unwrap().is_departing());
    }

    #[test]
    fn wrong_item_costs_reputation_and_patience() {
        let (mut queue, id) = queue_with(0.0, 1, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(10);
        let outcome = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, Some(Item::QuantumDice), &mut rng);
        assert_eq!(
            outcome,
            SaleOutcome::WrongItem {
                customer: id,
                offered: Item::QuantumDice,
                wanted: Item::FakeId
            }
        );
        let customer = queue.get(id).unwrap();
        assert!(!customer.is_departing());
        assert!((customer.patience_limit() - 500.0).abs() < f64::EPSILON);
        assert_eq!(ledger.reputation(), 48);
        assert_eq!(ledger.money(), Decimal::from(1000));
        assert_eq!(flashes.color_of(FlashTarget::Reputation), Some(ColorClass::Red));
    }

    #[test]
    fn out_of_stock_keeps_customer_waiting() {
        let (mut queue, id) = queue_with(0.0, 1, Item::QuantumDice);
        let mut ledger = ShopLedger::new();
        let mut stock = ShopInventory::default();
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let outcome = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, Some(Item::QuantumDice), &mut rng);
        assert_eq!(
            outcome,
            SaleOutcome::OutOfStock {
                customer: id,
                item: Item::QuantumDice
            }
        );
        assert!(!queue.get(id).unwrap().is_departing());
        assert_eq!(ledger.reputation(), 50);
    }

    #[test]
    fn counted_sale_consumes_stock() {
        let (mut queue, _) = queue_with(0.0, 1, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = ShopInventory::default();
        stock.add(Item::FakeId, 2).unwrap();
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(6);
        SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .attempt_sale(&mut queue, Some(Item::FakeId), &mut rng);
        assert_eq!(stock.count(Item::FakeId), 1);
    }

    #[test]
    fn haggle_won_credits_once() {
        let (mut queue, id) = queue_with(1.0, 1, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut desk = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        };
        let SaleOutcome::HaggleStarted { key, rounds, .. } =
            desk.attempt_sale(&mut queue, Some(Item::FakeId), &mut rng)
        else {
            panic!("expected haggle");
        };
        assert_eq!(rounds, 1);
        assert_eq!(
            desk.attempt_sale(&mut queue, Some(Item::FakeId), &mut rng),
            SaleOutcome::HaggleInProgress { customer: id }
        );
        let resolution = desk.resolve_haggle(&mut queue, Some(key), STEP_SECS, &mut rng);
        assert_eq!(
            resolution,
            HaggleResolution::Won {
                customer: id,
                price: 100
            }
        );
        assert_eq!(ledger.money(), Decimal::from(1100));
        assert_eq!(ledger.stats().sales_made, 1);
    }

    #[test]
    fn haggle_timeout_fails_the_sale() {
        let (mut queue, id) = queue_with(1.0, 2, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(8);
        let mut desk = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        };
        desk.attempt_sale(&mut queue, Some(Item::FakeId), &mut rng);
        let mut last = HaggleResolution::Idle;
        for _ in 0..90 {
            last = desk.resolve_haggle(&mut queue, None, STEP_SECS, &mut rng);
            if !matches!(last, HaggleResolution::Pending { .. }) {
                break;
            }
        }
        assert_eq!(
            last,
            HaggleResolution::Lost {
                customer: id,
                timed_out: true
            }
        );
        assert!(queue.get(id).unwrap().is_departing());
        assert_eq!(ledger.reputation(), 45);
        assert_eq!(ledger.money(), Decimal::from(1000));
        assert_eq!(ledger.stats().customers_failed, 1);
        assert_eq!(flashes.color_of(FlashTarget::Screen), Some(ColorClass::Red));
    }

    #[test]
    fn resolve_without_haggle_is_idle() {
        let (mut queue, _) = queue_with(0.0, 1, Item::FakeId);
        let mut ledger = ShopLedger::new();
        let mut stock = UnlimitedStock;
        let mut flashes = FlashBoard::new();
        let mut rng = SmallRng::seed_from_u64(9);
        let resolution = SaleDesk {
            economy: &mut ledger,
            stock: &mut stock,
            flashes: &mut flashes,
        }
        .resolve_haggle(&mut queue, Some(HaggleKey::Z), STEP_SECS, &mut rng);
        assert_eq!(resolution, HaggleResolution::Idle);
    }
}
