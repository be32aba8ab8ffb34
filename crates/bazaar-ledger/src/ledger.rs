//! The shop ledger: balances, per-day counters, and an append-only log.
//!
//! [`ShopLedger`] holds the shop's money, reputation, and debt, the running
//! [`DayStats`] for the current day, and every [`LedgerEntry`] recorded so
//! far.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Precision**: money and debt use [`Decimal`], never floating point.
//! - **Day boundary**: [`ShopLedger::close_day`] charges interest and
//!   produces the [`DaySummary`]; [`ShopLedger::begin_day`] resets the
//!   counters for the next day.

use bazaar_types::{DayStats, DaySummary, Item, LedgerEntry, LedgerEntryId, LedgerEntryKind};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::economy::Economy;
use crate::interest::interest_due;
use crate::LedgerError;

/// Money on hand when a new shop opens.
pub const STARTING_MONEY: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Reputation when a new shop opens.
pub const STARTING_REPUTATION: i64 = 50;

/// Debt owed when a new shop opens.
pub const STARTING_DEBT: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// Daily interest rate on the debt (10%).
pub const INTEREST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Balances and bookkeeping for one shop.
#[derive(Debug, Clone, Serialize)]
pub struct ShopLedger {
    /// Day the counters belong to (1-based).
    day: u32,
    /// Money on hand. May go negative after interest.
    money: Decimal,
    /// Shop reputation.
    reputation: i64,
    /// Outstanding debt.
    debt: Decimal,
    /// Daily interest rate.
    interest_rate: Decimal,
    /// Counters for the current day.
    stats: DayStats,
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
    /// Summaries of every closed day, oldest first.
    summaries: Vec<DaySummary>,
}

impl ShopLedger {
    /// Open a shop with the standard starting balances on day 1.
    pub const fn new() -> Self {
        Self::with_balances(STARTING_MONEY, STARTING_REPUTATION, STARTING_DEBT, INTEREST_RATE)
    }

    /// Open a shop with explicit starting balances on day 1.
    pub const fn with_balances(
        money: Decimal,
        reputation: i64,
        debt: Decimal,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            day: 1,
            money,
            reputation,
            debt,
            interest_rate,
            stats: DayStats {
                sales_made: 0,
                money_earned: Decimal::ZERO,
                customers_served: 0,
                customers_failed: 0,
            },
            entries: Vec::new(),
            summaries: Vec::new(),
        }
    }

    /// Current day number.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Money on hand.
    pub const fn money(&self) -> Decimal {
        self.money
    }

    /// Shop reputation.
    pub const fn reputation(&self) -> i64 {
        self.reputation
    }

    /// Outstanding debt.
    pub const fn debt(&self) -> Decimal {
        self.debt
    }

    /// Counters for the current day.
    pub const fn stats(&self) -> &DayStats {
        &self.stats
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries recorded on `day`.
    pub fn entries_for_day(&self, day: u32) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.day == day).collect()
    }

    /// Summaries of every closed day, oldest first.
    pub fn summaries(&self) -> &[DaySummary] {
        &self.summaries
    }

    /// Start counting for `day`. Balances carry over.
    pub fn begin_day(&mut self, day: u32) {
        self.day = day;
        self.stats = DayStats::default();
        debug!(day, "ledger day opened");
    }

    /// Close the current day: charge interest and summarise.
    ///
    /// Interest is `ceil(debt * rate)`; it is added to the debt and paid
    /// out of money on hand.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ArithmeticOverflow`] if a balance overflows.
    pub fn close_day(&mut self) -> Result<DaySummary, LedgerError> {
        let due = interest_due(self.debt, self.interest_rate)?;
        self.debt = self
            .debt
            .checked_add(due)
            .ok_or_else(|| overflow("debt + interest"))?;
        self.money = self
            .money
            .checked_sub(due)
            .ok_or_else(|| overflow("money - interest"))?;
        self.push_entry(LedgerEntryKind::InterestPayment, -due, String::from("daily interest"));

        let net_profit = self
            .stats
            .money_earned
            .checked_sub(due)
            .ok_or_else(|| overflow("earned - interest"))?;
        let summary = DaySummary {
            day: self.day,
            sales_made: self.stats.sales_made,
            money_earned: self.stats.money_earned,
            interest_paid: due,
            customers_served: self.stats.customers_served,
            customers_failed: self.stats.customers_failed,
            net_profit,
        };
        self.summaries.push(summary.clone());

        info!(
            day = summary.day,
            sales = summary.sales_made,
            earned = %summary.money_earned,
            interest = %due,
            net = %summary.net_profit,
            money = %self.money,
            debt = %self.debt,
            "day closed"
        );

        Ok(summary)
    }

    fn push_entry(&mut self, kind: LedgerEntryKind, amount: Decimal, reason: String) {
        self.entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            day: self.day,
            kind,
            amount,
            reason,
        });
    }
}

impl Default for ShopLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn overflow(context: &str) -> LedgerError {
    LedgerError::ArithmeticOverflow {
        context: String::from(context),
    }
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

impl Economy for ShopLedger {
    fn credit(&mut self, item: Item, amount: u32) -> Result<(), LedgerError> {
        let amount = Decimal::from(amount);
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount { amount });
        }
        self.money = self
            .money
            .checked_add(amount)
            .ok_or_else(|| overflow("money + sale"))?;
        self.stats.money_earned = self
            .stats
            .money_earned
            .checked_add(amount)
            .ok_or_else(|| overflow("day earnings + sale"))?;
        self.stats.sales_made = self.stats.sales_made.saturating_add(1);
        self.stats.customers_served = self.stats.customers_served.saturating_add(1);
        self.push_entry(LedgerEntryKind::SaleCredit, amount, format!("sale: {item}"));
        debug!(item = %item, amount = %amount, money = %self.money, "sale credited");
        Ok(())
    }

    fn adjust_reputation(&mut self, delta: i64, reason: &str) {
        self.reputation = self.reputation.saturating_add(delta);
        self.push_entry(LedgerEntryKind::Reputation, Decimal::from(delta), String::from(reason));
        debug!(delta, reason, reputation = self.reputation, "reputation adjusted");
    }

    fn record_failed_customer(&mut self) {
        self.stats.customers_failed = self.stats.customers_failed.saturating_add(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_shop_balances() {
        let ledger = ShopLedger::new();
        assert_eq!(ledger.day(), 1);
        assert_eq!(ledger.money(), Decimal::from(1000));
        assert_eq!(ledger.reputation(), 50);
        assert_eq!(ledger.debt(), Decimal::from(2000));
        assert!(ledger.entries().is_empty());
        assert_eq!(INTEREST_RATE, Decimal::new(1, 1));
    }

    #[test]
    fn credit_updates_money_and_stats() {
        let mut ledger = ShopLedger::new();
        ledger.credit(Item::FakeId, 80).unwrap();
        assert_eq!(ledger.money(), Decimal::from(1080));
        assert_eq!(ledger.stats().sales_made, 1);
        assert_eq!(ledger.stats().customers_served, 1);
        assert_eq!(ledger.stats().money_earned, Decimal::from(80));
        let entry = ledger.entries().first().unwrap();
        assert_eq!(entry.kind, LedgerEntryKind::SaleCredit);
        assert_eq!(entry.reason, "sale: Fake ID");
    }

    #[test]
    fn zero_credit_is_rejected() {
        let mut ledger = ShopLedger::new();
        assert_eq!(
            ledger.credit(Item::FakeId, 0),
            Err(LedgerError::NonPositiveAmount {
                amount: Decimal::ZERO
            })
        );
        assert_eq!(ledger.money(), Decimal::from(1000));
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn reputation_moves_both_ways() {
        let mut ledger = ShopLedger::new();
        ledger.adjust_reputation(-5, "failed haggle");
        ledger.adjust_reputation(1, "sale");
        assert_eq!(ledger.reputation(), 46);
        assert_eq!(ledger.entries().len(), 2);
    }

    #[test]
    fn failed_customers_are_counted() {
        let mut ledger = ShopLedger::new();
        ledger.record_failed_customer();
        ledger.record_failed_customer();
        assert_eq!(ledger.stats().customers_failed, 2);
        assert_eq!(ledger.money(), Decimal::from(1000));
    }

    #[test]
    fn close_day_charges_interest() {
        let mut ledger = ShopLedger::new();
        ledger.credit(Item::CloakingDevice, 100).unwrap();
        let summary = ledger.close_day().unwrap();
        assert_eq!(summary.day, 1);
        assert_eq!(summary.interest_paid, Decimal::from(200));
        assert_eq!(summary.money_earned, Decimal::from(100));
        assert_eq!(summary.net_profit, Decimal::from(-100));
        assert_eq!(ledger.debt(), Decimal::from(2200));
        assert_eq!(ledger.money(), Decimal::from(900));
        assert_eq!(ledger.summaries().len(), 1);
    }

    #[test]
    fn interest_compounds_across_days() {
        let mut ledger = ShopLedger::new();
        ledger.close_day().unwrap();
        ledger.begin_day(2);
        let summary = ledger.close_day().unwrap();
        assert_eq!(summary.day, 2);
        assert_eq!(summary.interest_paid, Decimal::from(220));
        assert_eq!(ledger.debt(), Decimal::from(2420));
    }

    #[test]
    fn begin_day_resets_counters_only() {
        let mut ledger = ShopLedger::new();
        ledger.credit(Item::QuantumDice, 100).unwrap();
        ledger.begin_day(2);
        assert_eq!(ledger.stats(), &DayStats::default());
        assert_eq!(ledger.money(), Decimal::from(1100));
        assert_eq!(ledger.entries_for_day(1).len(), 1);
        assert!(ledger.entries_for_day(2).is_empty());
    }

    #[test]
    fn ledger_serializes() {
        let mut ledger = ShopLedger::new();
        ledger.credit(Item::FakeId, 100).unwrap();
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.contains("\"reputation\":50"));
    }
}
