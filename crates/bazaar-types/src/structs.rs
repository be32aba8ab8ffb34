//! Core data structs shared between the simulation and its consumers.
//!
//! The renderer never touches live entities; it receives a [`ShopSnapshot`]
//! each frame. Everything in this module is plain data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    ColorClass, CustomerKind, FlashTarget, HaggleKey, Item, LedgerEntryKind, MessageTone,
    TradingPhase,
};
use crate::ids::{CustomerId, LedgerEntryId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point on the shop floor, in character-grid units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column (grows toward the street entrance).
    pub x: f64,
    /// Row.
    pub y: f64,
}

impl Position {
    /// Construct a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move toward `target` by at most `max_step`.
    ///
    /// Returns `target` exactly when it is within reach, so repeated calls
    /// never overshoot or oscillate.
    pub fn step_toward(self, target: Self, max_step: f64) -> Self {
        let distance = self.distance_to(target);
        if distance <= max_step || distance <= f64::EPSILON {
            return target;
        }
        let ratio = max_step / distance;
        Self {
            x: self.x + (target.x - self.x) * ratio,
            y: self.y + (target.y - self.y) * ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// Haggling
// ---------------------------------------------------------------------------

/// One timed key-match round of a haggle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HaggleChallenge {
    /// The key the shopkeeper must press.
    pub required_key: HaggleKey,
    /// Seconds allowed for the round.
    pub time_limit: f64,
    /// Seconds left before the round times out.
    pub time_left: f64,
    /// Fraction knocked off the price if the round is lost.
    pub price_cut_fraction: f64,
}

// ---------------------------------------------------------------------------
// Render snapshot
// ---------------------------------------------------------------------------

/// Read-only view of one customer for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerView {
    /// Customer handle.
    pub id: CustomerId,
    /// Variant of the customer.
    pub kind: CustomerKind,
    /// Current position on the shop floor.
    pub position: Position,
    /// Glyph to draw.
    pub display_symbol: char,
    /// Colour class for the glyph.
    pub color_class: ColorClass,
    /// Whether the customer is heading for the exit.
    pub is_departing: bool,
    /// Whether the customer is standing at the counter.
    pub is_at_counter: bool,
    /// The item this customer is asking for.
    pub desired_item: Item,
    /// Speech bubble text.
    pub message: String,
    /// Tone of the speech bubble.
    pub message_tone: MessageTone,
    /// Patience left, `1 - elapsed / limit`, clamped to `[0, 1]`.
    pub patience_fraction: f64,
    /// Colour of the patience bar.
    pub patience_color: ColorClass,
    /// Key requested by the running haggle round, if any.
    pub haggle_key: Option<HaggleKey>,
    /// Seconds left in the running haggle round, if any.
    pub haggle_time_left: Option<f64>,
}

/// A short-lived highlight drawn over part of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlashIndicator {
    /// What is flashing.
    pub target: FlashTarget,
    /// Flash colour.
    pub color: ColorClass,
    /// Seconds until the flash ends.
    pub remaining: f64,
}

/// Stock on hand for one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StockLevel {
    /// The item.
    pub item: Item,
    /// Units on hand, or `None` when stock never runs out.
    pub quantity: Option<u32>,
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShopSnapshot {
    /// Simulation step that produced this snapshot.
    pub tick: u64,
    /// Customers in queue order (index 0 is the front).
    pub customers: Vec<CustomerView>,
    /// Index of the active (selectable) customer, if any.
    pub active_index: Option<usize>,
    /// Item currently selected by the shopkeeper.
    pub selected_item: Option<Item>,
    /// Money on hand.
    #[ts(as = "String")]
    pub money: Decimal,
    /// Current day number (1-based).
    pub day: u32,
    /// Shop reputation.
    pub reputation: i64,
    /// Time left in the trading window, formatted `m:ss`.
    pub time_display: String,
    /// Phase of the day.
    pub phase: TradingPhase,
    /// Stock levels in catalog order.
    pub stock: Vec<StockLevel>,
    /// Active flash indicators.
    pub flashes: Vec<FlashIndicator>,
    /// Summary of the most recently closed day, shown at end of day.
    pub last_summary: Option<DaySummary>,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// Running counters for the current trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DayStats {
    /// Sales completed.
    pub sales_made: u32,
    /// Money taken in from sales.
    #[ts(as = "String")]
    pub money_earned: Decimal,
    /// Customers who left with what they wanted.
    pub customers_served: u32,
    /// Customers who left without a sale.
    pub customers_failed: u32,
}

/// Totals reported when a trading day closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DaySummary {
    /// The day that closed.
    pub day: u32,
    /// Sales completed.
    pub sales_made: u32,
    /// Money taken in from sales.
    #[ts(as = "String")]
    pub money_earned: Decimal,
    /// Interest paid on the debt at close.
    #[ts(as = "String")]
    pub interest_paid: Decimal,
    /// Customers who left with what they wanted.
    pub customers_served: u32,
    /// Customers who left without a sale.
    pub customers_failed: u32,
    /// `money_earned - interest_paid`.
    #[ts(as = "String")]
    pub net_profit: Decimal,
}

/// One append-only ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Entry identifier.
    pub id: LedgerEntryId,
    /// Day on which the entry was recorded.
    pub day: u32,
    /// Category of the entry.
    pub kind: LedgerEntryKind,
    /// Signed amount: money for sales and interest, points for reputation.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Short reason, e.g. `"sale: Fake ID"`.
    pub reason: String,
}
