//! Stock keeping behind the sale path.
//!
//! The sale resolver only asks two questions of the shop's shelves: is the
//! item on hand, and take one off. [`StockKeeper`] is that boundary.
//! Two policies ship with the crate:
//!
//! - [`UnlimitedStock`] never runs out (the default game rules)
//! - [`ShopInventory`] counts units per item and rejects sales once empty
//!
//! All counting uses checked arithmetic.

use std::collections::BTreeMap;

use bazaar_types::{Item, StockLevel};

use crate::error::StockError;

/// Default number of distinct item lines a counted inventory can hold.
pub const DEFAULT_ITEM_LINES: usize = 20;

/// Shelf access used by the sale resolver.
pub trait StockKeeper: Send + std::fmt::Debug {
    /// Whether at least one unit of `item` is on hand.
    fn has_stock(&self, item: Item) -> bool;

    /// Take one unit of `item` off the shelf.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::OutOfStock`] when none are left.
    fn consume(&mut self, item: Item) -> Result<(), StockError>;

    /// Units on hand, or `None` when stock is not counted.
    fn quantity(&self, item: Item) -> Option<u32>;

    /// Stock levels for every catalog item, in catalog order.
    fn levels(&self) -> Vec<StockLevel> {
        Item::ALL
            .iter()
            .map(|&item| StockLevel {
                item,
                quantity: self.quantity(item),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Unlimited
// ---------------------------------------------------------------------------

/// Shelves that never empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedStock;

impl StockKeeper for UnlimitedStock {
    fn has_stock(&self, _item: Item) -> bool {
        true
    }

    fn consume(&mut self, _item: Item) -> Result<(), StockError> {
        Ok(())
    }

    fn quantity(&self, _item: Item) -> Option<u32> {
        None
    }
}

// ---------------------------------------------------------------------------
// Counted
// ---------------------------------------------------------------------------

/// Counted shelves with a cap on distinct item lines.
#[derive(Debug, Clone)]
pub struct ShopInventory {
    capacity: usize,
    items: BTreeMap<Item, u32>,
}

impl ShopInventory {
    /// Create an empty inventory holding at most `capacity` item lines.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: BTreeMap::new(),
        }
    }

    /// Maximum number of distinct item lines.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `quantity` units of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::CapacityExceeded`] when `item` would open a new
    /// line past capacity, or [`StockError::QuantityOverflow`] when the count
    /// overflows.
    pub fn add(&mut self, item: Item, quantity: u32) -> Result<(), StockError> {
        if !self.items.contains_key(&item) && self.items.len() >= self.capacity {
            return Err(StockError::CapacityExceeded {
                item,
                capacity: self.capacity,
            });
        }
        let entry = self.items.entry(item).or_insert(0);
        *entry = entry
            .checked_add(quantity)
            .ok_or(StockError::QuantityOverflow { item })?;
        Ok(())
    }

    /// Units of `item` on hand.
    pub fn count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }
}

impl Default for ShopInventory {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_LINES)
    }
}

impl StockKeeper for ShopInventory {
    fn has_stock(&self, item: Item) -> bool {
        self.count(item) > 0
    }

    fn consume(&mut self, item: Item) -> Result<(), StockError> {
        let current = self.count(item);
        let remaining = current
            .checked_sub(1)
            .ok_or(StockError::OutOfStock { item })?;
        if remaining == 0 {
            self.items.remove(&item);
        } else {
            self.items.insert(item, remaining);
        }
        Ok(())
    }

    fn quantity(&self, item: Item) -> Option<u32> {
        Some(self.count(item))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_runs_out() {
        let mut stock = UnlimitedStock;
        for _ in 0..1000 {
            stock.consume(Item::FakeId).unwrap();
        }
        assert!(stock.has_stock(Item::FakeId));
        assert!(stock.levels().iter().all(|l| l.quantity.is_none()));
    }

    #[test]
    fn counted_stock_depletes() {
        let mut stock = ShopInventory::default();
        stock.add(Item::QuantumDice, 2).unwrap();
        stock.consume(Item::QuantumDice).unwrap();
        assert!(stock.has_stock(Item::QuantumDice));
        stock.consume(Item::QuantumDice).unwrap();
        assert!(!stock.has_stock(Item::QuantumDice));
        assert_eq!(
            stock.consume(Item::QuantumDice),
            Err(StockError::OutOfStock {
                item: Item::QuantumDice
            })
        );
    }

    #[test]
    fn capacity_limits_new_lines_only() {
        let mut stock = ShopInventory::new(1);
        stock.add(Item::FakeId, 1).unwrap();
        stock.add(Item::FakeId, 4).unwrap();
        assert_eq!(stock.count(Item::FakeId), 5);
        assert!(matches!(
            stock.add(Item::CloakingDevice, 1),
            Err(StockError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[test]
    fn add_overflow_is_reported() {
        let mut stock = ShopInventory::default();
        stock.add(Item::FakeId, u32::MAX).unwrap();
        assert_eq!(
            stock.add(Item::FakeId, 1),
            Err(StockError::QuantityOverflow { item: Item::FakeId })
        );
    }

    #[test]
    fn levels_follow_catalog_order() {
        let mut stock = ShopInventory::default();
        stock.add(Item::QuantumDice, 3).unwrap();
        let levels = stock.levels();
        let items: Vec<Item> = levels.iter().map(|l| l.item).collect();
        assert_eq!(items, Item::ALL.to_vec());
        assert_eq!(levels.last().and_then(|l| l.quantity), Some(3));
        assert_eq!(levels.first().and_then(|l| l.quantity), Some(0));
    }
}
