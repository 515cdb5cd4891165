//! # Sales Types
//!
//! The basket lifecycle state machine and the receipt snapshot it produces.
//!
//! ## Basket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Basket State Machine                          │
//! │                                                                 │
//! │   create ──► OPENED ──── close (≥1 line) ──► CLOSED             │
//! │                │                                                │
//! │                └──────── cancel ───────────► CANCELLED          │
//! │                                                                 │
//! │   CLOSED and CANCELLED are terminal: no transition leaves       │
//! │   them and no line mutation is permitted once non-opened.       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A line stores the `SaleItem` resolved when the item first entered the
//! basket. Re-adding the same item only bumps the count; price and tax are
//! NOT recomputed, so a catalog price change mid-sale cannot shift a line.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::InventoryItem;
use crate::error::{DomainError, DomainResult};
use crate::money::Money;

// =============================================================================
// Sale Item
// =============================================================================

/// An inventory item priced for sale: the frozen tax amount and gross price
/// computed at the moment the item entered a basket.
///
/// Derived, never edited: the tax resolution engine is the only producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub item: InventoryItem,

    /// Cash-rounded tax amount for one unit.
    pub tax: Money,

    /// `item.price + tax`.
    pub gross: Money,
}

// =============================================================================
// Basket
// =============================================================================

/// One basket line: a frozen sale item and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    pub sale_item: SaleItem,

    /// Unit count, always positive; a line that would reach zero is removed.
    pub count: i64,
}

impl BasketItem {
    /// Net line total: `price × count`.
    pub fn total_price(&self) -> Money {
        self.sale_item.item.price.times(self.count)
    }

    /// Tax line total: `tax × count`.
    pub fn total_tax(&self) -> Money {
        self.sale_item.tax.times(self.count)
    }

    /// Gross line total: `gross × count`.
    pub fn total_gross(&self) -> Money {
        self.sale_item.gross.times(self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasketState {
    Opened,
    Closed,
    Cancelled,
}

/// A record of the items a customer has chosen to buy.
///
/// The basket exclusively owns its lines; receipts take independent copies
/// at close time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub id: Uuid,

    /// Lines keyed by item id. Ordered map so persisted records and receipt
    /// lines come out in a stable order.
    pub items: BTreeMap<Uuid, BasketItem>,

    pub state: BasketState,
}

impl Basket {
    /// A new basket: opened, no lines.
    pub fn new(id: Uuid) -> Self {
        Basket {
            id,
            items: BTreeMap::new(),
            state: BasketState::Opened,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == BasketState::Opened
    }

    /// Adds `count` units of a resolved sale item, aggregating into an
    /// existing line if the item is already in the basket.
    ///
    /// The existing line's frozen pricing wins; the incoming `sale_item` is
    /// only used when the line is new.
    pub fn add_item(&mut self, sale_item: SaleItem, count: i64) -> DomainResult<()> {
        if count <= 0 {
            return Err(DomainError::InvalidItemCount);
        }
        if !self.is_open() {
            return Err(DomainError::BasketNotOpen);
        }

        self.items
            .entry(sale_item.item.id)
            .and_modify(|line| line.count += count)
            .or_insert(BasketItem { sale_item, count });
        Ok(())
    }

    /// Removes `count` units of an item; dropping a line to exactly zero
    /// deletes it.
    pub fn remove_item(&mut self, item_id: &Uuid, count: i64) -> DomainResult<()> {
        if count <= 0 {
            return Err(DomainError::InvalidItemCount);
        }
        if !self.is_open() {
            return Err(DomainError::BasketNotOpen);
        }

        let line = self
            .items
            .get_mut(item_id)
            .ok_or(DomainError::InvalidItemId)?;
        if line.count < count {
            return Err(DomainError::InvalidItemCount);
        }

        line.count -= count;
        if line.count == 0 {
            self.items.remove(item_id);
        }
        Ok(())
    }

    /// Transitions to `Cancelled`. Terminal.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::BasketNotOpen);
        }
        self.state = BasketState::Cancelled;
        Ok(())
    }

    /// Transitions to `Closed` and produces the receipt snapshot.
    ///
    /// Totals are summed per line (`unit amount × count`), so the receipt
    /// identity `total_gross == total_price + total_tax` holds exactly.
    pub fn close(&mut self, receipt_id: Uuid) -> DomainResult<Receipt> {
        if !self.is_open() {
            return Err(DomainError::BasketNotOpen);
        }
        if self.items.is_empty() {
            return Err(DomainError::NoItemInBasket);
        }

        let items: Vec<BasketItem> = self.items.values().cloned().collect();
        let receipt = Receipt {
            id: receipt_id,
            total_tax: items.iter().map(BasketItem::total_tax).sum(),
            total_price: items.iter().map(BasketItem::total_price).sum(),
            total_gross: items.iter().map(BasketItem::total_gross).sum(),
            items,
            created_at: Utc::now(),
        };

        self.state = BasketState::Closed;
        Ok(receipt)
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Immutable sale snapshot, created exactly once when a basket closes.
///
/// The line items are independent copies; mutating the source basket after
/// close (which the state machine forbids anyway) could never reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub items: Vec<BasketItem>,
    pub total_tax: Money,
    pub total_price: Money,
    pub total_gross: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemOrigin;

    fn sale_item(price: i64, tax: i64) -> SaleItem {
        SaleItem {
            item: InventoryItem {
                id: Uuid::new_v4(),
                name: "music CD".into(),
                category_id: Uuid::new_v4(),
                origin: ItemOrigin::Local,
                price: Money::from_cents(price),
            },
            tax: Money::from_cents(tax),
            gross: Money::from_cents(price + tax),
        }
    }

    #[test]
    fn test_new_basket_is_opened_and_empty() {
        let basket = Basket::new(Uuid::new_v4());
        assert!(basket.is_open());
        assert!(basket.items.is_empty());
    }

    #[test]
    fn test_add_item_aggregates_counts_and_keeps_pricing() {
        let mut basket = Basket::new(Uuid::new_v4());
        let si = sale_item(1499, 150);
        let item_id = si.item.id;

        basket.add_item(si.clone(), 2).unwrap();

        // Same item id, different (stale) pricing: count bumps, price stays.
        let mut repriced = si.clone();
        repriced.item.price = Money::from_cents(9999);
        basket.add_item(repriced, 3).unwrap();

        let line = &basket.items[&item_id];
        assert_eq!(line.count, 5);
        assert_eq!(line.sale_item.item.price, Money::from_cents(1499));
    }

    #[test]
    fn test_add_item_rejects_non_positive_count() {
        let mut basket = Basket::new(Uuid::new_v4());
        assert_eq!(
            basket.add_item(sale_item(100, 0), 0),
            Err(DomainError::InvalidItemCount)
        );
        assert_eq!(
            basket.add_item(sale_item(100, 0), -3),
            Err(DomainError::InvalidItemCount)
        );
    }

    #[test]
    fn test_remove_item_decrements_and_deletes_at_zero() {
        let mut basket = Basket::new(Uuid::new_v4());
        let si = sale_item(1000, 100);
        let item_id = si.item.id;
        basket.add_item(si, 5).unwrap();

        basket.remove_item(&item_id, 2).unwrap();
        assert_eq!(basket.items[&item_id].count, 3);

        basket.remove_item(&item_id, 3).unwrap();
        assert!(!basket.items.contains_key(&item_id));
    }

    #[test]
    fn test_remove_item_validations() {
        let mut basket = Basket::new(Uuid::new_v4());
        let si = sale_item(1000, 100);
        let item_id = si.item.id;
        basket.add_item(si, 2).unwrap();

        assert_eq!(
            basket.remove_item(&Uuid::new_v4(), 1),
            Err(DomainError::InvalidItemId)
        );
        // Over-removal fails and leaves the line untouched.
        assert_eq!(
            basket.remove_item(&item_id, 3),
            Err(DomainError::InvalidItemCount)
        );
        assert_eq!(basket.items[&item_id].count, 2);
    }

    #[test]
    fn test_close_empty_basket_rejected() {
        let mut basket = Basket::new(Uuid::new_v4());
        assert_eq!(
            basket.close(Uuid::new_v4()),
            Err(DomainError::NoItemInBasket)
        );
        // Failed close does not consume the basket's opened state.
        assert!(basket.is_open());
    }

    #[test]
    fn test_close_produces_consistent_totals() {
        let mut basket = Basket::new(Uuid::new_v4());
        basket.add_item(sale_item(1000, 100), 10).unwrap();
        basket.add_item(sale_item(4750, 715), 1).unwrap();

        let receipt = basket.close(Uuid::new_v4()).unwrap();

        assert_eq!(basket.state, BasketState::Closed);
        assert_eq!(receipt.total_price, Money::from_cents(10_000 + 4750));
        assert_eq!(receipt.total_tax, Money::from_cents(1000 + 715));
        assert_eq!(
            receipt.total_gross,
            receipt.total_price + receipt.total_tax
        );
        assert_eq!(receipt.items.len(), 2);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut cancelled = Basket::new(Uuid::new_v4());
        cancelled.cancel().unwrap();
        assert_eq!(cancelled.state, BasketState::Cancelled);
        assert_eq!(
            cancelled.add_item(sale_item(100, 0), 1),
            Err(DomainError::BasketNotOpen)
        );
        assert_eq!(cancelled.cancel(), Err(DomainError::BasketNotOpen));
        assert_eq!(
            cancelled.close(Uuid::new_v4()),
            Err(DomainError::BasketNotOpen)
        );

        let mut closed = Basket::new(Uuid::new_v4());
        closed.add_item(sale_item(100, 0), 1).unwrap();
        closed.close(Uuid::new_v4()).unwrap();
        assert_eq!(
            closed.close(Uuid::new_v4()),
            Err(DomainError::BasketNotOpen)
        );
        assert_eq!(cancelled.cancel(), Err(DomainError::BasketNotOpen));
    }

    #[test]
    fn test_receipt_lines_are_independent_copies() {
        let mut basket = Basket::new(Uuid::new_v4());
        let si = sale_item(1000, 100);
        let item_id = si.item.id;
        basket.add_item(si, 1).unwrap();

        let receipt = basket.close(Uuid::new_v4()).unwrap();

        // Clearing the basket record afterwards cannot reach the receipt.
        basket.items.clear();
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].sale_item.item.id, item_id);
    }
}
