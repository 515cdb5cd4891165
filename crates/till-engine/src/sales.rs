//! # Sales Service
//!
//! Orchestrates the basket lifecycle and receipt creation.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  add_item(basket, item, count)                                  │
//! │                                                                 │
//! │   validate ids/count                                            │
//! │        │                                                        │
//! │        ▼                                                        │
//! │   catalog lookup ──► tax resolution (price frozen here)         │
//! │        │                                                        │
//! │        ▼                                                        │
//! │   ┌── one write transaction ─────────────────────────────┐      │
//! │   │  load basket → state machine mutation → save basket  │      │
//! │   └──────────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every basket mutation loads and saves the record inside a single write
//! transaction, so two callers racing on one basket serialize instead of
//! losing an update. `close_basket` writes the receipt and the closed
//! basket in that same transaction: either both land or neither does.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use till_core::{Basket, DomainError, Receipt};
use till_db::{BasketRepository, ReceiptRepository, Store};

use crate::catalog::CatalogService;
use crate::error::EngineResult;
use crate::tax::TaxService;

/// The basket/receipt engine.
#[derive(Clone)]
pub struct SalesService {
    store: Arc<Store>,
    baskets: BasketRepository,
    receipts: ReceiptRepository,
    catalog: CatalogService,
    taxes: TaxService,
}

impl SalesService {
    pub fn new(store: Arc<Store>, catalog: CatalogService, taxes: TaxService) -> Self {
        SalesService {
            baskets: BasketRepository::new(store.clone()),
            receipts: ReceiptRepository::new(store.clone()),
            catalog,
            taxes,
            store,
        }
    }

    /// Opens a new empty basket and returns its id.
    pub fn create_basket(&self) -> EngineResult<Uuid> {
        let basket = Basket::new(Uuid::new_v4());
        self.baskets.save(&basket)?;
        info!(id = %basket.id, "basket created");
        Ok(basket.id)
    }

    /// Point read. An unknown id is `None`, not an error.
    pub fn get_basket(&self, basket_id: &Uuid) -> EngineResult<Option<Basket>> {
        if basket_id.is_nil() {
            return Err(DomainError::InvalidBasketId.into());
        }
        Ok(self.baskets.get_by_id(basket_id)?)
    }

    pub fn list_baskets(&self) -> EngineResult<Vec<Basket>> {
        Ok(self.baskets.list()?)
    }

    /// Adds `count` units of an item to an open basket.
    ///
    /// The item is resolved and priced first; if it is already a line of the
    /// basket only the count grows — the line keeps the pricing frozen when
    /// it first entered.
    pub fn add_item(&self, basket_id: &Uuid, item_id: &Uuid, count: i64) -> EngineResult<()> {
        if basket_id.is_nil() {
            return Err(DomainError::InvalidBasketId.into());
        }
        if item_id.is_nil() {
            return Err(DomainError::InvalidItemId.into());
        }
        if count <= 0 {
            warn!(basket = %basket_id, item = %item_id, count, "rejected add: bad count");
            return Err(DomainError::InvalidItemCount.into());
        }

        let item = self.catalog.get_item(item_id)?;
        let sale_item = self.taxes.sale_item(item.as_ref())?;

        self.store.update(|tx| -> EngineResult<()> {
            let mut basket = self
                .baskets
                .get_by_id_tx(tx, basket_id)?
                .ok_or(DomainError::InvalidBasketId)?;
            basket.add_item(sale_item, count)?;
            self.baskets.save_tx(tx, &basket)?;
            Ok(())
        })?;

        info!(basket = %basket_id, item = %item_id, count, "item added to basket");
        Ok(())
    }

    /// Removes `count` units of a line from an open basket; a line reaching
    /// zero disappears.
    pub fn remove_item(&self, basket_id: &Uuid, item_id: &Uuid, count: i64) -> EngineResult<()> {
        if basket_id.is_nil() {
            return Err(DomainError::InvalidBasketId.into());
        }
        if item_id.is_nil() {
            return Err(DomainError::InvalidItemId.into());
        }
        if count <= 0 {
            warn!(basket = %basket_id, item = %item_id, count, "rejected remove: bad count");
            return Err(DomainError::InvalidItemCount.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            let mut basket = self
                .baskets
                .get_by_id_tx(tx, basket_id)?
                .ok_or(DomainError::InvalidBasketId)?;
            basket.remove_item(item_id, count)?;
            self.baskets.save_tx(tx, &basket)?;
            Ok(())
        })?;

        info!(basket = %basket_id, item = %item_id, count, "item removed from basket");
        Ok(())
    }

    /// Cancels an open basket. Terminal.
    pub fn cancel_basket(&self, basket_id: &Uuid) -> EngineResult<()> {
        if basket_id.is_nil() {
            return Err(DomainError::InvalidBasketId.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            let mut basket = self
                .baskets
                .get_by_id_tx(tx, basket_id)?
                .ok_or(DomainError::InvalidBasketId)?;
            basket.cancel()?;
            self.baskets.save_tx(tx, &basket)?;
            Ok(())
        })?;

        info!(id = %basket_id, "basket cancelled");
        Ok(())
    }

    /// Closes an open non-empty basket and returns its receipt.
    ///
    /// The receipt and the closed basket commit in one transaction; a
    /// receipt can never exist against a basket that still reads as opened.
    pub fn close_basket(&self, basket_id: &Uuid) -> EngineResult<Receipt> {
        if basket_id.is_nil() {
            return Err(DomainError::InvalidBasketId.into());
        }

        let receipt = self.store.update(|tx| -> EngineResult<Receipt> {
            let mut basket = self
                .baskets
                .get_by_id_tx(tx, basket_id)?
                .ok_or(DomainError::InvalidBasketId)?;

            let receipt = basket.close(Uuid::new_v4())?;
            self.receipts.save_tx(tx, &receipt)?;
            self.baskets.save_tx(tx, &basket)?;
            Ok(receipt)
        })?;

        info!(
            basket = %basket_id,
            receipt = %receipt.id,
            total = %receipt.total_gross,
            "basket closed"
        );
        Ok(receipt)
    }

    /// Point read. An unknown id is `None`, not an error.
    pub fn get_receipt(&self, receipt_id: &Uuid) -> EngineResult<Option<Receipt>> {
        if receipt_id.is_nil() {
            return Err(DomainError::InvalidReceiptId.into());
        }
        Ok(self.receipts.get_by_id(receipt_id)?)
    }

    pub fn list_receipts(&self) -> EngineResult<Vec<Receipt>> {
        Ok(self.receipts.list()?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
