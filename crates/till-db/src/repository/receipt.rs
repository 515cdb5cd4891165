//! # Receipt Repository
//!
//! Receipts are immutable snapshots: written exactly once at basket close
//! (in the same transaction as the basket's state flip) and never updated.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use till_core::Receipt;

use crate::error::StoreResult;
use crate::repository::{decode, encode};
use crate::store::{Container, Store, StoreReader, WriteTxn};

pub(crate) const RECEIPTS: Container = Container::new("sales_receipts");

/// Repository for receipt records.
#[derive(Clone)]
pub struct ReceiptRepository {
    store: Arc<Store>,
}

impl ReceiptRepository {
    pub fn new(store: Arc<Store>) -> Self {
        ReceiptRepository { store }
    }

    pub fn save(&self, receipt: &Receipt) -> StoreResult<()> {
        self.store.update(|tx| self.save_tx(tx, receipt))
    }

    pub fn save_tx(&self, tx: &WriteTxn, receipt: &Receipt) -> StoreResult<()> {
        tx.put(RECEIPTS, receipt.id.as_bytes(), &encode(receipt)?)?;
        debug!(id = %receipt.id, total = %receipt.total_gross, "saved receipt");
        Ok(())
    }

    pub fn get_by_id(&self, receipt_id: &Uuid) -> StoreResult<Option<Receipt>> {
        self.store.view(|tx| {
            tx.get(RECEIPTS, receipt_id.as_bytes())?
                .map(|bytes| decode(&bytes))
                .transpose()
        })
    }

    pub fn list(&self) -> StoreResult<Vec<Receipt>> {
        self.store.view(|tx| {
            tx.scan(RECEIPTS)?
                .iter()
                .map(|(_, bytes)| decode(bytes))
                .collect()
        })
    }
}
