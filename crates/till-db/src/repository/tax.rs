//! # Tax Repository
//!
//! Persists tax definitions and maintains the tax→category scope index.
//!
//! ## Containers
//! ```text
//! taxes              tax id (16B)            → Tax JSON
//! tax_category_idx   tax id ‖ category id    → (marker)
//! ```
//!
//! ## Rebuild-on-save
//! `save` drops the tax's whole scope sub-range and re-creates it from the
//! record being written. Tax definitions change rarely relative to reads, so
//! the write amplification buys not having to diff scope sets.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use till_core::{ItemOrigin, Tax};

use crate::error::StoreResult;
use crate::repository::{composite_key, composite_member, decode, encode, INDEX_MARKER};
use crate::store::{Container, Store, StoreReader, WriteTxn};

pub(crate) const TAXES: Container = Container::new("taxes");
pub(crate) const TAX_CATEGORY_IDX: Container = Container::new("tax_category_idx");

/// Repository for tax records and their category scope index.
#[derive(Clone)]
pub struct TaxRepository {
    store: Arc<Store>,
}

impl TaxRepository {
    pub fn new(store: Arc<Store>) -> Self {
        TaxRepository { store }
    }

    /// Rewrites the record and rebuilds its scope index from scratch in the
    /// same transaction. The drop is unconditional so a scope shrinking to
    /// empty leaves no stale entries behind.
    pub fn save(&self, tax: &Tax) -> StoreResult<()> {
        self.store.update(|tx| self.save_tx(tx, tax))
    }

    pub fn save_tx(&self, tx: &WriteTxn, tax: &Tax) -> StoreResult<()> {
        tx.delete_prefix(TAX_CATEGORY_IDX, tax.id.as_bytes())?;
        for category_id in tax.scope.category_ids() {
            tx.put(
                TAX_CATEGORY_IDX,
                &composite_key(&tax.id, category_id),
                INDEX_MARKER,
            )?;
        }

        tx.put(TAXES, tax.id.as_bytes(), &encode(tax)?)?;

        debug!(id = %tax.id, name = %tax.name, "saved tax");
        Ok(())
    }

    pub fn get_by_id(&self, tax_id: &Uuid) -> StoreResult<Option<Tax>> {
        self.store.view(|tx| self.get_by_id_tx(tx, tax_id))
    }

    pub fn get_by_id_tx(&self, tx: &dyn StoreReader, tax_id: &Uuid) -> StoreResult<Option<Tax>> {
        tx.get(TAXES, tax_id.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn list(&self) -> StoreResult<Vec<Tax>> {
        self.store.view(|tx| self.list_tx(tx))
    }

    pub fn list_tx(&self, tx: &dyn StoreReader) -> StoreResult<Vec<Tax>> {
        tx.scan(TAXES)?
            .iter()
            .map(|(_, bytes)| decode(bytes))
            .collect()
    }

    /// Removes the record and its scope entries. Absent id is a `None` no-op.
    pub fn delete(&self, tax_id: &Uuid) -> StoreResult<Option<Tax>> {
        self.store.update(|tx| self.delete_tx(tx, tax_id))
    }

    pub fn delete_tx(&self, tx: &WriteTxn, tax_id: &Uuid) -> StoreResult<Option<Tax>> {
        let Some(bytes) = tx.get(TAXES, tax_id.as_bytes())? else {
            return Ok(None);
        };
        let existing: Tax = decode(&bytes)?;

        tx.delete_prefix(TAX_CATEGORY_IDX, tax_id.as_bytes())?;
        tx.delete(TAXES, tax_id.as_bytes())?;

        debug!(id = %tax_id, "deleted tax");
        Ok(Some(existing))
    }

    /// All taxes eligible for an item with the given origin and category.
    ///
    /// Scans every tax record and applies the eligibility rule. A full scan
    /// by design: tax rule sets are tens of records, not millions.
    pub fn find_for_origin_and_category(
        &self,
        origin: ItemOrigin,
        category_id: &Uuid,
    ) -> StoreResult<Vec<Tax>> {
        self.store.view(|tx| {
            Ok(self
                .list_tx(tx)?
                .into_iter()
                .filter(|tax| tax.applies_to(origin, category_id))
                .collect())
        })
    }

    /// The category ids currently in a tax's scope index, in key order.
    pub fn scope_index_entries(&self, tax_id: &Uuid) -> StoreResult<Vec<Uuid>> {
        self.store.view(|tx| {
            tx.scan_prefix(TAX_CATEGORY_IDX, tax_id.as_bytes())?
                .iter()
                .map(|(key, _)| composite_member(key))
                .collect()
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
