//! # Category Repository
//!
//! Persists categories and maintains the case-insensitive name index.
//!
//! ## Containers
//! ```text
//! inventory_categories          category id (16B)  → Category JSON
//! inventory_category_name_idx   lower-cased name   → category id (16B)
//! ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use till_core::Category;

use crate::error::StoreResult;
use crate::repository::{decode, encode};
use crate::store::{Container, Store, StoreReader, WriteTxn};

pub(crate) const CATEGORIES: Container = Container::new("inventory_categories");
pub(crate) const CATEGORY_NAME_IDX: Container = Container::new("inventory_category_name_idx");

/// Lower-cased name bytes, the case-insensitive index key.
fn name_key(name: &str) -> Vec<u8> {
    name.to_lowercase().into_bytes()
}

/// Repository for category records and their name index.
#[derive(Clone)]
pub struct CategoryRepository {
    store: Arc<Store>,
}

impl CategoryRepository {
    pub fn new(store: Arc<Store>) -> Self {
        CategoryRepository { store }
    }

    /// Unconditional upsert: writes the record and points the name-index
    /// entry at the id. Uniqueness checks are the service layer's job.
    pub fn save(&self, category: &Category) -> StoreResult<()> {
        self.store.update(|tx| self.save_tx(tx, category))
    }

    pub fn save_tx(&self, tx: &WriteTxn, category: &Category) -> StoreResult<()> {
        // A rename must not leave the old name claiming this id.
        if let Some(bytes) = tx.get(CATEGORIES, category.id.as_bytes())? {
            let previous: Category = decode(&bytes)?;
            if name_key(&previous.name) != name_key(&category.name) {
                tx.delete(CATEGORY_NAME_IDX, &name_key(&previous.name))?;
            }
        }

        tx.put(CATEGORIES, category.id.as_bytes(), &encode(category)?)?;
        tx.put(
            CATEGORY_NAME_IDX,
            &name_key(&category.name),
            category.id.as_bytes(),
        )?;

        debug!(id = %category.id, name = %category.name, "saved category");
        Ok(())
    }

    pub fn get_by_id(&self, category_id: &Uuid) -> StoreResult<Option<Category>> {
        self.store.view(|tx| self.get_by_id_tx(tx, category_id))
    }

    pub fn get_by_id_tx(
        &self,
        tx: &dyn StoreReader,
        category_id: &Uuid,
    ) -> StoreResult<Option<Category>> {
        tx.get(CATEGORIES, category_id.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Name lookup through the lower-cased index; case-insensitive.
    pub fn get_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        self.store.view(|tx| self.get_by_name_tx(tx, name))
    }

    pub fn get_by_name_tx(
        &self,
        tx: &dyn StoreReader,
        name: &str,
    ) -> StoreResult<Option<Category>> {
        let Some(id_bytes) = tx.get(CATEGORY_NAME_IDX, &name_key(name))? else {
            return Ok(None);
        };
        tx.get(CATEGORIES, &id_bytes)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn list(&self) -> StoreResult<Vec<Category>> {
        self.store.view(|tx| self.list_tx(tx))
    }

    pub fn list_tx(&self, tx: &dyn StoreReader) -> StoreResult<Vec<Category>> {
        tx.scan(CATEGORIES)?
            .iter()
            .map(|(_, bytes)| decode(bytes))
            .collect()
    }

    /// Removes the record and its name-index entry in one transaction.
    /// Deleting an absent id is a `None` no-op, not an error.
    pub fn delete(&self, category_id: &Uuid) -> StoreResult<Option<Category>> {
        self.store.update(|tx| self.delete_tx(tx, category_id))
    }

    pub fn delete_tx(&self, tx: &WriteTxn, category_id: &Uuid) -> StoreResult<Option<Category>> {
        let Some(bytes) = tx.get(CATEGORIES, category_id.as_bytes())? else {
            return Ok(None);
        };
        let existing: Category = decode(&bytes)?;

        tx.delete(CATEGORY_NAME_IDX, &name_key(&existing.name))?;
        tx.delete(CATEGORIES, category_id.as_bytes())?;

        debug!(id = %category_id, "deleted category");
        Ok(Some(existing))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
