//! # Catalog Service
//!
//! Category and inventory item management. Repositories persist whatever
//! they are handed; the checks live here — id collisions, case-insensitive
//! name uniqueness, category references, and the members-block-delete rule.
//!
//! Every check-then-write runs inside one store write transaction, so a
//! concurrent writer cannot slip a duplicate or a dangling reference in
//! between the check and the save.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use till_core::{Category, DomainError, InventoryItem};
use till_db::{CategoryRepository, ItemRepository, Store};

use crate::error::EngineResult;

/// Service-level wrapper over the category and item repositories.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<Store>,
    categories: CategoryRepository,
    items: ItemRepository,
}

impl CatalogService {
    pub fn new(store: Arc<Store>) -> Self {
        CatalogService {
            categories: CategoryRepository::new(store.clone()),
            items: ItemRepository::new(store.clone()),
            store,
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Creates a category. A nil id means "allocate one"; a caller-supplied
    /// id must not collide. The name must be present and unique
    /// case-insensitively.
    pub fn create_category(&self, mut category: Category) -> EngineResult<Category> {
        if category.name.trim().is_empty() {
            warn!("rejected category create: missing name");
            return Err(DomainError::InvalidCategoryName.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            if category.id.is_nil() {
                category.id = Uuid::new_v4();
            } else if self.categories.get_by_id_tx(tx, &category.id)?.is_some() {
                warn!(id = %category.id, "rejected category create: id collision");
                return Err(DomainError::InvalidCategoryId.into());
            }

            if self.categories.get_by_name_tx(tx, &category.name)?.is_some() {
                warn!(name = %category.name, "rejected category create: duplicate name");
                return Err(DomainError::InvalidCategoryName.into());
            }

            self.categories.save_tx(tx, &category)?;
            Ok(())
        })?;

        info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Updates an existing category; the id must resolve. Renaming onto
    /// another category's name (case-insensitively) is rejected.
    pub fn update_category(&self, category: &Category) -> EngineResult<Category> {
        if category.id.is_nil() {
            return Err(DomainError::InvalidCategoryId.into());
        }
        if category.name.trim().is_empty() {
            return Err(DomainError::InvalidCategoryName.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            if self.categories.get_by_id_tx(tx, &category.id)?.is_none() {
                warn!(id = %category.id, "rejected category update: unknown id");
                return Err(DomainError::InvalidCategoryId.into());
            }

            if let Some(holder) = self.categories.get_by_name_tx(tx, &category.name)? {
                if holder.id != category.id {
                    warn!(name = %category.name, "rejected category update: duplicate name");
                    return Err(DomainError::InvalidCategoryName.into());
                }
            }

            self.categories.save_tx(tx, category)?;
            Ok(())
        })?;

        info!(id = %category.id, "category updated");
        Ok(category.clone())
    }

    /// Point read. An unknown id is `None`, not an error.
    pub fn get_category(&self, category_id: &Uuid) -> EngineResult<Option<Category>> {
        if category_id.is_nil() {
            return Err(DomainError::InvalidCategoryId.into());
        }
        Ok(self.categories.get_by_id(category_id)?)
    }

    /// Case-insensitive name lookup.
    pub fn get_category_by_name(&self, name: &str) -> EngineResult<Option<Category>> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidCategoryName.into());
        }
        Ok(self.categories.get_by_name(name)?)
    }

    pub fn list_categories(&self) -> EngineResult<Vec<Category>> {
        Ok(self.categories.list()?)
    }

    /// Deletes a category that exists and has no member items; returns the
    /// deleted record. The membership check and the delete share one
    /// transaction.
    pub fn delete_category(&self, category_id: &Uuid) -> EngineResult<Category> {
        if category_id.is_nil() {
            return Err(DomainError::InvalidCategoryId.into());
        }

        let deleted = self.store.update(|tx| -> EngineResult<Category> {
            if self.categories.get_by_id_tx(tx, category_id)?.is_none() {
                return Err(DomainError::InvalidCategoryId.into());
            }

            if !self.items.list_by_category_tx(tx, category_id)?.is_empty() {
                warn!(id = %category_id, "rejected category delete: has member items");
                return Err(DomainError::CategoryNotEmpty.into());
            }

            // Existence was just checked inside this same transaction.
            self.categories
                .delete_tx(tx, category_id)?
                .ok_or_else(|| DomainError::InvalidCategoryId.into())
        })?;

        info!(id = %category_id, "category deleted");
        Ok(deleted)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Creates an item. A nil id means "allocate one"; the category must
    /// resolve; the price must not be negative.
    pub fn create_item(&self, mut item: InventoryItem) -> EngineResult<InventoryItem> {
        if item.name.trim().is_empty() {
            return Err(DomainError::InvalidItemName.into());
        }
        if item.price.is_negative() {
            warn!(price = %item.price, "rejected item create: negative price");
            return Err(DomainError::InvalidItemPrice.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            if item.id.is_nil() {
                item.id = Uuid::new_v4();
            } else if self.items.get_by_id_tx(tx, &item.id)?.is_some() {
                warn!(id = %item.id, "rejected item create: id collision");
                return Err(DomainError::InvalidItemId.into());
            }

            if self.categories.get_by_id_tx(tx, &item.category_id)?.is_none() {
                warn!(category_id = %item.category_id, "rejected item create: unknown category");
                return Err(DomainError::InvalidCategoryId.into());
            }

            self.items.save_tx(tx, &item)?;
            Ok(())
        })?;

        info!(id = %item.id, name = %item.name, "item created");
        Ok(item)
    }

    /// Updates an existing item. A category change re-validates the new
    /// category reference.
    pub fn update_item(&self, item: &InventoryItem) -> EngineResult<InventoryItem> {
        if item.id.is_nil() {
            return Err(DomainError::InvalidItemId.into());
        }
        if item.name.trim().is_empty() {
            return Err(DomainError::InvalidItemName.into());
        }
        if item.price.is_negative() {
            return Err(DomainError::InvalidItemPrice.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            let Some(existing) = self.items.get_by_id_tx(tx, &item.id)? else {
                warn!(id = %item.id, "rejected item update: unknown id");
                return Err(DomainError::InvalidItemId.into());
            };

            if existing.category_id != item.category_id
                && self.categories.get_by_id_tx(tx, &item.category_id)?.is_none()
            {
                warn!(category_id = %item.category_id, "rejected item update: unknown category");
                return Err(DomainError::InvalidCategoryId.into());
            }

            self.items.save_tx(tx, item)?;
            Ok(())
        })?;

        info!(id = %item.id, "item updated");
        Ok(item.clone())
    }

    /// Point read. An unknown id is `None`, not an error.
    pub fn get_item(&self, item_id: &Uuid) -> EngineResult<Option<InventoryItem>> {
        if item_id.is_nil() {
            return Err(DomainError::InvalidItemId.into());
        }
        Ok(self.items.get_by_id(item_id)?)
    }

    pub fn list_items(&self) -> EngineResult<Vec<InventoryItem>> {
        Ok(self.items.list()?)
    }

    pub fn list_items_by_category(&self, category_id: &Uuid) -> EngineResult<Vec<InventoryItem>> {
        if category_id.is_nil() {
            return Err(DomainError::InvalidCategoryId.into());
        }
        Ok(self.items.list_by_category(category_id)?)
    }

    /// Deletes an item; an absent id is a `None` no-op.
    pub fn delete_item(&self, item_id: &Uuid) -> EngineResult<Option<InventoryItem>> {
        if item_id.is_nil() {
            return Err(DomainError::InvalidItemId.into());
        }
        let deleted = self.items.delete(item_id)?;
        if deleted.is_some() {
            info!(id = %item_id, "item deleted");
        }
        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
