//! # Item Repository
//!
//! Persists inventory items and maintains the item→category membership
//! index that backs `list_by_category` and the category-delete guard.
//!
//! ## Containers
//! ```text
//! inventory_items              item id (16B)            → InventoryItem JSON
//! inventory_item_category_idx  category id ‖ item id    → (marker)
//! ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use till_core::InventoryItem;

use crate::error::{StoreError, StoreResult};
use crate::repository::{composite_key, composite_member, decode, encode, INDEX_MARKER};
use crate::store::{Container, Store, StoreReader, WriteTxn};

pub(crate) const ITEMS: Container = Container::new("inventory_items");
pub(crate) const ITEM_CATEGORY_IDX: Container = Container::new("inventory_item_category_idx");

/// Repository for item records and their category membership index.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<Store>,
}

impl ItemRepository {
    pub fn new(store: Arc<Store>) -> Self {
        ItemRepository { store }
    }

    /// Upserts the record and keeps exactly one membership entry alive:
    /// a category change removes the stale `(old category, item)` entry in
    /// the same transaction that adds the new one.
    pub fn save(&self, item: &InventoryItem) -> StoreResult<()> {
        self.store.update(|tx| self.save_tx(tx, item))
    }

    pub fn save_tx(&self, tx: &WriteTxn, item: &InventoryItem) -> StoreResult<()> {
        if let Some(bytes) = tx.get(ITEMS, item.id.as_bytes())? {
            let previous: InventoryItem = decode(&bytes)?;
            if previous.category_id != item.category_id {
                tx.delete(
                    ITEM_CATEGORY_IDX,
                    &composite_key(&previous.category_id, &item.id),
                )?;
            }
        }

        tx.put(ITEMS, item.id.as_bytes(), &encode(item)?)?;
        tx.put(
            ITEM_CATEGORY_IDX,
            &composite_key(&item.category_id, &item.id),
            INDEX_MARKER,
        )?;

        debug!(id = %item.id, category_id = %item.category_id, "saved item");
        Ok(())
    }

    pub fn get_by_id(&self, item_id: &Uuid) -> StoreResult<Option<InventoryItem>> {
        self.store.view(|tx| self.get_by_id_tx(tx, item_id))
    }

    pub fn get_by_id_tx(
        &self,
        tx: &dyn StoreReader,
        item_id: &Uuid,
    ) -> StoreResult<Option<InventoryItem>> {
        tx.get(ITEMS, item_id.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn list(&self) -> StoreResult<Vec<InventoryItem>> {
        self.store.view(|tx| {
            tx.scan(ITEMS)?
                .iter()
                .map(|(_, bytes)| decode(bytes))
                .collect()
        })
    }

    /// Membership prefix scan plus a point lookup per member. An unknown or
    /// empty category yields an empty list, not an error.
    pub fn list_by_category(&self, category_id: &Uuid) -> StoreResult<Vec<InventoryItem>> {
        self.store
            .view(|tx| self.list_by_category_tx(tx, category_id))
    }

    pub fn list_by_category_tx(
        &self,
        tx: &dyn StoreReader,
        category_id: &Uuid,
    ) -> StoreResult<Vec<InventoryItem>> {
        let mut items = Vec::new();
        for (key, _) in tx.scan_prefix(ITEM_CATEGORY_IDX, category_id.as_bytes())? {
            let item_id = composite_member(&key)?;
            let bytes = tx.get(ITEMS, item_id.as_bytes())?.ok_or_else(|| {
                StoreError::CorruptIndex(format!("membership entry for missing item {item_id}"))
            })?;
            items.push(decode(&bytes)?);
        }
        Ok(items)
    }

    /// Removes the record and its membership entry. Absent id is a `None`
    /// no-op.
    pub fn delete(&self, item_id: &Uuid) -> StoreResult<Option<InventoryItem>> {
        self.store.update(|tx| self.delete_tx(tx, item_id))
    }

    pub fn delete_tx(&self, tx: &WriteTxn, item_id: &Uuid) -> StoreResult<Option<InventoryItem>> {
        let Some(bytes) = tx.get(ITEMS, item_id.as_bytes())? else {
            return Ok(None);
        };
        let existing: InventoryItem = decode(&bytes)?;

        tx.delete(
            ITEM_CATEGORY_IDX,
            &composite_key(&existing.category_id, item_id),
        )?;
        tx.delete(ITEMS, item_id.as_bytes())?;

        debug!(id = %item_id, "deleted item");
        Ok(Some(existing))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use till_core::{ItemOrigin, Money};

    fn repository() -> (TempDir, ItemRepository) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Store::open(dir.path().join("till.redb")).unwrap());
        (dir, ItemRepository::new(store))
    }

    fn item(name: &str, category_id: Uuid) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.into(),
            category_id,
            origin: ItemOrigin::Local,
            price: Money::from_cents(1249),
        }
    }

    #[test]
    fn test_save_and_get_by_id() {
        let (_dir, repo) = repository();
        let it = item("book", Uuid::new_v4());

        repo.save(&it).unwrap();
        assert_eq!(repo.get_by_id(&it.id).unwrap(), Some(it));
    }

    #[test]
    fn test_list_by_category_only_sees_members() {
        let (_dir, repo) = repository();
        let books = Uuid::new_v4();
        let food = Uuid::new_v4();

        let novel = item("novel", books);
        let atlas = item("atlas", books);
        let bread = item("bread", food);
        for it in [&novel, &atlas, &bread] {
            repo.save(it).unwrap();
        }

        let members = repo.list_by_category(&books).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.category_id == books));

        assert!(repo.list_by_category(&Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_category_change_moves_membership() {
        let (_dir, repo) = repository();
        let books = Uuid::new_v4();
        let food = Uuid::new_v4();

        let mut it = item("cookbook", books);
        repo.save(&it).unwrap();

        it.category_id = food;
        repo.save(&it).unwrap();

        assert!(repo.list_by_category(&books).unwrap().is_empty());
        let members = repo.list_by_category(&food).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, it.id);
    }

    #[test]
    fn test_delete_removes_record_and_membership() {
        let (_dir, repo) = repository();
        let books = Uuid::new_v4();
        let it = item("novel", books);
        repo.save(&it).unwrap();

        assert_eq!(repo.delete(&it.id).unwrap(), Some(it.clone()));
        assert_eq!(repo.get_by_id(&it.id).unwrap(), None);
        assert!(repo.list_by_category(&books).unwrap().is_empty());

        assert_eq!(repo.delete(&it.id).unwrap(), None);
    }

    #[test]
    fn test_list_returns_every_record() {
        let (_dir, repo) = repository();
        repo.save(&item("a", Uuid::new_v4())).unwrap();
        repo.save(&item("b", Uuid::new_v4())).unwrap();

        assert_eq!(repo.list().unwrap().len(), 2);
    }
}
