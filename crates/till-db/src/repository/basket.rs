//! # Basket Repository
//!
//! Plain record persistence for baskets; no secondary indexes. The service
//! layer composes the `*_tx` methods into single-transaction
//! read-modify-write units so concurrent mutations of one basket cannot
//! lose updates.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use till_core::Basket;

use crate::error::StoreResult;
use crate::repository::{decode, encode};
use crate::store::{Container, Store, StoreReader, WriteTxn};

pub(crate) const BASKETS: Container = Container::new("sales_baskets");

/// Repository for basket records.
#[derive(Clone)]
pub struct BasketRepository {
    store: Arc<Store>,
}

impl BasketRepository {
    pub fn new(store: Arc<Store>) -> Self {
        BasketRepository { store }
    }

    pub fn save(&self, basket: &Basket) -> StoreResult<()> {
        self.store.update(|tx| self.save_tx(tx, basket))
    }

    pub fn save_tx(&self, tx: &WriteTxn, basket: &Basket) -> StoreResult<()> {
        tx.put(BASKETS, basket.id.as_bytes(), &encode(basket)?)?;
        debug!(id = %basket.id, state = ?basket.state, "saved basket");
        Ok(())
    }

    pub fn get_by_id(&self, basket_id: &Uuid) -> StoreResult<Option<Basket>> {
        self.store.view(|tx| self.get_by_id_tx(tx, basket_id))
    }

    pub fn get_by_id_tx(
        &self,
        tx: &dyn StoreReader,
        basket_id: &Uuid,
    ) -> StoreResult<Option<Basket>> {
        tx.get(BASKETS, basket_id.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn list(&self) -> StoreResult<Vec<Basket>> {
        self.store.view(|tx| {
            tx.scan(BASKETS)?
                .iter()
                .map(|(_, bytes)| decode(bytes))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use till_core::BasketState;

    fn repository() -> (TempDir, BasketRepository) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Store::open(dir.path().join("till.redb")).unwrap());
        (dir, BasketRepository::new(store))
    }

    #[test]
    fn test_save_and_get_roundtrip() {
        let (_dir, repo) = repository();
        let basket = Basket::new(Uuid::new_v4());

        repo.save(&basket).unwrap();
        let loaded = repo.get_by_id(&basket.id).unwrap().unwrap();
        assert_eq!(loaded, basket);
        assert_eq!(loaded.state, BasketState::Opened);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let (_dir, repo) = repository();
        assert_eq!(repo.get_by_id(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_save_overwrites_state() {
        let (_dir, repo) = repository();
        let mut basket = Basket::new(Uuid::new_v4());
        repo.save(&basket).unwrap();

        basket.cancel().unwrap();
        repo.save(&basket).unwrap();

        let loaded = repo.get_by_id(&basket.id).unwrap().unwrap();
        assert_eq!(loaded.state, BasketState::Cancelled);
    }

    #[test]
    fn test_list_returns_every_record() {
        let (_dir, repo) = repository();
        repo.save(&Basket::new(Uuid::new_v4())).unwrap();
        repo.save(&Basket::new(Uuid::new_v4())).unwrap();
        assert_eq!(repo.list().unwrap().len(), 2);
    }
}
