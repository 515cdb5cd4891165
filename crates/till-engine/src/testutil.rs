//! Shared test fixture: the full service stack wired over a throwaway
//! single-file store, the way a deployment wires it — no mocks.

use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use till_core::{Category, InventoryItem, ItemOrigin, Money};
use till_db::Store;

use crate::catalog::CatalogService;
use crate::sales::SalesService;
use crate::tax::TaxService;

pub(crate) struct Fixture {
    _dir: TempDir,
    pub catalog: CatalogService,
    pub taxes: TaxService,
    pub sales: SalesService,
    default_category: Category,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Store::open(dir.path().join("till.redb")).unwrap());

        let catalog = CatalogService::new(store.clone());
        let taxes = TaxService::new(store.clone());
        let sales = SalesService::new(store, catalog.clone(), taxes.clone());

        let default_category = catalog.create_category(Category::new("General")).unwrap();

        Fixture {
            _dir: dir,
            catalog,
            taxes,
            sales,
            default_category,
        }
    }

    /// Creates a fresh category.
    pub fn category(&self, name: &str) -> Category {
        self.catalog.create_category(Category::new(name)).unwrap()
    }

    /// Creates an item in the fixture's default category.
    pub fn item(&self, name: &str, origin: ItemOrigin, price: Money) -> InventoryItem {
        self.item_in(name, self.default_category.id, origin, price)
    }

    /// Creates an item in a specific category.
    pub fn item_in(
        &self,
        name: &str,
        category_id: Uuid,
        origin: ItemOrigin,
        price: Money,
    ) -> InventoryItem {
        self.catalog
            .create_item(InventoryItem::new(name, category_id, origin, price))
            .unwrap()
    }
}
