//! # Tax Service
//!
//! Tax definition management plus the tax resolution engine: turning a
//! catalog item into a priced [`SaleItem`].
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  sale_item(item)                                                │
//! │                                                                 │
//! │  1. find every tax whose origin + scope admit the item          │
//! │  2. combined rate = Σ rate            (stack, no rounding yet)  │
//! │  3. tax = price × combined rate, cash rounded to nearest $0.05  │
//! │  4. gross = price + tax                                         │
//! │                                                                 │
//! │  Deterministic: same item + same tax definitions → same result. │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use till_core::{DomainError, InventoryItem, SaleItem, Tax, TaxRate};
use till_db::{Store, TaxRepository};

use crate::error::EngineResult;

/// Service-level wrapper over the tax repository, and the resolution engine.
#[derive(Clone)]
pub struct TaxService {
    store: Arc<Store>,
    taxes: TaxRepository,
}

impl TaxService {
    pub fn new(store: Arc<Store>) -> Self {
        TaxService {
            taxes: TaxRepository::new(store.clone()),
            store,
        }
    }

    /// Creates a tax. A nil id means "allocate one"; the name must be
    /// present and the rate positive.
    pub fn create_tax(&self, mut tax: Tax) -> EngineResult<Tax> {
        if tax.name.trim().is_empty() {
            return Err(DomainError::InvalidTaxName.into());
        }
        if tax.rate.is_zero() {
            warn!(name = %tax.name, "rejected tax create: zero rate");
            return Err(DomainError::InvalidTaxRate.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            if tax.id.is_nil() {
                tax.id = Uuid::new_v4();
            } else if self.taxes.get_by_id_tx(tx, &tax.id)?.is_some() {
                warn!(id = %tax.id, "rejected tax create: id collision");
                return Err(DomainError::InvalidTaxId.into());
            }

            self.taxes.save_tx(tx, &tax)?;
            Ok(())
        })?;

        info!(id = %tax.id, name = %tax.name, rate = %tax.rate, "tax created");
        Ok(tax)
    }

    /// Updates an existing tax; the id must resolve.
    pub fn update_tax(&self, tax: &Tax) -> EngineResult<Tax> {
        if tax.id.is_nil() {
            return Err(DomainError::InvalidTaxId.into());
        }
        if tax.name.trim().is_empty() {
            return Err(DomainError::InvalidTaxName.into());
        }
        if tax.rate.is_zero() {
            return Err(DomainError::InvalidTaxRate.into());
        }

        self.store.update(|tx| -> EngineResult<()> {
            if self.taxes.get_by_id_tx(tx, &tax.id)?.is_none() {
                warn!(id = %tax.id, "rejected tax update: unknown id");
                return Err(DomainError::InvalidTaxId.into());
            }
            self.taxes.save_tx(tx, tax)?;
            Ok(())
        })?;

        info!(id = %tax.id, "tax updated");
        Ok(tax.clone())
    }

    /// Point read. An unknown id is `None`, not an error.
    pub fn get_tax(&self, tax_id: &Uuid) -> EngineResult<Option<Tax>> {
        if tax_id.is_nil() {
            return Err(DomainError::InvalidTaxId.into());
        }
        Ok(self.taxes.get_by_id(tax_id)?)
    }

    pub fn list_taxes(&self) -> EngineResult<Vec<Tax>> {
        Ok(self.taxes.list()?)
    }

    /// Deletes a tax; an absent id is a `None` no-op.
    pub fn delete_tax(&self, tax_id: &Uuid) -> EngineResult<Option<Tax>> {
        if tax_id.is_nil() {
            return Err(DomainError::InvalidTaxId.into());
        }
        let deleted = self.taxes.delete(tax_id)?;
        if deleted.is_some() {
            info!(id = %tax_id, "tax deleted");
        }
        Ok(deleted)
    }

    /// Prices an item for sale: the frozen tax amount and gross price at
    /// this moment. An absent item is an invalid parameter.
    pub fn sale_item(&self, item: Option<&InventoryItem>) -> EngineResult<SaleItem> {
        let Some(item) = item else {
            warn!("cannot price an absent item");
            return Err(DomainError::InvalidParameter.into());
        };

        let eligible = self
            .taxes
            .find_for_origin_and_category(item.origin, &item.category_id)?;
        let combined: TaxRate = eligible.iter().map(|tax| tax.rate).sum();
        let tax = item.price.tax_amount(combined);

        debug!(
            item = %item.id,
            taxes = eligible.len(),
            rate = %combined,
            tax = %tax,
            "priced item"
        );

        Ok(SaleItem {
            tax,
            gross: item.price + tax,
            item: item.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Fixture;
    use std::collections::BTreeSet;
    use till_core::{ItemOrigin, Money, TaxOrigin, TaxScope};

    fn scope(ids: &[Uuid]) -> BTreeSet<Uuid> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_create_tax_allocates_id_and_validates() {
        let fx = Fixture::new();

        let created = fx
            .taxes
            .create_tax(Tax::new(
                "basic sales tax",
                TaxRate::from_percent(10),
                TaxOrigin::All,
                TaxScope::Unconditional,
            ))
            .unwrap();
        assert!(!created.id.is_nil());

        let err = fx
            .taxes
            .create_tax(Tax::new(
                "",
                TaxRate::from_percent(10),
                TaxOrigin::All,
                TaxScope::Unconditional,
            ))
            .unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidTaxName));

        let err = fx
            .taxes
            .create_tax(Tax::new(
                "free tax",
                TaxRate::from_bps(0),
                TaxOrigin::All,
                TaxScope::Unconditional,
            ))
            .unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidTaxRate));

        let mut clash = Tax::new(
            "double",
            TaxRate::from_percent(5),
            TaxOrigin::All,
            TaxScope::Unconditional,
        );
        clash.id = created.id;
        let err = fx.taxes.create_tax(clash).unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidTaxId));
    }

    #[test]
    fn test_update_tax_requires_existing_id() {
        let fx = Fixture::new();
        let mut ghost = Tax::new(
            "ghost",
            TaxRate::from_percent(5),
            TaxOrigin::All,
            TaxScope::Unconditional,
        );
        ghost.id = Uuid::new_v4();

        let err = fx.taxes.update_tax(&ghost).unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidTaxId));
    }

    #[test]
    fn test_delete_tax_returns_the_record() {
        let fx = Fixture::new();
        let created = fx
            .taxes
            .create_tax(Tax::new(
                "duty",
                TaxRate::from_percent(5),
                TaxOrigin::Imported,
                TaxScope::Unconditional,
            ))
            .unwrap();

        assert_eq!(fx.taxes.delete_tax(&created.id).unwrap(), Some(created.clone()));
        assert_eq!(fx.taxes.delete_tax(&created.id).unwrap(), None);
        assert_eq!(fx.taxes.get_tax(&created.id).unwrap(), None);
    }

    #[test]
    fn test_sale_item_rejects_absent_item() {
        let fx = Fixture::new();
        let err = fx.taxes.sale_item(None).unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidParameter));
    }

    #[test]
    fn test_sale_item_with_no_eligible_taxes_is_net_priced() {
        let fx = Fixture::new();
        let item = fx.item("book", ItemOrigin::Local, Money::from_cents(1249));

        let priced = fx.taxes.sale_item(Some(&item)).unwrap();
        assert_eq!(priced.tax, Money::zero());
        assert_eq!(priced.gross, Money::from_cents(1249));
    }

    #[test]
    fn test_sale_item_basic_rate() {
        let fx = Fixture::new();
        fx.taxes
            .create_tax(Tax::new(
                "basic sales tax",
                TaxRate::from_percent(10),
                TaxOrigin::All,
                TaxScope::Unconditional,
            ))
            .unwrap();

        // $10.00 at 10% ⇒ tax $1.00, gross $11.00
        let item = fx.item("music CD", ItemOrigin::Local, Money::from_cents(1000));
        let priced = fx.taxes.sale_item(Some(&item)).unwrap();
        assert_eq!(priced.tax, Money::from_cents(100));
        assert_eq!(priced.gross, Money::from_cents(1100));
    }

    #[test]
    fn test_sale_item_stacks_eligible_rates() {
        let fx = Fixture::new();
        fx.taxes
            .create_tax(Tax::new(
                "basic sales tax",
                TaxRate::from_percent(10),
                TaxOrigin::All,
                TaxScope::Unconditional,
            ))
            .unwrap();
        fx.taxes
            .create_tax(Tax::new(
                "import duty",
                TaxRate::from_percent(5),
                TaxOrigin::Imported,
                TaxScope::Unconditional,
            ))
            .unwrap();

        // Imported perfume $27.99 at 10% + 5% = $4.1985 → $4.20
        let item = fx.item("perfume", ItemOrigin::Imported, Money::from_cents(2799));
        let priced = fx.taxes.sale_item(Some(&item)).unwrap();
        assert_eq!(priced.tax, Money::from_cents(420));
        assert_eq!(priced.gross, Money::from_cents(3219));

        // The local twin only pays the sales tax.
        let local = fx.item("eau de toilette", ItemOrigin::Local, Money::from_cents(2799));
        let priced = fx.taxes.sale_item(Some(&local)).unwrap();
        assert_eq!(priced.tax, Money::from_cents(280));
    }

    #[test]
    fn test_sale_item_honours_exempt_scope() {
        let fx = Fixture::new();
        let books = fx.category("Books");
        let other = fx.category("Perfume");

        fx.taxes
            .create_tax(Tax::new(
                "basic sales tax",
                TaxRate::from_percent(10),
                TaxOrigin::All,
                TaxScope::Exempt(scope(&[books.id])),
            ))
            .unwrap();

        let novel = fx.item_in("novel", books.id, ItemOrigin::Local, Money::from_cents(1249));
        let priced = fx.taxes.sale_item(Some(&novel)).unwrap();
        assert_eq!(priced.tax, Money::zero());

        let bottle = fx.item_in(
            "perfume",
            other.id,
            ItemOrigin::Local,
            Money::from_cents(1899),
        );
        let priced = fx.taxes.sale_item(Some(&bottle)).unwrap();
        assert_eq!(priced.tax, Money::from_cents(190));
    }

    #[test]
    fn test_sale_item_honours_subject_scope() {
        let fx = Fixture::new();
        let luxury = fx.category("Luxury");
        let staple = fx.category("Staples");

        fx.taxes
            .create_tax(Tax::new(
                "luxury levy",
                TaxRate::from_percent(20),
                TaxOrigin::All,
                TaxScope::Subject(scope(&[luxury.id])),
            ))
            .unwrap();

        let watch = fx.item_in("watch", luxury.id, ItemOrigin::Local, Money::from_cents(10_000));
        assert_eq!(
            fx.taxes.sale_item(Some(&watch)).unwrap().tax,
            Money::from_cents(2000)
        );

        let bread = fx.item_in("bread", staple.id, ItemOrigin::Local, Money::from_cents(250));
        assert_eq!(fx.taxes.sale_item(Some(&bread)).unwrap().tax, Money::zero());
    }
}
