//! # Tax Types
//!
//! Tax definitions and the eligibility rule that decides which taxes apply
//! to an inventory item.
//!
//! ## Eligibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  A tax applies to an item when BOTH hold:                       │
//! │                                                                 │
//! │  1. origin matches    tax.origin is All, or equals item.origin  │
//! │  2. scope admits      Unconditional        → always            │
//! │     the category      Subject({c₁, c₂…})   → category ∈ set    │
//! │                       Exempt({c₁, c₂…})    → category ∉ set    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//! Eligible taxes stack: their rates are summed before rounding.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ItemOrigin;
use crate::money::TaxRate;

// =============================================================================
// Tax Origin
// =============================================================================

/// The item origins a tax is levied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxOrigin {
    Local,
    Imported,
    All,
}

impl TaxOrigin {
    /// Whether this tax origin covers the given item origin.
    pub fn matches(&self, origin: ItemOrigin) -> bool {
        match self {
            TaxOrigin::All => true,
            TaxOrigin::Local => origin == ItemOrigin::Local,
            TaxOrigin::Imported => origin == ItemOrigin::Imported,
        }
    }
}

// =============================================================================
// Tax Scope
// =============================================================================

/// The category-based half of the eligibility rule.
///
/// One variant per condition, with the scope set carried inside the variant,
/// so there is exactly one place the rule is evaluated. Persisted records
/// stay field-tagged: `{"condition": "subject", "categories": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition", content = "categories", rename_all = "lowercase")]
pub enum TaxScope {
    /// Applies to every item whose origin matches, category ignored.
    Unconditional,
    /// Applies only when the item's category is in the set.
    Subject(BTreeSet<Uuid>),
    /// Applies to every matching item EXCEPT those whose category is in the set.
    Exempt(BTreeSet<Uuid>),
}

impl TaxScope {
    /// Evaluates the category rule for one item category.
    pub fn admits(&self, category_id: &Uuid) -> bool {
        match self {
            TaxScope::Unconditional => true,
            TaxScope::Subject(scope) => scope.contains(category_id),
            TaxScope::Exempt(scope) => !scope.contains(category_id),
        }
    }

    /// The category ids parameterizing this scope; empty for `Unconditional`.
    /// The storage layer mirrors these into the tax→category index.
    pub fn category_ids(&self) -> impl Iterator<Item = &Uuid> {
        match self {
            TaxScope::Unconditional => None,
            TaxScope::Subject(scope) | TaxScope::Exempt(scope) => Some(scope.iter()),
        }
        .into_iter()
        .flatten()
    }
}

// =============================================================================
// Tax
// =============================================================================

/// A tax rule: a rate levied on items selected by origin and category scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    pub id: Uuid,
    pub name: String,

    /// Rate in basis points. Must be positive.
    pub rate: TaxRate,

    pub origin: TaxOrigin,

    #[serde(flatten)]
    pub scope: TaxScope,
}

impl Tax {
    /// Creates a tax with no id yet; the service allocates one on create.
    pub fn new(name: impl Into<String>, rate: TaxRate, origin: TaxOrigin, scope: TaxScope) -> Self {
        Tax {
            id: Uuid::nil(),
            name: name.into(),
            rate,
            origin,
            scope,
        }
    }

    /// The full eligibility rule: origin match AND category admission.
    pub fn applies_to(&self, origin: ItemOrigin, category_id: &Uuid) -> bool {
        self.origin.matches(origin) && self.scope.admits(category_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_of(ids: &[Uuid]) -> BTreeSet<Uuid> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_origin_matching() {
        assert!(TaxOrigin::All.matches(ItemOrigin::Local));
        assert!(TaxOrigin::All.matches(ItemOrigin::Imported));
        assert!(TaxOrigin::Local.matches(ItemOrigin::Local));
        assert!(!TaxOrigin::Local.matches(ItemOrigin::Imported));
        assert!(TaxOrigin::Imported.matches(ItemOrigin::Imported));
        assert!(!TaxOrigin::Imported.matches(ItemOrigin::Local));
    }

    #[test]
    fn test_unconditional_ignores_category() {
        let any = Uuid::new_v4();
        assert!(TaxScope::Unconditional.admits(&any));
    }

    #[test]
    fn test_subject_requires_membership() {
        let in_scope = Uuid::new_v4();
        let out_of_scope = Uuid::new_v4();
        let scope = TaxScope::Subject(scope_of(&[in_scope]));

        assert!(scope.admits(&in_scope));
        assert!(!scope.admits(&out_of_scope));
    }

    #[test]
    fn test_exempt_excludes_membership() {
        let exempted = Uuid::new_v4();
        let other = Uuid::new_v4();
        let scope = TaxScope::Exempt(scope_of(&[exempted]));

        assert!(!scope.admits(&exempted));
        assert!(scope.admits(&other));
    }

    #[test]
    fn test_applies_to_needs_both_halves() {
        let category = Uuid::new_v4();
        let tax = Tax::new(
            "import duty",
            TaxRate::from_percent(5),
            TaxOrigin::Imported,
            TaxScope::Unconditional,
        );

        assert!(tax.applies_to(ItemOrigin::Imported, &category));
        assert!(!tax.applies_to(ItemOrigin::Local, &category));

        let exempting = Tax::new(
            "basic sales tax",
            TaxRate::from_percent(10),
            TaxOrigin::All,
            TaxScope::Exempt(scope_of(&[category])),
        );
        assert!(!exempting.applies_to(ItemOrigin::Local, &category));
        assert!(exempting.applies_to(ItemOrigin::Local, &Uuid::new_v4()));
    }

    #[test]
    fn test_scope_category_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let none: Vec<_> = TaxScope::Unconditional.category_ids().collect();
        assert!(none.is_empty());

        let some: BTreeSet<_> = TaxScope::Subject(scope_of(&[a, b]))
            .category_ids()
            .copied()
            .collect();
        assert_eq!(some, scope_of(&[a, b]));
    }

    #[test]
    fn test_record_is_field_tagged() {
        let tax = Tax {
            id: Uuid::new_v4(),
            name: "books exemption".into(),
            rate: TaxRate::from_percent(10),
            origin: TaxOrigin::All,
            scope: TaxScope::Exempt(scope_of(&[Uuid::new_v4()])),
        };

        let value = serde_json::to_value(&tax).unwrap();
        assert_eq!(value["condition"], "exempt");
        assert!(value["categories"].is_array());

        let back: Tax = serde_json::from_value(value).unwrap();
        assert_eq!(back, tax);
    }

    #[test]
    fn test_unconditional_record_roundtrip() {
        let tax = Tax::new(
            "basic sales tax",
            TaxRate::from_percent(10),
            TaxOrigin::All,
            TaxScope::Unconditional,
        );
        let json = serde_json::to_string(&tax).unwrap();
        let back: Tax = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scope, TaxScope::Unconditional);
    }
}
