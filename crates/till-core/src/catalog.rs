//! # Catalog Types
//!
//! Categories and the inventory items that belong to them.
//!
//! ## Identity
//! Every entity carries a 16-byte UUID. `Uuid::nil()` stands for "no id yet":
//! the service layer allocates a fresh v4 id on create when the caller left
//! the id nil, and rejects nil ids everywhere an existing entity is referenced.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Groups inventory items for tax scoping.
///
/// Category names are unique case-insensitively; the storage layer maintains
/// a lower-cased name index and the service layer rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    /// Creates a category with no id yet; the service allocates one on create.
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            id: Uuid::nil(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// Whether an item was sourced locally or imported.
///
/// Drives origin-scoped tax applicability: an import duty applies to
/// `Imported` items only, no matter their category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOrigin {
    Local,
    Imported,
}

/// A physical good available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,

    /// Display name shown on receipts.
    pub name: String,

    /// Category this item belongs to. Must reference an existing category at
    /// creation and on any update that changes it.
    pub category_id: Uuid,

    pub origin: ItemOrigin,

    /// Catalog price in cents, tax exclusive. Never negative.
    pub price: Money,
}

impl InventoryItem {
    /// Creates an item with no id yet; the service allocates one on create.
    pub fn new(name: impl Into<String>, category_id: Uuid, origin: ItemOrigin, price: Money) -> Self {
        InventoryItem {
            id: Uuid::nil(),
            name: name.into(),
            category_id,
            origin,
            price,
        }
    }
}
