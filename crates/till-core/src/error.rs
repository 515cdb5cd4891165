//! # Domain Error Kinds
//!
//! One kind per business-rule violation. The service layer returns these
//! untouched so a transport can map them mechanically (validation failures
//! to 400s, absent reads to empty responses, storage failures to 500s).
//!
//! Validation always precedes any store write: when an operation returns one
//! of these kinds, no state has changed.

use thiserror::Error;

/// Business rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required object is absent, e.g. pricing an item that does not exist.
    #[error("invalid parameter")]
    InvalidParameter,

    /// Category id is nil, colliding, or does not resolve.
    #[error("invalid category id")]
    InvalidCategoryId,

    /// Category name is missing or duplicates an existing name
    /// (case-insensitively).
    #[error("invalid category name")]
    InvalidCategoryName,

    /// Category delete blocked: at least one item still references it.
    #[error("category is not empty")]
    CategoryNotEmpty,

    /// Item id is nil, colliding, or does not resolve; also an item that is
    /// not a line of the basket it is being removed from.
    #[error("invalid item id")]
    InvalidItemId,

    /// Item name is missing.
    #[error("invalid item name")]
    InvalidItemName,

    /// Item price is negative.
    #[error("invalid item price")]
    InvalidItemPrice,

    /// Tax id is nil, colliding, or does not resolve.
    #[error("invalid tax id")]
    InvalidTaxId,

    /// Tax name is missing.
    #[error("invalid tax name")]
    InvalidTaxName,

    /// Tax rate is not positive.
    #[error("invalid tax rate")]
    InvalidTaxRate,

    /// Basket id is nil or does not resolve.
    #[error("invalid basket id")]
    InvalidBasketId,

    /// Count is not positive, or a removal exceeds the line's current count.
    #[error("invalid item count")]
    InvalidItemCount,

    /// Basket is closed or cancelled; no further mutation is permitted.
    #[error("basket not open")]
    BasketNotOpen,

    /// Close rejected: the basket has no lines.
    #[error("no item in basket")]
    NoItemInBasket,

    /// Receipt id is nil.
    #[error("invalid receipt id")]
    InvalidReceiptId,
}

/// Convenience alias for pure domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(DomainError::BasketNotOpen.to_string(), "basket not open");
        assert_eq!(
            DomainError::CategoryNotEmpty.to_string(),
            "category is not empty"
        );
    }
}
