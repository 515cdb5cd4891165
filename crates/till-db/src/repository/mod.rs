//! # Repositories
//!
//! One repository per entity family. Each persists its records together with
//! its secondary indexes in the same write transaction, so the index
//! invariants (case-insensitive category-name uniqueness, item→category
//! membership, tax→category scope) can never drift from the records.
//!
//! Every operation exists in two forms: a one-shot method that wraps its own
//! transaction, and a `*_tx` method taking an open transaction so the service
//! layer can compose several repository calls into one atomic unit.

pub mod basket;
pub mod category;
pub mod item;
pub mod receipt;
pub mod tax;

pub use basket::BasketRepository;
pub use category::CategoryRepository;
pub use item::ItemRepository;
pub use receipt::ReceiptRepository;
pub use tax::TaxRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Encodes an entity record as field-tagged JSON bytes.
pub(crate) fn encode<T: Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

/// Decodes an entity record from its stored bytes.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Composite `owner ‖ member` index key: 16 + 16 bytes.
pub(crate) fn composite_key(owner: &Uuid, member: &Uuid) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(owner.as_bytes());
    key[16..].copy_from_slice(member.as_bytes());
    key
}

/// Recovers the member id from a composite index key.
pub(crate) fn composite_member(key: &[u8]) -> StoreResult<Uuid> {
    if key.len() != 32 {
        return Err(StoreError::CorruptIndex(format!(
            "composite key has {} bytes, expected 32",
            key.len()
        )));
    }
    Uuid::from_slice(&key[16..])
        .map_err(|err| StoreError::CorruptIndex(format!("member id: {err}")))
}

/// Marker value for index entries whose key carries all the information.
pub(crate) const INDEX_MARKER: &[u8] = &[];
