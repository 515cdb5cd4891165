//! # Indexed Store
//!
//! A transactional, ordered byte-key/byte-value store with named containers,
//! backed by a single redb file.
//!
//! ## Transaction Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  view(f)    f runs against a consistent read snapshot           │
//! │                                                                 │
//! │  update(f)  f sees its own writes; on Ok the whole unit commits │
//! │             atomically, on Err the transaction ABORTS and no    │
//! │             write becomes visible                               │
//! │                                                                 │
//! │  Writers are serialized store-wide; readers run concurrently    │
//! │  against the last committed snapshot.                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Containers
//! A [`Container`] is a named key-value namespace. Containers are created on
//! first write use and persist across restarts. Reading a container that was
//! never written behaves as empty. Keys are application-chosen bytes: 16-byte
//! entity ids, lower-cased names, or 32-byte `owner ‖ member` composites for
//! the secondary indexes — prefix scans over the owner half give the
//! owner→member index scans the repositories need.

use std::ops::Bound;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition, TableError};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

type Def = TableDefinition<'static, &'static [u8], &'static [u8]>;

// =============================================================================
// Container
// =============================================================================

/// A named key-value namespace inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    name: &'static str,
}

impl Container {
    pub const fn new(name: &'static str) -> Self {
        Container { name }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn definition(&self) -> Def {
        TableDefinition::new(self.name)
    }
}

/// Smallest byte string strictly greater than every key with `prefix`,
/// or `None` when the prefix is all `0xff` and no such bound exists.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last == u8::MAX {
            end.pop();
        } else {
            *last += 1;
            return Some(end);
        }
    }
    None
}

// =============================================================================
// Read Access
// =============================================================================

/// Read operations shared by read and write transactions, so repository
/// lookups compose into either.
pub trait StoreReader {
    /// Point lookup. `None` for a missing key or a never-written container.
    fn get(&self, container: Container, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Full scan in key order.
    fn scan(&self, container: Container) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Scan of all entries whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, container: Container, prefix: &[u8])
        -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;
}

fn read_table<T: ReadableTable<&'static [u8], &'static [u8]>>(
    table: &T,
    key: &[u8],
) -> StoreResult<Option<Vec<u8>>> {
    Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
}

fn scan_table<T: ReadableTable<&'static [u8], &'static [u8]>>(
    table: &T,
) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut entries = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        entries.push((key.value().to_vec(), value.value().to_vec()));
    }
    Ok(entries)
}

fn scan_table_prefix<T: ReadableTable<&'static [u8], &'static [u8]>>(
    table: &T,
    prefix: &[u8],
) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
    let upper = prefix_successor(prefix);
    let end = match upper.as_deref() {
        Some(bound) => Bound::Excluded(bound),
        None => Bound::Unbounded,
    };

    let mut entries = Vec::new();
    for entry in table.range::<&[u8]>((Bound::Included(prefix), end))? {
        let (key, value) = entry?;
        entries.push((key.value().to_vec(), value.value().to_vec()));
    }
    Ok(entries)
}

// =============================================================================
// Transactions
// =============================================================================

/// A read transaction: a consistent snapshot of the whole store.
pub struct ReadTxn {
    inner: redb::ReadTransaction,
}

impl StoreReader for ReadTxn {
    fn get(&self, container: Container, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.inner.open_table(container.definition()) {
            Ok(table) => read_table(&table, key),
            Err(TableError::TableDoesNotExist(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn scan(&self, container: Container) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        match self.inner.open_table(container.definition()) {
            Ok(table) => scan_table(&table),
            Err(TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn scan_prefix(
        &self,
        container: Container,
        prefix: &[u8],
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        match self.inner.open_table(container.definition()) {
            Ok(table) => scan_table_prefix(&table, prefix),
            Err(TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A write transaction: an atomic multi-container read/write unit.
///
/// Write methods take `&self`; redb serializes write transactions store-wide,
/// so there is exactly one of these in flight at a time.
pub struct WriteTxn {
    inner: redb::WriteTransaction,
}

impl WriteTxn {
    pub fn put(&self, container: Container, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut table = self.inner.open_table(container.definition())?;
        table.insert(key, value)?;
        Ok(())
    }

    /// Removes a key. Missing keys are not an error.
    pub fn delete(&self, container: Container, key: &[u8]) -> StoreResult<()> {
        let mut table = self.inner.open_table(container.definition())?;
        table.remove(key)?;
        Ok(())
    }

    /// Removes every entry whose key starts with `prefix`; returns how many
    /// entries went away. This is how an owner's whole index sub-range is
    /// dropped.
    pub fn delete_prefix(&self, container: Container, prefix: &[u8]) -> StoreResult<usize> {
        let mut table = self.inner.open_table(container.definition())?;
        let keys: Vec<Vec<u8>> = {
            let upper = prefix_successor(prefix);
            let end = match upper.as_deref() {
                Some(bound) => Bound::Excluded(bound),
                None => Bound::Unbounded,
            };
            let mut keys = Vec::new();
            for entry in table.range::<&[u8]>((Bound::Included(prefix), end))? {
                let (key, _) = entry?;
                keys.push(key.value().to_vec());
            }
            keys
        };

        for key in &keys {
            table.remove(key.as_slice())?;
        }
        Ok(keys.len())
    }
}

impl StoreReader for WriteTxn {
    fn get(&self, container: Container, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let table = self.inner.open_table(container.definition())?;
        read_table(&table, key)
    }

    fn scan(&self, container: Container) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let table = self.inner.open_table(container.definition())?;
        scan_table(&table)
    }

    fn scan_prefix(
        &self,
        container: Container,
        prefix: &[u8],
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let table = self.inner.open_table(container.definition())?;
        scan_table_prefix(&table, prefix)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the single-file embedded store.
pub struct Store {
    db: Database,
}

impl Store {
    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let db = Database::create(path)?;
        debug!(path = %path.display(), "opened store");
        Ok(Store { db })
    }

    /// Runs `f` against a consistent read snapshot.
    pub fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&ReadTxn) -> Result<T, E>,
    {
        let inner = self.db.begin_read().map_err(StoreError::from)?;
        f(&ReadTxn { inner })
    }

    /// Runs `f` inside a write transaction.
    ///
    /// On `Ok` every write in the unit commits atomically and becomes
    /// visible to subsequent transactions; on `Err` the transaction aborts
    /// and no write takes effect.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&WriteTxn) -> Result<T, E>,
    {
        let inner = self.db.begin_write().map_err(StoreError::from)?;
        let txn = WriteTxn { inner };
        match f(&txn) {
            Ok(value) => {
                txn.inner.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = txn.inner.abort() {
                    warn!(error = %abort_err, "failed to abort write transaction");
                }
                Err(err)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
