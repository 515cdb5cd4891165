//! # till-db: Storage Layer for Till
//!
//! This crate provides all persistence for Till: the indexed store (a
//! single-file transactional byte-key/byte-value store with named
//! containers, backed by redb) and the repositories that keep entity
//! records and their secondary indexes consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  till-engine services                                           │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  till-db (THIS CRATE)                     │  │
//! │  │                                                           │  │
//! │  │   ┌─────────────┐        ┌────────────────────────────┐   │  │
//! │  │   │    Store    │◄───────│       Repositories         │   │  │
//! │  │   │ (store.rs)  │        │ category · item · tax      │   │  │
//! │  │   │ view/update │        │ basket · receipt           │   │  │
//! │  │   │ containers  │        │ + secondary indexes        │   │  │
//! │  │   └─────────────┘        └────────────────────────────┘   │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  single redb file (till.redb)                                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `Store`, transactions, containers
//! - [`error`] - `StoreError`
//! - [`repository`] - repository implementations

pub mod error;
pub mod repository;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use repository::{
    BasketRepository, CategoryRepository, ItemRepository, ReceiptRepository, TaxRepository,
};
pub use store::{Container, ReadTxn, Store, StoreReader, WriteTxn};
