//! # till-core: Pure Business Logic for Till
//!
//! This crate is the heart of Till. It contains the business rules of the
//! sales transaction and tax resolution engine as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  request router (out of scope)                                  │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  till-engine   CatalogService · TaxService · SalesService       │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  ★ till-core (THIS CRATE) ★                                     │
//! │     money · catalog · tax · sales · error                       │
//! │     NO I/O • NO DATABASE • PURE FUNCTIONS                       │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  till-db       indexed store (redb) + repositories              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` (integer cents) and `TaxRate` (basis points), with
//!   the cash rounding law
//! - [`catalog`] - `Category`, `InventoryItem`, item origins
//! - [`tax`] - `Tax` definitions and the eligibility rule
//! - [`sales`] - basket state machine, `SaleItem`, `Receipt`
//! - [`error`] - domain error kinds
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output; the only clock use is the
//!    receipt snapshot timestamp
//! 2. **Integer money**: all monetary values are cents (i64), never floats
//! 3. **Explicit errors**: every rule violation is a typed kind, never a panic

pub mod catalog;
pub mod error;
pub mod money;
pub mod sales;
pub mod tax;

pub use catalog::{Category, InventoryItem, ItemOrigin};
pub use error::{DomainError, DomainResult};
pub use money::{Money, TaxRate};
pub use sales::{Basket, BasketItem, BasketState, Receipt, SaleItem};
pub use tax::{Tax, TaxOrigin, TaxScope};
