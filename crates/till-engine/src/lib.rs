//! # till-engine: Service Layer for Till
//!
//! The operation surface of Till. A request router (not part of this
//! workspace) decodes payloads, calls these services, and maps
//! [`EngineError`] onto transport status codes: domain kinds to client
//! errors, absent reads to empty responses, storage failures to server
//! errors.
//!
//! ## Services
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  CatalogService   categories + inventory items                  │
//! │  TaxService       tax definitions + sale-item resolution        │
//! │  SalesService     basket lifecycle + receipts                   │
//! │                                                                 │
//! │  SalesService ──► CatalogService (item lookup)                  │
//! │               ──► TaxService     (pricing at add time)          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wiring
//! ```rust,no_run
//! use std::sync::Arc;
//! use till_db::Store;
//! use till_engine::{CatalogService, SalesService, TaxService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(Store::open("till.redb")?);
//! let catalog = CatalogService::new(store.clone());
//! let taxes = TaxService::new(store.clone());
//! let sales = SalesService::new(store, catalog.clone(), taxes.clone());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod sales;
pub mod tax;

#[cfg(test)]
mod testutil;

pub use catalog::CatalogService;
pub use error::{EngineError, EngineResult};
pub use sales::SalesService;
pub use tax::TaxService;
