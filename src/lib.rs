//! # track-kit
//!
//! A type-safe, storage-agnostic customer and order tracking core for
//! service businesses.
//!
//! ## Features
//!
//! - **Typed Entities:** Customers and orders with enforced invariants,
//!   not stringly-typed blobs
//! - **Backend Agnostic:** Store records in the built-in in-memory
//!   backend or any custom `StoreBackend`
//! - **Audited Lifecycle:** Every order status change lands in an
//!   append-only history with timestamps and notes
//! - **Race-Free Order Numbers:** Daily sequences come from an atomic
//!   reserve-and-increment counter, never from re-counting records
//! - **Read-Side Rollups:** Analytics, notifications, and CSV export as
//!   pure functions over the collections
//! - **Production Ready:** Built-in logging, metrics hooks, and error
//!   handling
//!
//! ## Quick Start
//!
//! ```ignore
//! use track_kit::{TrackingService, backend::InMemoryBackend};
//! use track_kit::domain::{NewCustomer, NewOrder, OrderStatus, ServiceDetails};
//!
//! // 1. Create the service over a backend
//! let service = TrackingService::new(InMemoryBackend::new());
//!
//! // 2. Register a customer (phone is the natural dedup key)
//! let customer = service.create_customer(NewCustomer {
//!     name: "Jane Doe".into(),
//!     phone: "+255700000001".into(),
//!     ..Default::default()
//! }).await?;
//!
//! // 3. Open an order - number, history and customer stats are handled
//! let order = service.create_order(NewOrder::new(
//!     &customer.id,
//!     ServiceDetails::TireSales {
//!         items: vec!["All-season radial".into()],
//!         brand: "Yana".into(),
//!         quantity: 4,
//!         tire_type: "tubeless".into(),
//!     },
//! )).await?;
//!
//! // 4. Progress it - completion stamps departure and duration
//! service.update_order_status(&order.id, OrderStatus::Completed, None).await?;
//!
//! // 5. Read it back
//! let snapshot = service.analytics().await?;
//! ```

#[macro_use]
extern crate log;

pub mod analytics;
pub mod backend;
pub mod domain;
pub mod entity;
pub mod error;
pub mod export;
pub mod ids;
pub mod key;
pub mod notify;
pub mod observability;
pub mod serialization;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use analytics::AnalyticsSnapshot;
pub use backend::StoreBackend;
pub use domain::{Customer, NewCustomer, NewOrder, Order, OrderStatus};
pub use entity::StoreEntity;
pub use error::{Error, Result};
pub use notify::Notification;
pub use service::{ServiceConfig, TrackingService};
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
