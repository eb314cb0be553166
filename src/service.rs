//! High-level tracking service.
//!
//! `TrackingService` is the command/query surface consumed by every
//! screen: customer registration, order creation, status updates, the
//! searches behind the list views, and the analytics/notification reads
//! behind the dashboard. It wraps an `Arc<RecordStore>` so handles are
//! cheap to clone and share.
//!
//! Commands validate first and mutate second; a failed command leaves
//! the store untouched. Queries never fail on absent records - unknown
//! ids come back as `Ok(None)` and empty matches as empty vectors.

use crate::analytics::{self, AnalyticsSnapshot};
use crate::backend::StoreBackend;
use crate::domain::{
    Customer, CustomerPatch, NewCustomer, NewOrder, Order, OrderStatus, VehicleSpec,
};
use crate::entity::StoreEntity;
use crate::error::{Error, Result};
use crate::ids;
use crate::key::KeyBuilder;
use crate::notify::{self, Notification};
use crate::observability::StoreMetrics;
use crate::store::RecordStore;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Tunables for the tracking service.
///
/// # Example
///
/// ```
/// use track_kit::ServiceConfig;
/// use chrono::Duration;
///
/// let config = ServiceConfig::default()
///     .with_long_wait_threshold(Duration::hours(2))
///     .with_trend_window_days(14);
/// ```
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// How long a customer may wait before a warning notification fires
    pub long_wait_threshold: Duration,
    /// Length of the daily-activity window in `analytics()`
    pub trend_window_days: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            long_wait_threshold: Duration::hours(3),
            trend_window_days: 7,
        }
    }
}

impl ServiceConfig {
    /// Override the long-wait notification threshold.
    pub fn with_long_wait_threshold(mut self, threshold: Duration) -> Self {
        self.long_wait_threshold = threshold;
        self
    }

    /// Override the daily-activity window length.
    pub fn with_trend_window_days(mut self, days: u32) -> Self {
        self.trend_window_days = days;
        self
    }
}

/// The tracking system's command/query API.
///
/// # Example
///
/// ```ignore
/// use track_kit::{TrackingService, backend::InMemoryBackend};
/// use track_kit::domain::{NewCustomer, NewOrder, ServiceDetails};
///
/// let service = TrackingService::new(InMemoryBackend::new());
///
/// let customer = service.create_customer(NewCustomer {
///     name: "Jane Doe".into(),
///     phone: "+255700000001".into(),
///     ..Default::default()
/// }).await?;
///
/// let order = service.create_order(NewOrder::new(
///     &customer.id,
///     ServiceDetails::GeneralInquiry { inquiry_details: "quote".into() },
/// )).await?;
/// ```
#[derive(Clone)]
pub struct TrackingService<B: StoreBackend> {
    store: Arc<RecordStore<B>>,
    config: ServiceConfig,
}

impl<B: StoreBackend> TrackingService<B> {
    /// Create a new tracking service with the given backend.
    pub fn new(backend: B) -> Self {
        TrackingService {
            store: Arc::new(RecordStore::new(backend)),
            config: ServiceConfig::default(),
        }
    }

    /// Create a new tracking service with custom configuration.
    pub fn with_config(backend: B, config: ServiceConfig) -> Self {
        TrackingService {
            store: Arc::new(RecordStore::new(backend)),
            config,
        }
    }

    /// Create a new tracking service with custom store metrics.
    pub fn with_metrics(backend: B, metrics: Box<dyn StoreMetrics>) -> Self {
        TrackingService {
            store: Arc::new(RecordStore::new(backend).with_metrics(metrics)),
            config: ServiceConfig::default(),
        }
    }

    /// Get a reference to the underlying record store.
    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    // ========================================================================
    // Customer commands
    // ========================================================================

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: name or phone is blank
    /// - `Error::DuplicatePhone`: another customer already has this phone
    ///   number (exact string match)
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
        input.validate()?;

        if self.customer_by_phone(&input.phone).await?.is_some() {
            return Err(Error::DuplicatePhone(input.phone));
        }

        let customer = Customer::from_new(input, Utc::now());
        self.store.insert(&customer).await?;

        debug!("✓ Customer {} registered ({})", customer.id, customer.name);
        Ok(customer)
    }

    /// Apply a shallow-merge patch to an existing customer.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: unknown customer id
    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> Result<Customer> {
        let mut customer = self.require_customer(id).await?;
        customer.apply(patch, Utc::now());
        self.store.replace(&customer).await?;

        debug!("✓ Customer {} updated", customer.id);
        Ok(customer)
    }

    /// Register another vehicle against a customer. The vehicle list is
    /// append-only.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: unknown customer id
    pub async fn add_vehicle(&self, customer_id: &str, vehicle: VehicleSpec) -> Result<Customer> {
        let mut customer = self.require_customer(customer_id).await?;
        customer.add_vehicle(vehicle, Utc::now());
        self.store.replace(&customer).await?;

        debug!("✓ Customer {} vehicle added", customer.id);
        Ok(customer)
    }

    // ========================================================================
    // Order commands
    // ========================================================================

    /// Open a new order for an existing customer.
    ///
    /// The order number is reserved from the per-day atomic counter, the
    /// status history is seeded with an "Order created" entry, and the
    /// referenced customer's `total_orders`/`last_visit` are refreshed.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: invalid detail payload
    /// - `Error::NotFound`: `customer_id` does not resolve to a customer
    pub async fn create_order(&self, input: NewOrder) -> Result<Order> {
        input.validate()?;

        let customer = self.require_customer(&input.customer_id).await?;

        let now = Utc::now();
        let day = now.date_naive();
        let sequence = self
            .store
            .next_in_series(&KeyBuilder::order_day_series(day))
            .await?;
        let order_number = ids::order_number(day, sequence);

        let order = Order::from_new(input, order_number, customer.name.clone(), now);
        self.store.insert(&order).await?;

        self.refresh_customer_order_stats(customer).await?;

        debug!("✓ Order {} created ({})", order.id, order.order_number);
        Ok(order)
    }

    /// Move an order to a new status, appending to its audit trail.
    ///
    /// Any target status is accepted from any source; the history records
    /// every move. Entering `completed` stamps the departure time (once),
    /// materializes the actual duration, and refreshes the customer's
    /// `last_visit`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: unknown order id
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order> {
        let mut order = self
            .store
            .get::<Order>(&order_id.to_string())
            .await?
            .ok_or_else(|| Error::NotFound {
                kind: Order::store_prefix(),
                id: order_id.to_string(),
            })?;

        let now = Utc::now();
        order.record_status(status, notes.map(str::to_string), now);
        self.store.replace(&order).await?;

        if status == OrderStatus::Completed {
            // Tolerate a customer record removed out-of-band; the order
            // keeps its snapshot either way.
            if let Some(mut customer) = self.customer_by_id(&order.customer_id).await? {
                customer.last_visit = Some(now);
                customer.updated_at = now;
                self.store.replace(&customer).await?;
            }
        }

        debug!("✓ Order {} -> {}", order.id, status);
        Ok(order)
    }

    // ========================================================================
    // Customer queries
    // ========================================================================

    /// Every customer, in storage insertion order.
    pub async fn all_customers(&self) -> Result<Vec<Customer>> {
        self.store.all::<Customer>().await
    }

    /// Exact-match lookup by id.
    pub async fn customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        self.store.get::<Customer>(&id.to_string()).await
    }

    /// Exact-match lookup by phone number.
    pub async fn customer_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        let customers = self.all_customers().await?;
        Ok(customers.into_iter().find(|c| c.phone == phone))
    }

    /// Case-insensitive substring search over name, phone, email and id.
    /// An empty query matches everything.
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>> {
        let needle = query.to_lowercase();
        let customers = self.all_customers().await?;
        Ok(customers.into_iter().filter(|c| c.matches(&needle)).collect())
    }

    // ========================================================================
    // Order queries
    // ========================================================================

    /// Every order, in storage insertion order.
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.store.all::<Order>().await
    }

    /// Exact-match lookup by id.
    pub async fn order_by_id(&self, id: &str) -> Result<Option<Order>> {
        self.store.get::<Order>(&id.to_string()).await
    }

    /// Every order referencing the given customer.
    pub async fn orders_by_customer(&self, customer_id: &str) -> Result<Vec<Order>> {
        let orders = self.all_orders().await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.customer_id == customer_id)
            .collect())
    }

    /// Every order currently in the given status.
    pub async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let orders = self.all_orders().await?;
        Ok(orders.into_iter().filter(|o| o.status == status).collect())
    }

    /// Case-insensitive substring search over order number, customer
    /// name, id and description. An empty query matches everything.
    pub async fn search_orders(&self, query: &str) -> Result<Vec<Order>> {
        let needle = query.to_lowercase();
        let orders = self.all_orders().await?;
        Ok(orders.into_iter().filter(|o| o.matches(&needle)).collect())
    }

    // ========================================================================
    // Rollups
    // ========================================================================

    /// Compute the current analytics snapshot from scratch.
    pub async fn analytics(&self) -> Result<AnalyticsSnapshot> {
        let customers = self.all_customers().await?;
        let orders = self.all_orders().await?;
        Ok(analytics::snapshot(
            &customers,
            &orders,
            Utc::now(),
            self.config.trend_window_days,
        ))
    }

    /// Compute the current notification list.
    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        let orders = self.all_orders().await?;
        Ok(notify::sweep(
            &orders,
            Utc::now(),
            self.config.long_wait_threshold,
        ))
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    async fn require_customer(&self, id: &str) -> Result<Customer> {
        self.customer_by_id(id).await?.ok_or_else(|| Error::NotFound {
            kind: Customer::store_prefix(),
            id: id.to_string(),
        })
    }

    /// Recount the customer's orders and stamp the visit after an order
    /// was created for them.
    async fn refresh_customer_order_stats(&self, mut customer: Customer) -> Result<()> {
        let total = self.orders_by_customer(&customer.id).await?.len() as u64;
        let now = Utc::now();
        customer.total_orders = total;
        customer.last_visit = Some(now);
        customer.updated_at = now;
        self.store.replace(&customer).await
    }
}
