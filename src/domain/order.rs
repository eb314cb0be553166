//! Order records, the service-type catalog and the status lifecycle.

use crate::entity::StoreEntity;
use crate::error::{Error, Result};
use crate::ids;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const ORDER_ID_PREFIX: &str = "ORD";

/// Catalog of services an order can be opened for.
///
/// The service type decides which detail payload the order carries and
/// whether the order counts as sales or service work.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    TireSales,
    CarService,
    GeneralInquiry,
}

impl ServiceType {
    /// Every catalog entry, in display order.
    pub const ALL: [ServiceType; 3] = [
        ServiceType::TireSales,
        ServiceType::CarService,
        ServiceType::GeneralInquiry,
    ];

    /// Sales vs. service classification. Tire sales is the only sales
    /// entry; everything else is service work.
    pub fn order_type(&self) -> OrderType {
        match self {
            ServiceType::TireSales => OrderType::Sales,
            ServiceType::CarService | ServiceType::GeneralInquiry => OrderType::Service,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::TireSales => "Tire Sales",
            ServiceType::CarService => "Car Service",
            ServiceType::GeneralInquiry => "General Inquiry",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Broad classification derived from the service type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Sales,
    Service,
}

/// Order priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Position of an order in its lifecycle.
///
/// The expected progression is pending → in-progress → service-complete
/// → ready-for-departure → completed, with cancelled reachable from any
/// active state. The machine is deliberately permissive: any target is
/// accepted from any source, and the status history is the audit trail
/// that records every move, including manual corrections out of a
/// terminal state. The only automatic side effects are tied to entering
/// `completed` (departure stamp and duration calculation).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    ServiceComplete,
    ReadyForDeparture,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::ServiceComplete,
        OrderStatus::ReadyForDeparture,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Completed and cancelled orders are settled; everything else is
    /// still in the shop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::ServiceComplete => "Service Complete",
            OrderStatus::ReadyForDeparture => "Ready for Departure",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Vehicle details attached to a car-service order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VehicleInfo {
    pub plate_number: String,
    pub make: String,
    pub model: String,
}

/// Service-specific detail payload, one variant per catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceDetails {
    TireSales {
        items: Vec<String>,
        brand: String,
        quantity: u32,
        tire_type: String,
    },
    CarService {
        service_types: Vec<String>,
        vehicle_info: VehicleInfo,
        problem_description: String,
        estimated_duration: Option<String>,
    },
    GeneralInquiry {
        inquiry_details: String,
    },
}

impl ServiceDetails {
    /// The catalog entry this payload belongs to.
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::TireSales { .. } => ServiceType::TireSales,
            ServiceDetails::CarService { .. } => ServiceType::CarService,
            ServiceDetails::GeneralInquiry { .. } => ServiceType::GeneralInquiry,
        }
    }
}

/// One entry in an order's status audit trail.
///
/// Entries are append-only; earlier entries are never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub previous_status: Option<OrderStatus>,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A customer visit tracked from arrival to departure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Human-facing daily sequence, `YYMMDD-NNN`
    pub order_number: String,
    /// Reference to the customer; not owned, never cascaded
    pub customer_id: String,
    /// Snapshot of the customer name at creation time; not kept in sync
    /// with later renames
    pub customer_name: String,
    pub order_type: OrderType,
    pub service_type: ServiceType,
    pub status: OrderStatus,
    pub priority: Priority,
    pub description: Option<String>,
    pub estimated_completion: Option<String>,
    pub service_details: ServiceDetails,
    /// When the customer arrived, not just when the record was written
    pub arrival_time: DateTime<Utc>,
    /// Stamped automatically the first time the order completes
    pub departure_time: Option<DateTime<Utc>>,
    /// `"Hh Mm"`, materialized once both timestamps exist
    pub actual_duration: Option<String>,
    pub status_history: Vec<StatusEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub(crate) fn from_new(
        input: NewOrder,
        order_number: String,
        customer_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        let service_type = input.service_details.service_type();
        Order {
            id: ids::generate_id(ORDER_ID_PREFIX),
            order_number,
            customer_id: input.customer_id,
            customer_name,
            order_type: service_type.order_type(),
            service_type,
            status: OrderStatus::Pending,
            priority: input.priority,
            description: input.description,
            estimated_completion: input.estimated_completion,
            service_details: input.service_details,
            arrival_time: input.arrival_time.unwrap_or(now),
            departure_time: None,
            actual_duration: None,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                previous_status: None,
                timestamp: now,
                notes: Some("Order created".to_string()),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the order to `new_status`, appending to the audit trail.
    ///
    /// Entering `completed` for the first time stamps `departure_time`
    /// and materializes `actual_duration`; an already-set departure stamp
    /// is never overwritten, so re-completing is idempotent on both.
    pub(crate) fn record_status(
        &mut self,
        new_status: OrderStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        let previous = self.status;
        self.status = new_status;
        self.updated_at = now;
        self.status_history.push(StatusEntry {
            status: new_status,
            previous_status: Some(previous),
            timestamp: now,
            notes,
        });

        if new_status == OrderStatus::Completed && self.departure_time.is_none() {
            self.departure_time = Some(now);
            self.actual_duration = Some(duration_between(self.arrival_time, now));
        }
    }

    /// Case-insensitive substring match against order number, customer
    /// name, id and description.
    ///
    /// `needle` must already be lowercased; an empty needle matches every
    /// order.
    pub fn matches(&self, needle: &str) -> bool {
        self.order_number.to_lowercase().contains(needle)
            || self.customer_name.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

impl StoreEntity for Order {
    type Key = String;

    fn store_key(&self) -> Self::Key {
        self.id.clone()
    }

    fn store_prefix() -> &'static str {
        "order"
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::ValidationError("order id must not be empty".into()));
        }
        let last = self.status_history.last().ok_or_else(|| {
            Error::ValidationError("order status history must never be empty".into())
        })?;
        if last.status != self.status {
            return Err(Error::ValidationError(format!(
                "order status {} does not match last history entry {}",
                self.status, last.status
            )));
        }
        Ok(())
    }
}

/// Input for opening a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub priority: Priority,
    pub description: Option<String>,
    pub estimated_completion: Option<String>,
    pub service_details: ServiceDetails,
    /// Defaults to the creation instant when not supplied
    pub arrival_time: Option<DateTime<Utc>>,
}

impl NewOrder {
    /// Open an order for a customer with the given detail payload;
    /// everything else defaults.
    pub fn new(customer_id: impl Into<String>, service_details: ServiceDetails) -> Self {
        NewOrder {
            customer_id: customer_id.into(),
            priority: Priority::default(),
            description: None,
            estimated_completion: None,
            service_details,
            arrival_time: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_estimated_completion(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_completion = Some(estimate.into());
        self
    }

    pub fn with_arrival_time(mut self, arrival: DateTime<Utc>) -> Self {
        self.arrival_time = Some(arrival);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.customer_id.trim().is_empty() {
            return Err(Error::ValidationError("customer id must not be empty".into()));
        }
        match &self.service_details {
            ServiceDetails::TireSales { quantity, .. } => {
                if *quantity == 0 {
                    return Err(Error::ValidationError(
                        "tire sales quantity must be at least 1".into(),
                    ));
                }
            }
            ServiceDetails::CarService { service_types, .. } => {
                if service_types.is_empty() {
                    return Err(Error::ValidationError(
                        "car service requires at least one service type".into(),
                    ));
                }
            }
            ServiceDetails::GeneralInquiry { inquiry_details } => {
                if inquiry_details.trim().is_empty() {
                    return Err(Error::ValidationError(
                        "inquiry details must not be empty".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Format a minute count as `"Hh Mm"`.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn duration_between(arrival: DateTime<Utc>, departure: DateTime<Utc>) -> String {
    format_duration((departure - arrival).num_minutes())
}
