//! Customer records and their registration inputs.

use crate::entity::StoreEntity;
use crate::error::{Error, Result};
use crate::ids;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const CUSTOMER_ID_PREFIX: &str = "CUST";

/// Category a customer belongs to.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerType {
    #[default]
    Personal,
    Business,
    Government,
    Ngo,
    BodaBoda,
}

impl CustomerType {
    /// Every customer type, in display order.
    pub const ALL: [CustomerType; 5] = [
        CustomerType::Personal,
        CustomerType::Business,
        CustomerType::Government,
        CustomerType::Ngo,
        CustomerType::BodaBoda,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CustomerType::Personal => "Personal",
            CustomerType::Business => "Business",
            CustomerType::Government => "Government",
            CustomerType::Ngo => "NGO",
            CustomerType::BodaBoda => "Boda Boda",
        }
    }
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A vehicle registered against a customer.
///
/// The list is append-only from the customer's perspective: vehicles are
/// added with a timestamp and never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub plate_number: Option<String>,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub added_at: DateTime<Utc>,
}

/// Vehicle details as supplied by a registration, before timestamping.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub plate_number: Option<String>,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
}

impl VehicleSpec {
    fn into_vehicle(self, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            plate_number: self.plate_number,
            make: self.make,
            model: self.model,
            vehicle_type: self.vehicle_type,
            added_at: now,
        }
    }
}

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Natural dedup key: at most one customer per phone number
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub notes: Option<String>,
    pub vehicles: Vec<Vehicle>,
    /// Derived counter, recomputed whenever an order is created for this
    /// customer. Managed by the service, never set by callers.
    pub total_orders: u64,
    /// Most recent order creation or completion. Managed by the service.
    pub last_visit: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub(crate) fn from_new(input: NewCustomer, now: DateTime<Utc>) -> Self {
        Customer {
            id: ids::generate_id(CUSTOMER_ID_PREFIX),
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            customer_type: input.customer_type,
            notes: input.notes,
            vehicles: input
                .vehicles
                .into_iter()
                .map(|v| v.into_vehicle(now))
                .collect(),
            total_orders: 0,
            last_visit: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn add_vehicle(&mut self, vehicle: VehicleSpec, now: DateTime<Utc>) {
        self.vehicles.push(vehicle.into_vehicle(now));
        self.updated_at = now;
    }

    pub(crate) fn apply(&mut self, patch: CustomerPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(customer_type) = patch.customer_type {
            self.customer_type = customer_type;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        self.updated_at = now;
    }

    /// Case-insensitive substring match against name, phone, email and id.
    ///
    /// `needle` must already be lowercased; an empty needle matches every
    /// customer.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.phone.to_lowercase().contains(needle)
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(needle))
            || self.id.to_lowercase().contains(needle)
    }
}

impl StoreEntity for Customer {
    type Key = String;

    fn store_key(&self) -> Self::Key {
        self.id.clone()
    }

    fn store_prefix() -> &'static str {
        "customer"
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::ValidationError("customer id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError(
                "customer name must not be empty".into(),
            ));
        }
        if self.phone.trim().is_empty() {
            return Err(Error::ValidationError(
                "customer phone must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Input for registering a new customer.
///
/// Phone format policy stays with the caller: duplicate detection is an
/// exact string comparison on whatever is supplied here.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub notes: Option<String>,
    pub vehicles: Vec<VehicleSpec>,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError(
                "customer name must not be empty".into(),
            ));
        }
        if self.phone.trim().is_empty() {
            return Err(Error::ValidationError(
                "customer phone must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Shallow-merge patch for an existing customer.
///
/// Only the fields a caller may edit appear here; `total_orders` and
/// `last_visit` are derived by the service.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub notes: Option<String>,
}

impl CustomerPatch {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
