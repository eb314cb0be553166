//! CSV export of customer and order lists.
//!
//! Produces a header row followed by one quoted row per record, ready to
//! hand to whatever download/file collaborator the caller uses. Callers
//! pass in the (already filtered) list they want exported.

use crate::domain::{Customer, Order};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct CustomerRow<'a> {
    #[serde(rename = "Customer Code")]
    customer_code: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Customer Type")]
    customer_type: &'static str,
    #[serde(rename = "Registration Date")]
    registration_date: String,
    #[serde(rename = "Total Orders")]
    total_orders: u64,
    #[serde(rename = "Last Visit")]
    last_visit: String,
}

#[derive(Serialize)]
struct OrderRow<'a> {
    #[serde(rename = "Order Number")]
    order_number: &'a str,
    #[serde(rename = "Customer")]
    customer: &'a str,
    #[serde(rename = "Service Type")]
    service_type: &'static str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Priority")]
    priority: &'static str,
    #[serde(rename = "Arrival Time")]
    arrival_time: String,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(rename = "Notes")]
    notes: &'a str,
}

/// Render a customer list as CSV.
pub fn customers_to_csv(customers: &[Customer]) -> Result<String> {
    let mut writer = quoting_writer();
    for customer in customers {
        writer.serialize(CustomerRow {
            customer_code: &customer.id,
            name: &customer.name,
            phone: &customer.phone,
            email: customer.email.as_deref().unwrap_or(""),
            customer_type: customer.customer_type.label(),
            registration_date: format_date(customer.created_at),
            total_orders: customer.total_orders,
            last_visit: customer
                .last_visit
                .map(format_date)
                .unwrap_or_else(|| "Never".to_string()),
        })?;
    }
    finish(writer)
}

/// Render an order list as CSV.
pub fn orders_to_csv(orders: &[Order]) -> Result<String> {
    let mut writer = quoting_writer();
    for order in orders {
        writer.serialize(OrderRow {
            order_number: &order.order_number,
            customer: &order.customer_name,
            service_type: order.service_type.label(),
            status: order.status.label(),
            priority: order.priority.label(),
            arrival_time: format_datetime(order.arrival_time),
            created_at: format_datetime(order.created_at),
            notes: order.description.as_deref().unwrap_or(""),
        })?;
    }
    finish(writer)
}

fn quoting_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(vec![])
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::SerializationError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::SerializationError(e.to_string()))
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
