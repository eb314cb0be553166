//! Read-side analytics rollups.
//!
//! Every rollup is a pure function over the full collections, recomputed
//! from scratch per call: callers pass the state in, nothing is cached
//! between calls. `TrackingService::analytics` is the usual entry point.

use crate::domain::{format_duration, Customer, CustomerType, Order, OrderStatus, ServiceType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Arrivals and completions for one calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub arrivals: usize,
    pub completions: usize,
}

/// Point-in-time summary of shop activity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsSnapshot {
    pub total_customers: usize,
    pub total_orders: usize,
    /// Orders in any non-terminal status
    pub active_orders: usize,
    /// Orders whose departure stamp falls on the snapshot day
    pub completed_today: usize,
    pub pending_orders: usize,
    pub in_progress_orders: usize,
    pub ready_for_departure: usize,
    /// Mean completed-service duration, `"Hh Mm"`
    pub average_service_time: String,
    pub customer_types: BTreeMap<CustomerType, usize>,
    pub service_types: BTreeMap<ServiceType, usize>,
    /// Trailing window of daily activity, oldest day first, ending today
    pub daily: Vec<DailyActivity>,
}

/// Compute the full snapshot for the given collections.
pub fn snapshot(
    customers: &[Customer],
    orders: &[Order],
    now: DateTime<Utc>,
    window_days: u32,
) -> AnalyticsSnapshot {
    let today = now.date_naive();

    let mut customer_types: BTreeMap<CustomerType, usize> = BTreeMap::new();
    for customer_type in CustomerType::ALL {
        customer_types.insert(customer_type, 0);
    }
    for customer in customers {
        *customer_types.entry(customer.customer_type).or_insert(0) += 1;
    }

    let mut service_types: BTreeMap<ServiceType, usize> = BTreeMap::new();
    for service_type in ServiceType::ALL {
        service_types.insert(service_type, 0);
    }
    for order in orders {
        *service_types.entry(order.service_type).or_insert(0) += 1;
    }

    AnalyticsSnapshot {
        total_customers: customers.len(),
        total_orders: orders.len(),
        active_orders: orders.iter().filter(|o| o.status.is_active()).count(),
        completed_today: completions_on(orders, today),
        pending_orders: count_status(orders, OrderStatus::Pending),
        in_progress_orders: count_status(orders, OrderStatus::InProgress),
        ready_for_departure: count_status(orders, OrderStatus::ReadyForDeparture),
        average_service_time: average_service_time(orders),
        customer_types,
        service_types,
        daily: daily_activity(orders, today, window_days),
    }
}

/// Mean completed-service duration across orders with a departure stamp,
/// formatted `"Hh Mm"`. `"0h 0m"` when no order qualifies.
pub fn average_service_time(orders: &[Order]) -> String {
    let durations: Vec<f64> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .filter_map(|o| {
            o.departure_time
                .map(|d| (d - o.arrival_time).num_seconds() as f64 / 60.0)
        })
        .collect();

    if durations.is_empty() {
        return "0h 0m".to_string();
    }

    let avg_minutes = durations.iter().sum::<f64>() / durations.len() as f64;
    format_duration(avg_minutes as i64)
}

/// Arrivals vs. completions per day over a trailing window ending `today`.
pub fn daily_activity(orders: &[Order], today: NaiveDate, window_days: u32) -> Vec<DailyActivity> {
    (0..i64::from(window_days))
        .rev()
        .map(|offset| {
            let date = today - chrono::Duration::days(offset);
            DailyActivity {
                date,
                arrivals: orders
                    .iter()
                    .filter(|o| o.arrival_time.date_naive() == date)
                    .count(),
                completions: completions_on(orders, date),
            }
        })
        .collect()
}

fn count_status(orders: &[Order], status: OrderStatus) -> usize {
    orders.iter().filter(|o| o.status == status).count()
}

fn completions_on(orders: &[Order], date: NaiveDate) -> usize {
    orders
        .iter()
        .filter(|o| {
            o.status == OrderStatus::Completed
                && o.departure_time.is_some_and(|d| d.date_naive() == date)
        })
        .count()
}
