//! Notification sweep over the order collection.
//!
//! Like the analytics rollups, this is a pure read-side computation:
//! callers pass the orders in and get the current notification list back.

use crate::domain::{Order, OrderStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Notification severity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Warning,
    Info,
}

/// A notice surfaced to the operator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Compute the current notifications.
///
/// - **Warning** for every active order whose customer has been waiting
///   longer than `long_wait` (measured from arrival).
/// - **Info** for every order sitting in ready-for-departure.
pub fn sweep(orders: &[Order], now: DateTime<Utc>, long_wait: Duration) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for order in orders {
        if order.status.is_active() && now - order.arrival_time > long_wait {
            notifications.push(Notification {
                kind: NotificationKind::Warning,
                title: "Long Waiting Customer".to_string(),
                message: format!(
                    "{} has been waiting for more than {} hours",
                    order.customer_name,
                    long_wait.num_hours()
                ),
                order_id: order.id.clone(),
                timestamp: now,
            });
        }
    }

    for order in orders {
        if order.status == OrderStatus::ReadyForDeparture {
            notifications.push(Notification {
                kind: NotificationKind::Info,
                title: "Ready for Departure".to_string(),
                message: format!("{} is ready to leave", order.customer_name),
                order_id: order.id.clone(),
                timestamp: now,
            });
        }
    }

    notifications
}
