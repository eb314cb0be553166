//! Domain entities: customers, orders, and the order status lifecycle.

pub mod customer;
pub mod order;

pub use customer::{Customer, CustomerPatch, CustomerType, NewCustomer, Vehicle, VehicleSpec};
pub use order::{
    format_duration, NewOrder, Order, OrderStatus, OrderType, Priority, ServiceDetails,
    ServiceType, StatusEntry, VehicleInfo,
};
