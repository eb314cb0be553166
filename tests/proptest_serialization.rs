//! Property-based tests for record serialization.
//!
//! These tests use proptest to verify that serialization properties hold
//! for randomly generated domain records, catching edge cases that
//! example-based tests might miss.
//!
//! # Properties Tested
//!
//! 1. **Roundtrip Property**: deserialize(serialize(x)) == x for ANY x
//! 2. **Determinism Property**: serialize(x) == serialize(x) always
//! 3. **Envelope Property**: All serialized data has correct magic + version
//! 4. **Domain Properties**: duration formatting and search matching
//!    invariants hold for arbitrary inputs

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use track_kit::domain::{
    format_duration, Customer, CustomerType, Order, OrderStatus, OrderType, Priority,
    ServiceDetails, ServiceType, StatusEntry, Vehicle, VehicleInfo,
};
use track_kit::serialization::{
    deserialize_from_store, serialize_for_store, RecordEnvelope, CURRENT_SCHEMA_VERSION,
    RECORD_MAGIC,
};
use track_kit::store::StoredRecord;

// ============================================================================
// Strategies for domain values
// ============================================================================

fn arb_datetime() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970..2100, whole seconds
    (0i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_customer_type() -> impl Strategy<Value = CustomerType> {
    prop::sample::select(CustomerType::ALL.to_vec())
}

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(vec![
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Urgent,
    ])
}

fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
    (
        prop::option::of(any::<String>()),
        any::<String>(),
        any::<String>(),
        any::<String>(),
        arb_datetime(),
    )
        .prop_map(|(plate_number, make, model, vehicle_type, added_at)| Vehicle {
            plate_number,
            make,
            model,
            vehicle_type,
            added_at,
        })
}

fn arb_customer() -> impl Strategy<Value = Customer> {
    (
        (
            "[A-Z]{4}-[0-9A-Z]{8}-[0-9A-Z]{6}",
            any::<String>(),
            "\\+?[0-9]{6,12}",
            prop::option::of(any::<String>()),
            prop::option::of(any::<String>()),
            arb_customer_type(),
            prop::option::of(any::<String>()),
            prop::collection::vec(arb_vehicle(), 0..4),
        ),
        (any::<u64>(), prop::option::of(arb_datetime()), arb_datetime(), arb_datetime()),
    )
        .prop_map(
            |(
                (id, name, phone, email, address, customer_type, notes, vehicles),
                (total_orders, last_visit, created_at, updated_at),
            )| Customer {
                id,
                name,
                phone,
                email,
                address,
                customer_type,
                notes,
                vehicles,
                total_orders,
                last_visit,
                created_at,
                updated_at,
            },
        )
}

fn arb_service_details() -> impl Strategy<Value = ServiceDetails> {
    prop_oneof![
        (
            prop::collection::vec(any::<String>(), 0..3),
            any::<String>(),
            1u32..100,
            any::<String>(),
        )
            .prop_map(|(items, brand, quantity, tire_type)| ServiceDetails::TireSales {
                items,
                brand,
                quantity,
                tire_type,
            }),
        (
            prop::collection::vec(any::<String>(), 1..4),
            any::<String>(),
            any::<String>(),
            any::<String>(),
            any::<String>(),
            prop::option::of(any::<String>()),
        )
            .prop_map(
                |(service_types, plate_number, make, model, problem_description, estimated_duration)| {
                    ServiceDetails::CarService {
                        service_types,
                        vehicle_info: VehicleInfo {
                            plate_number,
                            make,
                            model,
                        },
                        problem_description,
                        estimated_duration,
                    }
                }
            ),
        any::<String>().prop_map(|inquiry_details| ServiceDetails::GeneralInquiry {
            inquiry_details
        }),
    ]
}

/// Orders with a consistent audit trail: the final history entry always
/// carries the order's current status.
fn arb_order() -> impl Strategy<Value = Order> {
    (
        (
            "[A-Z]{3}-[0-9A-Z]{8}-[0-9A-Z]{6}",
            "[0-9]{6}-[0-9]{3}",
            any::<String>(),
            any::<String>(),
            arb_status(),
            arb_priority(),
            prop::option::of(any::<String>()),
            prop::option::of(any::<String>()),
            arb_service_details(),
        ),
        (
            arb_datetime(),
            prop::option::of(arb_datetime()),
            prop::collection::vec((arb_status(), prop::option::of(any::<String>())), 0..4),
            prop::option::of(any::<String>()),
            arb_datetime(),
            arb_datetime(),
        ),
    )
        .prop_map(
            |(
                (
                    id,
                    order_number,
                    customer_id,
                    customer_name,
                    status,
                    priority,
                    description,
                    estimated_completion,
                    service_details,
                ),
                (arrival_time, departure_time, earlier, final_notes, created_at, updated_at),
            )| {
                let mut status_history: Vec<StatusEntry> = Vec::new();
                let mut previous = None;
                for (entry_status, notes) in earlier {
                    status_history.push(StatusEntry {
                        status: entry_status,
                        previous_status: previous,
                        timestamp: created_at,
                        notes,
                    });
                    previous = Some(entry_status);
                }
                status_history.push(StatusEntry {
                    status,
                    previous_status: previous,
                    timestamp: updated_at,
                    notes: final_notes,
                });

                let service_type = service_details.service_type();
                let actual_duration = departure_time
                    .map(|d| format_duration((d - arrival_time).num_minutes()));
                Order {
                    id,
                    order_number,
                    customer_id,
                    customer_name,
                    order_type: service_type.order_type(),
                    service_type,
                    status,
                    priority,
                    description,
                    estimated_completion,
                    service_details,
                    arrival_time,
                    departure_time,
                    actual_duration,
                    status_history,
                    created_at,
                    updated_at,
                }
            },
        )
}

// ============================================================================
// Serialization properties
// ============================================================================

proptest! {
    #[test]
    fn prop_customer_roundtrip(customer in arb_customer()) {
        let bytes = serialize_for_store(&customer).unwrap();
        let restored: Customer = deserialize_from_store(&bytes).unwrap();
        prop_assert_eq!(customer, restored);
    }

    #[test]
    fn prop_order_roundtrip(order in arb_order()) {
        let bytes = serialize_for_store(&order).unwrap();
        let restored: Order = deserialize_from_store(&bytes).unwrap();
        prop_assert_eq!(order, restored);
    }

    #[test]
    fn prop_stored_record_roundtrip(order in arb_order(), seq in any::<u64>()) {
        let stored = StoredRecord { seq, entity: order };
        let bytes = serialize_for_store(&stored).unwrap();
        let restored: StoredRecord<Order> = deserialize_from_store(&bytes).unwrap();
        prop_assert_eq!(stored, restored);
    }

    #[test]
    fn prop_serialization_is_deterministic(customer in arb_customer()) {
        let bytes1 = serialize_for_store(&customer).unwrap();
        let bytes2 = serialize_for_store(&customer).unwrap();
        prop_assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn prop_envelope_carries_magic_and_version(order in arb_order()) {
        let bytes = serialize_for_store(&order).unwrap();
        let envelope: RecordEnvelope<Order> = postcard::from_bytes(&bytes).unwrap();
        prop_assert_eq!(envelope.magic, RECORD_MAGIC);
        prop_assert_eq!(envelope.version, CURRENT_SCHEMA_VERSION);
    }
}

// ============================================================================
// Domain properties
// ============================================================================

proptest! {
    #[test]
    fn prop_format_duration_shape(minutes in 0i64..1_000_000) {
        let formatted = format_duration(minutes);
        let (hours_part, minutes_part) = formatted.split_once(' ').unwrap();
        let hours: i64 = hours_part.strip_suffix('h').unwrap().parse().unwrap();
        let mins: i64 = minutes_part.strip_suffix('m').unwrap().parse().unwrap();
        prop_assert!(mins < 60);
        prop_assert_eq!(hours * 60 + mins, minutes);
    }

    #[test]
    fn prop_negative_durations_clamp_to_zero(minutes in i64::MIN..0) {
        prop_assert_eq!(format_duration(minutes), "0h 0m");
    }

    #[test]
    fn prop_customer_matches_own_name(customer in arb_customer()) {
        prop_assert!(customer.matches(&customer.name.to_lowercase()));
    }

    #[test]
    fn prop_order_type_follows_service_type(details in arb_service_details()) {
        let expected = match details.service_type() {
            ServiceType::TireSales => OrderType::Sales,
            ServiceType::CarService | ServiceType::GeneralInquiry => OrderType::Service,
        };
        prop_assert_eq!(details.service_type().order_type(), expected);
    }
}
