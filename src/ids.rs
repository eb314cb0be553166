//! Identifier and order-number generation.
//!
//! Record ids follow the original shop convention:
//! `PREFIX-<base36 timestamp>-<base36 random suffix>`, uppercased.
//! They have a high probability of uniqueness within a single store and
//! make no cryptographic promise.
//!
//! Order numbers are the human-facing daily sequence `YYMMDD-NNN`. The
//! `NNN` part comes from an atomic per-day counter reserved at creation
//! time (see `KeyBuilder::order_day_series`), never from re-counting
//! persisted orders.

use chrono::{NaiveDate, Utc};
use rand::Rng;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Generate a record id: `PREFIX-<base36 millis>-<base36 random>`.
///
/// # Example
///
/// ```
/// use track_kit::ids::generate_id;
///
/// let id = generate_id("CUST");
/// assert!(id.starts_with("CUST-"));
/// assert_eq!(id, id.to_uppercase());
/// ```
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, to_base36(millis), suffix).to_uppercase()
}

/// Format a human-facing order number for the given day and sequence.
///
/// The sequence is 1-based and zero-padded to three digits; a day with
/// more than 999 orders simply grows a fourth digit.
pub fn order_number(day: NaiveDate, sequence: u64) -> String {
    format!("{}-{:03}", day.format("%y%m%d"), sequence)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}
