//! Rupee formatting and numeric conversion helpers.

use num_traits::cast::cast;
use serde::{Deserialize, Deserializer};

/// Format a whole amount with Indian digit grouping, e.g. `123456` -> `1,23,456`.
#[must_use]
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{last_three}", groups.join(","))
}

/// Format an amount as rupees: `₹1,23,456`.
#[must_use]
pub fn format_inr(amount: u64) -> String {
    format!("₹{}", group_indian(amount))
}

/// Cost label used on activity tags and alternative cards.
#[must_use]
pub fn cost_label(cost_inr: u64) -> String {
    if cost_inr == 0 {
        "Free".to_string()
    } else {
        format_inr(cost_inr)
    }
}

/// Round a f64 and clamp it into the u64 range, returning 0 for NaN and negatives.
#[must_use]
pub fn round_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).round()).unwrap_or(u64::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Divide and round to the nearest whole unit.
#[must_use]
pub fn rounded_div(total: u64, by: u32) -> u64 {
    if by == 0 {
        return total;
    }
    round_f64_to_u64(u64_to_f64(total) / f64::from(by))
}

/// Deserialize a non-negative amount that the service may send as an integer,
/// a float or `null`.
///
/// # Errors
///
/// Returns an error when the value is neither a number nor null.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map_or(0, round_f64_to_u64))
}

/// Optional variant of [`deserialize_amount`].
///
/// # Errors
///
/// Returns an error when the value is neither a number nor null.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(round_f64_to_u64))
}
