//! Price handling
//!
//! The backend stores prices as decimals and may serialize them as JSON
//! strings (`"12.50"`) or numbers. Amounts sent back are rounded to cents.

use serde::{Deserialize, Deserializer};

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

fn parse(raw: RawPrice) -> Option<f64> {
    match raw {
        RawPrice::Number(n) => Some(n),
        RawPrice::Text(s) => s.trim().parse().ok(),
    }
}

/// Accept a price as number or numeric string. Unparseable text reads as 0.
pub fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(parse(RawPrice::deserialize(deserializer)?).unwrap_or(0.0))
}

/// Optional variant of [`deserialize_price`]; `null` and garbage read as `None`.
pub fn deserialize_optional_price<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(Option::<RawPrice>::deserialize(deserializer)?.and_then(parse))
}
