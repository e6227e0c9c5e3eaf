// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monetary value coercion.
//!
//! Backends hand values back as JSON numbers, JSON strings, or SQLite
//! TEXT/INTEGER/REAL cells. Every monetary field is decoded through
//! [`lenient`] exactly once, when a row crosses the store boundary, so the
//! aggregation code only ever sees `Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a loosely typed value into a `Decimal`. Unparseable input is zero.
pub fn coerce(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                coerce_str(&n.to_string())
            }
        }
        Value::String(s) => coerce_str(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => Decimal::ZERO,
    }
}

pub fn coerce_str(s: &str) -> Decimal {
    let s = s.trim();
    if s.is_empty() {
        return Decimal::ZERO;
    }
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// `deserialize_with` adapter applying [`coerce`].
pub fn lenient<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(coerce(&v))
}

/// Render a decimal without trailing zeros, the way exported files show it.
pub fn plain(d: &Decimal) -> String {
    d.normalize().to_string()
}
