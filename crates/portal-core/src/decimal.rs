//! Serde helpers for decimal fields.
//!
//! Decimals are written as JSON strings. They are read from strings or from
//! JSON numbers, and a number keeps exactly the digits the client sent.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use std::str::FromStr;

/// Render `value` rounded half-up with exactly `places` fractional digits.
pub fn to_fixed(value: &BigDecimal, places: u32) -> String {
    let (digits, _) = value
        .with_scale_round(i64::from(places), RoundingMode::HalfUp)
        .as_bigint_and_exponent();
    let text = digits.to_string();
    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(magnitude) => ("-", magnitude),
        None => ("", text.as_str()),
    };

    let places = places as usize;
    if places == 0 {
        return format!("{sign}{magnitude}");
    }

    let padded = format!("{:0>width$}", magnitude, width = places + 1);
    let (whole, fraction) = padded.split_at(padded.len() - places);
    format!("{sign}{whole}.{fraction}")
}

fn parse<E: de::Error>(text: &str) -> Result<BigDecimal, E> {
    BigDecimal::from_str(text.trim())
        .map_err(|e| E::custom(format!("invalid decimal '{}': {}", text, e)))
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = BigDecimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BigDecimal, E> {
        parse(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigDecimal, E> {
        Ok(BigDecimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigDecimal, E> {
        Ok(BigDecimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigDecimal, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        // Shortest text that reads back as `v`.
        parse(&v.to_string())
    }

    // serde_json hands arbitrary-precision numbers over as a one-entry map.
    fn visit_map<A: de::MapAccess<'de>>(self, map: A) -> Result<BigDecimal, A::Error> {
        let number = serde_json::Number::deserialize(MapAccessDeserializer::new(map))?;
        parse(&number.to_string())
    }
}

struct OptionalDecimalVisitor;

impl<'de> Visitor<'de> for OptionalDecimalVisitor {
    type Value = Option<BigDecimal>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number, a numeric string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).map(Some)
    }
}

fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error> {
    deserializer.deserialize_option(OptionalDecimalVisitor)
}

/// `Option<BigDecimal>` written as given, e.g. prices.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<BigDecimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&v.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigDecimal>, D::Error> {
        deserialize_optional(d)
    }
}

/// `Option<BigDecimal>` always written with two fractional digits.
pub mod two_places {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<BigDecimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&to_fixed(v, 2)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigDecimal>, D::Error> {
        deserialize_optional(d)
    }
}
