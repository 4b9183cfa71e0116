//! Permissive amount decoding.
//!
//! The mobile app sends every number as text and users edit those fields
//! freely, so a value that does not read as a non-negative integer decodes to
//! zero instead of rejecting the request. This is the only place where that
//! parsing happens; everything past the request boundary works on `Amount`.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use super::models::{RoomTable, RoomType};

/// Integer amount in the agency's single currency unit (DA).
pub type Amount = i64;

/// Party size used when a quote does not say how many travellers it covers.
pub const DEFAULT_PEOPLE: Amount = 1;

/// Parse the leading integer of `text`, or return zero.
///
/// Leading whitespace and a `+` sign are accepted and digits are read up to
/// the first non-digit, so `"12 nights"` is 12 and `"3.9"` is 3.
///
/// # Examples
/// ```
/// use umrah_quotes::pricing::amount::parse_or_zero;
///
/// assert_eq!(parse_or_zero("150"), 150);
/// assert_eq!(parse_or_zero(" 42abc"), 42);
/// assert_eq!(parse_or_zero("abc"), 0);
/// assert_eq!(parse_or_zero("-5"), 0);
/// ```
pub fn parse_or_zero(text: &str) -> Amount {
    parse_leading(text).unwrap_or(0)
}

fn parse_leading(text: &str) -> Option<Amount> {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    if end == 0 {
        return None;
    }

    // Overflow is a parse failure like any other.
    unsigned[..end].parse::<Amount>().ok()
}

/// Decode a JSON value into an amount, `None` when it does not read as one.
///
/// Strings go through [`parse_or_zero`]'s rules, numbers are truncated
/// towards zero. Negative values, `null`, booleans, arrays and objects are
/// not amounts.
pub fn decode(value: &Value) -> Option<Amount> {
    match value {
        Value::String(s) => parse_leading(s),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                (v >= 0).then_some(v)
            } else if n.is_u64() {
                // Larger than i64::MAX
                None
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f < Amount::MAX as f64)
                    .map(|f| f.trunc() as Amount)
            }
        }
        _ => None,
    }
}

/// Decode a JSON value into an amount, zero when it does not read as one.
pub fn decode_or_zero(value: &Value) -> Amount {
    decode(value).unwrap_or(0)
}

/// Serde adapter: accept anything, decode parse-or-zero.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or_zero(&value))
}

/// Serde adapter: write the amount as decimal text.
pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(amount)
}

pub fn default_people() -> Amount {
    DEFAULT_PEOPLE
}

/// Serde adapter for the traveller count.
///
/// Anything that does not decode becomes [`DEFAULT_PEOPLE`], so the pricing
/// engine never sees a parse failure for this field. Combine with
/// `#[serde(default = "amount::default_people")]` for a missing field.
pub mod head_count {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(decode(&value).unwrap_or(DEFAULT_PEOPLE))
    }

    pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize(amount, serializer)
    }
}

/// Serde adapter for a `{ single, double, triple, quad }` object of amounts.
///
/// Missing keys are zero, unknown keys are ignored and a non-object value is
/// an all-zero table.
pub mod table {
    use super::*;
    use serde::ser::SerializeMap;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<RoomTable<Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut table = RoomTable::default();

        let Value::Object(entries) = value else {
            return Ok(table);
        };

        for room in RoomType::ALL {
            if let Some(v) = entries.get(room.key()) {
                table[room] = decode_or_zero(v);
            }
        }

        Ok(table)
    }

    pub fn serialize<S>(table: &RoomTable<Amount>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(RoomType::ALL.len()))?;
        for room in RoomType::ALL {
            map.serialize_entry(room.key(), &table[room].to_string())?;
        }
        map.end()
    }
}
