//! Request DTOs for the quote and hotel endpoints.
//!
//! These mirror what the mobile app sends: camelCase keys, numbers as text,
//! one flat field per city. Decoding them into domain types is the single
//! point where parse-or-zero is applied.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::amount::{self, Amount};
use super::models::{HotelRateSheet, QuoteDraft, QuoteStatus, RoomTable, StayLeg};

/// Text field that tolerates `null` and numbers
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// List of labels; anything that is not an array is an empty list
fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Check-in/check-out labels for each city (`dd/mm/yyyy`)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayDates {
    #[serde(default, deserialize_with = "text")]
    pub makkah_check_in: String,
    #[serde(default, deserialize_with = "text")]
    pub makkah_check_out: String,
    #[serde(default, deserialize_with = "text")]
    pub medina_check_in: String,
    #[serde(default, deserialize_with = "text")]
    pub medina_check_out: String,
    #[serde(default, deserialize_with = "text")]
    pub jeddah_check_in: String,
    #[serde(default, deserialize_with = "text")]
    pub jeddah_check_out: String,
}

fn dates<'de, D>(deserializer: D) -> Result<StayDates, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A quote as submitted by the app, for pricing or saving.
///
/// Derived fields (`prices`, `hotelTotal`, `totalAmount`) and the passport
/// image are accepted but ignored; the server always reprices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(default)]
    pub status: Option<QuoteStatus>,
    #[serde(default, deserialize_with = "text")]
    pub client_name: String,
    #[serde(default, deserialize_with = "text")]
    pub client_phone: String,
    #[serde(default, deserialize_with = "text")]
    pub created_by: String,

    #[serde(default, deserialize_with = "text")]
    pub destination: String,
    #[serde(default, deserialize_with = "text")]
    pub period: String,
    #[serde(default, deserialize_with = "text")]
    pub transport: String,
    #[serde(default, deserialize_with = "text", rename = "transportMakkahMedina")]
    pub intercity_transport: String,
    #[serde(default, deserialize_with = "labels")]
    pub meals: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub notes: String,

    #[serde(default, deserialize_with = "text")]
    pub hotel_makkah: String,
    #[serde(default, deserialize_with = "text")]
    pub hotel_medina: String,
    #[serde(default, deserialize_with = "text")]
    pub hotel_jeddah: String,
    #[serde(default, with = "amount")]
    pub nights_makkah: Amount,
    #[serde(default, with = "amount")]
    pub nights_medina: Amount,
    #[serde(default, with = "amount")]
    pub nights_jeddah: Amount,
    #[serde(default, deserialize_with = "dates")]
    pub dates: StayDates,

    #[serde(default, with = "amount::table")]
    pub quantities: RoomTable<Amount>,
    #[serde(default = "amount::default_people", with = "amount::head_count")]
    pub number_of_people: Amount,
    #[serde(default, with = "amount")]
    pub flight_price: Amount,
    #[serde(default, with = "amount")]
    pub transport_price: Amount,
    #[serde(default, with = "amount")]
    pub visa_price: Amount,
}

impl QuotePayload {
    /// Convert into a draft with zeroed derived fields
    pub fn into_draft(self) -> QuoteDraft {
        let dates = self.dates;

        QuoteDraft {
            status: self.status.unwrap_or_default(),
            client_name: self.client_name,
            client_phone: self.client_phone,
            created_by: self.created_by,
            destination: self.destination,
            period: self.period,
            transport: self.transport,
            intercity_transport: self.intercity_transport,
            meals: self.meals,
            notes: self.notes,
            makkah: StayLeg {
                hotel: self.hotel_makkah,
                nights: self.nights_makkah,
                check_in: dates.makkah_check_in,
                check_out: dates.makkah_check_out,
            },
            medina: StayLeg {
                hotel: self.hotel_medina,
                nights: self.nights_medina,
                check_in: dates.medina_check_in,
                check_out: dates.medina_check_out,
            },
            jeddah: StayLeg {
                hotel: self.hotel_jeddah,
                nights: self.nights_jeddah,
                check_in: dates.jeddah_check_in,
                check_out: dates.jeddah_check_out,
            },
            quantities: self.quantities,
            number_of_people: self.number_of_people,
            flight_price: self.flight_price,
            transport_price: self.transport_price,
            visa_price: self.visa_price,
            ..QuoteDraft::default()
        }
    }
}

/// Hotel as submitted from the catalog admin screen
#[derive(Debug, Deserialize)]
pub struct HotelPayload {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub city: String,
    #[serde(default, with = "amount::table")]
    pub prices: RoomTable<Amount>,
}

impl HotelPayload {
    pub fn into_rate_sheet(self) -> HotelRateSheet {
        HotelRateSheet {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            rates: self.prices,
        }
    }
}
