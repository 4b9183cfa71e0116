//! Response DTOs for the quote, hotel and pricing endpoints.
//!
//! Amounts are written as decimal text, which is what the app stores and
//! displays.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::amount::{self, Amount};
use super::models::{HotelRateSheet, QuoteDraft, QuotePricing, QuoteStatus, RoomTable};

/// Response for quote pricing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePricingResponse {
    #[serde(with = "amount::table")]
    pub prices: RoomTable<Amount>,
    #[serde(with = "amount")]
    pub hotel_total: Amount,
    #[serde(with = "amount")]
    pub total_amount: Amount,
}

impl From<QuotePricing> for QuotePricingResponse {
    fn from(pricing: QuotePricing) -> Self {
        Self {
            prices: pricing.prices,
            hotel_total: pricing.hotel_total,
            total_amount: pricing.total_amount,
        }
    }
}

/// Check-in/check-out labels, keyed the way the app expects
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayDatesResponse {
    pub makkah_check_in: String,
    pub makkah_check_out: String,
    pub medina_check_in: String,
    pub medina_check_out: String,
    pub jeddah_check_in: String,
    pub jeddah_check_out: String,
}

/// A stored quote, in the app's flat document shape
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub id: Uuid,
    pub status: QuoteStatus,
    pub client_name: String,
    pub client_phone: String,
    pub created_by: String,
    /// Seller account, when `created_by` names one
    pub creator_id: Option<Uuid>,

    pub destination: String,
    pub period: String,
    pub transport: String,
    #[serde(rename = "transportMakkahMedina")]
    pub intercity_transport: String,
    pub meals: Vec<String>,
    pub notes: String,

    pub hotel_makkah: String,
    pub hotel_medina: String,
    pub hotel_jeddah: String,
    #[serde(with = "amount")]
    pub nights_makkah: Amount,
    #[serde(with = "amount")]
    pub nights_medina: Amount,
    #[serde(with = "amount")]
    pub nights_jeddah: Amount,
    pub dates: StayDatesResponse,

    #[serde(with = "amount::table")]
    pub quantities: RoomTable<Amount>,
    #[serde(with = "amount")]
    pub number_of_people: Amount,
    #[serde(with = "amount")]
    pub flight_price: Amount,
    #[serde(with = "amount")]
    pub transport_price: Amount,
    #[serde(with = "amount")]
    pub visa_price: Amount,

    #[serde(with = "amount::table")]
    pub prices: RoomTable<Amount>,
    #[serde(with = "amount")]
    pub hotel_total: Amount,
    #[serde(with = "amount")]
    pub total_amount: Amount,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteResponse {
    pub fn new(
        id: Uuid,
        draft: QuoteDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: draft.status,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            created_by: draft.created_by,
            creator_id: None,
            destination: draft.destination,
            period: draft.period,
            transport: draft.transport,
            intercity_transport: draft.intercity_transport,
            meals: draft.meals,
            notes: draft.notes,
            hotel_makkah: draft.makkah.hotel,
            hotel_medina: draft.medina.hotel,
            hotel_jeddah: draft.jeddah.hotel,
            nights_makkah: draft.makkah.nights,
            nights_medina: draft.medina.nights,
            nights_jeddah: draft.jeddah.nights,
            dates: StayDatesResponse {
                makkah_check_in: draft.makkah.check_in,
                makkah_check_out: draft.makkah.check_out,
                medina_check_in: draft.medina.check_in,
                medina_check_out: draft.medina.check_out,
                jeddah_check_in: draft.jeddah.check_in,
                jeddah_check_out: draft.jeddah.check_out,
            },
            quantities: draft.quantities,
            number_of_people: draft.number_of_people,
            flight_price: draft.flight_price,
            transport_price: draft.transport_price,
            visa_price: draft.visa_price,
            prices: draft.prices,
            hotel_total: draft.hotel_total,
            total_amount: draft.total_amount,
            created_at,
            updated_at,
        }
    }
}

/// A catalog hotel
#[derive(Debug, Clone, Serialize)]
pub struct HotelResponse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    #[serde(with = "amount::table")]
    pub prices: RoomTable<Amount>,
}

impl HotelResponse {
    pub fn new(id: Uuid, sheet: HotelRateSheet) -> Self {
        Self {
            id,
            name: sheet.name,
            city: sheet.city,
            prices: sheet.rates,
        }
    }
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}
