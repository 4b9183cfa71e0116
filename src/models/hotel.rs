//! Hotel catalog models

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::amount::Amount;
use crate::pricing::models::{HotelRateSheet, RoomTable};
use crate::pricing::responses::HotelResponse;

/// Hotel from the `hotels` table
#[derive(Debug, Clone, FromRow)]
pub struct HotelRow {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub rates: Json<RoomTable<Amount>>,
    pub created_at: DateTime<Utc>,
}

impl HotelRow {
    /// Rate sheet used by the pricing engine
    pub fn rate_sheet(&self) -> HotelRateSheet {
        HotelRateSheet {
            name: self.name.clone(),
            city: self.city.clone(),
            rates: self.rates.0,
        }
    }

    pub fn into_response(self) -> HotelResponse {
        HotelResponse::new(
            self.id,
            HotelRateSheet {
                name: self.name,
                city: self.city,
                rates: self.rates.0,
            },
        )
    }
}
