//! Domain types for quote pricing.
//!
//! These are the typed values the pricing engine works on. Wire formats live
//! in `requests` and `responses`; database rows live in `crate::models`.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::amount::{Amount, DEFAULT_PEOPLE};

/// Room occupancy sold by the agency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Quad,
}

impl RoomType {
    /// All room types, in presentation order.
    pub const ALL: [RoomType; 4] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Triple,
        RoomType::Quad,
    ];

    /// Key used for this room type in rate sheets and quantity maps
    pub fn key(self) -> &'static str {
        match self {
            RoomType::Single => "single",
            RoomType::Double => "double",
            RoomType::Triple => "triple",
            RoomType::Quad => "quad",
        }
    }
}

/// One value per room type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTable<T> {
    pub single: T,
    pub double: T,
    pub triple: T,
    pub quad: T,
}

impl<T> RoomTable<T> {
    /// Iterate `(room type, value)` pairs in presentation order
    pub fn iter(&self) -> impl Iterator<Item = (RoomType, &T)> {
        RoomType::ALL.into_iter().map(move |room| (room, &self[room]))
    }
}

impl<T> Index<RoomType> for RoomTable<T> {
    type Output = T;

    fn index(&self, room: RoomType) -> &T {
        match room {
            RoomType::Single => &self.single,
            RoomType::Double => &self.double,
            RoomType::Triple => &self.triple,
            RoomType::Quad => &self.quad,
        }
    }
}

impl<T> IndexMut<RoomType> for RoomTable<T> {
    fn index_mut(&mut self, room: RoomType) -> &mut T {
        match room {
            RoomType::Single => &mut self.single,
            RoomType::Double => &mut self.double,
            RoomType::Triple => &mut self.triple,
            RoomType::Quad => &mut self.quad,
        }
    }
}

/// Cities a package can stay in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Makkah,
    Medina,
    Jeddah,
}

impl City {
    pub const ALL: [City; 3] = [City::Makkah, City::Medina, City::Jeddah];

    pub fn name(self) -> &'static str {
        match self {
            City::Makkah => "Makkah",
            City::Medina => "Medina",
            City::Jeddah => "Jeddah",
        }
    }
}

/// A hotel's nightly prices per room type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRateSheet {
    pub name: String,
    pub city: String,
    pub rates: RoomTable<Amount>,
}

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Confirmed => "confirmed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

/// One city's portion of the trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayLeg {
    /// Selected hotel name, empty when not staying in this city
    pub hotel: String,
    pub nights: Amount,
    pub check_in: String,
    pub check_out: String,
}

/// Engine output merged back into a draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotePricing {
    pub prices: RoomTable<Amount>,
    pub hotel_total: Amount,
    pub total_amount: Amount,
}

/// The quote being composed or edited.
///
/// `prices`, `hotel_total` and `total_amount` are derived and get
/// overwritten by [`QuoteDraft::apply_pricing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub status: QuoteStatus,
    pub client_name: String,
    pub client_phone: String,
    pub created_by: String,

    pub destination: String,
    pub period: String,
    pub transport: String,
    pub intercity_transport: String,
    pub meals: Vec<String>,
    pub notes: String,

    pub makkah: StayLeg,
    pub medina: StayLeg,
    pub jeddah: StayLeg,

    pub quantities: RoomTable<Amount>,
    pub number_of_people: Amount,
    pub flight_price: Amount,
    pub transport_price: Amount,
    pub visa_price: Amount,

    pub prices: RoomTable<Amount>,
    pub hotel_total: Amount,
    pub total_amount: Amount,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            status: QuoteStatus::Pending,
            client_name: String::new(),
            client_phone: String::new(),
            created_by: String::new(),
            destination: String::new(),
            period: String::new(),
            transport: String::new(),
            intercity_transport: String::new(),
            meals: Vec::new(),
            notes: String::new(),
            makkah: StayLeg::default(),
            medina: StayLeg::default(),
            jeddah: StayLeg::default(),
            quantities: RoomTable::default(),
            number_of_people: DEFAULT_PEOPLE,
            flight_price: 0,
            transport_price: 0,
            visa_price: 0,
            prices: RoomTable::default(),
            hotel_total: 0,
            total_amount: 0,
        }
    }
}

impl QuoteDraft {
    pub fn leg(&self, city: City) -> &StayLeg {
        match city {
            City::Makkah => &self.makkah,
            City::Medina => &self.medina,
            City::Jeddah => &self.jeddah,
        }
    }

    pub fn leg_mut(&mut self, city: City) -> &mut StayLeg {
        match city {
            City::Makkah => &mut self.makkah,
            City::Medina => &mut self.medina,
            City::Jeddah => &mut self.jeddah,
        }
    }

    /// Current derived fields, as last applied
    pub fn pricing(&self) -> QuotePricing {
        QuotePricing {
            prices: self.prices,
            hotel_total: self.hotel_total,
            total_amount: self.total_amount,
        }
    }

    /// Write derived fields back into the draft.
    ///
    /// Returns `false` and leaves the draft untouched when the pricing is
    /// identical to what is already stored, so callers can skip a save or a
    /// re-render.
    pub fn apply_pricing(&mut self, pricing: &QuotePricing) -> bool {
        if self.pricing() == *pricing {
            return false;
        }

        self.prices = pricing.prices;
        self.hotel_total = pricing.hotel_total;
        self.total_amount = pricing.total_amount;
        true
    }
}
