//! Core quote pricing functions.
//!
//! Pure functions for pricing math - no database access, no parsing. Inputs
//! arrive already decoded (see `pricing::amount`), so nothing here can fail.
//! Arithmetic saturates rather than overflowing.

use super::amount::Amount;
use super::models::{City, HotelRateSheet, QuoteDraft, QuotePricing, RoomTable, RoomType};

/// Find the hotel a leg refers to.
///
/// Matches on the exact hotel name. An empty name never matches, and when
/// several catalog entries share a name the first one in catalog order wins.
pub fn resolve_hotel<'a>(catalog: &'a [HotelRateSheet], name: &str) -> Option<&'a HotelRateSheet> {
    if name.is_empty() {
        return None;
    }
    catalog.iter().find(|hotel| hotel.name == name)
}

/// Nightly rate of a room type, zero when there is no hotel.
pub fn nightly_rate(hotel: Option<&HotelRateSheet>, room: RoomType) -> Amount {
    hotel.map(|h| h.rates[room]).unwrap_or(0)
}

/// A leg's resolved hotel and its nights
type ResolvedLeg<'a> = (Option<&'a HotelRateSheet>, Amount);

/// Hotels resolved for each leg, in `City::ALL` order
fn resolve_legs<'a>(draft: &QuoteDraft, catalog: &'a [HotelRateSheet]) -> [ResolvedLeg<'a>; 3] {
    City::ALL.map(|city| {
        let leg = draft.leg(city);
        (resolve_hotel(catalog, &leg.hotel), leg.nights)
    })
}

/// Cost of one room of the given type across all legs.
///
/// Each leg is priced independently, so two cities booked into the same
/// hotel are both counted.
fn stay_cost(legs: &[ResolvedLeg<'_>], room: RoomType) -> Amount {
    legs.iter().fold(0, |acc: Amount, (hotel, nights)| {
        acc.saturating_add(nightly_rate(*hotel, room).saturating_mul(*nights))
    })
}

/// Per-person costs (flight, intercity transport, visa) for the whole party.
pub fn fixed_costs(draft: &QuoteDraft) -> Amount {
    draft
        .flight_price
        .saturating_add(draft.transport_price)
        .saturating_add(draft.visa_price)
        .saturating_mul(draft.number_of_people)
}

/// Price a quote draft against a catalog snapshot.
///
/// For each room type, the line total is the room quantity times the sum
/// over the three legs of nightly rate times nights. The hotel total sums
/// the lines and the grand total adds the fixed per-person costs.
///
/// Deterministic: calling it twice with the same inputs gives the same
/// result.
///
/// # Examples
/// ```
/// use umrah_quotes::pricing::calculators::price_quote;
/// use umrah_quotes::pricing::models::{HotelRateSheet, QuoteDraft, RoomTable};
///
/// let catalog = vec![HotelRateSheet {
///     name: "Hilton Makkah".to_string(),
///     city: "Makkah".to_string(),
///     rates: RoomTable { single: 100, double: 150, triple: 0, quad: 0 },
/// }];
///
/// let mut draft = QuoteDraft::default();
/// draft.makkah.hotel = "Hilton Makkah".to_string();
/// draft.makkah.nights = 3;
/// draft.quantities.single = 2;
///
/// let pricing = price_quote(&draft, &catalog);
/// assert_eq!(pricing.prices.single, 600);
/// assert_eq!(pricing.total_amount, 600);
/// ```
pub fn price_quote(draft: &QuoteDraft, catalog: &[HotelRateSheet]) -> QuotePricing {
    let legs = resolve_legs(draft, catalog);

    let mut prices = RoomTable::default();
    let mut hotel_total: Amount = 0;

    for room in RoomType::ALL {
        let line = stay_cost(&legs, room).saturating_mul(draft.quantities[room]);

        prices[room] = line;
        hotel_total = hotel_total.saturating_add(line);
    }

    QuotePricing {
        prices,
        hotel_total,
        total_amount: hotel_total.saturating_add(fixed_costs(draft)),
    }
}

/// Price a draft and store the result in it.
///
/// Returns whether any derived field changed.
pub fn reprice(draft: &mut QuoteDraft, catalog: &[HotelRateSheet]) -> bool {
    let pricing = price_quote(draft, catalog);
    draft.apply_pricing(&pricing)
}
