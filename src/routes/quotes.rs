//! Quote route handlers

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::QuoteRecord;
use crate::pricing::amount::Amount;
use crate::pricing::calculators::fixed_costs;
use crate::pricing::models::{City, QuoteDraft, QuoteStatus};
use crate::pricing::requests::QuotePayload;
use crate::pricing::responses::QuoteResponse;
use crate::pricing::services;
use crate::AppState;

/// Creator recorded when the app does not say who made the quote
pub const DEFAULT_CREATOR: &str = "Admin";

/// Query parameters for the quote list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListQuery {
    /// Restrict to one seller's quotes (unattributed quotes stay visible)
    pub created_by: Option<String>,
    /// Free-text search over destination, client and creator
    pub q: Option<String>,
    pub status: Option<QuoteStatus>,
}

impl QuoteListQuery {
    /// Creator filter, ignoring an empty value
    fn creator(&self) -> Option<&str> {
        self.created_by.as_deref().filter(|c| !c.is_empty())
    }

    /// ILIKE pattern for the free-text search, if any
    fn search_pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(db::contains_pattern)
    }
}

/// A quote needs at least a client and a destination
fn validate_draft(draft: &QuoteDraft) -> Result<()> {
    let mut missing = Vec::new();
    if draft.client_name.trim().is_empty() {
        missing.push("clientName");
    }
    if draft.destination.trim().is_empty() {
        missing.push("destination");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Missing {}", missing.join(", "))))
    }
}

/// Creator to store: the submitted one, else the stored one, else the default
fn resolve_creator(submitted: &str, stored: Option<&str>) -> String {
    let submitted = submitted.trim();
    if !submitted.is_empty() {
        return submitted.to_string();
    }

    match stored {
        Some(stored) if !stored.is_empty() => stored.to_string(),
        _ => DEFAULT_CREATOR.to_string(),
    }
}

/// List quotes, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuoteListQuery>,
) -> Result<Json<Vec<QuoteResponse>>> {
    let search = query.search_pattern();
    let quotes = db::list_quotes(&state.db, query.creator(), query.status, search.as_deref()).await?;

    Ok(Json(quotes.into_iter().map(QuoteRecord::into_response).collect()))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteResponse>> {
    let quote = db::get_quote(&state.db, id).await?;
    Ok(Json(quote.into_response()))
}

/// Price and store a new quote
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<QuotePayload>,
) -> Result<(StatusCode, Json<QuoteResponse>)> {
    let mut draft = payload.into_draft();
    validate_draft(&draft)?;

    draft.created_by = resolve_creator(&draft.created_by, None);
    services::reprice_draft(&state.db, &state.cache, &mut draft).await?;

    let quote = db::insert_quote(&state.db, &draft).await?;
    tracing::info!(
        "Quote {} created by {} (total {})",
        quote.id,
        quote.created_by,
        quote.total_amount
    );

    Ok((StatusCode::CREATED, Json(quote.into_response())))
}

/// Replace a stored quote with a resubmitted one
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuotePayload>,
) -> Result<Json<QuoteResponse>> {
    let existing = db::get_quote(&state.db, id).await?;

    let mut draft = payload.into_draft();
    validate_draft(&draft)?;

    draft.created_by = resolve_creator(&draft.created_by, Some(&existing.created_by));
    services::reprice_draft(&state.db, &state.cache, &mut draft).await?;

    let quote = db::replace_quote(&state.db, id, &draft).await?;
    tracing::info!("Quote {} replaced (total {})", quote.id, quote.total_amount);

    Ok(Json(quote.into_response()))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_quote(&state.db, id).await?;
    tracing::info!("Quote {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Stay line on the printable sheet
struct SheetLeg {
    city: &'static str,
    hotel: String,
    nights: Amount,
    check_in: String,
    check_out: String,
}

/// Room line on the printable sheet
struct SheetRoom {
    room_type: &'static str,
    quantity: Amount,
    line_total: Amount,
}

/// Printable quote sheet template
#[derive(Template)]
#[template(path = "quote_sheet.html")]
struct QuoteSheetTemplate {
    reference: String,
    created_on: String,
    status: &'static str,
    client_name: String,
    client_phone: String,
    created_by: String,
    destination: String,
    period: String,
    transport: String,
    intercity_transport: String,
    meals: String,
    legs: Vec<SheetLeg>,
    rooms: Vec<SheetRoom>,
    number_of_people: Amount,
    flight_price: Amount,
    transport_price: Amount,
    visa_price: Amount,
    fixed_total: Amount,
    hotel_total: Amount,
    total_amount: Amount,
    notes: String,
}

impl QuoteSheetTemplate {
    fn new(quote: QuoteRecord) -> Self {
        let draft = quote.draft.0;

        let legs = City::ALL
            .into_iter()
            .filter_map(|city| {
                let leg = draft.leg(city);
                if leg.hotel.is_empty() && leg.nights == 0 {
                    return None;
                }
                Some(SheetLeg {
                    city: city.name(),
                    hotel: leg.hotel.clone(),
                    nights: leg.nights,
                    check_in: leg.check_in.clone(),
                    check_out: leg.check_out.clone(),
                })
            })
            .collect();

        let rooms = draft
            .quantities
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(room, quantity)| SheetRoom {
                room_type: room.key(),
                quantity: *quantity,
                line_total: draft.prices[room],
            })
            .collect();

        Self {
            reference: quote.id.simple().to_string()[..8].to_uppercase(),
            created_on: quote.created_at.format("%d/%m/%Y").to_string(),
            status: draft.status.as_str(),
            fixed_total: fixed_costs(&draft),
            legs,
            rooms,
            meals: draft.meals.join(", "),
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            created_by: quote.created_by,
            destination: draft.destination,
            period: draft.period,
            transport: draft.transport,
            intercity_transport: draft.intercity_transport,
            number_of_people: draft.number_of_people,
            flight_price: draft.flight_price,
            transport_price: draft.transport_price,
            visa_price: draft.visa_price,
            hotel_total: draft.hotel_total,
            total_amount: draft.total_amount,
            notes: draft.notes,
        }
    }
}

/// Printable HTML sheet for one quote
pub async fn sheet(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>> {
    let quote = db::get_quote(&state.db, id).await?;
    let template = QuoteSheetTemplate::new(quote);

    Ok(Html(template.render()?))
}
