//! Persisted quote model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::amount::Amount;
use crate::pricing::models::QuoteDraft;
use crate::pricing::responses::QuoteResponse;

/// Quote from the `quotes` table.
///
/// The draft document is stored whole. `created_by` and `total_amount` are
/// copies kept as columns for filtering and totals; `creator_id` links the
/// seller's account when the name matches one.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRecord {
    pub id: Uuid,
    pub created_by: String,
    pub creator_id: Option<Uuid>,
    pub total_amount: Amount,
    pub draft: Json<QuoteDraft>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteRecord {
    pub fn into_response(self) -> QuoteResponse {
        let mut response =
            QuoteResponse::new(self.id, self.draft.0, self.created_at, self.updated_at);
        // Columns win over the document: renames only touch the columns
        response.created_by = self.created_by;
        response.creator_id = self.creator_id;
        response
    }
}
