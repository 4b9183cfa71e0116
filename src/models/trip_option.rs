//! Configurable trip options (destinations, periods, transports, ...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::amount::{self, Amount};

/// Which picker an option belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripCategory {
    Destinations,
    Periods,
    Transports,
    Intercity,
    Meals,
}

impl TripCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TripCategory::Destinations => "destinations",
            TripCategory::Periods => "periods",
            TripCategory::Transports => "transports",
            TripCategory::Intercity => "intercity",
            TripCategory::Meals => "meals",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "destinations" => Some(TripCategory::Destinations),
            "periods" => Some(TripCategory::Periods),
            "transports" => Some(TripCategory::Transports),
            "intercity" => Some(TripCategory::Intercity),
            "meals" => Some(TripCategory::Meals),
            _ => None,
        }
    }
}

/// Option from the `trip_options` table
#[derive(Debug, Clone, FromRow)]
pub struct TripOptionRow {
    pub id: Uuid,
    pub category: String,
    pub label: String,
    pub price: Amount,
    pub created_at: DateTime<Utc>,
}

/// Single option as returned to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripOption {
    pub id: Uuid,
    pub category: TripCategory,
    pub label: String,
    #[serde(with = "amount")]
    pub price: Amount,
}

impl TripOptionRow {
    /// `None` for rows whose category is no longer offered
    pub fn to_option(&self) -> Option<TripOption> {
        Some(TripOption {
            id: self.id,
            category: TripCategory::parse(&self.category)?,
            label: self.label.clone(),
            price: self.price,
        })
    }
}

/// All options grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripOptions {
    pub destinations: Vec<TripOption>,
    pub periods: Vec<TripOption>,
    pub transports: Vec<TripOption>,
    pub intercity: Vec<TripOption>,
    pub meals: Vec<TripOption>,
}

impl TripOptions {
    /// Group rows by category, keeping their order within each group
    pub fn group(rows: &[TripOptionRow]) -> Self {
        let mut grouped = TripOptions::default();

        for option in rows.iter().filter_map(TripOptionRow::to_option) {
            let bucket = match option.category {
                TripCategory::Destinations => &mut grouped.destinations,
                TripCategory::Periods => &mut grouped.periods,
                TripCategory::Transports => &mut grouped.transports,
                TripCategory::Intercity => &mut grouped.intercity,
                TripCategory::Meals => &mut grouped.meals,
            };
            bucket.push(option);
        }

        grouped
    }
}
