//! Database queries for quotes, hotels, trip options and users

use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{HotelRow, QuoteRecord, TripCategory, TripOptionRow, UserRole, UserRow};
use crate::pricing::amount::Amount;
use crate::pricing::models::{HotelRateSheet, QuoteDraft, QuoteStatus};

// ==================== hotels ====================

/// List catalog hotels, optionally for one city
pub async fn list_hotels(pool: &PgPool, city: Option<&str>) -> Result<Vec<HotelRow>> {
    let hotels = sqlx::query_as::<_, HotelRow>(
        r#"
        SELECT id, name, city, rates, created_at
        FROM hotels
        WHERE ($1::text IS NULL OR city = $1)
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(city)
    .fetch_all(pool)
    .await?;

    Ok(hotels)
}

pub async fn count_hotels(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hotels")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn insert_hotel(pool: &PgPool, sheet: &HotelRateSheet) -> Result<HotelRow> {
    let hotel = sqlx::query_as::<_, HotelRow>(
        r#"
        INSERT INTO hotels (id, name, city, rates, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, city, rates, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&sheet.name)
    .bind(&sheet.city)
    .bind(Json(sheet.rates))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(hotel)
}

pub async fn update_hotel(pool: &PgPool, id: Uuid, sheet: &HotelRateSheet) -> Result<HotelRow> {
    sqlx::query_as::<_, HotelRow>(
        r#"
        UPDATE hotels
        SET name = $2, city = $3, rates = $4
        WHERE id = $1
        RETURNING id, name, city, rates, created_at
        "#,
    )
    .bind(id)
    .bind(&sheet.name)
    .bind(&sheet.city)
    .bind(Json(sheet.rates))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_hotel(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ==================== quotes ====================

const QUOTE_COLUMNS: &str =
    "id, created_by, creator_id, total_amount, draft, created_at, updated_at";

/// ILIKE pattern matching `needle` anywhere, with wildcards escaped
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Quotes matching the list filters, newest first.
///
/// `created_by` also keeps quotes nobody is credited with. `search` is an
/// ILIKE pattern tried against destination, client name and creator.
pub async fn list_quotes(
    pool: &PgPool,
    created_by: Option<&str>,
    status: Option<QuoteStatus>,
    search: Option<&str>,
) -> Result<Vec<QuoteRecord>> {
    let quotes = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM quotes
        WHERE ($1::text IS NULL OR created_by = $1 OR created_by = '')
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL
               OR draft->>'destination' ILIKE $3
               OR draft->>'client_name' ILIKE $3
               OR created_by ILIKE $3)
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(created_by)
    .bind(status.map(QuoteStatus::as_str))
    .bind(search)
    .fetch_all(pool)
    .await?;

    Ok(quotes)
}

/// Most recent quotes, optionally for one creator only
pub async fn recent_quotes(
    pool: &PgPool,
    created_by: Option<&str>,
    limit: i64,
) -> Result<Vec<QuoteRecord>> {
    let quotes = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM quotes
        WHERE ($1::text IS NULL OR created_by = $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#
    ))
    .bind(created_by)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(quotes)
}

/// Number of quotes and the sum of their totals
pub async fn quote_totals(pool: &PgPool, created_by: Option<&str>) -> Result<(i64, Amount)> {
    let totals: (i64, Amount) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(total_amount), 0)::BIGINT
        FROM quotes
        WHERE ($1::text IS NULL OR created_by = $1)
        "#,
    )
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(totals)
}

pub async fn get_quote(pool: &PgPool, id: Uuid) -> Result<QuoteRecord> {
    sqlx::query_as::<_, QuoteRecord>(&format!(
        "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Store a new quote; the draft must already be priced.
///
/// The creator's account is linked when a user has that name.
pub async fn insert_quote(pool: &PgPool, draft: &QuoteDraft) -> Result<QuoteRecord> {
    let now = Utc::now();

    let quote = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        INSERT INTO quotes (id, created_by, creator_id, status, total_amount, draft, created_at, updated_at)
        VALUES ($1, $2, (SELECT id FROM users WHERE username = $2), $3, $4, $5, $6, $6)
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&draft.created_by)
    .bind(draft.status.as_str())
    .bind(draft.total_amount)
    .bind(Json(draft))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(quote)
}

/// Replace a stored quote with a new, already priced draft.
///
/// Keeps the identifier and creation time.
pub async fn replace_quote(pool: &PgPool, id: Uuid, draft: &QuoteDraft) -> Result<QuoteRecord> {
    sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        UPDATE quotes
        SET created_by = $2,
            creator_id = (SELECT id FROM users WHERE username = $2),
            status = $3,
            total_amount = $4,
            draft = $5,
            updated_at = $6
        WHERE id = $1
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.created_by)
    .bind(draft.status.as_str())
    .bind(draft.total_amount)
    .bind(Json(draft))
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_quote(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ==================== trip options ====================

pub async fn list_trip_options(pool: &PgPool) -> Result<Vec<TripOptionRow>> {
    let options = sqlx::query_as::<_, TripOptionRow>(
        r#"
        SELECT id, category, label, price, created_at
        FROM trip_options
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(options)
}

pub async fn insert_trip_option(
    pool: &PgPool,
    category: TripCategory,
    label: &str,
    price: Amount,
) -> Result<TripOptionRow> {
    let option = sqlx::query_as::<_, TripOptionRow>(
        r#"
        INSERT INTO trip_options (id, category, label, price, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, category, label, price, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category.as_str())
    .bind(label)
    .bind(price)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(option)
}

/// Update label and price; `None` keeps the stored value
pub async fn update_trip_option(
    pool: &PgPool,
    id: Uuid,
    label: Option<&str>,
    price: Option<Amount>,
) -> Result<TripOptionRow> {
    sqlx::query_as::<_, TripOptionRow>(
        r#"
        UPDATE trip_options
        SET label = COALESCE($2, label), price = COALESCE($3, price)
        WHERE id = $1
        RETURNING id, category, label, price, created_at
        "#,
    )
    .bind(id)
    .bind(label)
    .bind(price)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_trip_option(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM trip_options WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ==================== users ====================

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

/// Usernames are unique; a clash is the caller's mistake, not a server error
fn username_taken(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation("Username already exists".to_string())
        }
        _ => AppError::Database(err),
    }
}

/// All accounts, admins first
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>> {
    let users = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY role ASC, username ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn find_user_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn count_admins(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(username_taken)
}

/// Create the first admin; `None` once any account exists
pub async fn seed_admin(pool: &PgPool, username: &str, password_hash: &str) -> Result<Option<UserRow>> {
    let admin = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, role, created_at)
        SELECT $1, $2, $3, 'admin', $4
        WHERE NOT EXISTS (SELECT 1 FROM users)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(username_taken)?;

    Ok(admin)
}

/// Update an account; `None` keeps the stored value.
///
/// A rename is carried over to the quotes linked to the account.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    username: Option<&str>,
    password_hash: Option<&str>,
    role: Option<UserRole>,
) -> Result<UserRow> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            password_hash = COALESCE($3, password_hash),
            role = COALESCE($4, role)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(role.map(UserRole::as_str))
    .fetch_optional(&mut *tx)
    .await
    .map_err(username_taken)?
    .ok_or(AppError::NotFound)?;

    sqlx::query("UPDATE quotes SET created_by = $2 WHERE creator_id = $1 AND created_by <> $2")
        .bind(id)
        .bind(&user.username)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user)
}

pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
