//! Persistence tests. They run against `DATABASE_URL` and are skipped
//! when it is not set.

mod common;

use axum::{http::StatusCode, Router};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{database, empty_request, json_request, send, unique};
use umrah_quotes::cache::AppCache;
use umrah_quotes::db;
use umrah_quotes::error::AppError;
use umrah_quotes::models::UserRole;
use umrah_quotes::password;
use umrah_quotes::pricing::models::{QuoteDraft, QuoteStatus};
use umrah_quotes::{app, AppState};

macro_rules! database_or_skip {
    () => {
        match database().await {
            Some(pool) => pool,
            None => {
                eprintln!("DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

fn router(pool: &PgPool) -> Router {
    app(AppState {
        db: pool.clone(),
        cache: AppCache::new(),
    })
}

fn draft(created_by: &str, destination: &str, total: i64) -> QuoteDraft {
    QuoteDraft {
        client_name: "Karim Benali".to_string(),
        destination: destination.to_string(),
        created_by: created_by.to_string(),
        total_amount: total,
        ..QuoteDraft::default()
    }
}

#[tokio::test]
async fn test_quote_draft_round_trips() {
    let pool = database_or_skip!();

    let mut draft = draft(&unique("seller"), "Omra Ramadan", 700);
    draft.makkah.hotel = "Hilton Makkah".to_string();
    draft.makkah.nights = 3;
    draft.quantities.single = 2;
    draft.meals = vec!["Petit déjeuner".to_string()];
    draft.status = QuoteStatus::Confirmed;

    let stored = db::insert_quote(&pool, &draft).await.unwrap();
    let fetched = db::get_quote(&pool, stored.id).await.unwrap();

    assert_eq!(fetched.draft.0, draft);
    assert_eq!(fetched.created_by, draft.created_by);
    assert_eq!(fetched.total_amount, 700);
    assert_eq!(fetched.created_at, stored.created_at);
}

#[tokio::test]
async fn test_missing_quote_is_not_found() {
    let pool = database_or_skip!();
    let id = Uuid::new_v4();

    assert!(matches!(db::get_quote(&pool, id).await, Err(AppError::NotFound)));
    assert!(matches!(
        db::replace_quote(&pool, id, &draft("x", "y", 0)).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(db::delete_quote(&pool, id).await, Err(AppError::NotFound)));

    let app = router(&pool);
    let payload = json!({ "clientName": "Karim", "destination": "Omra" });
    let (status, _) = send(app.clone(), json_request("PUT", &format!("/quotes/{}", id), payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(app, empty_request("DELETE", &format!("/quotes/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replace_keeps_identity_and_creator() {
    let pool = database_or_skip!();
    let app = router(&pool);
    let seller = unique("seller");

    let (status, created) = send(
        app.clone(),
        json_request(
            "POST",
            "/quotes",
            json!({ "clientName": "Karim", "destination": "Omra", "createdBy": seller }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, replaced) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/quotes/{}", id),
            json!({ "clientName": "Karim B.", "destination": "Hajj", "createdBy": "", "status": "confirmed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["createdAt"], created["createdAt"]);
    assert_eq!(replaced["createdBy"], json!(seller));
    assert_eq!(replaced["destination"], "Hajj");
    assert_eq!(replaced["status"], "confirmed");

    let (status, _) = send(app.clone(), empty_request("DELETE", &format!("/quotes/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(app, empty_request("GET", &format!("/quotes/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hotel_edit_reprices_quotes() {
    let pool = database_or_skip!();
    let app = router(&pool);
    let hotel_name = unique("Hilton Makkah");

    let (status, hotel) = send(
        app.clone(),
        json_request(
            "POST",
            "/hotels",
            json!({ "name": hotel_name, "city": "Makkah", "prices": { "single": "100" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hotel_id = hotel["id"].as_str().unwrap().to_string();

    let quote = json!({
        "clientName": "Karim",
        "destination": "Omra",
        "hotelMakkah": hotel_name,
        "nightsMakkah": "3",
        "quantities": { "single": "2" }
    });
    let (_, created) = send(app.clone(), json_request("POST", "/quotes", quote.clone())).await;
    assert_eq!(created["totalAmount"], "600");
    let quote_id = created["id"].as_str().unwrap().to_string();

    // The first quote cached the catalog; the edit must replace it
    let (status, _) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/hotels/{}", hotel_id),
            json!({ "name": hotel_name, "city": "Makkah", "prices": { "single": "120" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, replaced) = send(
        app.clone(),
        json_request("PUT", &format!("/quotes/{}", quote_id), quote),
    )
    .await;
    assert_eq!(replaced["prices"]["single"], "720");
    assert_eq!(replaced["totalAmount"], "720");

    let (status, _) = send(app, empty_request("DELETE", &format!("/hotels/{}", hotel_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_filters_run_in_sql() {
    let pool = database_or_skip!();
    let seller = unique("seller");
    let other = unique("seller");
    let token = unique("dest");

    let mine = db::insert_quote(&pool, &draft(&seller, &format!("Omra {}", token), 100))
        .await
        .unwrap();
    let mut confirmed = draft(&seller, "Hajj", 200);
    confirmed.status = QuoteStatus::Confirmed;
    let confirmed = db::insert_quote(&pool, &confirmed).await.unwrap();
    let unattributed = db::insert_quote(&pool, &draft("", &format!("OMRA {}", token), 50))
        .await
        .unwrap();
    let theirs = db::insert_quote(&pool, &draft(&other, &format!("Omra {}", token), 300))
        .await
        .unwrap();

    let ids = |quotes: Vec<umrah_quotes::models::QuoteRecord>| -> Vec<Uuid> {
        quotes.into_iter().map(|q| q.id).collect()
    };

    let listed = ids(db::list_quotes(&pool, Some(&seller), None, None).await.unwrap());
    assert!(listed.contains(&mine.id));
    assert!(listed.contains(&confirmed.id));
    assert!(listed.contains(&unattributed.id));
    assert!(!listed.contains(&theirs.id));

    let pattern = db::contains_pattern(&token.to_uppercase());
    let found = ids(db::list_quotes(&pool, None, None, Some(&pattern)).await.unwrap());
    assert_eq!(found, vec![theirs.id, unattributed.id, mine.id]);

    let found = ids(
        db::list_quotes(&pool, Some(&seller), Some(QuoteStatus::Confirmed), None)
            .await
            .unwrap(),
    );
    assert_eq!(found, vec![confirmed.id]);
}

#[tokio::test]
async fn test_dashboard_totals_in_sql() {
    let pool = database_or_skip!();
    let seller = unique("seller");

    let mut stored = Vec::new();
    for total in [100, 200, 300, 400, 500, 600] {
        stored.push(db::insert_quote(&pool, &draft(&seller, "Omra", total)).await.unwrap());
    }

    assert_eq!(db::quote_totals(&pool, Some(&seller)).await.unwrap(), (6, 2100));

    let recent = db::recent_quotes(&pool, Some(&seller), 5).await.unwrap();
    let totals: Vec<i64> = recent.iter().map(|q| q.total_amount).collect();
    assert_eq!(totals, vec![600, 500, 400, 300, 200]);

    let (status, body) = send(
        router(&pool),
        empty_request("GET", &format!("/dashboard?createdBy={}", seller)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotesCount"], 6);
    assert_eq!(body["totalRevenue"], "2100");
    assert_eq!(body["recentQuotes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_trip_option_crud() {
    let pool = database_or_skip!();
    let label = unique("Bus");

    let option = db::insert_trip_option(
        &pool,
        umrah_quotes::models::TripCategory::Transports,
        &label,
        4500,
    )
    .await
    .unwrap();

    let renamed = db::update_trip_option(&pool, option.id, Some("Bus VIP"), None)
        .await
        .unwrap();
    assert_eq!(renamed.label, "Bus VIP");
    assert_eq!(renamed.price, 4500);

    db::delete_trip_option(&pool, option.id).await.unwrap();
    assert!(matches!(
        db::delete_trip_option(&pool, option.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_quotes_link_and_follow_their_seller() {
    let pool = database_or_skip!();
    let username = unique("sara");
    let hash = password::hash_password("pw").unwrap();

    let user = db::insert_user(&pool, &username, &hash, UserRole::User).await.unwrap();
    assert!(matches!(
        db::insert_user(&pool, &username, &hash, UserRole::User).await,
        Err(AppError::Validation(_))
    ));

    let quote = db::insert_quote(&pool, &draft(&username, "Omra", 100)).await.unwrap();
    assert_eq!(quote.creator_id, Some(user.id));
    let walk_in = db::insert_quote(&pool, &draft(&unique("nobody"), "Omra", 100)).await.unwrap();
    assert_eq!(walk_in.creator_id, None);

    let renamed = unique("sara");
    db::update_user(&pool, user.id, Some(&renamed), None, None).await.unwrap();
    let linked = db::get_quote(&pool, quote.id).await.unwrap();
    assert_eq!(linked.created_by, renamed);
    assert_eq!(linked.into_response().created_by, renamed);

    db::delete_user(&pool, user.id).await.unwrap();
    let orphan = db::get_quote(&pool, quote.id).await.unwrap();
    assert_eq!(orphan.creator_id, None);
    assert_eq!(orphan.created_by, renamed);
    assert!(matches!(db::get_user(&pool, user.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_seed_refused_once_accounts_exist() {
    let pool = database_or_skip!();
    let hash = password::hash_password("pw").unwrap();
    db::insert_user(&pool, &unique("seller"), &hash, UserRole::User).await.unwrap();

    assert!(db::seed_admin(&pool, "admin", &hash).await.unwrap().is_none());

    let (status, _) = send(router(&pool), empty_request("GET", "/auth/seed")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_and_account_management() {
    let pool = database_or_skip!();
    let app = router(&pool);
    let admin = unique("admin");
    let seller = unique("seller");

    let hash = password::hash_password("s3cret").unwrap();
    db::insert_user(&pool, &admin, &hash, UserRole::Admin).await.unwrap();
    db::insert_user(&pool, &seller, &hash, UserRole::User).await.unwrap();

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/auth/login", json!({ "username": admin, "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["username"], json!(admin));
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/auth/login", json!({ "username": admin, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A seller cannot create accounts
    let newcomer = unique("newcomer");
    let (status, _) = send(
        app.clone(),
        json_request(
            "POST",
            "/auth/create",
            json!({ "username": newcomer, "password": "pw", "adminUsername": seller }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        app.clone(),
        json_request(
            "POST",
            "/auth/create",
            json!({ "username": newcomer, "password": "pw", "adminUsername": admin }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "user");
    assert!(created.get("passwordHash").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/auth/users/{}", id),
            json!({ "role": "admin", "password": "new-pw", "adminUsername": admin }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "admin");

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/auth/login", json!({ "username": newcomer, "password": "new-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app, empty_request("DELETE", &format!("/auth/users/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
