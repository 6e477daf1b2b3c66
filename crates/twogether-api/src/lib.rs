//! HTTP surface of the twogether journal.
//!
//! Every handler resolves the caller's couple from the JWT subject and runs
//! its database work on the blocking pool. Journal mutations go through
//! [`twogether_db::Database::with_journal`] so each request is one
//! transaction.

pub mod auth;
pub mod coins;
pub mod couples;
pub mod error;
pub mod gifts;
pub mod middleware;
pub mod milestones;
pub mod progress;
pub mod records;
pub mod scripts;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use twogether_db::{Database, models::CoupleRow};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::require_auth;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/couples", post(couples::pair))
        .route("/couples/me", get(couples::current))
        .route("/records", post(records::create_record).get(records::list_records))
        .route("/records/{record_id}", get(records::get_record))
        .route("/coins/balance", get(coins::balance))
        .route("/coins/transactions", get(coins::transactions))
        .route("/coins/rules", get(coins::rules))
        .route("/gifts", get(gifts::list).post(gifts::create))
        .route("/gifts/{gift_id}/redeem", post(gifts::redeem))
        .route("/milestones", get(milestones::list).post(milestones::create))
        .route("/badges/progress", get(progress::badge_progress))
        .route("/achievements", get(progress::achievements))
        .route("/stats", get(progress::stats))
        .route("/scripts", post(scripts::upload).get(scripts::list))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow::anyhow!("blocking task failed"))
    })?
}

/// The caller's couple, or 404 if they have not paired yet.
pub(crate) fn couple_of(db: &Database, user_id: Uuid) -> ApiResult<CoupleRow> {
    db.get_couple_for_user(&user_id.to_string())?
        .ok_or_else(|| ApiError::NotFound("pair with your partner first".into()))
}

/// Calendar day the reward windows are measured from.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Trim a free-text field, treating blank as absent.
pub(crate) fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn check_len(name: &str, value: Option<&str>, max: usize) -> ApiResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ApiError::Validation(format!(
            "{} must be at most {} characters",
            name, max
        ))),
        _ => Ok(()),
    }
}
