use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use twogether_rewards::rule_table;
use twogether_types::api::{BalanceResponse, Claims};
use twogether_types::models::{CoinRuleInfo, CoinTransaction};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::{blocking, couple_of};

const MAX_PAGE: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

pub async fn balance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        Ok(state.db.get_balance(&couple.id)?)
    })
    .await?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<Json<Vec<CoinTransaction>>> {
    let limit = query.limit.clamp(1, MAX_PAGE);
    let rows = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        Ok(state.db.list_transactions(&couple.id, limit)?)
    })
    .await?;
    Ok(Json(rows.into_iter().map(|r| r.into_model()).collect()))
}

/// Earning rules per activity, with every bonus condition.
pub async fn rules() -> Json<Vec<CoinRuleInfo>> {
    Json(rule_table())
}
