use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use twogether_db::models::GiftRow;
use twogether_rewards::gifts::{catalog, find_gift, is_builtin};
use twogether_types::api::{Claims, CreateGiftRequest, RedeemResponse};
use twogether_types::models::Gift;

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{blocking, check_len, couple_of};

const MAX_GIFT_COST: i64 = 1_000_000;

/// Built-in gifts followed by the couple's own.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<Gift>>> {
    let rows = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        Ok(state.db.list_gifts(&couple.id)?)
    })
    .await?;
    Ok(Json(catalog(rows.into_iter().map(|r| r.into_model()).collect())))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGiftRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    check_len("title", Some(&title), 100)?;
    check_len("description", Some(req.description.trim()), 500)?;
    check_len("icon", Some(req.icon.trim()), 16)?;
    if req.cost <= 0 || req.cost > MAX_GIFT_COST {
        return Err(ApiError::Validation(format!(
            "cost must be between 1 and {}",
            MAX_GIFT_COST
        )));
    }

    let row = GiftRow {
        id: Uuid::new_v4().to_string(),
        title,
        description: req.description.trim().to_string(),
        cost: req.cost,
        category: req.category.as_str().to_string(),
        icon: req.icon.trim().to_string(),
        created_by: claims.sub.to_string(),
    };

    let gift = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        state.db.insert_gift(&couple.id, &row)?;
        Ok(row.into_model())
    })
    .await?;

    info!("Added custom gift '{}' for {} coins", gift.title, gift.cost);
    Ok((StatusCode::CREATED, Json(gift)))
}

/// Spend the gift's catalog price from the shared balance.
pub async fn redeem(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gift_id): Path<String>,
) -> ApiResult<Json<RedeemResponse>> {
    let response = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let custom: Vec<Gift> = if is_builtin(&gift_id) {
            Vec::new()
        } else {
            state
                .db
                .list_gifts(&couple.id)?
                .into_iter()
                .map(|r| r.into_model())
                .collect()
        };
        let gift = find_gift(&custom, &gift_id)
            .ok_or_else(|| ApiError::NotFound(format!("no gift '{}'", gift_id)))?;

        let balance = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                journal.redeem(&gift)
            })?;
        Ok(RedeemResponse { gift, balance })
    })
    .await?;

    Ok(Json(response))
}
