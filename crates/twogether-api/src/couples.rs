use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use twogether_db::Database;
use twogether_db::models::CoupleRow;
use twogether_types::api::{Claims, CoupleResponse, PairRequest, PartnerInfo};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{blocking, check_len, clean, couple_of};

pub async fn pair(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PairRequest>,
) -> ApiResult<impl IntoResponse> {
    let couple_name = clean(req.couple_name);
    check_len("coupleName", couple_name.as_deref(), 100)?;

    let response = blocking(move || {
        let partner = state
            .db
            .get_user_by_username(req.partner_username.trim())?
            .ok_or_else(|| ApiError::NotFound("no user with that username".into()))?;
        if partner.id == claims.sub.to_string() {
            return Err(ApiError::BadRequest("you cannot pair with yourself".into()));
        }

        let couple = state
            .db
            .pair_users(
                &Uuid::new_v4().to_string(),
                &claims.sub.to_string(),
                &partner.id,
                couple_name.as_deref(),
                req.anniversary_date.map(|d| d.to_string()).as_deref(),
            )?
            .ok_or_else(|| ApiError::Conflict("one of you is already paired".into()))?;

        describe(&state.db, couple, claims.sub)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn current(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<CoupleResponse>> {
    let response = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        describe(&state.db, couple, claims.sub)
    })
    .await?;
    Ok(Json(response))
}

fn describe(db: &Database, row: CoupleRow, me: Uuid) -> ApiResult<CoupleResponse> {
    let partner_id = row.partner_of(&me.to_string()).to_string();
    let partner = db
        .get_user_by_id(&partner_id)?
        .ok_or_else(|| anyhow::anyhow!("couple {} references missing user {}", row.id, partner_id))?;

    let couple = row.into_model();
    Ok(CoupleResponse {
        id: couple.id,
        couple_name: couple.couple_name,
        anniversary_date: couple.anniversary_date,
        partner: PartnerInfo {
            id: partner.id.parse().map_err(anyhow::Error::from)?,
            username: partner.username,
        },
        created_at: couple.created_at,
    })
}
