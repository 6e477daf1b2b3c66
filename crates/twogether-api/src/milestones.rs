use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use twogether_types::api::{Claims, CreateMilestoneRequest};
use twogether_types::models::JourneyMilestone;

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::{blocking, check_len, couple_of, today};

/// Milestones sorted by date. Backfills any count milestone the record
/// history has crossed first, so the list is complete even for histories
/// imported before milestones existed.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<JourneyMilestone>>> {
    let milestones = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let milestones = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                journal.refresh_milestones(today())?;
                Ok(journal.state().milestones.clone())
            })?;
        Ok(milestones)
    })
    .await?;
    Ok(Json(milestones))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateMilestoneRequest>,
) -> ApiResult<impl IntoResponse> {
    check_len("title", Some(req.title.trim()), 100)?;
    check_len("description", Some(req.description.trim()), 1000)?;

    let milestone = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let milestone = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                journal.add_milestone(req.kind, req.date, req.title.trim(), req.description.trim())
            })?;
        Ok(milestone)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(milestone)))
}
