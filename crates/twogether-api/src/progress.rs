use axum::{Extension, Json, extract::State};

use twogether_types::api::{AchievementsResponse, Claims};
use twogether_types::models::{BadgeProgress, IntimacyStats};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::{blocking, couple_of, today};

pub async fn badge_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<BadgeProgress>> {
    let progress = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let progress = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                Ok(journal.badge_progress(today()))
            })?;
        Ok(progress)
    })
    .await?;
    Ok(Json(progress))
}

/// Earned badges alongside progress towards every catalog achievement.
pub async fn achievements(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<AchievementsResponse>> {
    let (rows, catalog) = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let rows = state.db.list_achievements(&couple.id)?;
        let catalog = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                Ok(journal.achievements(today()))
            })?;
        Ok((rows, catalog))
    })
    .await?;

    let total = u32::try_from(catalog.len()).unwrap_or(u32::MAX);
    let unlocked = u32::try_from(catalog.iter().filter(|a| a.is_unlocked).count()).unwrap_or(total);
    let completion_percentage = if total == 0 {
        0.0
    } else {
        f64::from(unlocked) * 100.0 / f64::from(total)
    };

    Ok(Json(AchievementsResponse {
        earned: rows.into_iter().filter_map(|a| a.into_model()).collect(),
        catalog,
        unlocked,
        total,
        completion_percentage,
    }))
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<IntimacyStats>> {
    let stats = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let stats = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                Ok(journal.stats(today()))
            })?;
        Ok(stats)
    })
    .await?;
    Ok(Json(stats))
}
