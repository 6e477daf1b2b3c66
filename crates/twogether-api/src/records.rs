use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveTime;

use twogether_types::api::Claims;
use twogether_types::models::{IntimateRecord, NewRecord};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{blocking, check_len, clean, couple_of, today};

const MAX_NOTES: usize = 500;
const MAX_DESCRIPTION: usize = 1000;
const MAX_DURATION: usize = 100;
const MAX_LOCATION: usize = 200;
const MAX_SCRIPT_TITLE: usize = 100;

pub async fn create_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<NewRecord>,
) -> ApiResult<impl IntoResponse> {
    let draft = validate(draft)?;

    let outcome = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let outcome = state
            .db
            .with_journal(&couple.id, &claims.sub.to_string(), |journal| {
                journal.record_moment(draft, today())
            })?;
        Ok(outcome)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_records(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<IntimateRecord>>> {
    let records = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        Ok(state.db.list_records(&couple.id)?)
    })
    .await?;

    Ok(Json(records.into_iter().map(|r| r.into_model()).collect()))
}

pub async fn get_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(record_id): Path<i64>,
) -> ApiResult<Json<IntimateRecord>> {
    let record = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        state
            .db
            .get_record(&couple.id, record_id)?
            .ok_or_else(|| ApiError::NotFound(format!("record {} not found", record_id)))
    })
    .await?;

    Ok(Json(record.into_model()))
}

/// Normalize free text and enforce field limits.
fn validate(draft: NewRecord) -> ApiResult<NewRecord> {
    let time = draft.time.trim().to_string();
    NaiveTime::parse_from_str(&time, "%H:%M")
        .map_err(|_| ApiError::Validation("time must be HH:MM".into()))?;

    let mood = draft.mood.trim().to_string();
    if mood.is_empty() {
        return Err(ApiError::Validation("mood is required".into()));
    }

    let record = NewRecord {
        time,
        mood,
        notes: clean(draft.notes),
        description: clean(draft.description),
        duration: clean(draft.duration),
        location: clean(draft.location),
        roleplay_script: clean(draft.roleplay_script),
        ..draft
    };

    check_len("notes", record.notes.as_deref(), MAX_NOTES)?;
    check_len("description", record.description.as_deref(), MAX_DESCRIPTION)?;
    check_len("duration", record.duration.as_deref(), MAX_DURATION)?;
    check_len("location", record.location.as_deref(), MAX_LOCATION)?;
    check_len("roleplayScript", record.roleplay_script.as_deref(), MAX_SCRIPT_TITLE)?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use twogether_types::models::ActivityType;

    use super::*;

    fn draft() -> NewRecord {
        NewRecord {
            date: "2024-06-01".parse().unwrap(),
            time: " 22:30 ".into(),
            mood: "😍".into(),
            notes: Some("   ".into()),
            roleplay_script: Some(" Coffee shop strangers ".into()),
            activity_type: ActivityType::Roleplay,
            ..Default::default()
        }
    }

    #[test]
    fn validate_trims_and_drops_blank_fields() {
        let record = validate(draft()).unwrap();
        assert_eq!(record.time, "22:30");
        assert_eq!(record.notes, None);
        assert_eq!(record.roleplay_script.as_deref(), Some("Coffee shop strangers"));
        assert_eq!(record.activity_type, ActivityType::Roleplay);
    }

    #[test]
    fn validate_rejects_bad_time_and_mood() {
        let bad_time = NewRecord {
            time: "25:61".into(),
            ..draft()
        };
        assert!(matches!(validate(bad_time), Err(ApiError::Validation(_))));

        let no_mood = NewRecord {
            mood: "  ".into(),
            ..draft()
        };
        assert!(matches!(validate(no_mood), Err(ApiError::Validation(_))));
    }

    #[test]
    fn validate_enforces_length_limits() {
        let long_notes = NewRecord {
            notes: Some("x".repeat(MAX_NOTES + 1)),
            ..draft()
        };
        assert!(matches!(validate(long_notes), Err(ApiError::Validation(_))));

        let at_limit = NewRecord {
            notes: Some("x".repeat(MAX_NOTES)),
            ..draft()
        };
        assert!(validate(at_limit).is_ok());
    }
}
