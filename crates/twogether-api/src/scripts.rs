use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use twogether_db::models::ScriptRow;
use twogether_rewards::coins::SCRIPT_UPLOAD_REWARD;
use twogether_types::api::{Claims, CreateScriptRequest, CreateScriptResponse};
use twogether_types::models::RoleplayScript;

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{blocking, check_len, couple_of};

const MAX_TAGS: usize = 10;

pub async fn upload(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateScriptRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = req.title.trim().to_string();
    let content = req.content.trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::Validation("title and content are required".into()));
    }
    check_len("title", Some(&title), 100)?;
    check_len("scenario", Some(req.scenario.trim()), 1000)?;
    check_len("content", Some(&content), 20_000)?;

    let tags: Vec<String> = req
        .tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.len() > MAX_TAGS {
        return Err(ApiError::Validation(format!("at most {} tags", MAX_TAGS)));
    }

    let row = ScriptRow {
        id: Uuid::new_v4().to_string(),
        title,
        category: req.category.as_str().to_string(),
        scenario: req.scenario.trim().to_string(),
        content,
        tags: serde_json::to_string(&tags).map_err(anyhow::Error::from)?,
        created_by: claims.sub.to_string(),
        created_at: Utc::now().to_rfc3339(),
    };

    let (script, balance) = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        let balance = state.db.upload_script(&couple.id, &row, SCRIPT_UPLOAD_REWARD)?;
        Ok((row.into_model(), balance))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateScriptResponse {
            script,
            coins_earned: SCRIPT_UPLOAD_REWARD,
            balance,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<RoleplayScript>>> {
    let rows = blocking(move || {
        let couple = couple_of(&state.db, claims.sub)?;
        Ok(state.db.list_scripts(&couple.id)?)
    })
    .await?;
    Ok(Json(rows.into_iter().map(|r| r.into_model()).collect()))
}
