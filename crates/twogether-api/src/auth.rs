use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use twogether_db::Database;
use twogether_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use twogether_types::models::User;

use crate::blocking;
use crate::error::{ApiError, ApiResult};

const TOKEN_LIFETIME_DAYS: i64 = 30;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = req.username.trim().to_string();
    if username.chars().count() < 3 || username.chars().count() > 32 {
        return Err(ApiError::Validation(
            "username must be between 3 and 32 characters".into(),
        ));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let user_id = Uuid::new_v4();
    let db = state.clone();
    let name = username.clone();
    blocking(move || {
        // Argon2id with a fresh random salt
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
            .to_string();

        // Uniqueness is decided by the insert itself, so concurrent
        // registrations of one name cannot both succeed.
        if !db.db.create_user(&user_id.to_string(), &name, &password_hash)? {
            return Err(ApiError::Conflict("username is already taken".into()));
        }
        Ok(())
    })
    .await?;

    info!("Registered user {} ({})", username, user_id);
    let token = create_token(&state.jwt_secret, user_id, &username)?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let db = state.clone();
    let user = blocking(move || {
        let user = db
            .db
            .get_user_by_username(req.username.trim())?
            .ok_or(ApiError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| anyhow::anyhow!("stored password hash is corrupt: {}", e))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(user)
    })
    .await?;

    let user_id: Uuid = user.id.parse().map_err(anyhow::Error::from)?;
    let token = create_token(&state.jwt_secret, user_id, &user.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

/// The authenticated caller's account.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<User>> {
    let user = blocking(move || {
        state
            .db
            .get_user_by_id(&claims.sub.to_string())?
            .ok_or_else(|| ApiError::NotFound("user no longer exists".into()))
    })
    .await?;

    Ok(Json(user.into_model()))
}

pub fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
