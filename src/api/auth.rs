use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::AppendHeaders,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{self, SESSION_COOKIE};
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{AdminInfo, LoginRequest, LoginResponse, LogoutResponse, VerifyResponse};

type SetCookie = AppendHeaders<[(header::HeaderName, String); 1]>;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(SetCookie, Json<LoginResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let admin = repositories::admins::find_by_username(state.db(), payload.username.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load admin"))?
        .ok_or(ApiError::Unauthorized("Invalid username or password"))?;

    let verified = security::verify_password(&payload.password, &admin.password_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid username or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Invalid username or password"));
    }

    let token = security::create_access_token(&admin.id.to_string(), state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin logged in");

    let max_age = state.settings().security().access_token_expire_minutes * 60;
    let cookie = session_cookie(&token, max_age as i64, secure_cookies(&state));

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse { success: true, admin: AdminInfo::from_db(admin) }),
    ))
}

async fn logout(State(state): State<AppState>) -> (SetCookie, Json<LogoutResponse>) {
    let cookie = session_cookie("", 0, secure_cookies(&state));
    (AppendHeaders([(header::SET_COOKIE, cookie)]), Json(LogoutResponse { success: true }))
}

/// Always 200; the client decides what to render from the flag.
async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let admin = guards::admin_from_headers(&state, &headers).await?;

    Ok(Json(match admin {
        Some(admin) => {
            VerifyResponse { authenticated: true, admin: Some(AdminInfo::from_db(admin)) }
        }
        None => VerifyResponse { authenticated: false, admin: None },
    }))
}

fn session_cookie(value: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn secure_cookies(state: &AppState) -> bool {
    state.settings().runtime().environment.is_production()
}
