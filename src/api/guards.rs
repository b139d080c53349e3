use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts, HeaderMap};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::Admin;
use crate::repositories;

pub(crate) const SESSION_COOKIE: &str = "token";

/// Guard for admin routes: a valid, unexpired session cookie whose subject
/// resolves to an existing admin row. Anything else is a uniform 401.
pub(crate) struct CurrentAdmin(pub(crate) Admin);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let admin = admin_from_headers(&app_state, &parts.headers)
            .await?
            .ok_or(ApiError::Unauthorized("Authentication required"))?;

        Ok(CurrentAdmin(admin))
    }
}

/// Resolve the session cookie to an admin row, if any. Shared between the
/// guard (which rejects) and the verify endpoint (which reports).
pub(crate) async fn admin_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Admin>, ApiError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let Ok(claims) = security::verify_token(&token, state.settings()) else {
        return Ok(None);
    };

    let Ok(admin_id) = claims.sub.parse::<i64>() else {
        return Ok(None);
    };

    repositories::admins::find_by_id(state.db(), admin_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load admin"))
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let name = parts.next()?.trim();
        if name == SESSION_COOKIE {
            let value = parts.next().unwrap_or("").trim();
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }

    None
}
