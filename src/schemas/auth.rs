use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Admin;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub(crate) username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
}

/// Admin identity as exposed to the client; the password hash never leaves
/// the database layer.
#[derive(Debug, Serialize)]
pub(crate) struct AdminInfo {
    pub(crate) id: i64,
    pub(crate) username: String,
}

impl AdminInfo {
    pub(crate) fn from_db(admin: Admin) -> Self {
        Self { id: admin.id, username: admin.username }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub(crate) success: bool,
    pub(crate) admin: AdminInfo,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutResponse {
    pub(crate) success: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyResponse {
    pub(crate) authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) admin: Option<AdminInfo>,
}
