use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::is_arabic_text;
use crate::core::state::AppState;
use crate::core::time::now_rfc3339;
use crate::db::models::Class;
use crate::repositories;
use crate::schemas::class::ClassPayload;
use crate::schemas::DeleteResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/:id", get(get_class).put(update_class).delete(delete_class))
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<Class>>, ApiError> {
    let classes = repositories::classes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch classes"))?;
    Ok(Json(classes))
}

async fn get_class(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Class>, ApiError> {
    let class = repositories::classes::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;
    Ok(Json(class))
}

async fn create_class(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ClassPayload>,
) -> Result<(StatusCode, Json<Class>), ApiError> {
    let name = validate_class_name(&payload)?;

    let class = repositories::classes::create(state.db(), name, &now_rfc3339())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create class"))?;

    Ok((StatusCode::CREATED, Json(class)))
}

async fn update_class(
    Path(id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ClassPayload>,
) -> Result<Json<Class>, ApiError> {
    let name = validate_class_name(&payload)?;

    let changed = repositories::classes::update(state.db(), id, name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update class"))?;

    if changed == 0 {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    let class = repositories::classes::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(class))
}

async fn delete_class(
    Path(id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = repositories::classes::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete class"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    tracing::info!(admin_id = admin.id, class_id = id, "Admin deleted class");

    Ok(Json(DeleteResponse { success: true, message: "Class deleted" }))
}

fn validate_class_name(payload: &ClassPayload) -> Result<&str, ApiError> {
    payload
        .validate()
        .map_err(|_| ApiError::BadRequestCode("Class name is required".to_string(), "NAME_REQUIRED"))?;

    let trimmed = payload.name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequestCode(
            "Class name is required".to_string(),
            "NAME_REQUIRED",
        ));
    }
    if !is_arabic_text(trimmed) {
        return Err(ApiError::BadRequestCode(
            "Class name must contain Arabic letters only".to_string(),
            "INVALID_CHARACTERS",
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests;
