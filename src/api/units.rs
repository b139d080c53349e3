use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::is_arabic_text;
use crate::core::state::AppState;
use crate::core::time::now_rfc3339;
use crate::db::models::{Unit, UnitWithClass};
use crate::repositories;
use crate::schemas::unit::UnitPayload;
use crate::schemas::DeleteResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_units).post(create_unit))
        .route("/class/:class_id", get(list_units_by_class))
        .route("/:id", get(get_unit).put(update_unit).delete(delete_unit))
}

async fn list_units_by_class(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Unit>>, ApiError> {
    let units = repositories::units::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch units"))?;
    Ok(Json(units))
}

async fn get_unit(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Unit>, ApiError> {
    let unit = repositories::units::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch unit"))?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;
    Ok(Json(unit))
}

async fn list_units(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UnitWithClass>>, ApiError> {
    let units = repositories::units::list_with_class(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch all units"))?;
    Ok(Json(units))
}

async fn create_unit(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UnitPayload>,
) -> Result<(StatusCode, Json<Unit>), ApiError> {
    let (title, class_id) = validate_unit_payload(&payload)?;
    ensure_class_exists(&state, class_id).await?;
    ensure_title_available(&state, class_id, title, None).await?;

    let unit = repositories::units::create(state.db(), class_id, title, &now_rfc3339())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create unit"))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

async fn update_unit(
    Path(id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UnitPayload>,
) -> Result<Json<Unit>, ApiError> {
    let (title, class_id) = validate_unit_payload(&payload)?;
    ensure_class_exists(&state, class_id).await?;
    ensure_title_available(&state, class_id, title, Some(id)).await?;

    let changed = repositories::units::update(state.db(), id, class_id, title)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update unit"))?;

    if changed == 0 {
        return Err(ApiError::NotFound("الوحدة غير موجودة".to_string()));
    }

    let unit = repositories::units::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated unit"))?
        .ok_or_else(|| ApiError::NotFound("الوحدة غير موجودة".to_string()))?;

    Ok(Json(unit))
}

async fn delete_unit(
    Path(id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = repositories::units::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete unit"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Unit not found".to_string()));
    }

    tracing::info!(admin_id = admin.id, unit_id = id, "Admin deleted unit");

    Ok(Json(DeleteResponse { success: true, message: "Unit deleted" }))
}

fn validate_unit_payload(payload: &UnitPayload) -> Result<(&str, i64), ApiError> {
    let trimmed = payload.title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequestCode(
            "عنوان الوحدة مطلوب".to_string(),
            "TITLE_REQUIRED",
        ));
    }

    let class_id = match payload.class_id {
        Some(id) if id > 0 => id,
        _ => {
            return Err(ApiError::BadRequestCode(
                "الصف الدراسي مطلوب".to_string(),
                "CLASS_ID_REQUIRED",
            ))
        }
    };

    if !is_arabic_text(trimmed) {
        return Err(ApiError::BadRequestCode(
            "عنوان الوحدة يجب أن يحتوي على أحرف عربية فقط".to_string(),
            "INVALID_CHARACTERS",
        ));
    }

    Ok((trimmed, class_id))
}

async fn ensure_class_exists(state: &AppState, class_id: i64) -> Result<(), ApiError> {
    let exists = repositories::classes::find_by_id(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to verify class"))?;

    if exists.is_none() {
        return Err(ApiError::NotFoundCode(
            "الصف الدراسي غير موجود".to_string(),
            "CLASS_NOT_FOUND",
        ));
    }

    Ok(())
}

async fn ensure_title_available(
    state: &AppState,
    class_id: i64,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let duplicate =
        repositories::units::title_exists_in_class(state.db(), class_id, title, exclude_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check for duplicate unit title"))?;

    if duplicate {
        return Err(ApiError::Conflict(
            "هذا العنوان موجود بالفعل في هذا الصف. يرجى اختيار عنوان آخر".to_string(),
            "DUPLICATE_UNIT_TITLE",
        ));
    }

    Ok(())
}
