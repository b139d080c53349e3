use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::{is_arabic_text, validate_image_upload, validate_position, validate_size};
use crate::core::state::AppState;
use crate::core::time::now_rfc3339;
use crate::db::models::{LessonSummary, LessonWithContext};
use crate::repositories;
use crate::schemas::lesson::{LessonDetailResponse, LessonPayload, UploadImageResponse};
use crate::schemas::DeleteResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lessons).post(create_lesson))
        .route("/unit/:unit_id", get(list_lessons_by_unit))
        .route("/upload-image", post(upload_image))
        .route("/:id", get(get_lesson).put(update_lesson).delete(delete_lesson))
        .merge(crate::api::questions::router())
}

async fn list_lessons_by_unit(
    Path(unit_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonSummary>>, ApiError> {
    let lessons = repositories::lessons::list_summaries_by_unit(state.db(), unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lessons"))?;
    Ok(Json(lessons))
}

async fn get_lesson(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<LessonDetailResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let detail = lesson_detail(&state, lesson).await?;
    Ok(Json(detail))
}

async fn list_lessons(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonWithContext>>, ApiError> {
    let lessons = repositories::lessons::list_with_context(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch all lessons"))?;
    Ok(Json(lessons))
}

async fn create_lesson(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<LessonPayload>,
) -> Result<(StatusCode, Json<LessonDetailResponse>), ApiError> {
    let (title, unit_id) = validate_lesson_payload(&payload)?;
    validate_attachments(&payload)?;
    ensure_unit_exists(&state, unit_id).await?;
    ensure_title_available(&state, unit_id, title, None).await?;

    let now = now_rfc3339();
    let content = payload.content.as_deref().unwrap_or("");
    let lesson = repositories::lessons::create(state.db(), unit_id, title, content, &now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

    insert_attachments(&state, lesson.id, &payload, &now).await?;

    let detail = lesson_detail(&state, lesson).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_lesson(
    Path(id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<LessonPayload>,
) -> Result<Json<LessonDetailResponse>, ApiError> {
    let (title, unit_id) = validate_lesson_payload(&payload)?;
    validate_attachments(&payload)?;
    ensure_unit_exists(&state, unit_id).await?;
    ensure_title_available(&state, unit_id, title, Some(id)).await?;

    let content = payload.content.as_deref().unwrap_or("");
    let changed = repositories::lessons::update(state.db(), id, unit_id, title, content)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson"))?;

    if changed == 0 {
        return Err(ApiError::NotFound("Lesson not found".to_string()));
    }

    // Attachments are replaced wholesale, never diffed: an empty array
    // clears the previous set.
    let now = now_rfc3339();
    repositories::videos::delete_by_lesson(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear lesson videos"))?;
    repositories::images::delete_by_lesson(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear lesson images"))?;
    insert_attachments(&state, id, &payload, &now).await?;

    let lesson = repositories::lessons::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let detail = lesson_detail(&state, lesson).await?;
    Ok(Json(detail))
}

async fn delete_lesson(
    Path(id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = repositories::lessons::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete lesson"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Lesson not found".to_string()));
    }

    tracing::info!(admin_id = admin.id, lesson_id = id, "Admin deleted lesson");

    Ok(Json(DeleteResponse { success: true, message: "Lesson deleted" }))
}

async fn upload_image(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("Image storage is not configured".to_string())
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Image filename is required".to_string()))?;
        let content_type = field.content_type().map(str::to_string).unwrap_or_default();

        validate_image_upload(
            &filename,
            &content_type,
            &state.settings().storage().allowed_image_extensions,
        )?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;

        let max_mb = state.settings().storage().max_upload_size_mb;
        if bytes.len() as u64 > max_mb * 1024 * 1024 {
            return Err(ApiError::PayloadTooLarge(format!("Image exceeds {max_mb} MB limit")));
        }

        let extension = filename.rsplit('.').next().unwrap_or("bin").to_ascii_lowercase();
        let key = format!("lessons/{}.{extension}", Uuid::new_v4());

        let (size, _hash) = storage
            .upload_bytes(&key, &content_type, bytes.to_vec())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to upload image"))?;

        tracing::info!(key = %key, size, "Uploaded lesson image");

        return Ok(Json(UploadImageResponse { url: storage.public_url(&key), size }));
    }

    Err(ApiError::BadRequest("Image file is required".to_string()))
}

async fn lesson_detail(
    state: &AppState,
    lesson: crate::db::models::Lesson,
) -> Result<LessonDetailResponse, ApiError> {
    let videos = repositories::videos::list_by_lesson(state.db(), lesson.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson videos"))?;
    let images = repositories::images::list_by_lesson(state.db(), lesson.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson images"))?;

    Ok(LessonDetailResponse { lesson, videos, images })
}

fn validate_lesson_payload(payload: &LessonPayload) -> Result<(&str, i64), ApiError> {
    let trimmed = payload.title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequestCode(
            "Lesson title is required".to_string(),
            "TITLE_REQUIRED",
        ));
    }

    let unit_id = match payload.unit_id {
        Some(id) if id > 0 => id,
        _ => {
            return Err(ApiError::BadRequestCode(
                "Unit ID is required".to_string(),
                "UNIT_ID_REQUIRED",
            ))
        }
    };

    if !is_arabic_text(trimmed) {
        return Err(ApiError::BadRequestCode(
            "Lesson title must contain Arabic letters only".to_string(),
            "INVALID_CHARACTERS",
        ));
    }

    Ok((trimmed, unit_id))
}

fn validate_attachments(payload: &LessonPayload) -> Result<(), ApiError> {
    for video in &payload.videos {
        if video.video_url.trim().is_empty() {
            return Err(ApiError::BadRequest("Video URL is required".to_string()));
        }
        validate_position(&video.position, "video")?;
        validate_size(&video.size, "video")?;
    }

    for image in &payload.images {
        if image.image_path.trim().is_empty() {
            return Err(ApiError::BadRequest("Image path is required".to_string()));
        }
        validate_position(&image.position, "image")?;
        validate_size(&image.size, "image")?;
    }

    Ok(())
}

async fn insert_attachments(
    state: &AppState,
    lesson_id: i64,
    payload: &LessonPayload,
    now: &str,
) -> Result<(), ApiError> {
    for video in &payload.videos {
        repositories::videos::insert(
            state.db(),
            lesson_id,
            repositories::videos::NewVideo {
                video_url: video.video_url.trim(),
                position: &video.position,
                size: &video.size,
                explanation: video.explanation.as_deref(),
                display_order: video.display_order,
            },
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to insert lesson video"))?;
    }

    for image in &payload.images {
        repositories::images::insert(
            state.db(),
            lesson_id,
            repositories::images::NewImage {
                image_path: image.image_path.trim(),
                position: &image.position,
                size: &image.size,
                caption: image.caption.as_deref(),
                display_order: image.display_order,
            },
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to insert lesson image"))?;
    }

    Ok(())
}

async fn ensure_unit_exists(state: &AppState, unit_id: i64) -> Result<(), ApiError> {
    let exists = repositories::units::find_by_id(state.db(), unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to verify unit"))?;

    if exists.is_none() {
        return Err(ApiError::NotFoundCode("Unit not found".to_string(), "UNIT_NOT_FOUND"));
    }

    Ok(())
}

async fn ensure_title_available(
    state: &AppState,
    unit_id: i64,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let duplicate =
        repositories::lessons::title_exists_in_unit(state.db(), unit_id, title, exclude_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check for duplicate lesson title"))?;

    if duplicate {
        return Err(ApiError::Conflict(
            "هذا العنوان موجود بالفعل في هذه الوحدة. يرجى اختيار عنوان آخر".to_string(),
            "DUPLICATE_LESSON_TITLE",
        ));
    }

    Ok(())
}
