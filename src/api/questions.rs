use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::normalize_answer_letter;
use crate::core::state::AppState;
use crate::core::time::now_rfc3339;
use crate::db::models::Question;
use crate::repositories;
use crate::schemas::question::{
    AnswerCheckRequest, AnswerCheckResponse, PublicQuestion, QuestionPayload,
};
use crate::schemas::DeleteResponse;

/// Lesson-scoped quiz routes, merged into the lessons router.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/questions", get(list_public_questions).post(create_question))
        .route("/:id/questions/all", get(list_admin_questions))
        .route("/:id/questions/:question_id", put(update_question).delete(delete_question))
        .route("/:id/questions/:question_id/check", post(check_answer))
}

/// Public listing. The answer key stays server-side; correctness is only
/// ever computed per request by `check_answer`.
async fn list_public_questions(
    Path(lesson_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicQuestion>>, ApiError> {
    ensure_lesson_exists(&state, lesson_id).await?;

    let questions = repositories::questions::list_by_lesson(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    Ok(Json(questions.into_iter().map(PublicQuestion::from_db).collect()))
}

async fn list_admin_questions(
    Path(lesson_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, ApiError> {
    ensure_lesson_exists(&state, lesson_id).await?;

    let questions = repositories::questions::list_by_lesson(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    Ok(Json(questions))
}

async fn create_question(
    Path(lesson_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let correct_answer = validate_question_payload(&payload)?;
    ensure_lesson_exists(&state, lesson_id).await?;

    let question = repositories::questions::create(
        state.db(),
        lesson_id,
        repositories::questions::QuestionFields {
            question_text: payload.question_text.trim(),
            option_a: payload.option_a.trim(),
            option_b: payload.option_b.trim(),
            option_c: payload.option_c.trim(),
            option_d: payload.option_d.trim(),
            correct_answer: correct_answer.as_str(),
            display_order: payload.display_order,
        },
        &now_rfc3339(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    Ok((StatusCode::CREATED, Json(question)))
}

async fn update_question(
    Path((lesson_id, question_id)): Path<(i64, i64)>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<Question>, ApiError> {
    let correct_answer = validate_question_payload(&payload)?;
    ensure_lesson_exists(&state, lesson_id).await?;

    let changed = repositories::questions::update_for_lesson(
        state.db(),
        lesson_id,
        question_id,
        repositories::questions::QuestionFields {
            question_text: payload.question_text.trim(),
            option_a: payload.option_a.trim(),
            option_b: payload.option_b.trim(),
            option_c: payload.option_c.trim(),
            option_d: payload.option_d.trim(),
            correct_answer: correct_answer.as_str(),
            display_order: payload.display_order,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?;

    if changed == 0 {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    let question = repositories::questions::find_for_lesson(state.db(), lesson_id, question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

async fn delete_question(
    Path((lesson_id, question_id)): Path<(i64, i64)>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = repositories::questions::delete_for_lesson(state.db(), lesson_id, question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    tracing::info!(admin_id = admin.id, question_id, "Admin deleted question");

    Ok(Json(DeleteResponse { success: true, message: "Question deleted" }))
}

/// Unauthenticated by design: students submit one answer at a time and the
/// server replies with the verdict plus the right letter.
async fn check_answer(
    Path((lesson_id, question_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    Json(payload): Json<AnswerCheckRequest>,
) -> Result<Json<AnswerCheckResponse>, ApiError> {
    let answer = normalize_answer_letter(&payload.answer)?;

    let question = repositories::questions::find_for_lesson(state.db(), lesson_id, question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(AnswerCheckResponse {
        correct: answer == question.correct_answer,
        correct_answer: question.correct_answer,
    }))
}

fn validate_question_payload(payload: &QuestionPayload) -> Result<String, ApiError> {
    if payload.question_text.trim().is_empty() {
        return Err(ApiError::BadRequest("Question text is required".to_string()));
    }

    let options = [
        payload.option_a.trim(),
        payload.option_b.trim(),
        payload.option_c.trim(),
        payload.option_d.trim(),
    ];
    if options.iter().any(|option| option.is_empty()) {
        return Err(ApiError::BadRequest("All four options are required".to_string()));
    }

    normalize_answer_letter(&payload.correct_answer)
        .map_err(|_| ApiError::BadRequest("Correct answer must be one of A, B, C, D".to_string()))
}

async fn ensure_lesson_exists(state: &AppState, lesson_id: i64) -> Result<(), ApiError> {
    let exists = repositories::lessons::find_by_id(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to verify lesson"))?;

    if exists.is_none() {
        return Err(ApiError::NotFound("Lesson not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
