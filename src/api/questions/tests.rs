use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn public_listing_withholds_the_answer_key() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;
    test_support::insert_question(ctx.state.db(), lesson.id, "B").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/lessons/{}/questions", lesson.id),
            None,
            None,
        ))
        .await
        .expect("list questions");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let questions = body.as_array().expect("array");
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["question_text"], "ما ناتج جمع واحد واثنين؟");
    assert_eq!(questions[0]["option_b"], "ثلاثة");
    assert!(questions[0].get("correct_answer").is_none());
    assert!(questions[0].get("correctAnswer").is_none());
}

#[tokio::test]
async fn check_answer_returns_verdict_and_key() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;
    let question = test_support::insert_question(ctx.state.db(), lesson.id, "B").await;

    let check_uri = format!("/api/lessons/{}/questions/{}/check", lesson.id, question.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &check_uri,
            None,
            Some(json!({ "answer": "B" })),
        ))
        .await
        .expect("check correct");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["correct"], true);
    assert_eq!(body["correctAnswer"], "B");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &check_uri,
            None,
            Some(json!({ "answer": "A" })),
        ))
        .await
        .expect("check incorrect");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["correct"], false);
    assert_eq!(body["correctAnswer"], "B");

    // Lowercase input is normalized before comparison
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &check_uri,
            None,
            Some(json!({ "answer": "b" })),
        ))
        .await
        .expect("check lowercase");
    let body = test_support::read_json(response).await;
    assert_eq!(body["correct"], true);
}

#[tokio::test]
async fn check_answer_rejects_invalid_letters() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;
    let question = test_support::insert_question(ctx.state.db(), lesson.id, "B").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/questions/{}/check", lesson.id, question.id),
            None,
            Some(json!({ "answer": "E" })),
        ))
        .await
        .expect("check invalid");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_answer_unknown_question_is_not_found() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/questions/424242/check", lesson.id),
            None,
            Some(json!({ "answer": "A" })),
        ))
        .await
        .expect("check missing");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_crud_roundtrip() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_admin(ctx.state.db(), "admin", "admin-pass").await;
    let cookie = test_support::admin_cookie(admin.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;

    let questions_uri = format!("/api/lessons/{}/questions", lesson.id);

    // Unauthenticated create is rejected
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &questions_uri,
            None,
            Some(json!({
                "question_text": "سؤال",
                "option_a": "أ", "option_b": "ب", "option_c": "ج", "option_d": "د",
                "correct_answer": "A"
            })),
        ))
        .await
        .expect("create without cookie");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &questions_uri,
            Some(&cookie),
            Some(json!({
                "question_text": "ما عاصمة مصر؟",
                "option_a": "القاهرة", "option_b": "دمشق", "option_c": "بغداد", "option_d": "عمان",
                "correct_answer": "a",
                "display_order": 1
            })),
        ))
        .await
        .expect("create question");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["correct_answer"], "A");
    let question_id = created["id"].as_i64().expect("question id");

    // Admin listing includes the answer key
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("{questions_uri}/all"),
            Some(&cookie),
            None,
        ))
        .await
        .expect("admin list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["correct_answer"], "A");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("{questions_uri}/{question_id}"),
            Some(&cookie),
            Some(json!({
                "question_text": "ما عاصمة مصر؟",
                "option_a": "القاهرة", "option_b": "دمشق", "option_c": "بغداد", "option_d": "عمان",
                "correct_answer": "C"
            })),
        ))
        .await
        .expect("update question");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = test_support::read_json(response).await;
    assert_eq!(updated["correct_answer"], "C");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("{questions_uri}/{question_id}"),
            Some(&cookie),
            None,
        ))
        .await
        .expect("delete question");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("{questions_uri}/{question_id}/check"),
            None,
            Some(json!({ "answer": "C" })),
        ))
        .await
        .expect("check deleted");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_all_options() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_admin(ctx.state.db(), "admin", "admin-pass").await;
    let cookie = test_support::admin_cookie(admin.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/questions", lesson.id),
            Some(&cookie),
            Some(json!({
                "question_text": "سؤال ناقص",
                "option_a": "أ", "option_b": "ب",
                "correct_answer": "A"
            })),
        ))
        .await
        .expect("create question");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Admin-built content read back through the public API: associations stay
/// consistent and the answer key never leaks.
#[tokio::test]
async fn admin_to_public_round_trip() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_admin(ctx.state.db(), "admin", "admin-pass").await;
    let cookie = test_support::admin_cookie(admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/classes",
            Some(&cookie),
            Some(json!({ "name": "الصف الأول" })),
        ))
        .await
        .expect("create class");
    let class = test_support::read_json(response).await;
    let class_id = class["id"].as_i64().unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/units",
            Some(&cookie),
            Some(json!({ "title": "الوحدة الأولى", "class_id": class_id })),
        ))
        .await
        .expect("create unit");
    let unit = test_support::read_json(response).await;
    let unit_id = unit["id"].as_i64().unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/lessons",
            Some(&cookie),
            Some(json!({ "title": "الدرس الأول", "unit_id": unit_id })),
        ))
        .await
        .expect("create lesson");
    let lesson = test_support::read_json(response).await;
    let lesson_id = lesson["id"].as_i64().unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{lesson_id}/questions"),
            Some(&cookie),
            Some(json!({
                "question_text": "سؤال الدرس",
                "option_a": "أ", "option_b": "ب", "option_c": "ج", "option_d": "د",
                "correct_answer": "B"
            })),
        ))
        .await
        .expect("create question");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Walk back down through the public API
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/lessons/{lesson_id}"),
            None,
            None,
        ))
        .await
        .expect("public lesson");
    let public_lesson = test_support::read_json(response).await;
    assert_eq!(public_lesson["unit_id"], unit_id);
    assert_eq!(public_lesson["title"], "الدرس الأول");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/units/{unit_id}"),
            None,
            None,
        ))
        .await
        .expect("public unit");
    let public_unit = test_support::read_json(response).await;
    assert_eq!(public_unit["class_id"], class_id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/lessons/{lesson_id}/questions"),
            None,
            None,
        ))
        .await
        .expect("public questions");
    let questions = test_support::read_json(response).await;
    assert_eq!(questions.as_array().unwrap().len(), 1);
    assert!(questions[0].get("correct_answer").is_none());
}
