use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn mutations_require_authentication() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/classes",
            None,
            Some(json!({ "name": "الصف الأول" })),
        ))
        .await
        .expect("create without cookie");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/classes/1",
            Some("token=forged"),
            None,
        ))
        .await
        .expect("delete with bad cookie");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_fetch_class() {
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
            Some(json!({ "name": "  الصف الأول  " })),
        ))
        .await
        .expect("create class");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["name"], "الصف الأول");
    let class_id = created["id"].as_i64().expect("class id");

    // Public fetch, no cookie needed
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/classes/{class_id}"),
            None,
            None,
        ))
        .await
        .expect("get class");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = test_support::read_json(response).await;
    assert_eq!(fetched["name"], "الصف الأول");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/classes", None, None))
        .await
        .expect("list classes");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn create_rejects_empty_name() {
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
            Some(json!({ "name": "   " })),
        ))
        .await
        .expect("create class");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["code"], "NAME_REQUIRED");
}

#[tokio::test]
async fn create_rejects_non_arabic_name() {
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
            Some(json!({ "name": "Grade 1" })),
        ))
        .await
        .expect("create class");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["code"], "INVALID_CHARACTERS");
}

#[tokio::test]
async fn update_replaces_name_or_404s() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_admin(ctx.state.db(), "admin", "admin-pass").await;
    let cookie = test_support::admin_cookie(admin.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/classes/{}", class.id),
            Some(&cookie),
            Some(json!({ "name": "الصف الثاني" })),
        ))
        .await
        .expect("update class");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = test_support::read_json(response).await;
    assert_eq!(updated["name"], "الصف الثاني");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            "/api/classes/9999",
            Some(&cookie),
            Some(json!({ "name": "الصف الثالث" })),
        ))
        .await
        .expect("update missing class");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_through_the_hierarchy() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_admin(ctx.state.db(), "admin", "admin-pass").await;
    let cookie = test_support::admin_cookie(admin.id, ctx.state.settings());

    let class = test_support::insert_class(ctx.state.db(), "الصف الأول").await;
    let unit = test_support::insert_unit(ctx.state.db(), class.id, "الوحدة الأولى").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), unit.id, "الدرس الأول").await;
    let question = test_support::insert_question(ctx.state.db(), lesson.id, "B").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/classes/{}", class.id),
            Some(&cookie),
            None,
        ))
        .await
        .expect("delete class");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], true);

    for uri in [
        format!("/api/classes/{}", class.id),
        format!("/api/units/{}", unit.id),
        format!("/api/lessons/{}", lesson.id),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &uri, None, None))
            .await
            .expect("fetch deleted resource");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
    }

    let orphaned =
        repositories::questions::find_for_lesson(ctx.state.db(), lesson.id, question.id)
            .await
            .expect("query question");
    assert!(orphaned.is_none(), "question survived the cascade");
}
