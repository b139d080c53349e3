use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    http::{HeaderName, Method, Request, Response, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::auth;
use crate::api::classes;
use crate::api::handlers;
use crate::api::lessons;
use crate::api::units;
use crate::core::{config::Settings, state::AppState};

pub(crate) fn router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings());

    let api = Router::new()
        .nest("/auth", auth::router())
        .nest("/classes", classes::router())
        .nest("/units", units::router())
        .nest("/lessons", lessons::router());

    let request_id_header = HeaderName::from_static("x-request-id");
    let request_id_header_for_span = request_id_header.clone();
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(&request_id_header_for_span)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status_label = response.status().as_u16().to_string();
            metrics::counter!(
                "http_requests_total",
                "status" => status_label.clone()
            )
            .increment(1);
            metrics::histogram!(
                "http_request_duration_seconds",
                "status" => status_label
            )
            .record(latency.as_secs_f64());
        });

    // Uploads go through multipart bodies; leave headroom above the image
    // size limit itself.
    let body_limit = (state.settings().storage().max_upload_size_mb as usize + 2) * 1024 * 1024;

    let mut router: Router<AppState> = Router::new()
        .route("/healthz", get(handlers::healthz).head(handlers::healthz))
        .nest("/api", api);

    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    let public_dir = PathBuf::from(&state.settings().static_files().public_dir);
    let router = if public_dir.is_dir() {
        let spa = Router::new().fallback(spa_fallback).with_state(state.clone());
        router.fallback_service(ServeDir::new(public_dir).not_found_service(spa))
    } else {
        router.route("/", get(handlers::root)).fallback(handlers::api_not_found)
    };

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

/// Non-file, non-API paths re-enter the single-page clients: `/admin/*`
/// loads the admin bundle, everything else the public one.
async fn spa_fallback(State(state): State<AppState>, uri: Uri) -> axum::response::Response {
    let path = uri.path();

    if path == "/api" || path.starts_with("/api/") {
        return handlers::api_not_found().await.into_response();
    }

    let file = if path == "/admin" || path.starts_with("/admin/") {
        "admin.html"
    } else {
        "index.html"
    };

    let full_path = PathBuf::from(&state.settings().static_files().public_dir).join(file);
    match tokio::fs::read(&full_path).await {
        Ok(bytes) => (
            [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, path = %full_path.display(), "Missing SPA entry point");
            handlers::api_not_found().await.into_response()
        }
    }
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        // Wildcard origin cannot be combined with allow_credentials
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true).allow_origin(AllowOrigin::list(origins))
    }
}
