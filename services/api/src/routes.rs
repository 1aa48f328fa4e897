use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lender_match::error::AppError;
use lender_match::matching::{
    lending_router, Application, LenderMatchingService, LendingRepository, MatchResult,
    MatchSummary,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) summary: MatchSummary,
    pub(crate) matches: Vec<MatchResult>,
}

pub(crate) fn with_lending_routes<R>(service: Arc<LenderMatchingService<R>>) -> axum::Router
where
    R: LendingRepository + 'static,
{
    lending_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/matches/preview",
            axum::routing::post(move |payload: Json<Application>| {
                preview_endpoint(service.clone(), payload)
            }),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Ranks the current catalog for an application without storing it.
pub(crate) async fn preview_endpoint<R>(
    service: Arc<LenderMatchingService<R>>,
    Json(application): Json<Application>,
) -> Result<Json<PreviewResponse>, AppError>
where
    R: LendingRepository + 'static,
{
    let matches = service.preview(&application)?;

    Ok(Json(PreviewResponse {
        summary: MatchSummary::from_results(&matches),
        matches,
    }))
}
