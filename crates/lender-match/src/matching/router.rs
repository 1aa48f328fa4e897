use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Application, ApplicationId, LenderDraft, LenderId, PolicyDraft};
use super::repository::{LendingRepository, RepositoryError};
use super::service::{LenderMatchingService, LendingServiceError};

/// Router builder exposing lender catalog, intake, and matching endpoints.
pub fn lending_router<R>(service: Arc<LenderMatchingService<R>>) -> Router
where
    R: LendingRepository + 'static,
{
    Router::new()
        .route("/", get(banner_handler))
        .route("/api/applications", post(submit_application_handler::<R>))
        .route(
            "/api/applications/:application_id",
            get(application_handler::<R>),
        )
        .route(
            "/api/applications/:application_id/matches",
            get(matches_handler::<R>),
        )
        .route(
            "/api/lenders",
            post(create_lender_handler::<R>).get(list_lenders_handler::<R>),
        )
        .route("/api/lenders/:lender_id", get(lender_handler::<R>))
        .route(
            "/api/lenders/:lender_id/policies",
            post(create_policy_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_list_limit")]
    limit: usize,
}

fn default_list_limit() -> usize {
    100
}

pub(crate) async fn banner_handler() -> Response {
    axum::Json(json!({ "message": "Lender Matching Platform API" })).into_response()
}

pub(crate) async fn submit_application_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    axum::Json(application): axum::Json<Application>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.submit_application(application) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error, "application"),
    }
}

pub(crate) async fn application_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.application(ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error, "application"),
    }
}

pub(crate) async fn matches_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.matches(ApplicationId(application_id)) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error, "application"),
    }
}

pub(crate) async fn create_lender_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    axum::Json(draft): axum::Json<LenderDraft>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.register_lender(draft) {
        Ok(lender) => (StatusCode::CREATED, axum::Json(lender)).into_response(),
        Err(error) => error_response(error, "lender"),
    }
}

pub(crate) async fn list_lenders_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.lenders(params.skip, params.limit) {
        Ok(lenders) => (StatusCode::OK, axum::Json(lenders)).into_response(),
        Err(error) => error_response(error, "lender"),
    }
}

pub(crate) async fn lender_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    Path(lender_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.lender(LenderId(lender_id)) {
        Ok(lender) => (StatusCode::OK, axum::Json(lender)).into_response(),
        Err(error) => error_response(error, "lender"),
    }
}

pub(crate) async fn create_policy_handler<R>(
    State(service): State<Arc<LenderMatchingService<R>>>,
    Path(lender_id): Path<u64>,
    axum::Json(draft): axum::Json<PolicyDraft>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.add_policy(LenderId(lender_id), draft) {
        Ok(policy) => (StatusCode::CREATED, axum::Json(policy)).into_response(),
        Err(error) => error_response(error, "lender"),
    }
}

fn error_response(error: LendingServiceError, resource: &str) -> Response {
    let status = match &error {
        LendingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LendingServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": format!("{resource} not found") });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        LendingServiceError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
        LendingServiceError::Repository(RepositoryError::Unavailable(_))
        | LendingServiceError::Match(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
