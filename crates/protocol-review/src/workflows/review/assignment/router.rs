use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ProtocolId, ResearchType, ReviewerId, SlotId};
use super::error::AssignmentError;
use super::policy::assignment_policy;
use super::repository::ReviewStore;
use super::service::ReviewAssignmentService;

/// Router builder exposing the chairperson-facing assignment endpoints.
pub fn assignment_router<S>(service: Arc<ReviewAssignmentService<S>>) -> Router
where
    S: ReviewStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/protocols/:protocol_id/assignments",
            post(assign_handler::<S>)
                .get(list_handler::<S>)
                .delete(clear_handler::<S>),
        )
        .route(
            "/api/v1/protocols/:protocol_id/assignments/overdue/scan",
            post(scan_handler::<S>),
        )
        .route(
            "/api/v1/protocols/:protocol_id/assignments/overdue",
            delete(remove_overdue_handler::<S>),
        )
        .route(
            "/api/v1/protocols/:protocol_id/assignments/:slot_id/reassign",
            post(reassign_handler::<S>),
        )
        .route(
            "/api/v1/protocols/:protocol_id/reassignments",
            get(history_handler::<S>),
        )
        .route(
            "/api/v1/reviewers/recommendations",
            get(recommend_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignRequest {
    pub(crate) reviewer_ids: Vec<String>,
    pub(crate) research_type: String,
    #[serde(default)]
    pub(crate) subtype: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReassignRequest {
    pub(crate) new_reviewer_id: String,
    pub(crate) reason: String,
    pub(crate) actor: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendQuery {
    pub(crate) research_type: String,
    #[serde(default)]
    pub(crate) subtype: Option<String>,
    /// Comma-separated protocol keywords matched against specializations.
    #[serde(default)]
    pub(crate) keywords: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

fn error_response(error: AssignmentError) -> Response {
    let (status, kind) = match &error {
        AssignmentError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        AssignmentError::NotFound(_) => (StatusCode::NOT_FOUND, "not-found"),
        AssignmentError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        AssignmentError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence"),
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}

fn parse_research(code: &str, subtype: Option<&str>) -> Result<ResearchType, Response> {
    ResearchType::from_codes(code, subtype)
        .map_err(|error| error_response(AssignmentError::Validation(error)))
}

pub(crate) async fn assign_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    S: ReviewStore + 'static,
{
    let research = match parse_research(&request.research_type, request.subtype.as_deref()) {
        Ok(research) => research,
        Err(response) => return response,
    };

    let protocol = ProtocolId(protocol_id);
    let reviewer_ids = request.reviewer_ids.into_iter().map(ReviewerId).collect();

    match service.assign(&protocol, reviewer_ids, research) {
        Ok(slots) => (StatusCode::CREATED, axum::Json(slots)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.list(&ProtocolId(protocol_id)) {
        Ok(slots) => (StatusCode::OK, axum::Json(slots)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.clear(&ProtocolId(protocol_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scan_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.scan_overdue(&ProtocolId(protocol_id)) {
        Ok(overdue) => (StatusCode::OK, axum::Json(overdue)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_overdue_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.remove_overdue(&ProtocolId(protocol_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(json!({ "removed": removed }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reassign_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path((protocol_id, slot_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ReassignRequest>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.reassign(
        &ProtocolId(protocol_id),
        &SlotId(slot_id),
        &ReviewerId(request.new_reviewer_id),
        &request.reason,
        &request.actor,
    ) {
        Ok(slot) => (StatusCode::OK, axum::Json(slot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.reassignment_history(&ProtocolId(protocol_id)) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommend_handler<S>(
    State(service): State<Arc<ReviewAssignmentService<S>>>,
    Query(query): Query<RecommendQuery>,
) -> Response
where
    S: ReviewStore + 'static,
{
    let research = match parse_research(&query.research_type, query.subtype.as_deref()) {
        Ok(research) => research,
        Err(response) => return response,
    };

    let keywords: Vec<String> = query
        .keywords
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect();

    match service.recommend(research, &keywords) {
        Ok(mut ranked) => {
            // A shortlist must leave the chairperson a real choice.
            let floor = 2 * assignment_policy(research).required_reviewers;
            if let Some(limit) = query.limit {
                ranked.truncate(limit.max(floor));
            }
            (StatusCode::OK, axum::Json(ranked)).into_response()
        }
        Err(error) => error_response(error),
    }
}
