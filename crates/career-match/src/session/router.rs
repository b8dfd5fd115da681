use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::service::{MatchingService, MatchingServiceError};
use super::store::{SessionStore, StoreError};
use super::SessionId;
use crate::catalog::JobPosting;
use crate::scorer::MatchResult;
use crate::skills::SkillSet;

const FEATURED_COUNT: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenSessionRequest {
    #[serde(default)]
    pub(crate) skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddSkillRequest {
    pub(crate) name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuggestQuery {
    #[serde(default)]
    pub(crate) prefix: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalysisRequest {
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRequest {
    pub(crate) skills: Vec<String>,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
}

/// Router builder exposing session, suggestion, and matching endpoints.
pub fn matching_router<S>(service: Arc<MatchingService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(open_session_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<S>).delete(close_session_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/skills",
            post(add_skill_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/skills/:name",
            delete(remove_skill_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/suggestions",
            get(suggestions_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/featured",
            get(featured_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/analysis",
            post(analysis_handler::<S>),
        )
        .route("/api/v1/matches", post(matches_handler::<S>))
        .route("/api/v1/jobs", get(jobs_handler::<S>))
        .with_state(service)
}

pub(crate) async fn open_session_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    body: Bytes,
) -> Response
where
    S: SessionStore + 'static,
{
    let request: OpenSessionRequest = match optional_json(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match service.open_session(&request.skills) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_session_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_skill_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
    request: Result<axum::Json<AddSkillRequest>, JsonRejection>,
) -> Response
where
    S: SessionStore + 'static,
{
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    match service.add_skill(&SessionId(session_id), &request.name) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_skill_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path((session_id, name)): Path<(String, String)>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.remove_skill(&SessionId(session_id), &name) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn suggestions_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> Response
where
    S: SessionStore + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    match service.suggest(&SessionId(session_id), &query.prefix) {
        Ok(skills) => (StatusCode::OK, axum::Json(skills)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn featured_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.featured(&SessionId(session_id), FEATURED_COUNT) {
        Ok(skills) => (StatusCode::OK, axum::Json(skills)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analysis_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Response
where
    S: SessionStore + 'static,
{
    let request: AnalysisRequest = match optional_json(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match service.start_analysis(&SessionId(session_id), request.top_n) {
        Ok(ticket) => {
            let payload = json!({
                "session_id": ticket.session(),
                "generation": ticket.generation(),
                "status": "analyzing",
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn matches_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    request: Result<axum::Json<MatchRequest>, JsonRejection>,
) -> Response
where
    S: SessionStore + 'static,
{
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    let ranked = SkillSet::from_names(&request.skills)
        .and_then(|skills| service.compute_matches(&skills, request.top_n));

    match ranked {
        Ok(results) => {
            let views: Vec<_> = results.iter().map(MatchResult::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(MatchingServiceError::Match(err)),
    }
}

pub(crate) async fn jobs_handler<S>(State(service): State<Arc<MatchingService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    let jobs: Vec<&JobPosting> = service.jobs().iter().map(|job| job.as_ref()).collect();
    (StatusCode::OK, axum::Json(jobs)).into_response()
}

/// Decodes a JSON body that may be omitted entirely; an empty body yields the defaults.
fn optional_json<T>(body: &Bytes) -> Result<T, Response>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|err| {
        let status = if err.is_data() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        };
        rejection_response(status, format!("invalid request body: {err}"))
    })
}

fn rejection_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn error_response(err: MatchingServiceError) -> Response {
    let status = match &err {
        MatchingServiceError::Match(inner) => inner.status_code(),
        MatchingServiceError::SessionNotFound(_)
        | MatchingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        MatchingServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        MatchingServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
