use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::workflows::identity::auth::TokenAuthority;
use crate::workflows::identity::repository::UserRepository;

use super::domain::{ApplicationId, ApplicationView, LoanSubmission, PageRequest};
use super::repository::ApplicationRepository;
use super::service::{LoanOriginationService, OriginationError};

const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_SORT_KEY: &str = "id";

/// Shared state for the origination endpoints: the use-case service plus the
/// token authority that authenticates the acting user.
pub struct OriginationRouterState<R, U, T> {
    service: Arc<LoanOriginationService<R, U>>,
    tokens: Arc<T>,
}

impl<R, U, T> Clone for OriginationRouterState<R, U, T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Router builder exposing HTTP endpoints for intake, evaluation, and the
/// manual review queue. Every route requires a bearer token.
pub fn application_router<R, U, T>(
    service: Arc<LoanOriginationService<R, U>>,
    tokens: Arc<T>,
) -> Router
where
    R: ApplicationRepository + 'static,
    U: UserRepository + 'static,
    T: TokenAuthority + 'static,
{
    Router::new()
        .route("/api/v1/loans", post(submit_handler::<R, U, T>))
        .route(
            "/api/v1/loans/review",
            get(review_queue_handler::<R, U, T>),
        )
        .route(
            "/api/v1/loans/:application_id/evaluation",
            get(evaluate_handler::<R, U, T>),
        )
        .with_state(OriginationRouterState { service, tokens })
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitLoanRequest {
    pub(crate) applicant_email: String,
    pub(crate) amount: f64,
    pub(crate) term_months: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewQueueParams {
    #[serde(default)]
    page: u32,
    size: Option<u32>,
    sort_by: Option<String>,
}

pub(crate) async fn submit_handler<R, U, T>(
    State(state): State<OriginationRouterState<R, U, T>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<SubmitLoanRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    U: UserRepository + 'static,
    T: TokenAuthority + 'static,
{
    let acting_email = match authorized_subject(&headers, state.tokens.as_ref()).await {
        Ok(subject) => subject,
        Err(response) => return response,
    };

    let submission = LoanSubmission {
        applicant_email: request.applicant_email,
        amount: request.amount,
        term_months: request.term_months,
    };

    match state.service.submit(submission, &acting_email).await {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.view())).into_response()
        }
        Err(error) => origination_error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, U, T>(
    State(state): State<OriginationRouterState<R, U, T>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    U: UserRepository + 'static,
    T: TokenAuthority + 'static,
{
    if let Err(response) = authorized_subject(&headers, state.tokens.as_ref()).await {
        return response;
    }

    let id = ApplicationId(application_id);
    match state.service.evaluate(&id).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => origination_error_response(error),
    }
}

pub(crate) async fn review_queue_handler<R, U, T>(
    State(state): State<OriginationRouterState<R, U, T>>,
    headers: HeaderMap,
    Query(params): Query<ReviewQueueParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
    U: UserRepository + 'static,
    T: TokenAuthority + 'static,
{
    if let Err(response) = authorized_subject(&headers, state.tokens.as_ref()).await {
        return response;
    }

    let page = PageRequest {
        page: params.page,
        size: params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        sort_by: params
            .sort_by
            .unwrap_or_else(|| DEFAULT_SORT_KEY.to_string()),
    };

    match state.service.review_queue(&page).await {
        Ok(applications) => {
            let views: Vec<ApplicationView> =
                applications.iter().map(|application| application.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => origination_error_response(error),
    }
}

async fn authorized_subject<T>(headers: &HeaderMap, tokens: &T) -> Result<String, Response>
where
    T: TokenAuthority,
{
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return Err(unauthorized_response("missing bearer token"));
    };

    match tokens.validate(token).await {
        Ok(claims) => Ok(claims.subject),
        Err(_) => Err(unauthorized_response("token is invalid or expired")),
    }
}

fn unauthorized_response(message: &str) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn origination_error_response(error: OriginationError) -> Response {
    let status = match &error {
        OriginationError::Validation(_) | OriginationError::UnknownApplicant => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        OriginationError::Unauthorized => StatusCode::FORBIDDEN,
        OriginationError::ApplicationNotFound | OriginationError::ApplicantNotFound => {
            StatusCode::NOT_FOUND
        }
        OriginationError::Conflict => StatusCode::CONFLICT,
        OriginationError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
