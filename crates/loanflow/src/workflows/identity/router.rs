use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::auth::{CredentialScheme, TokenAuthority};
use super::domain::NewUser;
use super::repository::UserRepository;
use super::service::{IdentityError, IdentityService};

/// Router builder exposing registration and login endpoints.
pub fn identity_router<R, C, T>(service: Arc<IdentityService<R, C, T>>) -> Router
where
    R: UserRepository + 'static,
    C: CredentialScheme + 'static,
    T: TokenAuthority + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<R, C, T>))
        .route("/api/v1/auth/login", post(login_handler::<R, C, T>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) birth_date: NaiveDate,
    #[serde(default)]
    pub(crate) address: String,
    #[serde(default)]
    pub(crate) phone: String,
    pub(crate) email: String,
    pub(crate) base_salary: f64,
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) roles: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

pub(crate) async fn register_handler<R, C, T>(
    State(service): State<Arc<IdentityService<R, C, T>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: UserRepository + 'static,
    C: CredentialScheme + 'static,
    T: TokenAuthority + 'static,
{
    let registration = NewUser {
        first_name: request.first_name,
        last_name: request.last_name,
        birth_date: request.birth_date,
        address: request.address,
        phone: request.phone,
        email: request.email,
        base_salary: request.base_salary,
        password: request.password,
        roles: request.roles,
    };

    match service.register(registration).await {
        Ok(user) => (StatusCode::CREATED, axum::Json(user.view())).into_response(),
        Err(error) => identity_error_response(error),
    }
}

pub(crate) async fn login_handler<R, C, T>(
    State(service): State<Arc<IdentityService<R, C, T>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: UserRepository + 'static,
    C: CredentialScheme + 'static,
    T: TokenAuthority + 'static,
{
    match service.login(&request.email, &request.password).await {
        Ok(token) => (StatusCode::OK, axum::Json(json!({ "token": token }))).into_response(),
        Err(error) => identity_error_response(error),
    }
}

fn identity_error_response(error: IdentityError) -> Response {
    let status = match &error {
        IdentityError::MissingRequiredFields
        | IdentityError::MalformedEmail
        | IdentityError::SalaryOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        IdentityError::EmailTaken => StatusCode::CONFLICT,
        IdentityError::InvalidCredentials | IdentityError::Token(_) => StatusCode::UNAUTHORIZED,
        IdentityError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
