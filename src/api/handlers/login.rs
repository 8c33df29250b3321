//! `POST /login` decision handler.
//!
//! Checks run in a fixed order and the first failure ends the request:
//! method, body shape, email syntax, then the credential lookup. Every failure maps to a fixed
//! status/body pair and nothing derived from the payload is ever logged.

use super::{valid_email, INVALID_EMAIL_FORMAT};
use crate::store::CredentialStore;
use axum::{
    body::to_bytes,
    extract::{Extension, Request},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::{fmt, sync::Arc};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Fixed log marker for an accepted credential pair.
pub const SUCCESSFUL_LOGIN: &str = "Successful login request";

/// Upper bound on the request body; anything larger is treated as undecodable.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// Compared against when the identifier is unknown so both failure paths do the same work.
const DUMMY_SECRET: &str = "keygate/unknown-identifier/placeholder-secret";

#[derive(ToSchema, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    email: String,
    #[serde(deserialize_with = "deserialize_secret")]
    #[schema(value_type = String, format = Password)]
    password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &"***")
            .field("password", &"***")
            .finish()
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Why a login attempt was turned away. Messages are the exact response bodies.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid request method")]
    MethodNotAllowed,
    // missing field, unknown field, wrong type and bad syntax all end up here
    #[error("Cannot decode body")]
    BodyMalformed,
    #[error("Invalid email format")]
    EmailFormatInvalid,
    // unknown identifier and wrong secret are deliberately the same error
    #[error("Invalid Email or Password")]
    AuthenticationFailed,
}

impl LoginError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyMalformed | Self::EmailFormatInvalid => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Invalid request method",
            Self::BodyMalformed => "Cannot decode body",
            Self::EmailFormatInvalid => "Invalid email format",
            Self::AuthenticationFailed => "Invalid Email or Password",
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

/// Terminal state of one login request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    Unauthorized,
    MethodNotAllowed,
    Malformed(LoginError),
}

impl From<Result<(), LoginError>> for AuthOutcome {
    fn from(result: Result<(), LoginError>) -> Self {
        match result {
            Ok(()) => Self::Authorized,
            Err(LoginError::AuthenticationFailed) => Self::Unauthorized,
            Err(LoginError::MethodNotAllowed) => Self::MethodNotAllowed,
            Err(e) => Self::Malformed(e),
        }
    }
}

impl IntoResponse for AuthOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Authorized => StatusCode::OK.into_response(),
            Self::Unauthorized => LoginError::AuthenticationFailed.into_response(),
            Self::MethodNotAllowed => LoginError::MethodNotAllowed.into_response(),
            Self::Malformed(e) => e.into_response(),
        }
    }
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Credentials are valid"),
        (status = 400, description = "Cannot decode body / Invalid email format", body = String, content_type = "text/plain"),
        (status = 401, description = "Invalid Email or Password", body = String, content_type = "text/plain"),
        (status = 405, description = "Invalid request method", body = String, content_type = "text/plain"),
    ),
    tag= "login"
)]
// axum handler for login, mounted for every method
#[instrument(skip_all)]
pub async fn login(
    Extension(store): Extension<Arc<dyn CredentialStore>>,
    request: Request,
) -> AuthOutcome {
    authenticate(store.as_ref(), request).await.into()
}

/// Run the ordered checks for one request.
///
/// # Errors
/// Returns the first [`LoginError`] hit; later stages never run.
pub async fn authenticate(store: &dyn CredentialStore, request: Request) -> Result<(), LoginError> {
    if request.method() != Method::POST {
        return Err(LoginError::MethodNotAllowed);
    }

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| LoginError::BodyMalformed)?;

    let user = decode(&body)?;

    if !valid_email(user.email()) {
        warn!("{}", INVALID_EMAIL_FORMAT);

        return Err(LoginError::EmailFormatInvalid);
    }

    verify(store, &user)
}

/// Decode exactly one JSON object; anything after it is ignored.
fn decode(body: &[u8]) -> Result<LoginRequest, LoginError> {
    // derived struct impls also accept a JSON array, only objects are valid here
    if body.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{') {
        return Err(LoginError::BodyMalformed);
    }

    serde_json::Deserializer::from_slice(body)
        .into_iter::<LoginRequest>()
        .next()
        .and_then(Result::ok)
        .ok_or(LoginError::BodyMalformed)
}

fn verify(store: &dyn CredentialStore, user: &LoginRequest) -> Result<(), LoginError> {
    let stored = store.lookup(user.email());
    let expected = stored
        .as_ref()
        .map_or(DUMMY_SECRET, |secret| secret.expose_secret());

    let matched = ct_eq(
        user.password().expose_secret().as_bytes(),
        expected.as_bytes(),
    );

    if stored.is_some() && matched {
        info!("{}", SUCCESSFUL_LOGIN);

        Ok(())
    } else {
        Err(LoginError::AuthenticationFailed)
    }
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}
