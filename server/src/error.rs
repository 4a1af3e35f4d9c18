//! Mapping of core errors onto HTTP responses.

use crate::api::ErrorBody;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use seatlock_session::AuthError;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    /// Malformed body or missing header.
    BadRequest(String),
    /// No bearer token at all.
    MissingToken,
    /// Bad or missing admin key.
    Forbidden,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                AuthError::Superseded | AuthError::LicenseExpired => StatusCode::FORBIDDEN,
                AuthError::NotFound(_) => StatusCode::NOT_FOUND,
                AuthError::Conflict(_) => StatusCode::CONFLICT,
                AuthError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(err) => err.kind(),
            Self::BadRequest(_) => "invalid_request",
            Self::MissingToken => "unauthenticated",
            Self::Forbidden => "forbidden",
        }
    }

    fn message(&self) -> String {
        match self {
            // Backend details stay in the log.
            Self::Auth(AuthError::Store(_)) => "account store unavailable".to_string(),
            Self::Auth(AuthError::Internal(_)) => "internal server error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::MissingToken => "missing bearer token".to_string(),
            Self::Forbidden => "invalid admin key".to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Auth(err @ (AuthError::Store(_) | AuthError::Internal(_))) = &self {
            error!("request failed: {err}");
        }
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
