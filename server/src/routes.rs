//! Client-facing license routes.

use crate::api::{
    CheckResponse, GrantResponse, LoginRequest, ValidateRequest, ValidateResponse,
    DEVICE_ID_HEADER,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;

/// POST /api/v1/login
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<GrantResponse>> {
    let Json(req) = body?;
    let grant = state
        .service
        .login(&req.account_id, &req.password, &req.device_id)
        .await?;
    Ok(Json(grant.into()))
}

/// POST /api/v1/refresh
pub(crate) async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<GrantResponse>> {
    let (token, device_id) = session_headers(&headers)?;
    let grant = state.service.refresh(token, device_id).await?;
    Ok(Json(grant.into()))
}

/// GET /api/v1/check
pub(crate) async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<CheckResponse>> {
    let (token, device_id) = session_headers(&headers)?;
    let check = state.service.check(token, device_id).await?;
    Ok(Json(check.into()))
}

/// POST /api/v1/session/validate
pub(crate) async fn validate_session(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> ApiResult<Json<ValidateResponse>> {
    let Json(req) = body?;
    let valid = state
        .service
        .session_valid(&req.account_id, &req.device_id, &req.token)
        .await?;
    Ok(Json(ValidateResponse { valid }))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn session_headers(headers: &HeaderMap) -> ApiResult<(&str, &str)> {
    let token = extract_bearer_token(headers).ok_or(ApiError::MissingToken)?;
    let device_id = headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing X-Device-Id header".to_string()))?;
    Ok((token, device_id))
}
