//! Admin routes. Every handler checks `X-Admin-Key` before touching its input.

use crate::api::{
    AccountDurationResponse, AccountView, CreateAccountRequest, DeletedResponse, ExtendRequest,
    ADMIN_KEY_HEADER,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use seatlock_session::constant_time_eq;
use tracing::warn;

fn authenticate_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let provided = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if state.admin_key.is_empty()
        || !constant_time_eq(provided.as_bytes(), state.admin_key.as_bytes())
    {
        warn!("admin request rejected: bad admin key");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// POST /admin/accounts
pub(crate) async fn create_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AccountDurationResponse>)> {
    authenticate_admin(&state, &headers)?;
    let Json(req) = body?;

    let summary = state
        .admin
        .create_account(&req.account_id, &req.password, req.duration_seconds)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AccountDurationResponse {
            account_id: summary.id,
            duration_seconds: summary.duration_secs,
        }),
    ))
}

/// GET /admin/accounts
pub(crate) async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<AccountView>>> {
    authenticate_admin(&state, &headers)?;
    let accounts = state.admin.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

/// DELETE /admin/accounts/{id}
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    authenticate_admin(&state, &headers)?;
    let account_id = account_id.trim();
    state.admin.delete_account(account_id).await?;
    Ok(Json(DeletedResponse {
        account_id: account_id.to_string(),
    }))
}

/// POST /admin/accounts/{id}/extend
pub(crate) async fn extend_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
    body: Result<Json<ExtendRequest>, JsonRejection>,
) -> ApiResult<Json<AccountDurationResponse>> {
    authenticate_admin(&state, &headers)?;
    let Json(req) = body?;

    let account_id = account_id.trim();
    let duration_seconds = state
        .admin
        .extend_duration(account_id, req.extra_seconds)
        .await?;
    Ok(Json(AccountDurationResponse {
        account_id: account_id.to_string(),
        duration_seconds,
    }))
}
