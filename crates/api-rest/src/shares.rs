//! Share link endpoints.

use crate::error::{blocking, ApiResult};
use crate::AppState;
use api_shared::{
    CreateShareReq, CreateShareRes, ErrorRes, ListSharesRes, ResolveShareRes, ShareItem,
};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    response::Json,
};
use chrono::SecondsFormat;
use sharebox_core::ShareRecord;

fn share_item(record: ShareRecord) -> ShareItem {
    ShareItem {
        id: record.id.to_string(),
        file_id: record.file_id,
        file_name: record.file_name,
        created_at: record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        expires_at: record
            .expires_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        downloads: record.downloads,
    }
}

#[utoipa::path(
    post,
    path = "/share",
    request_body = CreateShareReq,
    responses(
        (status = 200, description = "Share id (existing one if the file is already shared)", body = CreateShareRes),
        (status = 400, description = "Malformed body or expiresIn out of range", body = ErrorRes),
        (status = 404, description = "No such file", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a share link for a stored file
pub(crate) async fn create_share(
    State(state): State<AppState>,
    payload: Result<Json<CreateShareReq>, JsonRejection>,
) -> ApiResult<Json<CreateShareRes>> {
    let Json(req) = payload?;
    let file_name = if req.file_name.is_empty() {
        req.file_id.clone()
    } else {
        req.file_name
    };
    let service = state.share_service.clone();
    let id = blocking(move || service.create(&req.file_id, &file_name, req.expires_in)).await?;

    Ok(Json(CreateShareRes {
        share_id: id.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/share",
    responses(
        (status = 200, description = "Active share links", body = ListSharesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List active share links
///
/// Expired records are purged from the registry as a side effect.
pub(crate) async fn list_shares(State(state): State<AppState>) -> ApiResult<Json<ListSharesRes>> {
    let service = state.share_service.clone();
    let shares = blocking(move || service.list()).await?;
    Ok(Json(ListSharesRes {
        shares: shares.into_iter().map(share_item).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/share/{id}",
    params(("id" = String, Path, description = "Share id")),
    responses(
        (status = 200, description = "Resolved share; the download counter was incremented", body = ResolveShareRes),
        (status = 404, description = "Unknown share", body = ErrorRes),
        (status = 410, description = "Share expired", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Resolve a share link to its file
pub(crate) async fn resolve_share(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ResolveShareRes>> {
    let service = state.share_service.clone();
    let resolved = blocking(move || service.resolve(&id)).await?;
    Ok(Json(ResolveShareRes {
        file_name: resolved.file_name,
        file_url: resolved.file_url,
        downloads: resolved.downloads,
    }))
}
