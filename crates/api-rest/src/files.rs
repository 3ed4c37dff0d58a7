//! File endpoints: upload, catalogue, delete and statistics.

use crate::error::{blocking, ApiResult};
use crate::AppState;
use api_shared::{
    DeleteFileRes, ErrorRes, FileItem, FileStatsRes, ListFilesRes, TrendPoint, TypeCount,
    UploadRes,
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, Multipart, Path as AxumPath,
        State,
    },
    response::Json,
};
use chrono::SecondsFormat;
use sharebox_core::{compute_stats, CoreError, FileDescriptor, UploadRequest};

/// Multipart field that carries the file.
const FILE_FIELD: &str = "file";

fn multipart_error(err: MultipartError) -> CoreError {
    CoreError::InvalidInput(format!("invalid multipart body: {}", err.body_text()))
}

/// Pulls the `file` part out of a multipart body, skipping any other fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadRequest>, CoreError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(UploadRequest {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn file_item(file: FileDescriptor) -> FileItem {
    FileItem {
        id: file.id,
        file_name: file.file_name,
        original_name: file.original_name,
        file_url: file.url,
        size: file.size,
        file_type: file.file_type,
        created_at: file.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[utoipa::path(
    post,
    path = "/files",
    request_body(content = String, content_type = "multipart/form-data", description = "Multipart body with a `file` part"),
    responses(
        (status = 200, description = "File stored", body = UploadRes),
        (status = 400, description = "Not multipart, missing file, unsupported type or too large", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Upload a single file
///
/// Also served at `POST /upload`.
pub(crate) async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadRes>> {
    let mut multipart = multipart?;
    let request = read_file_field(&mut multipart).await?;
    let service = state.upload_service.clone();
    let uploaded = blocking(move || service.upload(request)).await?;

    Ok(Json(UploadRes {
        success: true,
        file_url: uploaded.url,
        file_name: uploaded.stored_name,
        original_name: uploaded.original_name,
        size: uploaded.size,
        file_type: uploaded.content_type,
    }))
}

#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "Stored files", body = ListFilesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every stored file, ordered by name
pub(crate) async fn list_files(State(state): State<AppState>) -> ApiResult<Json<ListFilesRes>> {
    let catalog = state.catalog_service.clone();
    let files = blocking(move || catalog.list()).await?;
    Ok(Json(ListFilesRes {
        files: files.into_iter().map(file_item).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(("id" = String, Path, description = "Percent-encoded stored name")),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileRes),
        (status = 400, description = "Identifier escapes the upload directory", body = ErrorRes),
        (status = 404, description = "No such file", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a stored file
///
/// Share records pointing at the file are left in place.
pub(crate) async fn delete_file(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<DeleteFileRes>> {
    let catalog = state.catalog_service.clone();
    blocking(move || catalog.delete(&id)).await?;
    Ok(Json(DeleteFileRes {
        success: true,
        message: "File deleted".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/files/stats",
    responses(
        (status = 200, description = "Catalogue aggregates", body = FileStatsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Aggregate counts and sizes over the catalogue
pub(crate) async fn file_stats(State(state): State<AppState>) -> ApiResult<Json<FileStatsRes>> {
    let catalog = state.catalog_service.clone();
    let stats = blocking(move || catalog.list().map(|files| compute_stats(&files))).await?;

    Ok(Json(FileStatsRes {
        total_files: stats.total_files,
        total_size: stats.total_size,
        type_distribution: stats
            .type_distribution
            .into_iter()
            .map(|(name, value)| TypeCount { name, value })
            .collect(),
        upload_trend: stats
            .upload_trend
            .into_iter()
            .map(|(date, count)| TrendPoint {
                date: date.format("%Y-%m-%d").to_string(),
                count,
            })
            .collect(),
    }))
}
