//! # API REST
//!
//! REST API implementation for sharebox.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Static serving of stored blobs under the public path
//! - REST-specific concerns (JSON serialization, multipart parsing, CORS, body limits)
//!
//! Uses `api-shared` for wire types and `sharebox-core` for the actual work. The binary that
//! binds a listener lives in the workspace root.

#![warn(rust_2018_idioms)]

mod error;
mod files;
mod shares;

pub use error::{ApiError, ApiResult};

use api_shared::{
    CreateShareReq, CreateShareRes, DeleteFileRes, ErrorRes, FileItem, FileStatsRes, HealthRes,
    HealthService, ListFilesRes, ListSharesRes, ResolveShareRes, ShareItem, TrendPoint, TypeCount,
    UploadRes,
};
use axum::{
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use sharebox_core::{CatalogService, CoreConfig, ShareService, UploadService};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Allowance for multipart framing on top of the configured upload limit.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    upload_service: UploadService,
    catalog_service: CatalogService,
    share_service: Arc<ShareService>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            upload_service: UploadService::new(cfg.clone()),
            catalog_service: CatalogService::new(cfg.clone()),
            share_service: Arc::new(ShareService::new(cfg.clone())),
            cfg,
        }
    }

    pub fn cfg(&self) -> &CoreConfig {
        &self.cfg
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        files::upload_file,
        files::list_files,
        files::delete_file,
        files::file_stats,
        shares::create_share,
        shares::list_shares,
        shares::resolve_share,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        UploadRes,
        FileItem,
        ListFilesRes,
        DeleteFileRes,
        FileStatsRes,
        TypeCount,
        TrendPoint,
        CreateShareReq,
        CreateShareRes,
        ShareItem,
        ListSharesRes,
        ResolveShareRes,
    ))
)]
struct ApiDoc;

/// Builds the full REST application for `state`.
///
/// Routes:
/// - `POST /files` (alias `POST /upload`), `GET /files`, `DELETE /files/:id`, `GET /files/stats`
/// - `POST /share`, `GET /share`, `GET /share/:id`
/// - `GET /health`
/// - stored blobs under the configured public path
/// - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .cfg
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let blobs = ServeDir::new(state.cfg.upload_dir());
    let public_path = state.cfg.public_path().to_owned();

    Router::new()
        .route("/health", get(health))
        .route("/files", get(files::list_files).post(files::upload_file))
        .route("/upload", post(files::upload_file))
        .route("/files/stats", get(files::file_stats))
        .route("/files/:id", delete(files::delete_file))
        .route("/share", get(shares::list_shares).post(shares::create_share))
        .route("/share/:id", get(shares::resolve_share))
        .nest_service(&public_path, blobs)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
