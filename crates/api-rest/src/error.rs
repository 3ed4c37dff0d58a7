//! Maps core failures onto HTTP responses.

use api_shared::ErrorRes;
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sharebox_core::{CoreError, CoreResult, ErrorKind};

/// Error returned by every fallible handler.
///
/// Validation, not-found and gone errors carry their message to the client. Storage errors and
/// failed worker tasks are logged and replaced by an opaque message.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Task(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Core(CoreError::InvalidInput(rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Core(CoreError::InvalidInput(rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(format!("blocking task failed: {}", err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Gone => StatusCode::GONE,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Core(err) if err.kind() != ErrorKind::Storage => err.to_string(),
            ApiError::Core(err) => {
                tracing::error!("storage error: {:?}", err);
                "internal error".to_owned()
            }
            ApiError::Task(msg) => {
                tracing::error!("{}", msg);
                "internal error".to_owned()
            }
        };
        (status, Json(ErrorRes { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Runs a synchronous core call on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(CoreError::MissingFile).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::ShareNotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CoreError::ShareExpired("x".into())).status(),
            StatusCode::GONE
        );
        assert_eq!(
            ApiError::from(CoreError::RegistryPoisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_blocking_returns_core_result() {
        let value = blocking(|| Ok(7)).await.unwrap();
        assert_eq!(value, 7);

        let err = blocking::<(), _>(|| Err(CoreError::MissingFile))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blocking_panic_is_internal_error() {
        let err = blocking::<(), _>(|| panic!("boom")).await.unwrap_err();
        assert!(matches!(err, ApiError::Task(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
