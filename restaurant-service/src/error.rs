use axum::{http::StatusCode, response::Json};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Connection unavailable: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Migration failed: {0}")]
    Migration(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error("Database task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(error = %self, "request failed");

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
