// Error taxonomy module
// Every failure a request can hit maps to exactly one kind here

use hyper::StatusCode;

/// Request-level failures, one variant per observable failure mode.
///
/// Each kind carries its own response status; the JSON body is always
/// `{"error": <Display of the kind>}` (see `api::response::error_response`).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The store connection URL was never configured
    #[error("Database connection not configured")]
    ConfigMissing,

    /// The request payload failed validation before any store access
    #[error("{0}")]
    ValidationFailed(String),

    /// Dispatch received a method other than GET/POST/OPTIONS
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Anything the store reported: connect, query, or commit failure
    #[error("Database error: {0}")]
    StoreFailure(#[from] sqlx::Error),
}

impl ApiError {
    /// Response status for this failure kind
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ConfigMissing | Self::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}
