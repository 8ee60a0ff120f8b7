use axum::{response::IntoResponse, Json};

#[derive(Debug, thiserror::Error)]
pub enum TicketsError {
    #[error("Ticket not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(String),
    /// No signed-in identity at the time of the operation. Surfaced as an
    /// empty 401; the original flow aborted without any notification.
    #[error("Not signed in")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
}

impl From<diesel::result::Error> for TicketsError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => Self::NotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for TicketsError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        Self::Database(e.to_string())
    }
}

impl IntoResponse for TicketsError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let (status, message) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::Unauthenticated => return StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
