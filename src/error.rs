// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(Vec<String>),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (external service issues)
    BadGateway(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Convert to JSON response body.
    ///
    /// Validation errors carry the itemized message list as `{"error": [...]}`;
    /// everything else is a single `{"msg": "..."}`.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(messages) => json!({ "error": messages }),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::BadGateway(msg) => json!({ "msg": msg }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(messages: Vec<String>) -> Self {
        ApiError::Validation(messages)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

// Convert other error types to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("record not found"),
            other => {
                // Don't expose internal SQL errors to clients
                tracing::error!("database error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::blob::BlobError> for ApiError {
    fn from(err: crate::services::blob::BlobError) -> Self {
        tracing::error!("blob store error: {}", err);
        ApiError::bad_gateway("image storage is currently unavailable")
    }
}

impl From<crate::services::items::ItemError> for ApiError {
    fn from(err: crate::services::items::ItemError) -> Self {
        use crate::services::items::ItemError;
        match err {
            ItemError::NotFound => ApiError::not_found("Item not found"),
            ItemError::NotFoundOrNotOwner => {
                ApiError::not_found("Item not found or you are not authorized")
            }
            ItemError::ClaimWrongCategory => {
                ApiError::bad_request("Only found items can be claimed")
            }
            ItemError::ClaimNotOwner => {
                ApiError::unauthorized("You are not allowed to claim this item")
            }
            ItemError::AlreadyClaimed => ApiError::bad_request("Item has already been claimed"),
            ItemError::Database(e) => e.into(),
            ItemError::Blob(e) => e.into(),
        }
    }
}

impl From<crate::services::users::UserError> for ApiError {
    fn from(err: crate::services::users::UserError) -> Self {
        use crate::services::users::UserError;
        match err {
            UserError::NotFound => ApiError::not_found("user not found"),
            UserError::UsernameTaken => ApiError::bad_request("username already taken"),
            UserError::InvalidCredentials => ApiError::unauthorized("invalid credentials"),
            UserError::PasswordHash(e) => {
                tracing::error!("password hashing error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            UserError::Database(e) => e.into(),
            UserError::Blob(e) => e.into(),
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("jwt error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(messages) => write!(f, "{}", messages.join(", ")),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::BadGateway(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_use_itemized_shape() {
        let err = ApiError::validation(vec!["name is required".to_string()]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json(), json!({ "error": ["name is required"] }));
    }

    #[test]
    fn other_errors_use_msg_shape() {
        let err = ApiError::not_found("Item not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json(), json!({ "msg": "Item not found" }));
    }
}
