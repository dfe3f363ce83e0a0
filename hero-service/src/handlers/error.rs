//! API error types for handler operations
//!
//! Every failure that reaches the HTTP boundary is an [`ApiError`]. Domain
//! errors keep their message; internal errors are logged with their detail
//! and answered with a generic body.
//!
//! # Example
//!
//! ```rust
//! use hero_service::handlers::{ApiError, ApiErrorKind, ApiOperation};
//!
//! let error = ApiError::not_found("Hero", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.kind.status_code().as_u16(), 404);
//! ```

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Public message for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing heroes
    List,
    /// Getting a single hero by ID
    Get,
    /// Creating a hero
    Create,
    /// Updating a hero
    Update,
    /// Deleting a hero
    Delete,
    /// Generating a hero's story
    Story,
    /// Serving an endpoint outside the hero collection
    Service,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Story => write!(f, "story"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists
    AlreadyExists,
    /// Malformed parameters or body
    InvalidInput,
    /// Anything else
    Internal,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::Internal => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Message returned to the caller
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
    /// Server-side detail, logged but never serialized
    pub detail: Option<String>,
    /// Id of the request that failed, logged but never serialized
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            detail: None,
            request_id: None,
        }
    }

    /// Create a "not found" error naming the resource
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::NotFound,
            format!("{} with id {} not found", entity_type, entity_id),
        )
        .with_entity(entity_type, entity_id)
    }

    /// Create an invalid input error
    pub fn invalid_input(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InvalidInput, message)
    }

    /// Create an internal error; `detail` is only logged
    pub fn internal(operation: ApiOperation, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(operation, ApiErrorKind::Internal, INTERNAL_ERROR_MESSAGE)
        }
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Attach the id of the failing request for the error log
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let request_id = self.request_id.as_deref().unwrap_or_default();

        if self.kind == ApiErrorKind::Internal {
            tracing::error!(
                request_id,
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                detail = self.detail.as_deref().unwrap_or_default(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                request_id,
                operation = %self.operation,
                status = status.as_u16(),
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::FindPage | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::AlreadyExists,
            RepositoryErrorKind::InvalidInput => ApiErrorKind::InvalidInput,
            RepositoryErrorKind::ConnectionFailed
            | RepositoryErrorKind::DatabaseError
            | RepositoryErrorKind::Other => ApiErrorKind::Internal,
        };

        if kind == ApiErrorKind::Internal {
            let detail = err.to_string();
            return Self {
                entity_type: err.entity_type,
                entity_id: err.entity_id,
                ..Self::internal(operation, detail)
            };
        }

        Self {
            operation,
            kind,
            message: err.message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            detail: None,
            request_id: None,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(ApiOperation::List, rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(ApiOperation::Create, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_input(ApiOperation::Get, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, ApiErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiErrorKind::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiErrorKind::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiErrorKind::AlreadyExists.error_code(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_display() {
        let error = ApiError::not_found("Hero", "9").with_operation(ApiOperation::Delete);
        assert_eq!(
            error.to_string(),
            "API not_found error during delete: Hero with id 9 not found [Hero: 9]"
        );
    }

    #[test]
    fn test_from_repository_domain_errors() {
        let conflict: ApiError = RepositoryError::already_exists("Hero", "alias", "Batman").into();
        assert_eq!(conflict.kind, ApiErrorKind::AlreadyExists);
        assert_eq!(conflict.operation, ApiOperation::Create);
        assert_eq!(conflict.message, "Hero with alias Batman already exists");

        let missing: ApiError = RepositoryError::not_found("Hero", "3")
            .with_operation(RepositoryOperation::Update)
            .into();
        assert_eq!(missing.kind, ApiErrorKind::NotFound);
        assert_eq!(missing.operation, ApiOperation::Update);
    }

    #[test]
    fn test_from_repository_internal_hides_message() {
        let err = RepositoryError::new(
            RepositoryOperation::FindPage,
            RepositoryErrorKind::DatabaseError,
            "no such table: heros",
        );
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::Internal);
        assert_eq!(api.message, INTERNAL_ERROR_MESSAGE);
        assert!(api.detail.unwrap().contains("no such table"));
    }

    #[tokio::test]
    async fn test_internal_response_leaks_nothing() {
        let (status, body) = body_of(ApiError::internal(
            ApiOperation::List,
            "database is locked at /var/lib/heroes.sqlite3",
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, INTERNAL_ERROR_MESSAGE);
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert_eq!(body.status, 500);
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let (status, body) = body_of(ApiError::not_found("Hero", "12")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Hero with id 12 not found");
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.entity_type.as_deref(), Some("Hero"));
        assert_eq!(body.entity_id.as_deref(), Some("12"));
    }
}
