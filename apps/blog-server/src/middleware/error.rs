//! Error handling - HTML error pages for failed requests.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use askama::Template;
use std::fmt;

use crate::views::ErrorTemplate;

/// Application-level error type rendered as an HTML error page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let page = match self {
            AppError::NotFound(detail) => {
                tracing::debug!(%detail, "Not found");
                ErrorTemplate::new(status, "Not Found", None)
            }
            AppError::BadRequest(detail) => {
                ErrorTemplate::new(status, "Bad Request", Some(detail.clone()))
            }
            AppError::Internal(detail) => {
                // Log internal errors; clients only see the generic page.
                tracing::error!("Internal error: {}", detail);
                ErrorTemplate::new(status, "Internal Server Error", None)
            }
        };

        match page.render() {
            Ok(body) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(body),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(status.canonical_reason().unwrap_or("Error"))
            }
        }
    }
}

// Conversion from domain errors
impl From<blog_core::error::DomainError> for AppError {
    fn from(err: blog_core::error::DomainError) -> Self {
        match err {
            blog_core::error::DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
        }
    }
}

impl From<blog_core::error::RepoError> for AppError {
    fn from(err: blog_core::error::RepoError) -> Self {
        match err {
            blog_core::error::RepoError::NotFound => {
                AppError::NotFound("Resource not found".to_string())
            }
            blog_core::error::RepoError::Constraint(msg) => {
                tracing::error!("Database constraint violation: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            blog_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            blog_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use blog_core::error::{DomainError, RepoError};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_status_codes() {
        let missing: AppError = DomainError::post_not_found(Uuid::new_v4()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let repo_miss: AppError = RepoError::NotFound.into();
        assert_eq!(repo_miss.status_code(), StatusCode::NOT_FOUND);

        let broken: AppError = RepoError::Query("syntax error".to_string()).into();
        assert_eq!(broken.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::Internal("password=hunter2".to_string());
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains("Internal Server Error"));
        assert!(!html.contains("hunter2"));
    }
}
