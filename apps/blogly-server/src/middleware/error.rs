//! Error handling - every failure becomes an HTML error page.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use blogly_core::{DomainError, RepoError};
use blogly_shared::ErrorResponse;
use std::fmt;

/// Standalone page; it cannot extend the layout because it renders without state.
const ERROR_TEMPLATE: &str = include_str!("../../templates/error.html");

/// Application-level error type rendered as an HTML problem page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        }
    }
}

/// Render the error page, degrading to plain text if the template fails.
pub fn render_problem(problem: &ErrorResponse) -> String {
    tera::Context::from_serialize(problem)
        .and_then(|ctx| tera::Tera::one_off(ERROR_TEMPLATE, &ctx, true))
        .unwrap_or_else(|e| {
            tracing::warn!("Error page failed to render: {}", e);
            format!("{} {}", problem.status, problem.title)
        })
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(render_problem(&self.problem()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) | DomainError::InUse(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Duplicate(msg) | RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        let mut detail = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        AppError::Internal(detail)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page_shows_detail() {
        let err = AppError::from(DomainError::not_found("User", 7));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let html = render_problem(&err.problem());
        assert!(html.contains("404"));
        assert!(html.contains("User 7 not found"));
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::from(RepoError::Query("relation \"users\" does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = render_problem(&err.problem());
        assert!(html.contains("Internal Server Error"));
        assert!(!html.contains("relation"));
    }

    #[test]
    fn test_detail_is_escaped() {
        let html = render_problem(&ErrorResponse::bad_request("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
