//! Error handling - RFC 7807 responses and the soft-denial redirect.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use std::fmt;

use gazette_core::error::RepoError;
use gazette_core::validate::FieldError;
use gazette_shared::{ErrorResponse, FieldViolation};

/// Application-level error type.
///
/// An absent entity and a hidden one both map to `NotFound`, so responses
/// never reveal whether unpublished content exists. `Denied` is the one
/// deliberate exception: a mutation attempt on a known id by a non-author
/// answers with a redirect to the entity's detail view instead of an error
/// page.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    Denied { location: String },
    Validation(Vec<FieldError>),
    Unauthorized,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "not found"),
            AppError::Denied { location } => write!(f, "denied, redirecting to {location}"),
            AppError::Validation(errors) => write!(f, "validation failed: {errors:?}"),
            AppError::Unauthorized => write!(f, "unauthorized"),
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Denied { .. } => StatusCode::SEE_OTHER,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Denied { location } => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location.clone()))
                .finish(),
            AppError::NotFound => {
                HttpResponse::NotFound().json(ErrorResponse::not_found())
            }
            AppError::Validation(errors) => {
                let fields = errors
                    .iter()
                    .map(|e| FieldViolation {
                        field: e.field.to_string(),
                        message: e.message.clone(),
                    })
                    .collect();
                HttpResponse::UnprocessableEntity().json(ErrorResponse::validation_failed(fields))
            }
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
            }
            AppError::Conflict(detail) => {
                HttpResponse::Conflict().json(ErrorResponse::conflict(detail.clone()))
            }
            AppError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("database error: {msg}");
                AppError::Internal("database error".to_string())
            }
        }
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_is_a_redirect_not_an_error_page() {
        let err = AppError::Denied {
            location: "/api/posts/abc".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::SEE_OTHER);

        let response = err.error_response();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(location, Some("/api/posts/abc"));
    }

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repo_not_found_collapses_into_the_same_not_found() {
        let err: AppError = RepoError::NotFound.into();
        assert!(matches!(err, AppError::NotFound));
    }
}
