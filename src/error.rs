use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::utils::api_response::{ResponseBuilder, ValidationErrorDetail};

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing entity, or one the requester does not own.
    #[error("{1}")]
    NotFound(&'static str, &'static str),

    #[error("Validation failed")]
    Validation(Vec<ValidationErrorDetail>),

    #[error("{1}")]
    Unauthorized(&'static str, &'static str),

    #[error("{1}")]
    Conflict(&'static str, &'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn field(field: &str, title: &str, message: &str) -> Self {
        AppError::Validation(vec![ValidationErrorDetail {
            field: field.to_string(),
            title: title.to_string(),
            message: message.to_string(),
        }])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(code, message) => {
                ResponseBuilder::error::<()>(StatusCode::NOT_FOUND, code, message).into_response()
            }
            AppError::Validation(details) => ResponseBuilder::invalid_form(details),
            AppError::Unauthorized(code, message) => {
                ResponseBuilder::error::<()>(StatusCode::UNAUTHORIZED, code, message).into_response()
            }
            AppError::Conflict(code, message) => {
                ResponseBuilder::error::<()>(StatusCode::CONFLICT, code, message).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ResponseBuilder::error::<()>(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DB_ERR",
                    "Database error",
                )
                .into_response()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                ResponseBuilder::error::<()>(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
                .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_misses_render_as_not_found() {
        let res = AppError::NotFound("POST_NOT_FOUND", "Post not found").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let res = AppError::field("url", "url", "Enter a valid URL").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_are_hidden_behind_500() {
        let res = AppError::from(DbErr::Custom("boom".into())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
