use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// What a view hands back to the client.
///
/// Pages and fragments share one shape: `code` says which template would be
/// rendered (`HOME_PAGE`, `POST_LIKES_FRAGMENT`, ...) and `data` is its context.
/// Failures use the same shape with `status: "error"` and no context, except for
/// form errors, which carry the offending fields.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// One rejected form field.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    /// Rule that failed, e.g. `length` or `reserved_username`.
    pub title: String,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn new(status: &str, code: &str, message: &str, data: Option<T>) -> Self {
        Self {
            status: status.to_string(),
            code: code.to_string(),
            message: message.to_string(),
            data,
        }
    }
}

pub struct ApiResponseResult<T>(pub StatusCode, pub ApiResponse<T>);

impl<T> IntoResponse for ApiResponseResult<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// A rendered page or fragment.
    pub fn view<T: Serialize>(code: &str, context: T) -> Response {
        Self::success(code, "Rendered", context).into_response()
    }

    pub fn success<T: Serialize>(code: &str, message: &str, data: T) -> ApiResponseResult<T> {
        ApiResponseResult(
            StatusCode::OK,
            ApiResponse::new("success", code, message, Some(data)),
        )
    }

    pub fn created<T: Serialize>(code: &str, message: &str, data: T) -> ApiResponseResult<T> {
        ApiResponseResult(
            StatusCode::CREATED,
            ApiResponse::new("success", code, message, Some(data)),
        )
    }

    pub fn error<T: Serialize>(
        status_code: StatusCode,
        code: &str,
        message: &str,
    ) -> ApiResponseResult<T> {
        ApiResponseResult(status_code, ApiResponse::new("error", code, message, None))
    }

    /// Rejected form: the error envelope plus the list of field problems.
    pub fn invalid_form(details: Vec<ValidationErrorDetail>) -> Response {
        ApiResponseResult(
            StatusCode::BAD_REQUEST,
            ApiResponse::new("error", "VALIDATION_ERROR", "Validation failed", Some(details)),
        )
        .into_response()
    }

    /// Empty 200 body, used when there is nothing left to append to a listing.
    pub fn empty() -> Response {
        (StatusCode::OK, "").into_response()
    }
}
