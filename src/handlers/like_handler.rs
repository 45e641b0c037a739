use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::config::AppState;
use crate::error::AppError;
use crate::models::auth_model::CurrentUser;
use crate::services::like_service::{toggle_like, Likeable};
use crate::utils::api_response::ResponseBuilder;

/// Mounted once per likeable type, e.g. `post(like_handler::<post::Model>)`.
pub async fn like_handler<T: Likeable>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let res = toggle_like::<T>(&state.db, id, user.db_id).await?;
    Ok(ResponseBuilder::view(T::FRAGMENT, res))
}
