//! Update Username Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use todo_app::users::data::UsernameUpdate;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Update Username Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct UpdateUsernameRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

impl UpdateUsernameRequest {
    fn into_update(mut self) -> Result<UsernameUpdate, StatusError> {
        self.username = self.username.trim().to_owned();

        self.validate().or_400("invalid username")?;

        Ok(UsernameUpdate {
            username: self.username,
        })
    }
}

/// Update Username Handler
#[endpoint(
    tags("users"),
    summary = "Change username",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Username updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateUsernameRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let update = json.into_inner().into_update()?;

    let user = state
        .app
        .users
        .update_username(user, update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
