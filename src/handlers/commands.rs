use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::commands::{dispatch, IncomingMessage};
use crate::error::AppResult;
use crate::AppState;

/// Webhook for the chat platform adapter: one message in, at most one reply out
pub async fn handle_message(
    State(state): State<AppState>,
    Json(message): Json<IncomingMessage>,
) -> AppResult<Response> {
    match dispatch(&state, &message).await? {
        Some(reply) => Ok(Json(reply).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
