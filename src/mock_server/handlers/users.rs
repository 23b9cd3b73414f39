//! User endpoint handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, not_found, parse_id};
use crate::mock_server::state::SharedState;
use crate::User;

/// GET /api/4.0/users
pub async fn list_users(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let users: Vec<User> = state.users.values().cloned().collect();
    Json(users).into_response()
}

/// GET /api/4.0/users/:id
pub async fn get_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found(),
    }
}
