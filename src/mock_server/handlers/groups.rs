//! Group membership endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, not_found, parse_id, validation};
use crate::mock_server::state::SharedState;
use crate::GroupIdForGroupUserInclusion;

/// GET /api/4.0/groups/:id/users
pub async fn list_group_users(
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
    match state.group_users(id) {
        Some(users) => Json(users).into_response(),
        None => not_found(),
    }
}

/// POST /api/4.0/groups/:id/users
pub async fn add_group_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<GroupIdForGroupUserInclusion>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let group_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Ok(user_id) = body.user_id.parse::<u64>() else {
        return validation("user_id", "invalid", "User ID must be numeric.");
    };
    let Some(user) = state.users.get(&user_id).cloned() else {
        return validation("user_id", "not_found", "User does not exist.");
    };
    match state.group_members.get_mut(&group_id) {
        Some(members) => {
            members.insert(user_id);
            Json(user).into_response()
        }
        None => not_found(),
    }
}

/// DELETE /api/4.0/groups/:id/users/:user_id
pub async fn remove_group_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((group_id, user_id)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let (Ok(group_id), Ok(user_id)) = (parse_id(&group_id), parse_id(&user_id)) else {
        return not_found();
    };
    let removed = state
        .group_members
        .get_mut(&group_id)
        .is_some_and(|members| members.remove(&user_id));
    if removed {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
