//! Login, logout and session endpoint handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::{authorize, error, not_found};
use crate::mock_server::state::SharedState;

/// Form fields of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
struct AccessToken {
    access_token: String,
    token_type: &'static str,
    expires_in: u64,
}

/// Body of `GET`/`PATCH /session`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo_user_id: Option<String>,
}

/// POST /api/4.0/login
pub async fn login(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> Response {
    let mut state = state.write().await;
    match state.login(&form.client_id, &form.client_secret) {
        Some(access_token) => Json(AccessToken {
            access_token,
            token_type: "Bearer",
            expires_in: state.token_lifetime,
        })
        .into_response(),
        // Looker answers bad credentials with a 404
        None => not_found(),
    }
}

/// DELETE /api/4.0/logout
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.write().await;
    let token = match authorize(&state, &headers) {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    state.logout(&token);
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/4.0/session
pub async fn get_session(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    let token = match authorize(&state, &headers) {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    Json(ApiSession {
        workspace_id: state.session(&token).map(str::to_string),
        sudo_user_id: None,
    })
    .into_response()
}

/// PATCH /api/4.0/session
pub async fn patch_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ApiSession>,
) -> Response {
    let mut state = state.write().await;
    let token = match authorize(&state, &headers) {
        Ok(token) => token,
        Err(resp) => return resp,
    };

    let Some(workspace) = body.workspace_id else {
        return Json(ApiSession {
            workspace_id: state.session(&token).map(str::to_string),
            sudo_user_id: None,
        })
        .into_response();
    };
    if workspace != "production" && workspace != "dev" {
        return error(StatusCode::BAD_REQUEST, "Unknown workspace");
    }

    state.sessions.insert(token, workspace.clone());
    Json(ApiSession {
        workspace_id: Some(workspace),
        sudo_user_id: None,
    })
    .into_response()
}
