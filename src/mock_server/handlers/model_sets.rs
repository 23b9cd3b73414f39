//! Model set endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header::LINK, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{authorize, not_found, parse_id, validation};
use crate::mock_server::state::SharedState;
use crate::ModelSet;

/// Query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// GET /api/4.0/model_sets
pub async fn list_model_sets(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let all: Vec<ModelSet> = state.model_sets.values().cloned().collect();
    let total = all.len();
    let offset = query.offset.unwrap_or(0).min(total);
    let end = query
        .limit
        .map_or(total, |limit| offset.saturating_add(limit).min(total));

    let mut resp = Json(all[offset..end].to_vec()).into_response();
    let out = resp.headers_mut();
    out.insert("x-total-count", HeaderValue::from(total));

    if let Some(limit) = query.limit {
        if end < total {
            let next = format!(
                "</api/4.0/model_sets?limit={limit}&offset={end}>; rel=\"next\""
            );
            if let Ok(value) = HeaderValue::from_str(&next) {
                out.insert(LINK, value);
            }
        }
    }
    resp
}

/// GET /api/4.0/model_sets/:id
pub async fn get_model_set(
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

    match state.model_sets.get(&id) {
        Some(set) => Json(set.clone()).into_response(),
        None => not_found(),
    }
}

/// POST /api/4.0/model_sets
pub async fn create_model_set(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ModelSet>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let Some(name) = body.name.as_deref().filter(|n| !n.is_empty()) else {
        return validation("name", "missing_field", "This field is required.");
    };
    if state.model_set_name_taken(name, None) {
        return validation("name", "already_exists", "Model set name is taken.");
    }

    let created = state.insert_model_set(ModelSet { id: None, ..body });
    Json(created).into_response()
}

/// PATCH /api/4.0/model_sets/:id
pub async fn update_model_set(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ModelSet>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Some(name) = body.name.as_deref() {
        if state.model_set_name_taken(name, Some(id)) {
            return validation("name", "already_exists", "Model set name is taken.");
        }
    }

    match state.update_model_set(id, body) {
        Some(set) => Json(set).into_response(),
        None => not_found(),
    }
}

/// DELETE /api/4.0/model_sets/:id
pub async fn delete_model_set(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.remove_model_set(id) {
        Some(_) => (StatusCode::NO_CONTENT, "").into_response(),
        None => not_found(),
    }
}
