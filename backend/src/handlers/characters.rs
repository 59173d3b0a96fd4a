use crate::AppState;
use crate::error::LookupError;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use shared::models::{Character, SearchRequest};

/// `POST /api/character` with `{"search": "<name>"}`.
///
/// An unparsable body, or a missing or non-string `search`, is a client-input
/// error like a blank term.
pub async fn search_character(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Character>, LookupError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected search body: {}", e);
        LookupError::InvalidSearch
    })?;

    let character = state.service.lookup(&request.search).await?;
    Ok(Json(character))
}
