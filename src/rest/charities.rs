//! Charity endpoints.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::domain::charity_service::CharityInput;
use crate::domain::models::Charity;
use crate::error::AppResult;
use crate::rest::{AppJson, AppState};

/// Body for POST /charities and PUT /charities/:id.
#[derive(Debug, Deserialize)]
pub struct CharityRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

impl From<CharityRequest> for CharityInput {
    fn from(request: CharityRequest) -> Self {
        CharityInput {
            name: request.name,
            description: request.description,
            website: request.website,
            logo: request.logo,
        }
    }
}

pub async fn create_charity(
    State(state): State<AppState>,
    AppJson(request): AppJson<CharityRequest>,
) -> AppResult<(StatusCode, Json<Charity>)> {
    info!("POST /charities - name: {}", request.name);
    let charity = state.charity_service.create_charity(request.into()).await?;
    Ok((StatusCode::CREATED, Json(charity)))
}

pub async fn list_charities(State(state): State<AppState>) -> AppResult<Json<Vec<Charity>>> {
    info!("GET /charities");
    Ok(Json(state.charity_service.list_charities().await?))
}

pub async fn get_charity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Charity>> {
    info!("GET /charities/{id}");
    Ok(Json(state.charity_service.get_charity(&id).await?))
}

pub async fn update_charity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CharityRequest>,
) -> AppResult<Json<Charity>> {
    info!("PUT /charities/{id}");
    Ok(Json(
        state
            .charity_service
            .update_charity(&id, request.into())
            .await?,
    ))
}

pub async fn delete_charity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    info!("DELETE /charities/{id}");
    state.charity_service.delete_charity(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
