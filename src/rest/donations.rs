//! Donation endpoints.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::domain::donation_service::{DonationUpdate, NewDonation};
use crate::domain::models::Donation;
use crate::error::AppResult;
use crate::rest::auth::AuthenticatedUser;
use crate::rest::{AppJson, AppState};

/// Body for POST /donations. A `status` field supplied by the client is
/// ignored: new donations always start pending.
#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    #[serde(default)]
    pub message: String,
    pub charity: String,
}

/// Body for PUT /donations/:id (full replacement of the mutable fields).
#[derive(Debug, Deserialize)]
pub struct UpdateDonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    #[serde(default)]
    pub message: String,
    pub charity: String,
}

/// Body for PATCH /donations/:id (partial update).
#[derive(Debug, Deserialize, Default)]
pub struct PatchDonationRequest {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: Option<Decimal>,
    pub message: Option<String>,
    pub charity: Option<String>,
}

pub async fn create_donation(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    AppJson(request): AppJson<CreateDonationRequest>,
) -> AppResult<(StatusCode, Json<Donation>)> {
    info!("POST /donations - donor: {}", request.donor_name);

    let donation = state
        .donation_service
        .create_donation(NewDonation {
            donor_name: request.donor_name,
            donor_email: request.donor_email,
            amount: request.amount,
            message: request.message,
            charity: request.charity,
            user: user.map(|u| u.id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

pub async fn list_donations(State(state): State<AppState>) -> AppResult<Json<Vec<Donation>>> {
    info!("GET /donations");
    Ok(Json(state.donation_service.list_donations().await?))
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Donation>> {
    info!("GET /donations/{id}");
    Ok(Json(state.donation_service.get_donation(&id).await?))
}

pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateDonationRequest>,
) -> AppResult<Json<Donation>> {
    info!("PUT /donations/{id}");

    let update = DonationUpdate {
        donor_name: Some(request.donor_name),
        donor_email: Some(request.donor_email),
        amount: Some(request.amount),
        message: Some(request.message),
        charity: Some(request.charity),
    };
    Ok(Json(state.donation_service.update_donation(&id, update).await?))
}

pub async fn patch_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<PatchDonationRequest>,
) -> AppResult<Json<Donation>> {
    info!("PATCH /donations/{id}");

    let update = DonationUpdate {
        donor_name: request.donor_name,
        donor_email: request.donor_email,
        amount: request.amount,
        message: request.message,
        charity: request.charity,
    };
    Ok(Json(state.donation_service.update_donation(&id, update).await?))
}

pub async fn delete_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    info!("DELETE /donations/{id}");
    state.donation_service.delete_donation(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Donation>> {
    info!("PATCH /donations/{id}/confirm");
    Ok(Json(state.donation_service.confirm_donation(&id).await?))
}

pub async fn fail_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Donation>> {
    info!("PATCH /donations/{id}/fail");
    Ok(Json(state.donation_service.fail_donation(&id).await?))
}
