//! Analytics and chart endpoints.
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::charts::render_donation_charts;
use crate::domain::reporting_service::Analytics;
use crate::error::AppResult;
use crate::rest::AppState;

/// Number of calendar days (today inclusive) shown by the trend chart.
const TREND_WINDOW_DAYS: u32 = 7;

pub async fn analytics(State(state): State<AppState>) -> AppResult<Json<Analytics>> {
    info!("GET /analytics");
    Ok(Json(state.reporting_service.analytics().await?))
}

pub async fn charts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    info!("GET /charts");

    let trend = state
        .reporting_service
        .trend_last_days(TREND_WINDOW_DAYS)
        .await?;
    let analytics = state.reporting_service.analytics().await?;

    let png = render_donation_charts(&trend, &analytics.count_per_charity)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
