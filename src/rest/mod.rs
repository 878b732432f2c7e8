//! HTTP surface: application state, route table and shared extractors.

pub mod auth;
pub mod charities;
pub mod donations;
pub mod policy;
pub mod reports;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use crate::config::Config;
use crate::db::DbConnection;
use crate::domain::{AuthService, CharityService, DonationService, ReportingService};
use crate::error::AppError;
use policy::Access;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub charity_service: CharityService,
    pub donation_service: DonationService,
    pub reporting_service: ReportingService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(connection: DbConnection, config: &Config) -> Self {
        Self {
            charity_service: CharityService::new(connection.clone()),
            donation_service: DonationService::new(connection.clone()),
            reporting_service: ReportingService::new(connection.clone()),
            auth_service: AuthService::new(connection, &config.session_secret),
        }
    }
}

/// JSON extractor with a single explicit parse-failure path: any malformed
/// body becomes a `Validation` error and a 400 `{error}` payload.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Consult the route policy table for every routed request. Requests to paths
/// the router did not match pass straight through to its 404 handling; known
/// paths hit with an unlisted method fall through to the router's 405.
async fn enforce_policy(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(matched_path) = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
    else {
        return next.run(req).await;
    };

    match policy::access_for(req.method(), &matched_path) {
        Some(Access::Public) => next.run(req).await,
        Some(Access::Admin) => {
            let authorized = auth::token_from_headers(req.headers())
                .and_then(|token| state.auth_service.verify_token(&token))
                .is_some();
            if authorized {
                next.run(req).await
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Authentication required" })),
                )
                    .into_response()
            }
        }
        None if policy::path_is_known(&matched_path) => next.run(req).await,
        None => {
            tracing::error!("routed operation without a policy entry: {matched_path}");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response()
        }
    }
}

/// Build the application router. Every route here must have a matching entry
/// in [`policy::ROUTE_POLICIES`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/donations",
            get(donations::list_donations).post(donations::create_donation),
        )
        .route(
            "/donations/:id",
            get(donations::get_donation)
                .put(donations::update_donation)
                .patch(donations::patch_donation)
                .delete(donations::delete_donation),
        )
        .route("/donations/:id/confirm", patch(donations::confirm_donation))
        .route("/donations/:id/fail", patch(donations::fail_donation))
        .route(
            "/charities",
            get(charities::list_charities).post(charities::create_charity),
        )
        .route(
            "/charities/:id",
            get(charities::get_charity)
                .put(charities::update_charity)
                .delete(charities::delete_charity),
        )
        .route("/analytics", get(reports::analytics))
        .route("/charts", get(reports::charts))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_policy,
        ))
        .with_state(state)
}
