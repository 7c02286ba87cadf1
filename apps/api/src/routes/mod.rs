pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/forms/defaults", get(handlers::handle_form_defaults))
        .route(
            "/api/v1/campaign-strategy",
            post(handlers::handle_campaign_strategy),
        )
        .route("/api/v1/sales-pitch", post(handlers::handle_sales_pitch))
        .route("/api/v1/leads/score", post(handlers::handle_lead_score))
        .route("/api/v1/leads/advise", post(handlers::handle_lead_advice))
        .with_state(state)
}
