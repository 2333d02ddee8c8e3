pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Premium matching
        .route(
            "/api/premium/run-matching",
            post(handlers::handle_run_matching),
        )
        .route(
            "/api/premium/recruiter/matches",
            get(handlers::handle_recruiter_matches),
        )
        .route(
            "/api/premium/jobseeker/matches",
            get(handlers::handle_jobseeker_matches),
        )
        .route(
            "/api/premium/matches/:id/payment-confirmed",
            post(handlers::handle_payment_confirmed),
        )
        // Recruiter candidate scoring
        .route(
            "/api/candidate-scoring/score",
            post(handlers::handle_score_candidate),
        )
        .route(
            "/api/candidate-scoring/top-candidates",
            post(handlers::handle_top_candidates),
        )
        .with_state(state)
}
