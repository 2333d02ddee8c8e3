use std::sync::Arc;

use crate::matching::{CandidateRanking, MatchingEngine};
use crate::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    /// Batch matcher behind `POST /api/premium/run-matching`.
    pub engine: Arc<MatchingEngine>,
    pub ranking: Arc<CandidateRanking>,
}
