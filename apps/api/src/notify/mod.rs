//! Match notifications. Delivery (email, push) belongs to an external
//! collaborator; the default notifier only logs.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// A newly created match, addressed to both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchNotice {
    pub match_id: i64,
    pub job_id: i64,
    pub job_title: String,
    pub employer_id: i64,
    pub candidate_id: i64,
    pub candidate_user_id: i64,
    pub match_score: u8,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn match_created(&self, notice: &MatchNotice) -> Result<(), NotifyError>;
}

pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn match_created(&self, notice: &MatchNotice) -> Result<(), NotifyError> {
        // The JSON payload is what a delivery collaborator would consume.
        let payload =
            serde_json::to_string(notice).map_err(|e| NotifyError::Delivery(e.to_string()))?;
        tracing::info!(
            match_id = notice.match_id,
            job_id = notice.job_id,
            employer_id = notice.employer_id,
            candidate_user_id = notice.candidate_user_id,
            score = notice.match_score,
            %payload,
            "New match: {}",
            notice.job_title
        );
        Ok(())
    }
}
