//! Payment confirmations: the only path that changes a match after creation.

use thiserror::Error;
use tracing::{info, warn};

use crate::models::match_record::TransitionError;
use crate::models::{MatchRecord, PaymentSide};
use crate::store::{MatchStore, StoreError};

/// Compare-and-set attempts before a confirmation is reported as contended.
const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("match {0} not found")]
    MatchNotFound(i64),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("match {0} was modified concurrently, retry the confirmation")]
    Contended(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies a confirmed payment for `side` of match `match_id`.
pub async fn confirm_payment(
    store: &dyn MatchStore,
    match_id: i64,
    side: PaymentSide,
) -> Result<MatchRecord, PaymentError> {
    for attempt in 1..=MAX_ATTEMPTS {
        let record = store
            .get_match(match_id)
            .await?
            .ok_or(PaymentError::MatchNotFound(match_id))?;

        let current = record.payment_state().map_err(StoreError::Corrupt)?;
        let next = current.apply_payment(side)?;
        if next == current {
            return Ok(record);
        }

        if let Some(updated) = store.update_payment_state(match_id, current, next).await? {
            info!(
                match_id,
                side = ?side,
                status = %next.status,
                "Payment confirmed"
            );
            return Ok(updated);
        }
        warn!(match_id, attempt, "Payment state changed underneath, retrying");
    }
    Err(PaymentError::Contended(match_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_record::MatchStatus;
    use crate::models::NewMatch;
    use crate::store::memory::{job, MemoryStore};
    use crate::store::InsertOutcome;
    use crate::profile::normalizer::tests::make_profile;

    async fn store_with_match() -> (MemoryStore, i64) {
        let store = MemoryStore::with(vec![job(1, 100)], vec![make_profile(2, "")]);
        let new_match = NewMatch {
            job_id: 1,
            candidate_id: 2,
            match_score: 80,
            skills_score: 80,
            experience_score: 80,
            location_score: 80,
            industry_score: 80,
            sa_context_score: 80,
            salary_score: 80,
            availability_score: 80,
            matched_skills: vec![],
            skill_gaps: vec![],
            match_reasons: vec![],
        };
        let InsertOutcome::Inserted(id) = store.insert_match(&new_match).await.unwrap() else {
            panic!("expected insert");
        };
        (store, id)
    }

    #[tokio::test]
    async fn test_confirmations_walk_the_state_machine() {
        let (store, id) = store_with_match().await;

        let after_first = confirm_payment(&store, id, PaymentSide::Jobseeker).await.unwrap();
        assert_eq!(after_first.status, MatchStatus::Active.as_str());
        assert!(after_first.contact_unlocked);

        let repeat = confirm_payment(&store, id, PaymentSide::Jobseeker).await.unwrap();
        assert_eq!(repeat.status, MatchStatus::Active.as_str());

        let after_second = confirm_payment(&store, id, PaymentSide::Recruiter).await.unwrap();
        assert_eq!(after_second.status, MatchStatus::MutualInterest.as_str());
        assert!(after_second.jobseeker_paid && after_second.recruiter_paid);
    }

    #[tokio::test]
    async fn test_unknown_match() {
        let (store, _) = store_with_match().await;
        assert!(matches!(
            confirm_payment(&store, 999, PaymentSide::Recruiter).await,
            Err(PaymentError::MatchNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_terminal_match_rejected() {
        let (store, id) = store_with_match().await;
        store.matches.lock().unwrap()[0].status = "expired".to_string();
        assert!(matches!(
            confirm_payment(&store, id, PaymentSide::Recruiter).await,
            Err(PaymentError::Transition(TransitionError::Terminal(MatchStatus::Expired)))
        ));
    }
}
