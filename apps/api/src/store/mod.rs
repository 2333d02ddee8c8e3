//! Persistence seam for jobs, candidates and matches.
//!
//! Handlers and the matching engine depend on `Arc<dyn MatchStore>`;
//! `PgMatchStore` is the production implementation.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::match_record::{MatchListing, PaymentState};
use crate::models::{CandidateProfile, JobPosting, MatchRecord, NewMatch};

pub use postgres::PgMatchStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    /// A match for the pair already existed; nothing was written.
    Duplicate,
}

/// One-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, StoreError>;

    /// Current candidate profiles with an ATS score of at least `min_ats_score`.
    async fn qualified_candidates(
        &self,
        min_ats_score: i32,
    ) -> Result<Vec<CandidateProfile>, StoreError>;

    async fn get_candidate(&self, id: i64) -> Result<Option<CandidateProfile>, StoreError>;

    /// Every (job_id, candidate_id) pair that already has a match.
    async fn existing_pairs(&self) -> Result<HashSet<(i64, i64)>, StoreError>;

    async fn insert_match(&self, new_match: &NewMatch) -> Result<InsertOutcome, StoreError>;

    async fn matches_for_employer(
        &self,
        employer_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError>;

    async fn matches_for_jobseeker(
        &self,
        user_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError>;

    async fn get_match(&self, id: i64) -> Result<Option<MatchRecord>, StoreError>;

    /// Writes `next` only if the stored payment state still equals `expected`.
    /// Returns `None` when another writer got there first.
    async fn update_payment_state(
        &self,
        id: i64,
        expected: PaymentState,
        next: PaymentState,
    ) -> Result<Option<MatchRecord>, StoreError>;
}
