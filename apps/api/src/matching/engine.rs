//! Batch matching: every active job against every qualified candidate.
//!
//! Pairs that already have a match are skipped before scoring. Scoring runs
//! on a bounded set of tasks; inserts happen here on the orchestrating task
//! and rely on the `(job_id, candidate_id)` unique constraint for safety.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::NewMatch;
use crate::notify::{MatchNotice, Notifier};
use crate::profile::{normalize_candidate, normalize_job, CandidateFeatures, JobFeatures};
use crate::scoring::{AssistedScorer, CompatibilityReport};
use crate::store::{InsertOutcome, MatchStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingSettings {
    /// Candidates below this ATS score are not considered.
    pub min_ats_score: i32,
    /// Pairs scoring below this are discarded.
    pub match_threshold: u8,
    /// Pairs scored concurrently.
    pub concurrency: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_ats_score: 75,
            match_threshold: 70,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRunSummary {
    pub run_id: Uuid,
    pub jobs: usize,
    pub candidates: usize,
    pub pairs_evaluated: usize,
    pub pairs_skipped_existing: usize,
    pub matches_created: usize,
    pub below_threshold: usize,
    pub failures: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("match store failed: {0}")]
    Store(#[from] StoreError),
}

struct JobEntry {
    id: i64,
    employer_id: i64,
    title: String,
    features: Arc<JobFeatures>,
}

struct CandidateEntry {
    id: i64,
    user_id: i64,
    features: Option<Arc<CandidateFeatures>>,
}

struct ScoredPair {
    job_id: i64,
    job_title: String,
    employer_id: i64,
    candidate_id: i64,
    candidate_user_id: i64,
    report: CompatibilityReport,
}

pub struct MatchingEngine {
    store: Arc<dyn MatchStore>,
    scorer: Arc<AssistedScorer>,
    notifier: Arc<dyn Notifier>,
    settings: MatchingSettings,
}

impl MatchingEngine {
    pub fn new(
        store: Arc<dyn MatchStore>,
        scorer: Arc<AssistedScorer>,
        notifier: Arc<dyn Notifier>,
        settings: MatchingSettings,
    ) -> Self {
        Self {
            store,
            scorer,
            notifier,
            settings,
        }
    }

    /// Runs one batch. Per-pair failures are logged and counted; only store
    /// errors abort the run.
    pub async fn run(&self) -> Result<MatchRunSummary, EngineError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        let jobs: Vec<JobEntry> = self
            .store
            .active_jobs()
            .await?
            .into_iter()
            .map(|job| JobEntry {
                id: job.id,
                employer_id: job.employer_id,
                features: Arc::new(normalize_job(&job.requirements())),
                title: job.title,
            })
            .collect();

        let candidates: Vec<CandidateEntry> = self
            .store
            .qualified_candidates(self.settings.min_ats_score)
            .await?
            .iter()
            .map(|profile| CandidateEntry {
                id: profile.id,
                user_id: profile.user_id,
                features: match normalize_candidate(profile) {
                    Ok(features) => Some(Arc::new(features)),
                    Err(e) => {
                        warn!(%run_id, candidate_id = profile.id, error = %e, "Invalid candidate profile");
                        None
                    }
                },
            })
            .collect();

        let existing: HashSet<(i64, i64)> = self.store.existing_pairs().await?;

        info!(
            %run_id,
            jobs = jobs.len(),
            candidates = candidates.len(),
            existing = existing.len(),
            ai = self.scorer.is_ai_enabled(),
            "Matching run started"
        );

        let mut summary = MatchRunSummary {
            run_id,
            jobs: jobs.len(),
            candidates: candidates.len(),
            ..Default::default()
        };

        let concurrency = self.settings.concurrency.max(1);
        let mut in_flight: JoinSet<ScoredPair> = JoinSet::new();

        for job in &jobs {
            for candidate in &candidates {
                if existing.contains(&(job.id, candidate.id)) {
                    summary.pairs_skipped_existing += 1;
                    continue;
                }
                let Some(features) = &candidate.features else {
                    warn!(%run_id, job_id = job.id, candidate_id = candidate.id, "Skipping pair with invalid candidate");
                    summary.failures += 1;
                    continue;
                };

                if in_flight.len() >= concurrency {
                    if let Some(joined) = in_flight.join_next().await {
                        self.record(run_id, joined, &mut summary).await?;
                    }
                }

                let scorer = Arc::clone(&self.scorer);
                let job_features = Arc::clone(&job.features);
                let candidate_features = Arc::clone(features);
                let (job_id, job_title, employer_id) = (job.id, job.title.clone(), job.employer_id);
                let (candidate_id, candidate_user_id) = (candidate.id, candidate.user_id);

                in_flight.spawn(async move {
                    let report = scorer.score(&job_features, &candidate_features).await;
                    ScoredPair {
                        job_id,
                        job_title,
                        employer_id,
                        candidate_id,
                        candidate_user_id,
                        report,
                    }
                });
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            self.record(run_id, joined, &mut summary).await?;
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            %run_id,
            evaluated = summary.pairs_evaluated,
            created = summary.matches_created,
            below_threshold = summary.below_threshold,
            skipped = summary.pairs_skipped_existing,
            failures = summary.failures,
            duration_ms = summary.duration_ms,
            "Matching run finished"
        );
        Ok(summary)
    }

    async fn record(
        &self,
        run_id: Uuid,
        joined: Result<ScoredPair, JoinError>,
        summary: &mut MatchRunSummary,
    ) -> Result<(), StoreError> {
        let pair = match joined {
            Ok(pair) => pair,
            Err(e) => {
                error!(%run_id, error = %e, "Scoring task failed");
                summary.failures += 1;
                return Ok(());
            }
        };

        summary.pairs_evaluated += 1;
        let score = pair.report.overall_score;

        if score < self.settings.match_threshold {
            debug!(%run_id, job_id = pair.job_id, candidate_id = pair.candidate_id, score, "Below threshold");
            summary.below_threshold += 1;
            return Ok(());
        }

        let new_match = NewMatch::from_report(pair.job_id, pair.candidate_id, &pair.report);
        match self.store.insert_match(&new_match).await? {
            InsertOutcome::Inserted(match_id) => {
                summary.matches_created += 1;
                debug!(%run_id, match_id, job_id = pair.job_id, candidate_id = pair.candidate_id, score, "Match created");

                let notice = MatchNotice {
                    match_id,
                    job_id: pair.job_id,
                    job_title: pair.job_title,
                    employer_id: pair.employer_id,
                    candidate_id: pair.candidate_id,
                    candidate_user_id: pair.candidate_user_id,
                    match_score: score,
                };
                if let Err(e) = self.notifier.match_created(&notice).await {
                    warn!(%run_id, match_id, error = %e, "Match notification failed");
                }
            }
            InsertOutcome::Duplicate => {
                summary.pairs_skipped_existing += 1;
                debug!(%run_id, job_id = pair.job_id, candidate_id = pair.candidate_id, "Match already existed");
            }
        }
        Ok(())
    }
}
