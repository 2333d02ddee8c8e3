use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{CandidateProfile, JobRequirements};
use crate::profile::{normalize_candidate, normalize_job, ProfileError};
use crate::scoring::{AssistedScorer, CompatibilityReport};
use crate::store::{MatchStore, StoreError};

pub const DEFAULT_RANKING_LIMIT: usize = 20;
pub const MAX_RANKING_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub candidate_id: i64,
    pub full_name: String,
    pub ats_score: i32,
    pub location: Option<String>,
    pub report: CompatibilityReport,
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("candidate {0} not found")]
    CandidateNotFound(i64),

    #[error("candidate {id} cannot be scored: {source}")]
    InvalidCandidate {
        id: i64,
        #[source]
        source: ProfileError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ranks the qualified candidate pool against recruiter-supplied requirements.
pub struct CandidateRanking {
    store: Arc<dyn MatchStore>,
    scorer: Arc<AssistedScorer>,
    min_ats_score: i32,
}

impl CandidateRanking {
    pub fn new(store: Arc<dyn MatchStore>, scorer: Arc<AssistedScorer>, min_ats_score: i32) -> Self {
        Self {
            store,
            scorer,
            min_ats_score,
        }
    }

    /// Best `limit` candidates, highest score first; equal scores keep
    /// ascending candidate id. Candidates that fail normalization are skipped.
    pub async fn top_candidates(
        &self,
        requirements: &JobRequirements,
        limit: usize,
    ) -> Result<Vec<RankedCandidate>, RankingError> {
        let job = normalize_job(requirements);
        let pool = self.store.qualified_candidates(self.min_ats_score).await?;

        let mut ranked = Vec::with_capacity(pool.len());
        for profile in pool {
            let features = match normalize_candidate(&profile) {
                Ok(f) => f,
                Err(e) => {
                    warn!(candidate_id = profile.id, error = %e, "Skipping candidate in ranking");
                    continue;
                }
            };
            let report = self.scorer.score(&job, &features).await;
            ranked.push(Self::ranked(profile, report));
        }

        ranked.sort_by_key(|r| (Reverse(r.report.overall_score), r.candidate_id));
        ranked.truncate(limit);

        debug!(returned = ranked.len(), limit, "Ranking complete");
        Ok(ranked)
    }

    pub async fn score_candidate(
        &self,
        candidate_id: i64,
        requirements: &JobRequirements,
    ) -> Result<RankedCandidate, RankingError> {
        let profile = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or(RankingError::CandidateNotFound(candidate_id))?;

        let features = normalize_candidate(&profile).map_err(|source| {
            RankingError::InvalidCandidate {
                id: candidate_id,
                source,
            }
        })?;

        let report = self
            .scorer
            .score(&normalize_job(requirements), &features)
            .await;
        Ok(Self::ranked(profile, report))
    }

    fn ranked(profile: CandidateProfile, report: CompatibilityReport) -> RankedCandidate {
        RankedCandidate {
            candidate_id: profile.id,
            location: profile.best_location().map(str::to_string),
            full_name: profile.full_name,
            ats_score: profile.ats_score,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::normalizer::tests::make_profile;
    use crate::scoring::{CompatibilityScorer, ScoringProfile};
    use crate::store::memory::MemoryStore;

    fn ranking(candidates: Vec<CandidateProfile>) -> CandidateRanking {
        CandidateRanking::new(
            Arc::new(MemoryStore::with(vec![], candidates)),
            Arc::new(AssistedScorer::deterministic(CompatibilityScorer::new(
                ScoringProfile::basic(),
            ))),
            75,
        )
    }

    fn requirements() -> JobRequirements {
        JobRequirements {
            title: "Data Analyst".to_string(),
            required_skills: vec!["SQL".to_string(), "Excel".to_string()],
            location: Some("Cape Town".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ranking_sorted_descending_and_limited() {
        let mut strong = make_profile(3, "SQL and Excel reporting");
        strong.location = Some("Cape Town".to_string());
        let partial = make_profile(1, "Excel only");
        let none = make_profile(2, "Forklift operator");

        let ranked = ranking(vec![strong, partial, none])
            .top_candidates(&requirements(), 2)
            .await
            .unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate_id, 3);
        assert!(ranked[0].report.overall_score >= ranked[1].report.overall_score);
    }

    #[tokio::test]
    async fn test_ranking_length_capped_by_pool() {
        let ranked = ranking(vec![make_profile(1, ""), make_profile(2, "")])
            .top_candidates(&requirements(), 20)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[tokio::test]
    async fn test_ties_break_by_candidate_id() {
        let ranked = ranking(vec![
            make_profile(9, "SQL"),
            make_profile(4, "SQL"),
            make_profile(7, "SQL"),
        ])
        .top_candidates(&requirements(), 10)
        .await
        .unwrap();
        let ids: Vec<i64> = ranked.iter().map(|r| r.candidate_id).collect();
        assert_eq!(ids, vec![4, 7, 9]);
    }

    #[tokio::test]
    async fn test_invalid_and_unqualified_candidates_are_skipped() {
        let mut broken = make_profile(1, "SQL");
        broken.ats_score = 101;
        let mut low = make_profile(2, "SQL Excel");
        low.ats_score = 50;
        let ranked = ranking(vec![broken, low, make_profile(3, "SQL")])
            .top_candidates(&requirements(), 10)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate_id, 3);
    }

    #[tokio::test]
    async fn test_score_candidate_unknown_id() {
        let result = ranking(vec![]).score_candidate(42, &requirements()).await;
        assert!(matches!(result, Err(RankingError::CandidateNotFound(42))));
    }

    #[tokio::test]
    async fn test_score_candidate_reports_breakdown() {
        let mut c = make_profile(5, "Advanced Excel and SQL");
        c.location = Some("Cape Town".to_string());
        let scored = ranking(vec![c])
            .score_candidate(5, &requirements())
            .await
            .unwrap();
        assert_eq!(scored.report.breakdown.skills, 100);
        assert_eq!(scored.report.breakdown.location, 100);
        assert_eq!(scored.report.scoring_scheme, "basic");
    }
}
