use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::ai::{AiAnalyzer, AiError};
use crate::profile::{CandidateFeatures, JobFeatures};
use crate::scoring::{CompatibilityReport, CompatibilityScorer, ScorerBackend};

/// How the analyzer participates when one is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    /// Ask the analyzer for every sub-score; the deterministic report is the fallback.
    FullAnalysis,
    /// Score deterministically and call the analyzer only to fill gaps:
    /// skills for a CV with none recognised, and a holistic skills estimate
    /// for a job that lists none.
    Enrichment,
}

/// Deterministic scorer with optional AI assistance. Never fails: every
/// analyzer error or timeout is logged and replaced by deterministic output.
#[derive(Clone)]
pub struct AssistedScorer {
    scorer: CompatibilityScorer,
    analyzer: Option<Arc<dyn AiAnalyzer>>,
    mode: AiMode,
    ai_timeout: Duration,
}

impl AssistedScorer {
    pub fn deterministic(scorer: CompatibilityScorer) -> Self {
        Self {
            scorer,
            analyzer: None,
            mode: AiMode::Enrichment,
            ai_timeout: Duration::ZERO,
        }
    }

    pub fn with_analyzer(
        scorer: CompatibilityScorer,
        analyzer: Arc<dyn AiAnalyzer>,
        mode: AiMode,
        ai_timeout: Duration,
    ) -> Self {
        Self {
            scorer,
            analyzer: Some(analyzer),
            mode,
            ai_timeout,
        }
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    pub async fn score(&self, job: &JobFeatures, candidate: &CandidateFeatures) -> CompatibilityReport {
        self.score_on(job, candidate, Utc::now().date_naive()).await
    }

    pub async fn score_on(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
        today: NaiveDate,
    ) -> CompatibilityReport {
        let Some(analyzer) = self.analyzer.as_deref() else {
            return self.scorer.score_on(job, candidate, today);
        };

        match self.mode {
            AiMode::FullAnalysis => self.full_analysis(analyzer, job, candidate, today).await,
            AiMode::Enrichment => self.enriched(analyzer, job, candidate, today).await,
        }
    }

    async fn full_analysis(
        &self,
        analyzer: &dyn AiAnalyzer,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
        today: NaiveDate,
    ) -> CompatibilityReport {
        let outcome = self
            .guarded(analyzer.analyze(job, candidate))
            .await
            .and_then(|analysis| analysis.into_evaluation());

        match outcome {
            Ok(evaluation) => {
                debug!(candidate_id = candidate.candidate_id, "AI analysis used");
                self.scorer.report(evaluation, ScorerBackend::Ai)
            }
            Err(e) => {
                warn!(
                    candidate_id = candidate.candidate_id,
                    error = %e,
                    "AI analysis failed, using deterministic scoring"
                );
                self.scorer.score_on(job, candidate, today)
            }
        }
    }

    async fn enriched(
        &self,
        analyzer: &dyn AiAnalyzer,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
        today: NaiveDate,
    ) -> CompatibilityReport {
        let mut ai_used = false;

        let candidate: Cow<'_, CandidateFeatures> =
            if candidate.skills.is_empty() && !candidate.cv_text.trim().is_empty() {
                match self.guarded(analyzer.extract_skills(&candidate.cv_text)).await {
                    Ok(skills) if !skills.is_empty() => {
                        ai_used = true;
                        let mut enriched = candidate.clone();
                        enriched.skills.extend(skills);
                        Cow::Owned(enriched)
                    }
                    Ok(_) => Cow::Borrowed(candidate),
                    Err(e) => {
                        warn!(
                            candidate_id = candidate.candidate_id,
                            error = %e,
                            "AI skill extraction failed"
                        );
                        Cow::Borrowed(candidate)
                    }
                }
            } else {
                Cow::Borrowed(candidate)
            };

        let mut evaluation = self.scorer.evaluate(job, &candidate, today);

        if !job.has_explicit_skills() {
            match self
                .guarded(analyzer.estimate_skill_similarity(job, &candidate))
                .await
            {
                Ok(estimate) => {
                    ai_used = true;
                    evaluation.breakdown.skills = estimate.min(100);
                }
                Err(e) => warn!(
                    candidate_id = candidate.candidate_id,
                    error = %e,
                    "AI skill estimate failed, keeping neutral skills score"
                ),
            }
        }

        let backend = if ai_used {
            ScorerBackend::Ai
        } else {
            ScorerBackend::Deterministic
        };
        self.scorer.report(evaluation, backend)
    }

    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, AiError>>,
    ) -> Result<T, AiError> {
        tokio::time::timeout(self.ai_timeout, call)
            .await
            .map_err(|_| AiError::Timeout(self.ai_timeout))?
    }
}
