//! AI match analyzer: the pluggable seam between the scorer and an LLM.
//!
//! `AssistedScorer` holds an `Option<Arc<dyn AiAnalyzer>>`; with `None` the
//! service runs purely deterministically.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::prompts::{
    analysis_prompt, skill_extraction_prompt, skill_similarity_prompt, JSON_ONLY_SYSTEM,
};
use crate::ai::{AiError, LlmClient};
use crate::profile::normalizer::canonical_skill_list;
use crate::profile::{CandidateFeatures, JobFeatures};
use crate::scoring::scorer::Evaluation;
use crate::scoring::SubScores;

/// Raw per-dimension analysis as returned by the model. Scores are kept wide
/// so out-of-range values surface through `validate` instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub skills_score: i64,
    pub experience_score: i64,
    pub location_score: i64,
    pub industry_score: i64,
    pub sa_context_score: i64,
    pub salary_score: i64,
    pub availability_score: i64,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub match_reasons: Vec<String>,
}

fn percent_from(name: &str, value: i64) -> Result<u8, AiError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| AiError::Malformed(format!("{name} {value} is outside 0-100")))
}

impl AiAnalysis {
    pub fn validate(&self) -> Result<SubScores, AiError> {
        Ok(SubScores {
            skills: percent_from("skills_score", self.skills_score)?,
            experience: percent_from("experience_score", self.experience_score)?,
            location: percent_from("location_score", self.location_score)?,
            industry: percent_from("industry_score", self.industry_score)?,
            sa_context: percent_from("sa_context_score", self.sa_context_score)?,
            salary: percent_from("salary_score", self.salary_score)?,
            availability: percent_from("availability_score", self.availability_score)?,
        })
    }

    pub fn into_evaluation(self) -> Result<Evaluation, AiError> {
        let breakdown = self.validate()?;
        let reasons: Vec<String> = self
            .match_reasons
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        Ok(Evaluation {
            breakdown,
            matched_skills: canonical_skill_list(&self.matched_skills),
            skill_gaps: canonical_skill_list(&self.skill_gaps),
            reasons: (!reasons.is_empty()).then_some(reasons),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SkillSimilarity {
    score: i64,
}

#[derive(Debug, Deserialize)]
struct ExtractedSkills {
    #[serde(default)]
    skills: Vec<String>,
}

#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    /// Full per-dimension analysis of one pair.
    async fn analyze(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
    ) -> Result<AiAnalysis, AiError>;

    /// Holistic skills estimate for jobs that list no explicit skills.
    async fn estimate_skill_similarity(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
    ) -> Result<u8, AiError>;

    /// Skills evidenced in free CV text, in canonical spelling.
    async fn extract_skills(&self, cv_text: &str) -> Result<Vec<String>, AiError>;
}

/// Analyzer backed by an OpenAI-compatible chat-completions provider.
pub struct LlmAnalyzer(pub LlmClient);

#[async_trait]
impl AiAnalyzer for LlmAnalyzer {
    async fn analyze(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
    ) -> Result<AiAnalysis, AiError> {
        let analysis: AiAnalysis = self
            .0
            .call_json(&analysis_prompt(job, candidate), JSON_ONLY_SYSTEM)
            .await?;
        analysis.validate()?;
        Ok(analysis)
    }

    async fn estimate_skill_similarity(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
    ) -> Result<u8, AiError> {
        let estimate: SkillSimilarity = self
            .0
            .call_json(&skill_similarity_prompt(job, candidate), JSON_ONLY_SYSTEM)
            .await?;
        percent_from("score", estimate.score)
    }

    async fn extract_skills(&self, cv_text: &str) -> Result<Vec<String>, AiError> {
        let extracted: ExtractedSkills = self
            .0
            .call_json(&skill_extraction_prompt(cv_text), JSON_ONLY_SYSTEM)
            .await?;
        Ok(canonical_skill_list(&extracted.skills))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> AiAnalysis {
        AiAnalysis {
            skills_score: 80,
            experience_score: 90,
            location_score: 100,
            industry_score: 60,
            sa_context_score: 75,
            salary_score: 65,
            availability_score: 70,
            matched_skills: vec!["python".to_string()],
            skill_gaps: vec![],
            match_reasons: vec!["  ".to_string()],
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut a = analysis();
        a.salary_score = 140;
        assert!(matches!(a.validate(), Err(AiError::Malformed(_))));

        let mut a = analysis();
        a.location_score = -5;
        assert!(matches!(a.validate(), Err(AiError::Malformed(_))));
    }

    #[test]
    fn test_into_evaluation_canonicalizes_and_drops_blank_reasons() {
        let evaluation = analysis().into_evaluation().unwrap();
        assert_eq!(evaluation.breakdown.location, 100);
        assert_eq!(evaluation.matched_skills, vec!["Python"]);
        assert!(evaluation.reasons.is_none());
    }

    #[test]
    fn test_analysis_parses_without_optional_lists() {
        let json = r#"{"skills_score": 70, "experience_score": 70, "location_score": 60,
            "industry_score": 60, "sa_context_score": 60, "salary_score": 65,
            "availability_score": 70}"#;
        let parsed: AiAnalysis = serde_json::from_str(json).unwrap();
        assert!(parsed.matched_skills.is_empty());
        assert!(parsed.validate().is_ok());
    }
}
