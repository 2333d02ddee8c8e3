//! Compatibility scoring between one job and one candidate.
//!
//! `CompatibilityScorer` is deterministic and total. `AssistedScorer` wraps it
//! with an optional AI analyzer and always falls back to the deterministic
//! report, so callers see the same `CompatibilityReport` shape either way.

pub mod assisted;
pub mod scorer;
pub mod subscores;
pub mod weights;

use serde::{Deserialize, Serialize};

pub use assisted::{AiMode, AssistedScorer};
pub use scorer::CompatibilityScorer;
pub use weights::ScoringProfile;

/// All seven sub-scores, 0–100. Present regardless of which weighting scheme
/// produced the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub skills: u8,
    pub experience: u8,
    pub location: u8,
    pub industry: u8,
    pub sa_context: u8,
    pub salary: u8,
    pub availability: u8,
}

impl SubScores {
    #[cfg(test)]
    pub fn all_within_range(&self) -> bool {
        [
            self.skills,
            self.experience,
            self.location,
            self.industry,
            self.sa_context,
            self.salary,
            self.availability,
        ]
        .iter()
        .all(|s| *s <= 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerBackend {
    Deterministic,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub overall_score: u8,
    pub breakdown: SubScores,
    pub matched_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub match_reasons: Vec<String>,
    pub scoring_scheme: String,
    pub scorer_backend: ScorerBackend,
}
