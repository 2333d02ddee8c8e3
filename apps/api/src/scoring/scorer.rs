use chrono::NaiveDate;

use crate::profile::{CandidateFeatures, JobFeatures};
use crate::scoring::subscores::{
    assess_skills, availability_score, experience_score, industry_score, location_score,
    salary_score, sa_context_score, NEUTRAL_SKILLS,
};
use crate::scoring::weights::ScoringProfile;
use crate::scoring::{CompatibilityReport, ScorerBackend, SubScores};

/// Sub-scores at or above this value produce a match reason.
pub const EXCELLENT_SUBSCORE: u8 = 80;

const MAX_LISTED_SKILLS: usize = 5;

/// Sub-scores and skill lists before the weighting scheme is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub breakdown: SubScores,
    pub matched_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    /// Reasons supplied by an analyzer. Derived from the breakdown when `None`.
    pub reasons: Option<Vec<String>>,
}

/// Deterministic multi-factor scorer. Never fails: sparse input falls back to
/// neutral sub-scores.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    profile: ScoringProfile,
}

impl CompatibilityScorer {
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    /// Scores with an explicit reference date for the availability sub-score.
    pub fn score_on(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
        today: NaiveDate,
    ) -> CompatibilityReport {
        self.report(
            self.evaluate(job, candidate, today),
            ScorerBackend::Deterministic,
        )
    }

    pub fn evaluate(
        &self,
        job: &JobFeatures,
        candidate: &CandidateFeatures,
        today: NaiveDate,
    ) -> Evaluation {
        let skills = assess_skills(job, candidate);
        let breakdown = SubScores {
            skills: skills.score.unwrap_or(NEUTRAL_SKILLS),
            experience: experience_score(
                self.profile.experience_curve,
                job.experience_level,
                candidate.experience_level,
            ),
            location: location_score(job, candidate),
            industry: industry_score(job.industry.as_deref(), &candidate.industry),
            sa_context: sa_context_score(job, candidate),
            salary: salary_score(job.salary, candidate.desired_salary),
            availability: availability_score(candidate.available_from, today),
        };

        Evaluation {
            breakdown,
            matched_skills: skills.matched,
            skill_gaps: skills.gaps,
            reasons: None,
        }
    }

    /// Applies the weighting scheme to an evaluation.
    pub fn report(&self, evaluation: Evaluation, backend: ScorerBackend) -> CompatibilityReport {
        let overall = self
            .profile
            .weights
            .combine(&evaluation.breakdown)
            .round()
            .clamp(0.0, 100.0) as u8;

        let match_reasons = match evaluation.reasons {
            Some(reasons) if !reasons.is_empty() => reasons,
            _ => self.derive_reasons(&evaluation.breakdown, &evaluation.matched_skills),
        };

        CompatibilityReport {
            overall_score: overall,
            breakdown: evaluation.breakdown,
            matched_skills: evaluation.matched_skills,
            skill_gaps: evaluation.skill_gaps,
            match_reasons,
            scoring_scheme: self.profile.name.to_string(),
            scorer_backend: backend,
        }
    }

    fn derive_reasons(&self, b: &SubScores, matched_skills: &[String]) -> Vec<String> {
        let w = &self.profile.weights;
        let excellent = |weight: f64, score: u8| weight > 0.0 && score >= EXCELLENT_SUBSCORE;
        let mut reasons = Vec::new();

        if excellent(w.skills, b.skills) {
            if matched_skills.is_empty() {
                reasons.push("Strong overall skills fit".to_string());
            } else {
                let listed: Vec<&str> = matched_skills
                    .iter()
                    .take(MAX_LISTED_SKILLS)
                    .map(String::as_str)
                    .collect();
                reasons.push(format!("Strong skills match: {}", listed.join(", ")));
            }
        }
        if excellent(w.experience, b.experience) {
            reasons.push("Experience level fits the role".to_string());
        }
        if excellent(w.location, b.location) {
            reasons.push(
                match b.location {
                    100 => "Based in the job's location",
                    90..=99 => "Based in the same province as the job",
                    _ => "Role supports remote or hybrid work",
                }
                .to_string(),
            );
        }
        if excellent(w.industry, b.industry) {
            reasons.push("Background in the same industry".to_string());
        }
        if excellent(w.sa_context, b.sa_context) {
            reasons.push("Meets the B-BBEE and NQF preferences".to_string());
        }
        if excellent(w.salary, b.salary) {
            reasons.push("Salary expectations align with the offer".to_string());
        }
        if excellent(w.availability, b.availability) {
            reasons.push(if b.availability == 100 {
                "Available immediately".to_string()
            } else {
                "Available to start within a month".to_string()
            });
        }
        reasons
    }
}
