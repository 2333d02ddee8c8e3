use serde::Serialize;

use crate::profile::ExperienceLevel;
use crate::scoring::SubScores;

/// Basic scheme: used for on-demand candidate scoring and ranking.
/// Cultural fit is the SA-context sub-score.
pub const BASIC_WEIGHTS: Weights = Weights {
    skills: 0.40,
    experience: 0.20,
    location: 0.20,
    industry: 0.0,
    sa_context: 0.20,
    salary: 0.0,
    availability: 0.0,
};

/// Premium scheme: used by the batch matching engine.
pub const PREMIUM_WEIGHTS: Weights = Weights {
    skills: 0.35,
    experience: 0.15,
    location: 0.12,
    industry: 0.10,
    sa_context: 0.08,
    salary: 0.15,
    availability: 0.05,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub industry: f64,
    pub sa_context: f64,
    pub salary: f64,
    pub availability: f64,
}

impl Weights {
    #[cfg(test)]
    pub fn sum(&self) -> f64 {
        self.skills
            + self.experience
            + self.location
            + self.industry
            + self.sa_context
            + self.salary
            + self.availability
    }

    /// Weighted sum of the sub-scores, on the same 0–100 scale.
    pub fn combine(&self, s: &SubScores) -> f64 {
        self.skills * f64::from(s.skills)
            + self.experience * f64::from(s.experience)
            + self.location * f64::from(s.location)
            + self.industry * f64::from(s.industry)
            + self.sa_context * f64::from(s.sa_context)
            + self.salary * f64::from(s.salary)
            + self.availability * f64::from(s.availability)
    }
}

/// How strongly a mismatch in experience tier is penalized.
///
/// Both curves penalize overqualification less than underqualification.
/// `Strict` drops faster for candidates below the role's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceCurve {
    Strict,
    Flat,
}

impl ExperienceCurve {
    pub fn score(&self, required: ExperienceLevel, actual: ExperienceLevel) -> u8 {
        let gap = actual.tier() - required.tier();
        match (self, gap) {
            (ExperienceCurve::Strict, 0) => 95,
            (ExperienceCurve::Strict, 1) => 75,
            (ExperienceCurve::Strict, -1) => 60,
            (ExperienceCurve::Strict, g) if g > 1 => 50,
            (ExperienceCurve::Strict, _) => 25,
            (ExperienceCurve::Flat, 0) => 90,
            (ExperienceCurve::Flat, 1) => 75,
            (ExperienceCurve::Flat, -1) => 65,
            (ExperienceCurve::Flat, g) if g > 1 => 55,
            (ExperienceCurve::Flat, _) => 40,
        }
    }
}

/// A named, internally consistent scoring configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringProfile {
    pub name: &'static str,
    pub weights: Weights,
    pub experience_curve: ExperienceCurve,
}

impl ScoringProfile {
    pub fn basic() -> Self {
        Self {
            name: "basic",
            weights: BASIC_WEIGHTS,
            experience_curve: ExperienceCurve::Strict,
        }
    }

    pub fn premium() -> Self {
        Self {
            name: "premium",
            weights: PREMIUM_WEIGHTS,
            experience_curve: ExperienceCurve::Flat,
        }
    }
}
