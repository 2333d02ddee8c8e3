//! Profile normalization: turns CV text, candidate records and employer-entered
//! job fields into the canonical features the scorer works on.
//!
//! Everything here is pure. Missing signals degrade to documented defaults;
//! only structurally invalid candidate records produce a `ProfileError`.

pub mod normalizer;
pub mod vocabulary;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use normalizer::{normalize_candidate, normalize_job};

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("ATS score {0} is outside 0-100")]
    AtsScoreOutOfRange(i32),

    #[error("NQF level {0} is outside 1-10")]
    NqfOutOfRange(i32),

    #[error("salary range is inverted (min {min} > max {max})")]
    InvertedSalaryRange { min: f64, max: f64 },

    #[error("salary value {0} is negative")]
    NegativeSalary(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn tier(&self) -> i8 {
        match self {
            ExperienceLevel::Entry => 0,
            ExperienceLevel::Mid => 1,
            ExperienceLevel::Senior => 2,
        }
    }
}

/// Highest qualification found on a CV, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Certificate,
    Diploma,
    Bachelors,
    Masters,
    Phd,
}

impl EducationLevel {
    /// NQF level a qualification of this kind sits at.
    pub fn implied_nqf(&self) -> u8 {
        match self {
            EducationLevel::HighSchool => 4,
            EducationLevel::Certificate => 5,
            EducationLevel::Diploma => 6,
            EducationLevel::Bachelors => 7,
            EducationLevel::Masters => 9,
            EducationLevel::Phd => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SalaryRange {
    /// `None` when neither bound is known.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn midpoint(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

/// Canonical job-side features.
#[derive(Debug, Clone, Serialize)]
pub struct JobFeatures {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub location: Option<String>,
    pub remote_friendly: bool,
    pub salary: Option<SalaryRange>,
    pub industry: Option<String>,
    pub bbbee_preferred: bool,
    pub nqf_requirement: Option<u8>,
}

impl JobFeatures {
    pub fn has_explicit_skills(&self) -> bool {
        !self.required_skills.is_empty() || !self.preferred_skills.is_empty()
    }
}

/// Canonical candidate-side features.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateFeatures {
    pub candidate_id: i64,
    pub cv_text: String,
    pub skills: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
    pub location: Option<String>,
    pub industry: String,
    pub education: EducationLevel,
    pub bbbee_level: Option<u8>,
    pub has_bbbee_status: bool,
    /// Stated NQF level, or the level implied by the highest qualification.
    pub nqf_level: u8,
    pub desired_salary: Option<SalaryRange>,
    pub available_from: Option<NaiveDate>,
}

impl CandidateFeatures {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}
