use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Snapshot of one CV revision joined with the owner's South African
/// context profile. Read from the `candidate_profiles` view; never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub cv_content: String,
    pub ats_score: i32,
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub province: Option<String>,
    pub bbbee_status: Option<String>,
    pub nqf_level: Option<i32>,
    pub desired_salary_min: Option<f64>,
    pub desired_salary_max: Option<f64>,
    pub available_from: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// City-level location when known, otherwise the province.
    pub fn best_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| self.province.as_deref().filter(|p| !p.trim().is_empty()))
    }
}
