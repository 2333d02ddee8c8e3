use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An employer's open role as stored in `job_postings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: String,
    pub industry: Option<String>,
    pub bbbee_preferred: bool,
    pub nqf_requirement: Option<i32>,
    pub is_active: bool,
    pub employer_email: Option<String>,
    pub employer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The scoring-relevant view of a job. Recruiters can submit one directly
/// (on-demand ranking) or it is derived from a stored `JobPosting`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequirements {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub industry: Option<String>,
    pub bbbee_preferred: bool,
    pub nqf_requirement: Option<i32>,
}

impl JobPosting {
    pub fn requirements(&self) -> JobRequirements {
        JobRequirements {
            title: self.title.clone(),
            description: self.description.clone(),
            required_skills: self.required_skills.clone(),
            preferred_skills: self.preferred_skills.clone(),
            experience_level: self.experience_level.clone(),
            location: self.location.clone(),
            work_mode: self.work_mode.clone(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            industry: self.industry.clone(),
            bbbee_preferred: self.bbbee_preferred,
            nqf_requirement: self.nqf_requirement,
        }
    }
}
