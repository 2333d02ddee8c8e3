//! Individual sub-score rules. Each returns a value in 0–100 and substitutes
//! a neutral value when either side lacks the data to compare.

use chrono::NaiveDate;

use crate::profile::normalizer::{resolve_province, same_place};
use crate::profile::vocabulary::GENERAL_INDUSTRY;
use crate::profile::{CandidateFeatures, ExperienceLevel, JobFeatures, SalaryRange};
use crate::scoring::weights::ExperienceCurve;

/// Share of the skills sub-score carried by required skills when the job
/// lists both required and preferred skills.
pub const REQUIRED_SKILL_SHARE: f64 = 0.75;

pub const NEUTRAL_SKILLS: u8 = 70;
pub const NEUTRAL_EXPERIENCE: u8 = 70;
pub const LOCATION_UNKNOWN: u8 = 60;
pub const LOCATION_ELSEWHERE: u8 = 40;
pub const LOCATION_REMOTE: u8 = 85;
pub const LOCATION_SAME_PROVINCE: u8 = 90;
pub const NEUTRAL_INDUSTRY: u8 = 60;
pub const SA_CONTEXT_BASE: u8 = 60;
pub const SA_CONTEXT_BBBEE_BONUS: u8 = 20;
pub const SA_CONTEXT_NQF_BONUS: u8 = 15;
pub const SALARY_UNKNOWN: u8 = 65;
pub const AVAILABILITY_UNKNOWN: u8 = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillAssessment {
    /// `None` when the job lists no explicit skills.
    pub score: Option<u8>,
    pub matched: Vec<String>,
    pub gaps: Vec<String>,
}

fn ratio_held(skills: &[String], candidate: &CandidateFeatures) -> Option<f64> {
    if skills.is_empty() {
        return None;
    }
    let held = skills.iter().filter(|s| candidate.has_skill(s)).count();
    Some(held as f64 / skills.len() as f64)
}

fn percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn assess_skills(job: &JobFeatures, candidate: &CandidateFeatures) -> SkillAssessment {
    let required = ratio_held(&job.required_skills, candidate);
    let preferred = ratio_held(&job.preferred_skills, candidate);

    let score = match (required, preferred) {
        (Some(r), Some(p)) => Some(percent(
            REQUIRED_SKILL_SHARE * r + (1.0 - REQUIRED_SKILL_SHARE) * p,
        )),
        (Some(only), None) | (None, Some(only)) => Some(percent(only)),
        (None, None) => None,
    };

    let (matched, gaps) = job
        .required_skills
        .iter()
        .chain(job.preferred_skills.iter())
        .cloned()
        .partition(|s| candidate.has_skill(s));

    SkillAssessment {
        score,
        matched,
        gaps,
    }
}

pub fn experience_score(
    curve: ExperienceCurve,
    required: Option<ExperienceLevel>,
    actual: ExperienceLevel,
) -> u8 {
    required.map_or(NEUTRAL_EXPERIENCE, |req| curve.score(req, actual))
}

pub fn location_score(job: &JobFeatures, candidate: &CandidateFeatures) -> u8 {
    match (job.location.as_deref(), candidate.location.as_deref()) {
        (Some(job_loc), Some(cand_loc)) => {
            if same_place(job_loc, cand_loc) {
                return 100;
            }
            let same_province = matches!(
                (resolve_province(job_loc), resolve_province(cand_loc)),
                (Some(a), Some(b)) if a == b
            );
            if same_province {
                LOCATION_SAME_PROVINCE
            } else if job.remote_friendly {
                LOCATION_REMOTE
            } else {
                LOCATION_ELSEWHERE
            }
        }
        _ if job.remote_friendly => LOCATION_REMOTE,
        (None, None) => LOCATION_UNKNOWN,
        _ => LOCATION_ELSEWHERE,
    }
}

pub fn industry_score(job_industry: Option<&str>, candidate_industry: &str) -> u8 {
    let Some(job_industry) = job_industry else {
        return NEUTRAL_INDUSTRY;
    };
    if candidate_industry.eq_ignore_ascii_case(GENERAL_INDUSTRY) {
        return NEUTRAL_INDUSTRY;
    }
    let j = job_industry.trim().to_lowercase();
    let c = candidate_industry.trim().to_lowercase();
    if j == c {
        100
    } else if j.contains(&c) || c.contains(&j) {
        80
    } else {
        30
    }
}

pub fn sa_context_score(job: &JobFeatures, candidate: &CandidateFeatures) -> u8 {
    let mut score = SA_CONTEXT_BASE;
    if job.bbbee_preferred && candidate.has_bbbee_status {
        score += SA_CONTEXT_BBBEE_BONUS;
    }
    if job
        .nqf_requirement
        .is_some_and(|required| candidate.nqf_level >= required)
    {
        score += SA_CONTEXT_NQF_BONUS;
    }
    score.min(100)
}

pub fn salary_score(offered: Option<SalaryRange>, desired: Option<SalaryRange>) -> u8 {
    let offered = offered.and_then(|r| r.midpoint()).filter(|m| *m > 0.0);
    let desired = desired.and_then(|r| r.midpoint());
    let (Some(offered), Some(desired)) = (offered, desired) else {
        return SALARY_UNKNOWN;
    };

    let diff_pct = (offered - desired).abs() / offered * 100.0;
    if diff_pct <= 10.0 {
        100
    } else if diff_pct <= 20.0 {
        80
    } else if diff_pct <= 30.0 {
        60
    } else {
        30
    }
}

pub fn availability_score(available_from: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(date) = available_from else {
        return AVAILABILITY_UNKNOWN;
    };
    match (date - today).num_days() {
        d if d <= 0 => 100,
        d if d <= 30 => 90,
        d if d <= 60 => 70,
        _ => 40,
    }
}
