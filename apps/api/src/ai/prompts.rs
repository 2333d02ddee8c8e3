// Prompt constants and builders for the match analyzer.

use serde_json::json;

use crate::profile::{CandidateFeatures, JobFeatures};

/// CV text beyond this many characters is cut before it is sent.
pub const MAX_CV_CHARS: usize = 6000;

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise recruitment analyst for the South African \
    job market. You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

const SUBSCORE_GUIDE: &str = "\
    Score each dimension as an integer from 0 to 100: \
    skills (required skills matter three times as much as preferred ones), \
    experience (overqualification is penalised less than underqualification), \
    location (same city or province scores high, remote or hybrid roles are flexible), \
    industry, sa_context (B-BBEE status when the employer prefers it, NQF level \
    against the stated requirement), salary (closeness of expectation to the offer), \
    availability (sooner is better).";

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn job_json(job: &JobFeatures) -> serde_json::Value {
    json!({
        "title": job.title,
        "description": truncate_chars(&job.description, MAX_CV_CHARS),
        "required_skills": job.required_skills,
        "preferred_skills": job.preferred_skills,
        "experience_level": job.experience_level,
        "location": job.location,
        "remote_friendly": job.remote_friendly,
        "salary": job.salary,
        "industry": job.industry,
        "bbbee_preferred": job.bbbee_preferred,
        "nqf_requirement": job.nqf_requirement,
    })
}

fn candidate_json(candidate: &CandidateFeatures) -> serde_json::Value {
    json!({
        "skills": candidate.skills,
        "experience_level": candidate.experience_level,
        "location": candidate.location,
        "industry": candidate.industry,
        "education": candidate.education,
        "has_bbbee_status": candidate.has_bbbee_status,
        "nqf_level": candidate.nqf_level,
        "desired_salary": candidate.desired_salary,
        "available_from": candidate.available_from,
        "cv_text": truncate_chars(&candidate.cv_text, MAX_CV_CHARS),
    })
}

pub fn analysis_prompt(job: &JobFeatures, candidate: &CandidateFeatures) -> String {
    format!(
        "Assess how well this candidate fits this job.\n\n\
         JOB:\n{job}\n\nCANDIDATE:\n{candidate}\n\n{SUBSCORE_GUIDE}\n\n\
         Respond with JSON of exactly this shape:\n\
         {{\"skills_score\": 0, \"experience_score\": 0, \"location_score\": 0, \
         \"industry_score\": 0, \"sa_context_score\": 0, \"salary_score\": 0, \
         \"availability_score\": 0, \"matched_skills\": [\"...\"], \
         \"skill_gaps\": [\"...\"], \"match_reasons\": [\"...\"]}}",
        job = job_json(job),
        candidate = candidate_json(candidate),
    )
}

pub fn skill_similarity_prompt(job: &JobFeatures, candidate: &CandidateFeatures) -> String {
    format!(
        "The job below lists no explicit skills. Estimate from its title and \
         description how well the candidate's skills and CV cover what the role needs.\n\n\
         JOB:\n{job}\n\nCANDIDATE:\n{candidate}\n\n\
         Respond with JSON: {{\"score\": <integer 0-100>}}",
        job = job_json(job),
        candidate = candidate_json(candidate),
    )
}

pub fn skill_extraction_prompt(cv_text: &str) -> String {
    format!(
        "List the professional skills evidenced in this CV. Use short canonical \
         names (e.g. \"Python\", \"Project Management\", \"Pastel\").\n\n\
         CV:\n{}\n\n\
         Respond with JSON: {{\"skills\": [\"...\"]}}",
        truncate_chars(cv_text, MAX_CV_CHARS)
    )
}
