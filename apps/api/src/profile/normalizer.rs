use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CandidateProfile, JobRequirements};
use crate::profile::vocabulary::{
    Province, CITY_PROVINCES, GENERAL_INDUSTRY, INDUSTRIES, PROVINCE_NAMES, REMOTE_MARKERS,
    SKILL_ALIASES, SKILL_VOCABULARY,
};
use crate::profile::{
    CandidateFeatures, EducationLevel, ExperienceLevel, JobFeatures, ProfileError, SalaryRange,
};

static BBBEE_LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)b-?bbee\s+level\s+(\d+)").expect("valid B-BBEE regex")
});

/// Looser form for the dedicated status field, which often holds just "Level 2".
static STATUS_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)level\s+(\d+)").expect("valid level regex"));

const SENIOR_MARKERS: &[&str] = &[
    "senior",
    "lead",
    "principal",
    "head of",
    "manager",
    "architect",
];

const ENTRY_MARKERS: &[&str] = &[
    "junior",
    "graduate",
    "intern",
    "internship",
    "entry level",
    "entry-level",
    "learnership",
    "trainee",
];

const EDUCATION_LADDER: &[(EducationLevel, &[&str])] = &[
    (EducationLevel::Phd, &["phd", "ph.d", "doctorate", "doctoral"]),
    (
        EducationLevel::Masters,
        &["masters", "master's", "master of", "msc", "m.sc", "mba"],
    ),
    (
        EducationLevel::Bachelors,
        &[
            "bachelor", "bachelors", "bsc", "b.sc", "bcom", "b.com", "ba", "llb", "beng",
            "honours", "degree",
        ],
    ),
    (EducationLevel::Diploma, &["diploma"]),
    (EducationLevel::Certificate, &["certificate", "certification"]),
];

/// School-leaving qualifications that name a "certificate" but sit below
/// the post-school Certificate rung.
const SCHOOL_CERTIFICATES: &[&str] = &[
    "matric certificate",
    "national senior certificate",
    "senior certificate",
];

/// Skills that are ordinary English words in lowercase.
const CASE_SENSITIVE_SKILLS: &[&str] = &["Go"];

const NO_BBBEE_STATUS: &[&str] = &["", "none", "unknown", "n/a", "na", "non-compliant"];

// ────────────────────────────────────────────────────────────────────────────
// Text matching
// ────────────────────────────────────────────────────────────────────────────

/// True when `term` occurs in `haystack` with no alphanumeric character
/// directly on either side, so "Java" is not found inside "JavaScript".
fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| contains_term(haystack, t))
}

// ────────────────────────────────────────────────────────────────────────────
// Extractors
// ────────────────────────────────────────────────────────────────────────────

/// Skills from the fixed vocabulary that appear in `text`.
///
/// Matching is case-insensitive except for skills that double as common
/// words ("Go"), which must appear in their canonical casing.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    if text.trim().is_empty() {
        return found;
    }

    let lower = text.to_lowercase();
    for skill in SKILL_VOCABULARY {
        let hit = if CASE_SENSITIVE_SKILLS.contains(skill) {
            contains_term(text, skill)
        } else {
            contains_term(&lower, &skill.to_lowercase())
        };
        if hit {
            found.insert(skill.to_string());
        }
    }
    for (alias, canonical) in SKILL_ALIASES {
        if contains_term(&lower, alias) {
            found.insert(canonical.to_string());
        }
    }
    found
}

/// Maps an employer- or user-entered skill name onto the vocabulary spelling.
/// Unknown skills are kept as entered (trimmed).
pub fn canonical_skill(name: &str) -> String {
    let trimmed = name.trim();
    if let Some(skill) = SKILL_VOCABULARY
        .iter()
        .find(|s| s.eq_ignore_ascii_case(trimmed))
    {
        return skill.to_string();
    }
    if let Some((_, canonical)) = SKILL_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
    {
        return canonical.to_string();
    }
    trimmed.to_string()
}

/// Canonicalizes a skill list, dropping blanks and case-insensitive duplicates
/// while keeping the original order.
pub fn canonical_skill_list(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let canonical = canonical_skill(skill);
        if canonical.is_empty() || out.iter().any(|s| s.eq_ignore_ascii_case(&canonical)) {
            continue;
        }
        out.push(canonical);
    }
    out
}

/// Experience tier signalled by keywords, if any.
pub fn detect_experience_level(text: &str) -> Option<ExperienceLevel> {
    let lower = text.to_lowercase();
    if contains_any(&lower, SENIOR_MARKERS) {
        Some(ExperienceLevel::Senior)
    } else if contains_any(&lower, ENTRY_MARKERS) {
        Some(ExperienceLevel::Entry)
    } else {
        None
    }
}

/// Experience tier of a CV; `Mid` when the text is ambiguous.
pub fn extract_experience_level(text: &str) -> ExperienceLevel {
    detect_experience_level(text).unwrap_or(ExperienceLevel::Mid)
}

/// Parses a structured experience tag such as "junior" or "Mid-level".
pub fn parse_experience_level(tag: &str) -> Option<ExperienceLevel> {
    let tag = tag.trim().to_lowercase();
    match tag.as_str() {
        "" => None,
        "entry" | "entry-level" | "entry level" | "junior" | "graduate" | "intern" => {
            Some(ExperienceLevel::Entry)
        }
        "mid" | "mid-level" | "mid level" | "intermediate" => Some(ExperienceLevel::Mid),
        "senior" | "lead" | "principal" | "executive" | "manager" => Some(ExperienceLevel::Senior),
        other => detect_experience_level(other),
    }
}

/// First industry from the fixed list mentioned in `text`, else "General".
pub fn extract_industry(text: &str) -> String {
    let lower = text.to_lowercase();
    INDUSTRIES
        .iter()
        .find(|(_, phrases)| contains_any(&lower, phrases))
        .map(|(industry, _)| industry.to_string())
        .unwrap_or_else(|| GENERAL_INDUSTRY.to_string())
}

/// Highest rung of the qualification ladder mentioned in `text`.
pub fn extract_education(text: &str) -> EducationLevel {
    let lower = SCHOOL_CERTIFICATES
        .iter()
        .fold(text.to_lowercase(), |acc, phrase| acc.replace(phrase, " "));
    EDUCATION_LADDER
        .iter()
        .find(|(_, markers)| contains_any(&lower, markers))
        .map(|(level, _)| *level)
        .unwrap_or(EducationLevel::HighSchool)
}

/// B-BBEE level 1–8 stated as "B-BBEE Level N". Anything else is unknown.
pub fn extract_bbbee_level(text: &str) -> Option<u8> {
    level_from(&BBBEE_LEVEL_RE, text)
}

fn level_from(re: &Regex, text: &str) -> Option<u8> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .filter(|level| (1..=8).contains(level))
}

/// Province a free-text location sits in, via province names first and the
/// city table second.
pub fn resolve_province(location: &str) -> Option<Province> {
    let lower = location.to_lowercase();
    PROVINCE_NAMES
        .iter()
        .chain(CITY_PROVINCES.iter())
        .find(|(name, _)| contains_term(&lower, name))
        .map(|(_, province)| *province)
}

/// True when two free-text locations name the same place: equal after
/// trimming, or one is a known city or province that the other mentions as a
/// whole term ("Sandton" within "Sandton, Gauteng").
pub fn same_place(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let known = PROVINCE_NAMES
        .iter()
        .chain(CITY_PROVINCES.iter())
        .any(|(name, _)| *name == short.as_str());
    known && contains_term(long, short)
}

pub fn is_remote_friendly(work_mode: Option<&str>, location: Option<&str>) -> bool {
    [work_mode, location]
        .into_iter()
        .flatten()
        .any(|text| contains_any(&text.to_lowercase(), REMOTE_MARKERS))
}

// ────────────────────────────────────────────────────────────────────────────
// Feature builders
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Canonical job features. Never fails: unusable employer input is treated
/// as absent.
pub fn normalize_job(req: &JobRequirements) -> JobFeatures {
    let required_skills = canonical_skill_list(&req.required_skills);
    let preferred_skills = canonical_skill_list(&req.preferred_skills)
        .into_iter()
        .filter(|p| !required_skills.iter().any(|r| r.eq_ignore_ascii_case(p)))
        .collect();

    let experience_level = req
        .experience_level
        .as_deref()
        .and_then(parse_experience_level)
        .or_else(|| detect_experience_level(&req.title));

    let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
    let salary = SalaryRange::from_bounds(positive(req.salary_min), positive(req.salary_max));

    let industry = non_blank(req.industry.as_deref()).or_else(|| {
        let inferred = extract_industry(&format!("{} {}", req.title, req.description));
        (inferred != GENERAL_INDUSTRY).then_some(inferred)
    });

    JobFeatures {
        title: req.title.trim().to_string(),
        description: req.description.clone(),
        required_skills,
        preferred_skills,
        experience_level,
        location: non_blank(req.location.as_deref()),
        remote_friendly: is_remote_friendly(req.work_mode.as_deref(), req.location.as_deref()),
        salary,
        industry,
        bbbee_preferred: req.bbbee_preferred,
        nqf_requirement: req
            .nqf_requirement
            .filter(|n| (1..=10).contains(n))
            .map(|n| n as u8),
    }
}

/// Canonical candidate features.
///
/// Rejects records that are structurally wrong (scores or levels out of
/// range, inverted salary expectations). Missing data is never an error.
pub fn normalize_candidate(profile: &CandidateProfile) -> Result<CandidateFeatures, ProfileError> {
    if !(0..=100).contains(&profile.ats_score) {
        return Err(ProfileError::AtsScoreOutOfRange(profile.ats_score));
    }
    if let Some(nqf) = profile.nqf_level {
        if !(1..=10).contains(&nqf) {
            return Err(ProfileError::NqfOutOfRange(nqf));
        }
    }
    for value in [profile.desired_salary_min, profile.desired_salary_max]
        .into_iter()
        .flatten()
    {
        if value < 0.0 {
            return Err(ProfileError::NegativeSalary(value));
        }
    }
    if let (Some(min), Some(max)) = (profile.desired_salary_min, profile.desired_salary_max) {
        if min > max {
            return Err(ProfileError::InvertedSalaryRange { min, max });
        }
    }

    let cv = profile.cv_content.as_str();

    let mut skills: BTreeSet<String> = canonical_skill_list(&profile.skills).into_iter().collect();
    for skill in extract_skills(cv) {
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            skills.insert(skill);
        }
    }

    let experience_level = profile
        .experience_level
        .as_deref()
        .and_then(parse_experience_level)
        .unwrap_or_else(|| extract_experience_level(cv));

    let status = profile.bbbee_status.as_deref().map(str::trim).unwrap_or("");
    let bbbee_level = level_from(&BBBEE_LEVEL_RE, status)
        .or_else(|| level_from(&STATUS_LEVEL_RE, status))
        .or_else(|| extract_bbbee_level(cv));
    let has_bbbee_status = bbbee_level.is_some()
        || !NO_BBBEE_STATUS.contains(&status.to_lowercase().as_str());

    let education = extract_education(cv);
    let nqf_level = profile
        .nqf_level
        .map(|n| n as u8)
        .unwrap_or_else(|| education.implied_nqf());

    Ok(CandidateFeatures {
        candidate_id: profile.id,
        cv_text: profile.cv_content.clone(),
        skills,
        experience_level,
        location: non_blank(profile.best_location()),
        industry: extract_industry(cv),
        education,
        bbbee_level,
        has_bbbee_status,
        nqf_level,
        desired_salary: SalaryRange::from_bounds(
            profile.desired_salary_min,
            profile.desired_salary_max,
        ),
        available_from: profile.available_from,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn make_profile(id: i64, cv: &str) -> CandidateProfile {
        CandidateProfile {
            id,
            user_id: id + 1000,
            full_name: format!("Candidate {id}"),
            cv_content: cv.to_string(),
            ats_score: 80,
            skills: vec![],
            experience_level: None,
            location: None,
            province: None,
            bbbee_status: None,
            nqf_level: None,
            desired_salary_min: None,
            desired_salary_max: None,
            available_from: None,
            email: Some(format!("candidate{id}@example.co.za")),
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_skills_is_case_insensitive() {
        let skills = extract_skills("Built dashboards in power bi and wrote complex sql queries.");
        assert!(skills.contains("Power BI"));
        assert!(skills.contains("SQL"));
    }

    #[test]
    fn test_extract_skills_respects_word_boundaries() {
        let skills = extract_skills("Frontend work in JavaScript and PostgreSQL tuning.");
        assert!(skills.contains("JavaScript"));
        assert!(skills.contains("PostgreSQL"));
        assert!(!skills.contains("Java"));
        assert!(!skills.contains("SQL"));
    }

    #[test]
    fn test_extract_skills_short_names_need_canonical_case() {
        assert!(!extract_skills("I am good to go on short notice").contains("Go"));
        assert!(extract_skills("Services written in Go and C#").contains("Go"));
    }

    #[test]
    fn test_extract_skills_csharp_any_case() {
        assert!(extract_skills("backend work in c# and .net").contains("C#"));
        assert!(extract_skills("C# developer").contains("C#"));
    }

    #[test]
    fn test_extract_skills_resolves_aliases() {
        let skills = extract_skills("Deployed to k8s, data in postgres");
        assert!(skills.contains("Kubernetes"));
        assert!(skills.contains("PostgreSQL"));
    }

    #[test]
    fn test_extract_skills_empty_input() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("   \n").is_empty());
    }

    #[test]
    fn test_canonical_skill_list_dedups_and_canonicalizes() {
        let list = canonical_skill_list(&[
            "javascript".to_string(),
            "JS".to_string(),
            " sql ".to_string(),
            "".to_string(),
            "Forklift Licence".to_string(),
        ]);
        assert_eq!(list, vec!["JavaScript", "SQL", "Forklift Licence"]);
    }

    #[test]
    fn test_experience_level_keywords() {
        assert_eq!(
            extract_experience_level("Senior Software Engineer at Takealot"),
            ExperienceLevel::Senior
        );
        assert_eq!(
            extract_experience_level("Graduate programme, junior analyst"),
            ExperienceLevel::Entry
        );
        assert_eq!(
            extract_experience_level("Software engineer, 4 years"),
            ExperienceLevel::Mid
        );
    }

    #[test]
    fn test_parse_experience_tag() {
        assert_eq!(parse_experience_level("Junior"), Some(ExperienceLevel::Entry));
        assert_eq!(parse_experience_level("mid-level"), Some(ExperienceLevel::Mid));
        assert_eq!(parse_experience_level("Team Lead"), Some(ExperienceLevel::Senior));
        assert_eq!(parse_experience_level("  "), None);
        assert_eq!(parse_experience_level("any"), None);
    }

    #[test]
    fn test_extract_industry_first_match_and_fallback() {
        assert_eq!(
            extract_industry("Software developer in a banking group"),
            "Information Technology"
        );
        assert_eq!(extract_industry("Underground mining supervisor"), "Mining");
        assert_eq!(extract_industry("Forklift operator"), "General");
    }

    #[test]
    fn test_extract_education_ladder() {
        assert_eq!(extract_education("PhD in Chemistry, MSc Physics"), EducationLevel::Phd);
        assert_eq!(extract_education("BCom Accounting (UCT)"), EducationLevel::Bachelors);
        assert_eq!(extract_education("National Diploma in IT"), EducationLevel::Diploma);
        assert_eq!(extract_education("Matric 2019"), EducationLevel::HighSchool);
    }

    #[test]
    fn test_school_certificates_stay_high_school() {
        assert_eq!(extract_education("Matric certificate, 2021"), EducationLevel::HighSchool);
        assert_eq!(
            extract_education("National Senior Certificate (NSC)"),
            EducationLevel::HighSchool
        );
        assert_eq!(
            extract_education("Matric certificate; Certificate in Bookkeeping"),
            EducationLevel::Certificate
        );
    }

    #[test]
    fn test_extract_bbbee_level() {
        assert_eq!(extract_bbbee_level("B-BBEE Level 2 contributor"), Some(2));
        assert_eq!(extract_bbbee_level("bbbee level 4"), Some(4));
        assert_eq!(extract_bbbee_level("B-BBEE Level 12"), None);
        assert_eq!(extract_bbbee_level("no status given"), None);
    }

    #[test]
    fn test_resolve_province() {
        assert_eq!(resolve_province("Sandton"), Some(Province::Gauteng));
        assert_eq!(resolve_province("Durban, KZN"), Some(Province::KwaZuluNatal));
        assert_eq!(resolve_province("Northern Cape"), Some(Province::NorthernCape));
        assert_eq!(resolve_province("London"), None);
    }

    #[test]
    fn test_same_place() {
        assert!(same_place(" Durban ", "durban"));
        assert!(same_place("Sandton, Gauteng", "Sandton"));
        assert!(same_place("Gauteng", "Pretoria, Gauteng"));
        assert!(!same_place("Cape Town, South Africa", "South Africa"));
        assert!(!same_place("East London", "London"));
        assert!(!same_place("Sandton", "SA"));
        assert!(!same_place("", ""));
    }

    #[test]
    fn test_normalize_job_splits_and_infers() {
        let req = JobRequirements {
            title: "Senior Data Engineer".to_string(),
            description: "Build pipelines for our banking platform".to_string(),
            required_skills: vec!["python".to_string(), "SQL".to_string()],
            preferred_skills: vec!["sql".to_string(), "AWS".to_string()],
            work_mode: Some("Hybrid".to_string()),
            salary_min: Some(-1.0),
            nqf_requirement: Some(14),
            ..Default::default()
        };
        let job = normalize_job(&req);
        assert_eq!(job.required_skills, vec!["Python", "SQL"]);
        assert_eq!(job.preferred_skills, vec!["AWS"]);
        assert_eq!(job.experience_level, Some(ExperienceLevel::Senior));
        assert!(job.remote_friendly);
        assert!(job.salary.is_none());
        assert_eq!(job.industry.as_deref(), Some("Finance"));
        assert!(job.nqf_requirement.is_none());
    }

    #[test]
    fn test_normalize_candidate_merges_skills_and_infers_nqf() {
        let mut profile = make_profile(1, "BSc Computer Science. Python and Docker.");
        profile.skills = vec!["python".to_string(), "Excel".to_string()];
        profile.bbbee_status = Some("Level 1".to_string());

        let features = normalize_candidate(&profile).unwrap();
        assert!(features.has_skill("Python"));
        assert!(features.has_skill("docker"));
        assert!(features.has_skill("Excel"));
        assert_eq!(features.skills.len(), 3);
        assert_eq!(features.education, EducationLevel::Bachelors);
        assert_eq!(features.nqf_level, 7);
        assert_eq!(features.bbbee_level, Some(1));
        assert!(features.has_bbbee_status);
    }

    #[test]
    fn test_normalize_candidate_empty_cv_uses_defaults() {
        let features = normalize_candidate(&make_profile(2, "")).unwrap();
        assert!(features.skills.is_empty());
        assert_eq!(features.experience_level, ExperienceLevel::Mid);
        assert_eq!(features.industry, "General");
        assert_eq!(features.education, EducationLevel::HighSchool);
        assert!(!features.has_bbbee_status);
        assert!(features.location.is_none());
    }

    #[test]
    fn test_normalize_candidate_rejects_invalid_records() {
        let mut bad_score = make_profile(3, "");
        bad_score.ats_score = 140;
        assert_eq!(
            normalize_candidate(&bad_score).unwrap_err(),
            ProfileError::AtsScoreOutOfRange(140)
        );

        let mut inverted = make_profile(4, "");
        inverted.desired_salary_min = Some(50_000.0);
        inverted.desired_salary_max = Some(30_000.0);
        assert!(matches!(
            normalize_candidate(&inverted),
            Err(ProfileError::InvertedSalaryRange { .. })
        ));

        let mut bad_nqf = make_profile(5, "");
        bad_nqf.nqf_level = Some(0);
        assert_eq!(
            normalize_candidate(&bad_nqf).unwrap_err(),
            ProfileError::NqfOutOfRange(0)
        );
    }
}
