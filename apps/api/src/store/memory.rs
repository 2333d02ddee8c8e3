//! In-memory `MatchStore` for unit and router tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::match_record::{MatchListing, PaymentState};
use crate::models::{CandidateProfile, JobPosting, MatchRecord, NewMatch};
use crate::store::{InsertOutcome, MatchStore, Page, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    pub jobs: Mutex<Vec<JobPosting>>,
    pub candidates: Mutex<Vec<CandidateProfile>>,
    pub matches: Mutex<Vec<MatchRecord>>,
    /// When set, `insert_match` fails with a database error.
    pub fail_inserts: bool,
}

impl MemoryStore {
    pub fn with(jobs: Vec<JobPosting>, candidates: Vec<CandidateProfile>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            candidates: Mutex::new(candidates),
            ..Default::default()
        }
    }

    pub fn match_count(&self) -> usize {
        self.matches.lock().unwrap().len()
    }

    pub fn all_matches(&self) -> Vec<MatchRecord> {
        self.matches.lock().unwrap().clone()
    }

    fn listing(&self, record: &MatchRecord) -> Option<MatchListing> {
        let jobs = self.jobs.lock().unwrap();
        let candidates = self.candidates.lock().unwrap();
        let job = jobs.iter().find(|j| j.id == record.job_id)?;
        let candidate = candidates.iter().find(|c| c.id == record.candidate_id)?;
        Some(MatchListing {
            record: record.clone(),
            job_title: job.title.clone(),
            employer_email: job.employer_email.clone(),
            employer_phone: job.employer_phone.clone(),
            candidate_name: candidate.full_name.clone(),
            candidate_email: candidate.email.clone(),
            candidate_phone: candidate.phone.clone(),
        })
    }

    fn page_of(&self, mut listings: Vec<MatchListing>, page: Page) -> Vec<MatchListing> {
        listings.sort_by(|a, b| {
            b.record
                .match_score
                .cmp(&a.record.match_score)
                .then(a.record.id.cmp(&b.record.id))
        });
        listings
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect()
    }
}

pub fn job(id: i64, employer_id: i64) -> JobPosting {
    JobPosting {
        id,
        employer_id,
        title: format!("Job {id}"),
        description: String::new(),
        required_skills: vec![],
        preferred_skills: vec![],
        experience_level: None,
        location: None,
        work_mode: None,
        salary_min: None,
        salary_max: None,
        currency: "ZAR".to_string(),
        industry: None,
        bbbee_preferred: false,
        nqf_requirement: None,
        is_active: true,
        employer_email: Some(format!("hr{employer_id}@example.co.za")),
        employer_phone: Some("+27 11 000 0000".to_string()),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.is_active)
            .cloned()
            .collect())
    }

    async fn qualified_candidates(
        &self,
        min_ats_score: i32,
    ) -> Result<Vec<CandidateProfile>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.ats_score >= min_ats_score)
            .cloned()
            .collect())
    }

    async fn get_candidate(&self, id: i64) -> Result<Option<CandidateProfile>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn existing_pairs(&self) -> Result<HashSet<(i64, i64)>, StoreError> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .iter()
            .map(|m| (m.job_id, m.candidate_id))
            .collect())
    }

    async fn insert_match(&self, m: &NewMatch) -> Result<InsertOutcome, StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut matches = self.matches.lock().unwrap();
        if matches
            .iter()
            .any(|r| r.job_id == m.job_id && r.candidate_id == m.candidate_id)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        let id = matches.len() as i64 + 1;
        let now = Utc::now();
        matches.push(MatchRecord {
            id,
            job_id: m.job_id,
            candidate_id: m.candidate_id,
            match_score: m.match_score,
            skills_score: m.skills_score,
            experience_score: m.experience_score,
            location_score: m.location_score,
            industry_score: m.industry_score,
            sa_context_score: m.sa_context_score,
            salary_score: m.salary_score,
            availability_score: m.availability_score,
            matched_skills: m.matched_skills.clone(),
            skill_gaps: m.skill_gaps.clone(),
            match_reasons: m.match_reasons.clone(),
            jobseeker_paid: false,
            recruiter_paid: false,
            contact_unlocked: false,
            status: "pending".to_string(),
            created_at: now,
            updated_at: now,
        });
        Ok(InsertOutcome::Inserted(id))
    }

    async fn matches_for_employer(
        &self,
        employer_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError> {
        let job_ids: HashSet<i64> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.employer_id == employer_id)
            .map(|j| j.id)
            .collect();
        let records = self.all_matches();
        let listings = records
            .iter()
            .filter(|m| job_ids.contains(&m.job_id))
            .filter_map(|m| self.listing(m))
            .collect();
        Ok(self.page_of(listings, page))
    }

    async fn matches_for_jobseeker(
        &self,
        user_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError> {
        let candidate_ids: HashSet<i64> = self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();
        let records = self.all_matches();
        let listings = records
            .iter()
            .filter(|m| candidate_ids.contains(&m.candidate_id))
            .filter_map(|m| self.listing(m))
            .collect();
        Ok(self.page_of(listings, page))
    }

    async fn get_match(&self, id: i64) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn update_payment_state(
        &self,
        id: i64,
        expected: PaymentState,
        next: PaymentState,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let mut matches = self.matches.lock().unwrap();
        let Some(record) = matches.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        let current = record.payment_state().map_err(StoreError::Corrupt)?;
        if current.jobseeker_paid != expected.jobseeker_paid
            || current.recruiter_paid != expected.recruiter_paid
            || current.status != expected.status
        {
            return Ok(None);
        }
        record.jobseeker_paid = next.jobseeker_paid;
        record.recruiter_paid = next.recruiter_paid;
        record.contact_unlocked = next.contact_unlocked;
        record.status = next.status.as_str().to_string();
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }
}
