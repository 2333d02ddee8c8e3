use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::match_record::{MatchListing, PaymentState};
use crate::models::{CandidateProfile, JobPosting, MatchRecord, NewMatch};
use crate::store::{InsertOutcome, MatchStore, Page, StoreError};

const JOB_SELECT: &str = r#"
    SELECT j.id, j.employer_id, j.title, j.description, j.required_skills,
           j.preferred_skills, j.experience_level, j.location, j.work_mode,
           j.salary_min, j.salary_max, j.currency, j.industry, j.bbbee_preferred,
           j.nqf_requirement, j.is_active, u.email AS employer_email,
           u.phone AS employer_phone, j.created_at
    FROM job_postings j
    JOIN users u ON u.id = j.employer_id
"#;

const LISTING_SELECT: &str = r#"
    SELECT m.*, j.title AS job_title, u.email AS employer_email,
           u.phone AS employer_phone, c.full_name AS candidate_name,
           c.email AS candidate_email, c.phone AS candidate_phone
    FROM matches m
    JOIN job_postings j ON j.id = m.job_id
    JOIN users u ON u.id = j.employer_id
    JOIN cvs cv ON cv.id = m.candidate_id
    JOIN users c ON c.id = cv.user_id
"#;

/// `MatchStore` over the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgMatchStore {
    db: PgPool,
}

impl PgMatchStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Opens a pool of at most `max_connections` and wraps it.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!(max_connections, "Connecting to PostgreSQL...");

        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(db))
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        let jobs = sqlx::query_as(&format!("{JOB_SELECT} WHERE j.is_active ORDER BY j.id"))
            .fetch_all(&self.db)
            .await?;
        Ok(jobs)
    }

    async fn qualified_candidates(
        &self,
        min_ats_score: i32,
    ) -> Result<Vec<CandidateProfile>, StoreError> {
        let candidates = sqlx::query_as(
            "SELECT * FROM candidate_profiles WHERE ats_score >= $1 ORDER BY id",
        )
        .bind(min_ats_score)
        .fetch_all(&self.db)
        .await?;
        Ok(candidates)
    }

    async fn get_candidate(&self, id: i64) -> Result<Option<CandidateProfile>, StoreError> {
        let candidate = sqlx::query_as("SELECT * FROM candidate_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(candidate)
    }

    async fn existing_pairs(&self) -> Result<HashSet<(i64, i64)>, StoreError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT job_id, candidate_id FROM matches")
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn insert_match(&self, m: &NewMatch) -> Result<InsertOutcome, StoreError> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO matches
                (job_id, candidate_id, match_score, skills_score, experience_score,
                 location_score, industry_score, sa_context_score, salary_score,
                 availability_score, matched_skills, skill_gaps, match_reasons)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (job_id, candidate_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(m.job_id)
        .bind(m.candidate_id)
        .bind(m.match_score)
        .bind(m.skills_score)
        .bind(m.experience_score)
        .bind(m.location_score)
        .bind(m.industry_score)
        .bind(m.sa_context_score)
        .bind(m.salary_score)
        .bind(m.availability_score)
        .bind(&m.matched_skills)
        .bind(&m.skill_gaps)
        .bind(&m.match_reasons)
        .fetch_optional(&self.db)
        .await?;

        Ok(id.map_or(InsertOutcome::Duplicate, InsertOutcome::Inserted))
    }

    async fn matches_for_employer(
        &self,
        employer_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError> {
        let rows = sqlx::query_as(&format!(
            "{LISTING_SELECT} WHERE j.employer_id = $1 \
             ORDER BY m.match_score DESC, m.id LIMIT $2 OFFSET $3"
        ))
        .bind(employer_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn matches_for_jobseeker(
        &self,
        user_id: i64,
        page: Page,
    ) -> Result<Vec<MatchListing>, StoreError> {
        let rows = sqlx::query_as(&format!(
            "{LISTING_SELECT} WHERE cv.user_id = $1 \
             ORDER BY m.match_score DESC, m.id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_match(&self, id: i64) -> Result<Option<MatchRecord>, StoreError> {
        let record = sqlx::query_as("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(record)
    }

    async fn update_payment_state(
        &self,
        id: i64,
        expected: PaymentState,
        next: PaymentState,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let record = sqlx::query_as(
            r#"
            UPDATE matches
            SET jobseeker_paid = $2, recruiter_paid = $3, contact_unlocked = $4,
                status = $5, updated_at = now()
            WHERE id = $1
              AND jobseeker_paid = $6 AND recruiter_paid = $7 AND status = $8
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next.jobseeker_paid)
        .bind(next.recruiter_paid)
        .bind(next.contact_unlocked)
        .bind(next.status.as_str())
        .bind(expected.jobseeker_paid)
        .bind(expected.recruiter_paid)
        .bind(expected.status.as_str())
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }
}
