//! Axum route handlers for premium matching and candidate scoring.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, Role};
use crate::errors::AppError;
use crate::matching::engine::MatchRunSummary;
use crate::matching::payments::confirm_payment;
use crate::matching::ranking::{RankedCandidate, DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT};
use crate::models::match_record::MatchSummary;
use crate::models::{JobRequirements, PaymentSide};
use crate::scoring::CompatibilityReport;
use crate::state::AppState;
use crate::store::Page;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCandidateRequest {
    pub candidate_id: Option<i64>,
    pub job_requirements: Option<JobRequirements>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCandidateResponse {
    pub candidate_id: i64,
    pub report: CompatibilityReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCandidatesRequest {
    pub job_requirements: Option<JobRequirements>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TopCandidatesResponse {
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct RunMatchingResponse {
    pub success: bool,
    pub summary: MatchRunSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchSummary>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct PaymentConfirmedRequest {
    pub side: PaymentSide,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmedResponse {
    pub match_id: i64,
    pub status: String,
    pub jobseeker_paid: bool,
    pub recruiter_paid: bool,
    pub contact_unlocked: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::Validation(e.body_text()))
}

pub fn validate_pagination(query: &PaginationQuery) -> Result<Page, AppError> {
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::Validation("page must be >= 1".to_string()));
    }
    let limit = query.limit.unwrap_or(i64::from(DEFAULT_PAGE_LIMIT));
    if !(1..=i64::from(MAX_PAGE_LIMIT)).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    let page = u32::try_from(page)
        .map_err(|_| AppError::Validation("page is too large".to_string()))?;
    Ok(Page {
        page,
        limit: limit as u32,
    })
}

pub fn validate_ranking_limit(limit: Option<i64>) -> Result<usize, AppError> {
    match limit {
        None => Ok(DEFAULT_RANKING_LIMIT),
        Some(l) if (1..=MAX_RANKING_LIMIT as i64).contains(&l) => Ok(l as usize),
        Some(_) => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_RANKING_LIMIT}"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/premium/run-matching
pub async fn handle_run_matching(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<RunMatchingResponse>, AppError> {
    user.require(&[Role::Admin])?;
    tracing::info!(user_id = user.user_id, "Matching run requested");

    let summary = state.engine.run().await?;
    Ok(Json(RunMatchingResponse {
        success: true,
        summary,
    }))
}

/// POST /api/candidate-scoring/score
pub async fn handle_score_candidate(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ScoreCandidateRequest>, JsonRejection>,
) -> Result<Json<ScoreCandidateResponse>, AppError> {
    user.require(&[Role::Employer, Role::Admin])?;
    let req = body(payload)?;

    let (Some(candidate_id), Some(requirements)) = (req.candidate_id, req.job_requirements)
    else {
        return Err(AppError::Validation(
            "candidateId and jobRequirements are required".to_string(),
        ));
    };

    let scored = state
        .ranking
        .score_candidate(candidate_id, &requirements)
        .await?;
    Ok(Json(ScoreCandidateResponse {
        candidate_id,
        report: scored.report,
    }))
}

/// POST /api/candidate-scoring/top-candidates
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<TopCandidatesRequest>, JsonRejection>,
) -> Result<Json<TopCandidatesResponse>, AppError> {
    user.require(&[Role::Employer, Role::Admin])?;
    let req = body(payload)?;

    let requirements = req
        .job_requirements
        .ok_or_else(|| AppError::Validation("jobRequirements is required".to_string()))?;
    let limit = validate_ranking_limit(req.limit)?;

    let candidates = state.ranking.top_candidates(&requirements, limit).await?;
    Ok(Json(TopCandidatesResponse { candidates }))
}

/// GET /api/premium/recruiter/matches
pub async fn handle_recruiter_matches(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<MatchListResponse>, AppError> {
    user.require(&[Role::Employer])?;
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let page = validate_pagination(&query)?;

    let listings = state.store.matches_for_employer(user.user_id, page).await?;
    Ok(Json(MatchListResponse {
        matches: listings.into_iter().map(MatchSummary::for_recruiter).collect(),
        page: page.page,
        limit: page.limit,
    }))
}

/// GET /api/premium/jobseeker/matches
pub async fn handle_jobseeker_matches(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<MatchListResponse>, AppError> {
    user.require(&[Role::Jobseeker])?;
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let page = validate_pagination(&query)?;

    let listings = state.store.matches_for_jobseeker(user.user_id, page).await?;
    Ok(Json(MatchListResponse {
        matches: listings.into_iter().map(MatchSummary::for_jobseeker).collect(),
        page: page.page,
        limit: page.limit,
    }))
}

/// POST /api/premium/matches/:id/payment-confirmed
pub async fn handle_payment_confirmed(
    State(state): State<AppState>,
    user: AuthUser,
    Path(match_id): Path<i64>,
    payload: Result<Json<PaymentConfirmedRequest>, JsonRejection>,
) -> Result<Json<PaymentConfirmedResponse>, AppError> {
    user.require(&[Role::Admin])?;
    let req = body(payload)?;

    let record = confirm_payment(state.store.as_ref(), match_id, req.side).await?;
    Ok(Json(PaymentConfirmedResponse {
        match_id: record.id,
        status: record.status,
        jobseeker_paid: record.jobseeker_paid,
        recruiter_paid: record.recruiter_paid,
        contact_unlocked: record.contact_unlocked,
    }))
}
