use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use crate::scoring::CompatibilityReport;

/// Lifecycle of a match. Only payment confirmations move it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Active,
    MutualInterest,
    Closed,
    Expired,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Active => "active",
            MatchStatus::MutualInterest => "mutual_interest",
            MatchStatus::Closed => "closed",
            MatchStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Closed | MatchStatus::Expired)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "active" => Ok(MatchStatus::Active),
            "mutual_interest" => Ok(MatchStatus::MutualInterest),
            "closed" => Ok(MatchStatus::Closed),
            "expired" => Ok(MatchStatus::Expired),
            other => Err(format!("unknown match status '{other}'")),
        }
    }
}

/// Which party completed a payment for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSide {
    Jobseeker,
    Recruiter,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("match is {0} and no longer accepts payments")]
    Terminal(MatchStatus),
}

/// The mutable, payment-driven part of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentState {
    pub jobseeker_paid: bool,
    pub recruiter_paid: bool,
    pub contact_unlocked: bool,
    pub status: MatchStatus,
}

impl PaymentState {
    #[cfg(test)]
    pub fn new_pending() -> Self {
        Self {
            jobseeker_paid: false,
            recruiter_paid: false,
            contact_unlocked: false,
            status: MatchStatus::Pending,
        }
    }

    /// Applies a confirmed payment.
    ///
    /// pending → active on the first paying side, active → mutual_interest
    /// once both sides have paid. Confirming an already-paid side is a no-op.
    pub fn apply_payment(self, side: PaymentSide) -> Result<Self, TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }

        let mut next = self;
        match side {
            PaymentSide::Jobseeker => next.jobseeker_paid = true,
            PaymentSide::Recruiter => next.recruiter_paid = true,
        }
        next.contact_unlocked = next.jobseeker_paid || next.recruiter_paid;
        next.status = if next.jobseeker_paid && next.recruiter_paid {
            MatchStatus::MutualInterest
        } else {
            MatchStatus::Active
        };
        Ok(next)
    }
}

/// A persisted row of the `matches` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRecord {
    pub id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub match_score: i32,
    pub skills_score: i32,
    pub experience_score: i32,
    pub location_score: i32,
    pub industry_score: i32,
    pub sa_context_score: i32,
    pub salary_score: i32,
    pub availability_score: i32,
    pub matched_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub match_reasons: Vec<String>,
    pub jobseeker_paid: bool,
    pub recruiter_paid: bool,
    pub contact_unlocked: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn payment_state(&self) -> Result<PaymentState, String> {
        Ok(PaymentState {
            jobseeker_paid: self.jobseeker_paid,
            recruiter_paid: self.recruiter_paid,
            contact_unlocked: self.contact_unlocked,
            status: self.status.parse()?,
        })
    }
}

/// Insert payload produced by the matching engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub job_id: i64,
    pub candidate_id: i64,
    pub match_score: i32,
    pub skills_score: i32,
    pub experience_score: i32,
    pub location_score: i32,
    pub industry_score: i32,
    pub sa_context_score: i32,
    pub salary_score: i32,
    pub availability_score: i32,
    pub matched_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub match_reasons: Vec<String>,
}

impl NewMatch {
    pub fn from_report(job_id: i64, candidate_id: i64, report: &CompatibilityReport) -> Self {
        let b = &report.breakdown;
        Self {
            job_id,
            candidate_id,
            match_score: i32::from(report.overall_score),
            skills_score: i32::from(b.skills),
            experience_score: i32::from(b.experience),
            location_score: i32::from(b.location),
            industry_score: i32::from(b.industry),
            sa_context_score: i32::from(b.sa_context),
            salary_score: i32::from(b.salary),
            availability_score: i32::from(b.availability),
            matched_skills: report.matched_skills.clone(),
            skill_gaps: report.skill_gaps.clone(),
            match_reasons: report.match_reasons.clone(),
        }
    }
}

/// A match joined with both parties, as read for the premium dashboards.
#[derive(Debug, Clone, FromRow)]
pub struct MatchListing {
    #[sqlx(flatten)]
    pub record: MatchRecord,
    pub job_title: String,
    pub employer_email: Option<String>,
    pub employer_phone: Option<String>,
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// What a dashboard user sees. Counterparty contact details are only
/// present once the viewing side has paid for the reveal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: i64,
    pub job_id: i64,
    pub job_title: String,
    pub candidate_id: i64,
    pub match_score: i32,
    pub matched_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub match_reasons: Vec<String>,
    pub status: String,
    pub jobseeker_paid: bool,
    pub recruiter_paid: bool,
    pub contact_unlocked: bool,
    pub contact: Option<ContactDetails>,
    pub created_at: DateTime<Utc>,
}

impl MatchSummary {
    pub fn for_recruiter(listing: MatchListing) -> Self {
        let contact = listing.record.recruiter_paid.then(|| ContactDetails {
            name: Some(listing.candidate_name.clone()),
            email: listing.candidate_email.clone(),
            phone: listing.candidate_phone.clone(),
        });
        Self::build(listing, contact)
    }

    pub fn for_jobseeker(listing: MatchListing) -> Self {
        let contact = listing.record.jobseeker_paid.then(|| ContactDetails {
            name: None,
            email: listing.employer_email.clone(),
            phone: listing.employer_phone.clone(),
        });
        Self::build(listing, contact)
    }

    fn build(listing: MatchListing, contact: Option<ContactDetails>) -> Self {
        let r = listing.record;
        Self {
            id: r.id,
            job_id: r.job_id,
            job_title: listing.job_title,
            candidate_id: r.candidate_id,
            match_score: r.match_score,
            matched_skills: r.matched_skills,
            skill_gaps: r.skill_gaps,
            match_reasons: r.match_reasons,
            status: r.status,
            jobseeker_paid: r.jobseeker_paid,
            recruiter_paid: r.recruiter_paid,
            contact_unlocked: r.contact_unlocked,
            contact,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(jobseeker_paid: bool, recruiter_paid: bool) -> MatchListing {
        MatchListing {
            record: MatchRecord {
                id: 1,
                job_id: 10,
                candidate_id: 20,
                match_score: 82,
                skills_score: 90,
                experience_score: 90,
                location_score: 100,
                industry_score: 60,
                sa_context_score: 60,
                salary_score: 65,
                availability_score: 70,
                matched_skills: vec!["SQL".to_string()],
                skill_gaps: vec![],
                match_reasons: vec![],
                jobseeker_paid,
                recruiter_paid,
                contact_unlocked: jobseeker_paid || recruiter_paid,
                status: "pending".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            job_title: "Data Analyst".to_string(),
            employer_email: Some("hr@acme.co.za".to_string()),
            employer_phone: None,
            candidate_name: "Thandi Nkosi".to_string(),
            candidate_email: Some("thandi@example.co.za".to_string()),
            candidate_phone: Some("+27 82 000 0000".to_string()),
        }
    }

    #[test]
    fn test_first_payment_activates_match() {
        let state = PaymentState::new_pending()
            .apply_payment(PaymentSide::Recruiter)
            .unwrap();
        assert_eq!(state.status, MatchStatus::Active);
        assert!(state.recruiter_paid);
        assert!(!state.jobseeker_paid);
        assert!(state.contact_unlocked);
    }

    #[test]
    fn test_both_payments_reach_mutual_interest() {
        let state = PaymentState::new_pending()
            .apply_payment(PaymentSide::Jobseeker)
            .and_then(|s| s.apply_payment(PaymentSide::Recruiter))
            .unwrap();
        assert_eq!(state.status, MatchStatus::MutualInterest);
    }

    #[test]
    fn test_repeat_payment_is_noop() {
        let once = PaymentState::new_pending()
            .apply_payment(PaymentSide::Jobseeker)
            .unwrap();
        let twice = once.apply_payment(PaymentSide::Jobseeker).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_terminal_match_rejects_payment() {
        let closed = PaymentState {
            status: MatchStatus::Expired,
            ..PaymentState::new_pending()
        };
        assert_eq!(
            closed.apply_payment(PaymentSide::Recruiter),
            Err(TransitionError::Terminal(MatchStatus::Expired))
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Active,
            MatchStatus::MutualInterest,
            MatchStatus::Closed,
            MatchStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<MatchStatus>(), Ok(status));
        }
        assert!("archived".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn test_recruiter_sees_contact_only_after_paying() {
        assert!(MatchSummary::for_recruiter(listing(true, false)).contact.is_none());

        let paid = MatchSummary::for_recruiter(listing(false, true));
        let contact = paid.contact.unwrap();
        assert_eq!(contact.name.as_deref(), Some("Thandi Nkosi"));
        assert_eq!(contact.email.as_deref(), Some("thandi@example.co.za"));
    }

    #[test]
    fn test_jobseeker_sees_employer_contact_only_after_paying() {
        assert!(MatchSummary::for_jobseeker(listing(false, true)).contact.is_none());

        let paid = MatchSummary::for_jobseeker(listing(true, false));
        assert_eq!(
            paid.contact.unwrap().email.as_deref(),
            Some("hr@acme.co.za")
        );
    }
}
