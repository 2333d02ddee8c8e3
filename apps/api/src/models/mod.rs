pub mod candidate;
pub mod job;
pub mod match_record;

pub use candidate::CandidateProfile;
pub use job::{JobPosting, JobRequirements};
pub use match_record::{MatchRecord, NewMatch, PaymentSide};
