pub mod engine;
pub mod handlers;
pub mod payments;
pub mod ranking;

pub use engine::{MatchingEngine, MatchingSettings};
pub use ranking::CandidateRanking;
