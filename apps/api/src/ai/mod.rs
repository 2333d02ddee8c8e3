//! Optional LLM enrichment. Every call returns `Result<_, AiError>`; callers
//! decide the fallback.

pub mod analyzer;
pub mod llm_client;
pub mod prompts;

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub use analyzer::{AiAnalyzer, LlmAnalyzer};
pub use llm_client::{LlmClient, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Xai,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Xai => "xai",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
            AiProvider::Xai => "https://api.x.ai/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Xai => "grok-2-latest",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OPENAI_API_KEY",
            AiProvider::Xai => "XAI_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "xai" | "grok" => Ok(AiProvider::Xai),
            other => Err(format!("unknown AI provider '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("malformed AI response: {0}")]
    Malformed(String),

    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),
}
