pub mod client;
pub mod prompt;

pub use client::{
    summarize, GeminiClient, NarrativeConfig, NarrativeSummary, RetryPolicy, TextGenerator,
};
pub use prompt::build_prompt;
