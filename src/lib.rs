//! # Minutes
//!
//! Rule-based meeting intelligence: turns a raw transcript into decisions,
//! action items, the next meeting date and a sentiment summary.
//!
//! ## Features
//!
//! - **Structured Intelligence**: Returns a typed `AnalysisResult` with confidence-scored records
//! - **Deterministic**: A fixed pattern catalog, no model, same input gives the same output
//! - **Report Ready**: Terminal, HTML email and JSON renderings of every analysis

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod patterns;
pub mod report;
pub mod sanitize;
pub mod text;
pub mod transcript;

pub use analysis::{
    ActionItem, AnalysisResult, Decision, ImpactLevel, NextMeeting, Priority, SentimentSummary,
};
pub use analyzer::analyze;
pub use config::{Config, Format};
pub use transcript::Transcript;
