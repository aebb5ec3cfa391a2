//! Analysis records - the structured output of the extraction engine.
//!
//! Everything presentation needs crosses over in an [`AnalysisResult`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How far-reaching a decision is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// Urgency tier of an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// Sentiment bucket a single segment falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A decision taken during the meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    /// What was decided, with the trigger phrase stripped
    pub content: String,
    pub impact_level: ImpactLevel,
    /// Estimated reliability in `[0, 1]`
    pub confidence: f64,
    /// People named alongside the decision
    pub stakeholders: BTreeSet<String>,
}

/// A task someone (or the team) took on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionItem {
    /// Named owner, `None` when the task was taken by "we", "I" and the like
    pub assignee: Option<String>,
    pub task: String,
    pub priority: Priority,
    /// Free-text date expression such as "Friday" or "end of week"
    pub deadline: Option<String>,
    pub confidence: f64,
}

/// When the group plans to meet again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NextMeeting {
    /// Raw date/time expression as written in the transcript
    pub when: String,
    pub confidence: f64,
}

/// Per-bucket segment counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Sentiment shares in percent, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentSummary {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Shares of each bucket. All zero for an empty transcript.
    pub fn percentages(&self) -> SentimentShares {
        let total = self.total().max(1) as f64;
        let pct = |n: usize| (n as f64 / total * 1000.0).round() / 10.0;
        SentimentShares {
            positive: pct(self.positive),
            neutral: pct(self.neutral),
            negative: pct(self.negative),
        }
    }
}

/// Who showed up and how long the transcript was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MeetingMetadata {
    pub attendees: BTreeSet<String>,
    pub segment_count: usize,
}

/// Headline numbers for dashboards and the email header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryStats {
    pub total_decisions: usize,
    pub high_impact_decisions: usize,
    pub total_actions: usize,
    pub critical_actions: usize,
    /// Mean decision confidence, two decimals
    pub avg_confidence: f64,
}

/// Complete output of one transcript analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// In transcript order
    pub decisions: Vec<Decision>,
    /// In transcript order
    pub action_items: Vec<ActionItem>,
    pub next_meeting: Option<NextMeeting>,
    pub sentiment: SentimentSummary,
    /// Segments that flag a risk, in transcript order
    pub risks: Vec<String>,
    pub metadata: MeetingMetadata,
}

impl AnalysisResult {
    /// Check if nothing structured was found
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty() && self.action_items.is_empty() && self.next_meeting.is_none()
    }

    /// Action item counts per priority, most urgent first
    pub fn priority_distribution(&self) -> Vec<(Priority, usize)> {
        [Priority::Critical, Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|p| (p, self.action_items.iter().filter(|a| a.priority == p).count()))
            .collect()
    }

    /// Decision counts per impact level, highest first
    pub fn impact_distribution(&self) -> Vec<(ImpactLevel, usize)> {
        [ImpactLevel::High, ImpactLevel::Medium, ImpactLevel::Low]
            .into_iter()
            .map(|l| (l, self.decisions.iter().filter(|d| d.impact_level == l).count()))
            .collect()
    }

    pub fn stats(&self) -> SummaryStats {
        let avg_confidence = if self.decisions.is_empty() {
            0.0
        } else {
            let sum: f64 = self.decisions.iter().map(|d| d.confidence).sum();
            (sum / self.decisions.len() as f64 * 100.0).round() / 100.0
        };

        SummaryStats {
            total_decisions: self.decisions.len(),
            high_impact_decisions: self
                .decisions
                .iter()
                .filter(|d| d.impact_level == ImpactLevel::High)
                .count(),
            total_actions: self.action_items.len(),
            critical_actions: self
                .action_items
                .iter()
                .filter(|a| a.priority == Priority::Critical)
                .count(),
            avg_confidence,
        }
    }
}
