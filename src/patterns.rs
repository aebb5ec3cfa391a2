//! Pattern catalog: the fixed rule table and keyword lists the engine runs on.
//!
//! Rules are evaluated in table order and the first hit per category wins for
//! a segment, so specific phrasings sit above generic ones. Weights say how
//! unambiguous a trigger is. Adding a rule means adding a row here.
//!
//! Captures are named: `content` for decisions, `assignee`/`task` for action
//! items, `when` for the next meeting.

use crate::analysis::{ImpactLevel, Priority};
use lazy_static::lazy_static;
use regex::Regex;

/// Which record a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Decision,
    ActionItem,
    NextMeeting,
}

/// What the `assignee` capture of an action rule may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneePolicy {
    /// Only a person's name; anything else voids the match
    Name,
    /// A name, or a pronoun such as "we" which leaves the item unassigned
    NameOrPronoun,
}

#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub pattern: Regex,
    pub weight: f64,
    /// Set for action rules only
    pub assignee: Option<AssigneePolicy>,
}

/// Added once per secondary signal (deadline, date, named person).
pub const SIGNAL_BONUS: f64 = 0.05;

/// Decision content shorter than this is too vague to report.
pub const MIN_DECISION_CHARS: usize = 15;

const RULES: &[(&str, Category, &str, f64, Option<AssigneePolicy>)] = &[
    (
        "final-decision",
        Category::Decision,
        r"(?i)\bfinal\s+decision\b\s*(?:is|was)?\s*[:,-]?\s*(?:to\s+|that\s+)?(?P<content>.+)",
        0.95,
        None,
    ),
    (
        "we-decided",
        Category::Decision,
        r"(?i)\bwe(?:'ve|\s+have)?\s+(?:decided|agreed|concluded|determined)\s+(?:to|that|on)\s+(?P<content>.+)",
        0.9,
        None,
    ),
    (
        "it-was-decided",
        Category::Decision,
        r"(?i)\bit\s+was\s+(?:decided|agreed)\s+(?:to\s+|that\s+)?(?P<content>.+)",
        0.85,
        None,
    ),
    (
        "decision-label",
        Category::Decision,
        r"(?i)\b(?:decision|conclusion)\s*:\s*(?P<content>.+)",
        0.8,
        None,
    ),
    (
        "we-will-choose",
        Category::Decision,
        r"(?i)\bwe\s+will\s+(?:go\s+with|choose|select|implement)\s+(?P<content>.+)",
        0.8,
        None,
    ),
    (
        "agreed-that",
        Category::Decision,
        r"(?i)\b(?:agreed|consensus\s+is)\s+that\s+(?P<content>.+)",
        0.75,
        None,
    ),
    // "not approved" and friends are rejected by the negation check.
    (
        "approved",
        Category::Decision,
        r"(?i)\bapproved\s+(?P<content>.+)",
        0.7,
        None,
    ),
    (
        "maybe-we-should",
        Category::Decision,
        r"(?i)\b(?:maybe|perhaps)\s+we\s+should\s+(?P<content>.+)",
        0.4,
        None,
    ),
    (
        "action-item-label",
        Category::ActionItem,
        r"(?i)\baction\s+item\s*:\s*(?P<assignee>\w+)\s*[-:,]\s*(?P<task>.+)",
        0.9,
        Some(AssigneePolicy::NameOrPronoun),
    ),
    (
        "will-own",
        Category::ActionItem,
        r"(?i)\b(?P<assignee>\w+)\s+(?:will\s+own|owns|will\s+take|takes)\s+(?P<task>.+)",
        0.9,
        Some(AssigneePolicy::Name),
    ),
    (
        "to-by",
        Category::ActionItem,
        r"(?i)\b(?P<assignee>\w+)\s+to\s+(?P<task>.+?)\s+by\s+\S.*",
        0.9,
        Some(AssigneePolicy::Name),
    ),
    (
        "responsible-for",
        Category::ActionItem,
        r"(?i)\b(?P<assignee>\w+)\s+is\s+responsible\s+for\s+(?P<task>.+)",
        0.85,
        Some(AssigneePolicy::Name),
    ),
    (
        "modal",
        Category::ActionItem,
        r"(?i)\b(?P<assignee>\w+)\s+(?:will|should|needs\s+to|must|has\s+to|have\s+to)\s+(?P<task>.+)",
        0.8,
        Some(AssigneePolicy::NameOrPronoun),
    ),
    (
        "assign-to",
        Category::ActionItem,
        r"(?i)\bassign(?:ed)?\s+(?P<assignee>\w+)\s+to\s+(?P<task>.+)",
        0.7,
        Some(AssigneePolicy::Name),
    ),
    (
        "next-meeting",
        Category::NextMeeting,
        r"(?i)\bnext\s+(?:meeting|sync|call|check-?in|session)\s*[:-]?\s*(?:is\s+|will\s+be\s+)?(?:scheduled\s+|set\s+|planned\s+)?(?:for\s+|on\s+|at\s+)?(?P<when>.+)",
        0.9,
        None,
    ),
    (
        "follow-up-meeting",
        Category::NextMeeting,
        r"(?i)\bfollow[\s-]?up\s+(?:meeting|call)\s+(?:is\s+|will\s+be\s+)?(?:scheduled\s+)?(?:for\s+|on\s+|at\s+)?(?P<when>.+)",
        0.75,
        None,
    ),
    (
        "meet-again",
        Category::NextMeeting,
        r"(?i)\b(?:reconvene|meet\s+again)\s+(?:on\s+|at\s+)?(?P<when>.+)",
        0.7,
        None,
    ),
];

lazy_static! {
    /// Compiled catalog, in evaluation order.
    pub static ref CATALOG: Vec<Rule> = RULES
        .iter()
        .map(|(name, category, pattern, weight, assignee)| Rule {
            name: *name,
            category: *category,
            pattern: Regex::new(pattern).unwrap(),
            weight: *weight,
            assignee: *assignee,
        })
        .collect();
}

pub const PRIORITY_KEYWORDS: &[(Priority, &[&str])] = &[
    (
        Priority::Critical,
        &["urgent", "asap", "critical", "emergency", "immediately", "blocker"],
    ),
    (
        Priority::High,
        &["important", "priority", "must", "required", "essential"],
    ),
    (
        Priority::Medium,
        &["should", "recommended", "preferred", "consider"],
    ),
    (Priority::Low, &["could", "maybe", "optional", "nice to have"]),
];

pub const IMPACT_KEYWORDS: &[(ImpactLevel, &[&str])] = &[
    (
        ImpactLevel::High,
        &[
            "budget",
            "hire",
            "fire",
            "strategy",
            "strategic",
            "launch",
            "cancel",
            "major",
            "critical",
            "acquisition",
        ],
    ),
    (
        ImpactLevel::Low,
        &["minor", "small", "cosmetic", "trivial", "typo"],
    ),
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "great",
    "excellent",
    "perfect",
    "amazing",
    "successful",
    "good",
    "happy",
    "pleased",
    "awesome",
    "progress",
    "on track",
    "well done",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "problem", "problems", "issue", "issues", "concern", "concerns", "delay", "delays", "blocker",
    "blockers", "risk", "risks", "failed", "behind", "worried", "broken", "bad",
];

pub const RISK_KEYWORDS: &[&str] = &[
    "delay", "delays", "blocker", "blockers", "issue", "issues", "problem", "problems", "concern",
    "concerns", "risk", "risks",
];
