//! Text heuristics shared by the extraction passes.
//!
//! Name detection, deadline capture and keyword lookup are approximate on
//! purpose: they mirror how people write meeting notes, not a grammar.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref NAME_TOKEN: Regex = Regex::new(r"\b[A-Z][a-z]+\b").unwrap();
    static ref DEADLINE: Regex = Regex::new(
        r"(?ix)
        \b(?:by|due(?:\s+on|\s+by)?|before|until|no\s+later\s+than|deadline(?:\s+is)?:?)\s+
        (?P<when>
            (?:the\s+)?end\s+of\s+(?:the\s+)?(?:day|week|month|quarter|year|sprint)
          | (?:next|this)\s+(?:week|month|quarter|sprint|year|[a-z]+day)
          | tomorrow | tonight | eod | eow
          | q[1-4]
          | \d{4}-\d{2}-\d{2}
          | \d{1,2}/\d{1,2}(?:/\d{2,4})?
          | (?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{1,2}(?:st|nd|rd|th)?
          | [a-z]+day
        )\b"
    )
    .unwrap();
    static ref DATE_EXPRESSION: Regex = Regex::new(
        r"(?ix)
        \b(?:
            (?:mon|tues|wednes|thurs|fri|satur|sun)day
          | tomorrow
          | (?:next|this)\s+(?:week|month|quarter)
          | (?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{1,2}
          | \d{1,2}(?::\d{2})?\s*(?:am|pm)
          | \d{1,2}:\d{2}
          | \d{4}-\d{2}-\d{2}
          | \d{1,2}/\d{1,2}(?:/\d{2,4})?
        )\b"
    )
    .unwrap();
    static ref CLOCK_TIME: Regex =
        Regex::new(r"(?i)\b(?:\d{1,2}(?::\d{2})?\s*(?:am|pm)|\d{1,2}:\d{2}|noon)\b").unwrap();
}

/// Words that flip a decision trigger into its opposite.
const NEGATIONS: &[&str] = &["not", "never", "no"];

/// Capitalized words that are never a person's name.
const NOT_NAMES: &[&str] = &[
    "A", "Action", "After", "Agreed", "All", "Also", "An", "And", "Any", "Approved", "As", "At",
    "Before", "But", "By", "Conclusion", "Decision", "Due", "Everyone", "Final", "For", "From",
    "He", "Her", "His", "However", "If", "In", "It", "Item", "Its", "Let", "Lets", "Maybe", "Meeting",
    "My", "Next", "No", "Not", "Now", "Of", "Ok", "Okay", "On", "Our", "Please", "Risk", "She",
    "So", "Team", "Thanks", "That", "The", "Their", "Then", "There", "These", "They", "This",
    "To", "Today", "Tomorrow", "We", "Well", "What", "When", "Where", "Which", "Who", "Why",
    "Will", "With", "Yes", "You", "Your", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
    "Saturday", "Sunday", "January", "February", "March", "April", "May", "June", "July",
    "August", "September", "October", "November", "December",
];

/// Words that take on a task without naming anyone.
const PRONOUNS: &[&str] = &["i", "we", "you", "they", "team", "everyone", "someone"];

/// Lowercase, collapse whitespace and drop trailing punctuation.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// Trim whitespace plus stray punctuation a regex capture tends to drag along.
pub fn clean_fragment(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-' | '"' | '\''))
        .trim()
        .to_string()
}

/// Lowercase word tokens, apostrophes kept.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Whole-word match of a keyword or multi-word phrase against pre-split words.
pub fn has_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
}

pub fn count_phrases(words: &[String], phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| has_phrase(words, p)).count()
}

pub fn is_name(token: &str) -> bool {
    let mut chars = token.chars();
    let capitalized = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && token.len() > 1
        && chars.all(|c| c.is_ascii_lowercase());
    capitalized && !NOT_NAMES.contains(&token)
}

pub fn is_pronoun(token: &str) -> bool {
    PRONOUNS.contains(&token.to_lowercase().as_str())
}

/// Capitalized tokens that look like people.
pub fn extract_names(text: &str) -> BTreeSet<String> {
    NAME_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| is_name(t))
        .map(str::to_string)
        .collect()
}

/// A deadline phrase and the byte offset where its trigger word starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    pub when: String,
    pub start: usize,
}

pub fn extract_deadline(text: &str) -> Option<Deadline> {
    let caps = DEADLINE.captures(text)?;
    let whole = caps.get(0)?;
    let when = caps.name("when")?;
    Some(Deadline {
        when: when.as_str().to_string(),
        start: whole.start(),
    })
}

/// Whether the text mentions something that reads like a date or time.
pub fn has_date_expression(text: &str) -> bool {
    DATE_EXPRESSION.is_match(text)
}

/// Whether the text names a time of day ("10 AM", "14:30", "noon").
pub fn has_clock_time(text: &str) -> bool {
    CLOCK_TIME.is_match(text)
}

/// Whether the word right before byte offset `pos` negates what follows.
pub fn preceded_by_negation(text: &str, pos: usize) -> bool {
    let Some(before) = text.get(..pos) else {
        return false;
    };
    match words(&before.replace('\u{2019}', "'")).last() {
        Some(word) => NEGATIONS.contains(&word.as_str()) || word.ends_with("n't"),
        None => false,
    }
}
