//! The extraction engine.
//!
//! [`analyze`] is a pure function of the transcript text and the static
//! [`CATALOG`]: segment, scan every segment against every rule, score and
//! parse each hit, merge duplicates, and bundle the lot into an
//! [`AnalysisResult`]. It never fails; a transcript with no recognisable
//! structure simply yields empty sequences.

use crate::analysis::{
    ActionItem, AnalysisResult, Decision, ImpactLevel, MeetingMetadata, NextMeeting, Priority,
    Sentiment, SentimentSummary,
};
use crate::patterns::{
    AssigneePolicy, Category, Rule, CATALOG, IMPACT_KEYWORDS, MIN_DECISION_CHARS,
    NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, PRIORITY_KEYWORDS, RISK_KEYWORDS, SIGNAL_BONUS,
};
use crate::text::{self, clean_fragment, count_phrases, has_phrase};
use crate::transcript::segment;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref PURPOSE_CLAUSE: Regex =
        Regex::new(r"(?i)(?:^|\s+)(?:to|so\s+that|in\s+order\s+to)\s+").unwrap();
}

/// Analyze a transcript and extract decisions, action items, the next
/// meeting, sentiment, risks and attendees.
pub fn analyze(transcript: &str) -> AnalysisResult {
    let segments = segment(transcript);

    let mut decisions = Vec::new();
    let mut action_items = Vec::new();
    let mut meetings = Vec::new();
    let mut sentiment = SentimentSummary::default();
    let mut risks = Vec::new();
    let mut metadata = MeetingMetadata {
        segment_count: segments.len(),
        ..Default::default()
    };

    for (index, seg) in segments.iter().enumerate() {
        let words = text::words(seg);
        let mut matched: Vec<Category> = Vec::with_capacity(3);

        for rule in CATALOG.iter() {
            if matched.contains(&rule.category) {
                continue;
            }
            let hit = match rule.category {
                Category::Decision => first_hit(rule, seg, |caps| {
                    decision_from(rule, caps, seg, &words)
                })
                .map(|d| decisions.push(d)),
                Category::ActionItem => {
                    first_hit(rule, seg, |caps| action_from(rule, caps, seg, &words))
                        .map(|a| action_items.push(a))
                }
                Category::NextMeeting => {
                    first_hit(rule, seg, |caps| meeting_from(rule, caps)).map(|m| meetings.push(m))
                }
            };
            if hit.is_none() {
                continue;
            }

            log::debug!("segment {} matched rule {}", index, rule.name);
            matched.push(rule.category);
        }

        sentiment.record(classify_sentiment(&words));

        if RISK_KEYWORDS.iter().any(|k| has_phrase(&words, k)) {
            risks.push(seg.clone());
        }

        metadata.attendees.extend(text::extract_names(seg));
    }

    let result = AnalysisResult {
        decisions: merge_duplicates(
            decisions,
            |d| text::normalize(&d.content),
            |d| d.confidence,
            |keep, other| keep.stakeholders.extend(other.stakeholders.iter().cloned()),
        ),
        action_items: merge_duplicates(
            action_items,
            |a| text::normalize(&a.task),
            |a| a.confidence,
            |_, _| {},
        ),
        next_meeting: select_next_meeting(meetings),
        sentiment,
        risks,
        metadata,
    };

    log::debug!(
        "analysed {} segments: {} decisions, {} action items, next meeting {}",
        result.metadata.segment_count,
        result.decisions.len(),
        result.action_items.len(),
        if result.next_meeting.is_some() {
            "found"
        } else {
            "not found"
        }
    );

    result
}

/// Base weight plus one bonus per secondary signal, capped at 1.0 and
/// rounded to two decimals.
fn score(weight: f64, signals: usize) -> f64 {
    let raw = (weight + SIGNAL_BONUS * signals as f64).clamp(0.0, 1.0);
    (raw * 100.0).round() / 100.0
}

/// Run a rule over a segment until one of its matches yields a record.
///
/// A rejected match (say, "the demo should ...") must not hide a later one
/// ("... and Tom needs to ..."), so the search resumes one character past
/// where the rejected match began.
fn first_hit<T>(
    rule: &Rule,
    seg: &str,
    mut extract: impl FnMut(&Captures) -> Option<T>,
) -> Option<T> {
    let mut start = 0;
    while let Some(caps) = rule.pattern.captures_at(seg, start) {
        if let Some(record) = extract(&caps) {
            return Some(record);
        }
        let begin = caps.get(0)?.start();
        let step = seg[begin..].chars().next()?.len_utf8();
        start = begin + step;
    }
    None
}

fn decision_from(rule: &Rule, caps: &Captures, seg: &str, words: &[String]) -> Option<Decision> {
    // "not approved", "never decided to": the trigger is negated.
    if text::preceded_by_negation(seg, caps.get(0)?.start()) {
        return None;
    }

    let content = clean_fragment(caps.name("content")?.as_str());
    if content.chars().count() < MIN_DECISION_CHARS {
        return None;
    }

    let stakeholders = text::extract_names(seg);
    let signals = usize::from(!stakeholders.is_empty());

    Some(Decision {
        content,
        impact_level: assess_impact(words),
        confidence: score(rule.weight, signals),
        stakeholders,
    })
}

fn action_from(rule: &Rule, caps: &Captures, seg: &str, words: &[String]) -> Option<ActionItem> {
    let raw_assignee = caps.name("assignee")?.as_str();
    let assignee = if text::is_name(raw_assignee) {
        Some(raw_assignee.to_string())
    } else if rule.assignee == Some(AssigneePolicy::NameOrPronoun)
        && text::is_pronoun(raw_assignee)
    {
        None
    } else {
        return None;
    };

    let task_match = caps.name("task")?;
    let deadline = text::extract_deadline(seg);

    // A deadline inside the task capture is reported separately.
    let task_end = match &deadline {
        Some(d) if d.start > task_match.start() && d.start < task_match.end() => d.start,
        _ => task_match.end(),
    };
    let task = clean_fragment(&seg[task_match.start()..task_end]);
    if task.len() < 3 {
        return None;
    }

    let signals = usize::from(deadline.is_some()) + usize::from(assignee.is_some());

    Some(ActionItem {
        assignee,
        task,
        priority: assess_priority(words),
        deadline: deadline.map(|d| d.when),
        confidence: score(rule.weight, signals),
    })
}

fn meeting_from(rule: &Rule, caps: &Captures) -> Option<NextMeeting> {
    let raw = clean_fragment(caps.name("when")?.as_str());
    let when = match PURPOSE_CLAUSE.find(&raw) {
        Some(m) => raw[..m.start()].trim().to_string(),
        None => raw,
    };
    // "the next session starts" names no date, so it is not a meeting time.
    if when.is_empty() || !text::has_date_expression(&when) {
        return None;
    }

    // The date itself counts as one signal, a time of day as another.
    let signals = 1 + usize::from(text::has_clock_time(&when));
    Some(NextMeeting {
        confidence: score(rule.weight, signals),
        when,
    })
}

fn assess_impact(words: &[String]) -> ImpactLevel {
    IMPACT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_phrase(words, k)))
        .map(|(level, _)| *level)
        .unwrap_or(ImpactLevel::Medium)
}

fn assess_priority(words: &[String]) -> Priority {
    PRIORITY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_phrase(words, k)))
        .map(|(priority, _)| *priority)
        .unwrap_or(Priority::Medium)
}

fn classify_sentiment(words: &[String]) -> Sentiment {
    let positive = count_phrases(words, POSITIVE_KEYWORDS);
    let negative = count_phrases(words, NEGATIVE_KEYWORDS);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Highest confidence wins; the earliest candidate wins a tie.
fn select_next_meeting(candidates: Vec<NextMeeting>) -> Option<NextMeeting> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(b) if b.confidence >= candidate.confidence => Some(b),
        _ => Some(candidate),
    })
}

/// Collapse records sharing a key. The merged record keeps the position of
/// the first occurrence and the fields of the most confident one.
fn merge_duplicates<T>(
    records: Vec<T>,
    key: impl Fn(&T) -> String,
    confidence: impl Fn(&T) -> f64,
    absorb: impl Fn(&mut T, &T),
) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let k = key(&record);
        match positions.get(&k).copied() {
            Some(idx) => {
                let existing = &mut merged[idx];
                if confidence(&record) > confidence(existing) {
                    let mut record = record;
                    absorb(&mut record, existing);
                    *existing = record;
                } else {
                    absorb(existing, &record);
                }
            }
            None => {
                positions.insert(k, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::DEMO_TRANSCRIPT;

    const SCENARIO: &str = "Sarah said: we decided to launch the new pricing page. \
        Mike will own the security audit by Friday. Next meeting is scheduled for Monday.";

    #[test]
    fn test_end_to_end_scenario() {
        let result = analyze(SCENARIO);

        assert_eq!(result.decisions.len(), 1);
        let decision = &result.decisions[0];
        assert!(decision.content.contains("launch the new pricing page"));
        assert!(decision.stakeholders.contains("Sarah"));
        assert!(decision.confidence > 0.0);

        assert_eq!(result.action_items.len(), 1);
        let action = &result.action_items[0];
        assert_eq!(action.assignee.as_deref(), Some("Mike"));
        assert!(action.task.contains("security audit"));
        assert!(action.deadline.as_deref().unwrap().contains("Friday"));
        assert!(action.confidence > 0.0);

        let next = result.next_meeting.as_ref().unwrap();
        assert!(next.when.contains("Monday"));
        assert!(next.confidence > 0.0);
    }

    #[test]
    fn test_scenario_scores() {
        let result = analyze(SCENARIO);
        assert_eq!(result.decisions[0].confidence, 0.95);
        assert_eq!(result.action_items[0].confidence, 1.0);
        assert_eq!(result.action_items[0].task, "the security audit");
        assert_eq!(result.next_meeting.unwrap().confidence, 0.95);
    }

    #[test]
    fn test_empty_input() {
        let result = analyze("");
        assert!(result.decisions.is_empty());
        assert!(result.action_items.is_empty());
        assert!(result.next_meeting.is_none());
        assert_eq!(result.sentiment.total(), 0);
        assert_eq!(result.metadata.segment_count, 0);
    }

    #[test]
    fn test_no_match_degrades_gracefully() {
        let result = analyze("Hello everyone. Thanks for joining today.\nLet us get started.");
        assert!(result.decisions.is_empty());
        assert!(result.action_items.is_empty());
        assert!(result.next_meeting.is_none());
        assert!(result.risks.is_empty());
        assert_eq!(result.sentiment.neutral, 3);
        assert_eq!(result.sentiment.total(), 3);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(analyze(DEMO_TRANSCRIPT), analyze(DEMO_TRANSCRIPT));
        assert_eq!(analyze(SCENARIO), analyze(SCENARIO));
    }

    #[test]
    fn test_confidence_bounds() {
        let result = analyze(DEMO_TRANSCRIPT);
        let confidences = result
            .decisions
            .iter()
            .map(|d| d.confidence)
            .chain(result.action_items.iter().map(|a| a.confidence))
            .chain(result.next_meeting.iter().map(|m| m.confidence));
        for c in confidences {
            assert!((0.0..=1.0).contains(&c), "confidence {} out of range", c);
        }
    }

    /// One sentence per catalog rule, each carrying every secondary signal
    /// its category can score.
    const EVERY_RULE: &[&str] = &[
        "Final decision: Priya ships the billing revamp",
        "Priya says we decided to ship the billing revamp",
        "It was agreed that Priya ships the billing revamp",
        "Decision: Priya ships the billing revamp",
        "We will go with Priya's billing revamp plan",
        "Everyone agreed that Priya ships the billing revamp",
        "Approved the billing revamp for Priya",
        "Maybe we should let Priya ship the billing revamp",
        "Action item: Priya - ship the billing revamp by Friday",
        "Priya will own the billing revamp by Friday",
        "Priya to ship the billing revamp by Friday",
        "Priya is responsible for the billing revamp by Friday",
        "Priya must ship the billing revamp by Friday",
        "Assign Priya to the billing revamp",
        "Next meeting is on Monday at 10 AM",
        "Follow-up meeting on Tuesday at 3 PM",
        "Let's meet again on Thursday at 9 AM",
    ];

    #[test]
    fn test_confidence_capped_for_every_category() {
        for rule in CATALOG.iter() {
            assert!(
                EVERY_RULE.iter().any(|s| rule.pattern.is_match(s)),
                "no sample sentence for rule {}",
                rule.name
            );
        }

        let mut decisions = Vec::new();
        let mut actions = Vec::new();
        let mut meetings = Vec::new();
        for sentence in EVERY_RULE {
            let result = analyze(sentence);
            decisions.extend(result.decisions.iter().map(|d| d.confidence));
            actions.extend(result.action_items.iter().map(|a| a.confidence));
            meetings.extend(result.next_meeting.iter().map(|m| m.confidence));
        }

        for c in decisions.iter().chain(&actions).chain(&meetings) {
            assert!((0.0..=1.0).contains(c), "confidence {} out of range", c);
        }
        let max = |v: &[f64]| v.iter().cloned().fold(0.0, f64::max);
        assert_eq!(max(&decisions[..]), 1.0);
        assert_eq!(max(&actions[..]), 1.0);
        assert_eq!(max(&meetings[..]), 1.0);
        assert_eq!(meetings.len(), 3);
    }

    #[test]
    fn test_score_clamps_above_one() {
        assert_eq!(score(0.95, 2), 1.0);
        assert_eq!(score(0.9, 0), 0.9);
        assert_eq!(score(0.85, 1), 0.9);
    }

    #[test]
    fn test_duplicate_decisions_merge_stakeholders() {
        let result = analyze(
            "Sarah: we decided to launch the new pricing page.\n\
             Tom: we decided to launch the new pricing page.",
        );
        assert_eq!(result.decisions.len(), 1);
        let stakeholders: Vec<_> = result.decisions[0].stakeholders.iter().collect();
        assert_eq!(stakeholders, vec!["Sarah", "Tom"]);
    }

    #[test]
    fn test_duplicate_keeps_most_confident_in_first_position() {
        let result = analyze(
            "Approved the vendor contract renewal. \
             We agreed to hire two engineers. \
             Final decision: the vendor contract renewal.",
        );
        assert_eq!(result.decisions.len(), 2);
        assert_eq!(result.decisions[0].content, "the vendor contract renewal");
        assert_eq!(result.decisions[0].confidence, 0.95);
        assert_eq!(result.decisions[1].content, "hire two engineers");
    }

    #[test]
    fn test_decisions_keep_transcript_order() {
        let result = analyze(
            "Approved the vendor contract renewal. Final decision: adopt the quarterly roadmap.",
        );
        assert_eq!(result.decisions.len(), 2);
        assert!(result.decisions[0].content.contains("vendor contract"));
        assert!(result.decisions[1].content.contains("quarterly roadmap"));
        assert!(result.decisions[0].confidence < result.decisions[1].confidence);
    }

    #[test]
    fn test_one_record_per_category_per_segment() {
        // Matches both "we-decided" and "agreed-that"; only the first counts.
        let result = analyze("We agreed that the release train moves to the afternoon");
        assert_eq!(result.decisions.len(), 1);
        assert_eq!(result.decisions[0].confidence, 0.9);
    }

    #[test]
    fn test_short_decision_is_ignored() {
        assert!(analyze("We decided to wait").decisions.is_empty());
    }

    #[test]
    fn test_impact_levels() {
        let high = analyze("We decided to cancel the offsite event");
        assert_eq!(high.decisions[0].impact_level, ImpactLevel::High);

        let low = analyze("We agreed to fix the small typo in the footer");
        assert_eq!(low.decisions[0].impact_level, ImpactLevel::Low);

        let medium = analyze("We decided to move standups to the afternoon");
        assert_eq!(medium.decisions[0].impact_level, ImpactLevel::Medium);
    }

    #[test]
    fn test_priority_tiers() {
        let result = analyze("Mike must fix the login outage immediately");
        assert_eq!(result.action_items[0].priority, Priority::Critical);

        let result = analyze("Priya must update the onboarding guide");
        assert_eq!(result.action_items[0].priority, Priority::High);

        let result = analyze("Priya will tidy the wiki, it's optional");
        assert_eq!(result.action_items[0].priority, Priority::Low);

        let result = analyze("Priya will tidy the wiki");
        assert_eq!(result.action_items[0].priority, Priority::Medium);
    }

    #[test]
    fn test_pronoun_leaves_action_unassigned() {
        let result = analyze("We should consider moving the standup");
        assert_eq!(result.action_items.len(), 1);
        let action = &result.action_items[0];
        assert_eq!(action.assignee, None);
        assert_eq!(action.task, "consider moving the standup");
        assert_eq!(action.confidence, 0.8);
    }

    #[test]
    fn test_non_name_subject_is_not_an_action() {
        let result = analyze("The weather will improve soon");
        assert!(result.action_items.is_empty());
    }

    #[test]
    fn test_later_named_assignee_is_found() {
        let result = analyze("the demo should go well, and Tom needs to book the room");
        assert_eq!(result.action_items.len(), 1);
        let action = &result.action_items[0];
        assert_eq!(action.assignee.as_deref(), Some("Tom"));
        assert_eq!(action.task, "book the room");
    }

    #[test]
    fn test_negated_approval_is_not_a_decision() {
        assert!(analyze("Budget not approved yet because finance has concerns")
            .decisions
            .is_empty());
        assert!(analyze("The board never approved the relocation budget")
            .decisions
            .is_empty());
        assert!(analyze("The vendor hasn't approved the revised contract terms")
            .decisions
            .is_empty());

        let result = analyze("Finance approved the new hiring budget for Q3");
        assert_eq!(result.decisions.len(), 1);
        assert_eq!(result.decisions[0].content, "the new hiring budget for Q3");
    }

    #[test]
    fn test_to_by_rule() {
        let result = analyze("Priya to send the revised deck by Thursday");
        let action = &result.action_items[0];
        assert_eq!(action.assignee.as_deref(), Some("Priya"));
        assert_eq!(action.task, "send the revised deck");
        assert_eq!(action.deadline.as_deref(), Some("Thursday"));
    }

    #[test]
    fn test_next_meeting_prefers_confidence() {
        let result = analyze("We could meet again on Thursday. Next meeting is on Monday.");
        assert_eq!(result.next_meeting.unwrap().when, "Monday");
    }

    #[test]
    fn test_next_meeting_tie_goes_to_earliest() {
        let result = analyze("Next meeting is Monday. Next meeting is Tuesday.");
        assert_eq!(result.next_meeting.unwrap().when, "Monday");
    }

    #[test]
    fn test_next_meeting_drops_purpose_clause() {
        let result = analyze("Next meeting scheduled for next Tuesday at 10 AM to review progress");
        assert_eq!(result.next_meeting.unwrap().when, "next Tuesday at 10 AM");
    }

    #[test]
    fn test_next_meeting_needs_a_date() {
        let result = analyze(
            "Follow-up call on Thursday at 3 PM. \
             I will share notes before the next session starts.",
        );
        let next = result.next_meeting.unwrap();
        assert_eq!(next.when, "Thursday at 3 PM");
        assert_eq!(next.confidence, 0.85);

        assert!(analyze("Next meeting to review the budget").next_meeting.is_none());
        assert!(analyze("We should meet again when everyone is back")
            .next_meeting
            .is_none());
    }

    #[test]
    fn test_sentiment_buckets() {
        let result = analyze(
            "Great progress on the beta. We hit a blocker with the vendor. \
             The demo was good but there is a delay.",
        );
        assert_eq!(result.sentiment.positive, 1);
        assert_eq!(result.sentiment.negative, 1);
        assert_eq!(result.sentiment.neutral, 1);
    }

    #[test]
    fn test_risks_and_attendees() {
        let result = analyze(
            "Sarah: the migration is on track.\nDaniel: there is a risk of delay on the API.",
        );
        assert_eq!(result.risks, vec!["Daniel: there is a risk of delay on the API"]);
        let attendees: Vec<_> = result.metadata.attendees.iter().collect();
        assert_eq!(attendees, vec!["Daniel", "Sarah"]);
        assert_eq!(result.metadata.segment_count, 2);
    }

    #[test]
    fn test_demo_transcript() {
        let result = analyze(DEMO_TRANSCRIPT);
        assert!(result.decisions.len() >= 4);
        assert!(result
            .decisions
            .iter()
            .any(|d| d.impact_level == ImpactLevel::High));

        let mike = result
            .action_items
            .iter()
            .find(|a| a.assignee.as_deref() == Some("Mike"))
            .unwrap();
        assert_eq!(mike.task, "conduct security audit");
        assert_eq!(mike.priority, Priority::Critical);
        assert_eq!(mike.deadline.as_deref(), Some("end of week"));

        assert!(result.next_meeting.unwrap().when.contains("Tuesday"));
        assert!(!result.risks.is_empty());
    }
}
