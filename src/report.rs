//! Report rendering: terminal text, HTML email and JSON export.
//!
//! Renderers only read an [`AnalysisResult`]; they never re-inspect the
//! transcript. Text and HTML honour the list limits in [`ReportOptions`],
//! the JSON export always carries everything.

use crate::analysis::{AnalysisResult, ImpactLevel, Priority, SentimentShares, SummaryStats};
use crate::config::{Format, ReportConfig};
use crate::sanitize::{self, html_escape};
use chrono::{DateTime, Local};
use colored::Colorize;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to format report: {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("failed to serialize report: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// What goes into a rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub title: String,
    pub max_decisions: usize,
    pub max_actions: usize,
    pub max_risks: usize,
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            max_decisions: config.max_decisions,
            max_actions: config.max_actions,
            max_risks: config.max_risks,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

/// Downloadable JSON document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Export {
    pub title: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub stats: SummaryStats,
    pub sentiment_shares: SentimentShares,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// Render a report in the requested format
pub fn render(
    result: &AnalysisResult,
    options: &ReportOptions,
    format: Format,
    generated_at: DateTime<Local>,
) -> Result<String, ReportError> {
    match format {
        Format::Text => render_text(result, options, generated_at),
        Format::Html => render_html(result, options, generated_at),
        Format::Json => render_json(result, options, generated_at),
    }
}

/// File name for a saved report, e.g. `executive_summary_20240501_093000.html`
pub fn default_file_name(format: Format, generated_at: DateTime<Local>) -> String {
    sanitize::file_name(&format!(
        "executive_summary_{}.{}",
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// JSON schema of the export document
pub fn export_schema() -> Result<String, ReportError> {
    let schema = schemars::schema_for!(Export);
    Ok(serde_json::to_string_pretty(&schema)?)
}

pub fn render_json(
    result: &AnalysisResult,
    options: &ReportOptions,
    generated_at: DateTime<Local>,
) -> Result<String, ReportError> {
    let export = Export {
        title: options.title.clone(),
        generated_at: generated_at.to_rfc3339(),
        stats: result.stats(),
        sentiment_shares: result.sentiment.percentages(),
        analysis: result.clone(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

fn bar(count: usize) -> String {
    "█".repeat(count)
}

pub fn render_text(
    result: &AnalysisResult,
    options: &ReportOptions,
    generated_at: DateTime<Local>,
) -> Result<String, ReportError> {
    let mut out = String::new();
    let stats = result.stats();

    writeln!(out, "{}", format!("=== {} ===", options.title).bold())?;
    writeln!(
        out,
        "{}\n",
        format!("Generated {}", generated_at.format("%B %d, %Y at %H:%M")).dimmed()
    )?;

    writeln!(
        out,
        "📊 {} decisions ({} high impact) · {} action items ({} critical) · avg confidence {:.2}\n",
        stats.total_decisions,
        stats.high_impact_decisions,
        stats.total_actions,
        stats.critical_actions,
        stats.avg_confidence
    )?;

    writeln!(out, "🎯 Decisions:")?;
    if result.decisions.is_empty() {
        writeln!(out, "  {}", "No decisions recorded".dimmed())?;
    }
    for decision in result.decisions.iter().take(options.max_decisions) {
        let impact = match decision.impact_level {
            ImpactLevel::High => decision.impact_level.to_string().red().bold(),
            ImpactLevel::Medium => decision.impact_level.to_string().yellow(),
            ImpactLevel::Low => decision.impact_level.to_string().normal(),
        };
        writeln!(
            out,
            "  • {}  [{} · {:.2}]",
            decision.content, impact, decision.confidence
        )?;
        if !decision.stakeholders.is_empty() {
            let names: Vec<&str> = decision.stakeholders.iter().map(String::as_str).collect();
            writeln!(out, "    Stakeholders: {}", names.join(", "))?;
        }
    }

    writeln!(out, "\n✅ Action Items:")?;
    if result.action_items.is_empty() {
        writeln!(out, "  {}", "No action items assigned".dimmed())?;
    }
    for item in result.action_items.iter().take(options.max_actions) {
        let priority = match item.priority {
            Priority::Critical => item.priority.to_string().red().bold(),
            Priority::High => item.priority.to_string().yellow().bold(),
            Priority::Medium => item.priority.to_string().yellow(),
            Priority::Low => item.priority.to_string().normal(),
        };
        let owner = item.assignee.as_deref().unwrap_or("Team");
        let deadline = item
            .deadline
            .as_deref()
            .map(|d| format!(" · due {}", d))
            .unwrap_or_default();
        writeln!(
            out,
            "  • {}: {}  [{}{} · {:.2}]",
            owner.cyan(),
            item.task,
            priority,
            deadline,
            item.confidence
        )?;
    }

    match &result.next_meeting {
        Some(next) => writeln!(
            out,
            "\n📅 Next Meeting: {} ({:.2})",
            next.when.green(),
            next.confidence
        )?,
        None => writeln!(out, "\n📅 Next Meeting: {}", "Not specified".dimmed())?,
    }

    let shares = result.sentiment.percentages();
    writeln!(
        out,
        "\n📈 Sentiment: Positive {}% | Neutral {}% | Negative {}%",
        shares.positive, shares.neutral, shares.negative
    )?;

    writeln!(out, "\n   Priorities")?;
    for (priority, count) in result.priority_distribution() {
        writeln!(out, "   {:<9} {} {}", priority.to_string(), bar(count), count)?;
    }
    writeln!(out, "\n   Impact")?;
    for (level, count) in result.impact_distribution() {
        writeln!(out, "   {:<9} {} {}", level.to_string(), bar(count), count)?;
    }

    if !result.risks.is_empty() {
        writeln!(out, "\n⚠️  Risks:")?;
        for risk in result.risks.iter().take(options.max_risks) {
            writeln!(out, "  • {}", risk)?;
        }
    }

    writeln!(
        out,
        "\n👥 Attendees: {} participants",
        result.metadata.attendees.len()
    )?;

    Ok(out)
}

const EMAIL_STYLE: &str = "\
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f8f9fa; }
.container { max-width: 800px; margin: 0 auto; background: white; border-radius: 12px; box-shadow: 0 4px 20px rgba(0,0,0,0.1); }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 12px 12px 0 0; }
.header h1 { margin: 0; font-size: 28px; font-weight: 300; }
.header .subtitle { opacity: 0.9; margin-top: 8px; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 15px; padding: 20px; background: #f8f9fa; }
.stat-card { background: white; padding: 15px; border-radius: 8px; text-align: center; border-left: 4px solid #667eea; }
.stat-number { font-size: 24px; font-weight: bold; color: #667eea; }
.stat-label { font-size: 12px; color: #666; text-transform: uppercase; }
.section { padding: 25px; }
.section h2 { color: #333; border-bottom: 2px solid #667eea; padding-bottom: 8px; margin-bottom: 20px; }
.decision-item, .action-item { background: #f8f9fa; padding: 15px; margin: 10px 0; border-radius: 8px; border-left: 4px solid #28a745; }
.high-impact { border-left-color: #dc3545; }
.critical { border-left-color: #fd7e14; }
.priority-badge { display: inline-block; padding: 4px 8px; border-radius: 12px; font-size: 11px; font-weight: bold; text-transform: uppercase; }
.critical-badge { background: #dc3545; color: white; }
.high-badge { background: #fd7e14; color: white; }
.medium-badge { background: #ffc107; color: black; }
.low-badge { background: #e9ecef; color: black; }
.confidence { float: right; color: #666; font-size: 12px; }
.footer { background: #f8f9fa; padding: 20px; border-radius: 0 0 12px 12px; text-align: center; color: #666; }
";

fn stat_card(out: &mut String, value: &str, label: &str) -> std::fmt::Result {
    writeln!(
        out,
        r#"<div class="stat-card"><div class="stat-number">{}</div><div class="stat-label">{}</div></div>"#,
        value, label
    )
}

/// Self-contained HTML email. Every transcript-derived string is escaped.
pub fn render_html(
    result: &AnalysisResult,
    options: &ReportOptions,
    generated_at: DateTime<Local>,
) -> Result<String, ReportError> {
    let mut out = String::new();
    let stats = result.stats();
    let title = html_escape(&options.title);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>\n<head>\n<meta charset=\"UTF-8\">")?;
    writeln!(out, "<title>{}</title>", title)?;
    writeln!(out, "<style>\n{}</style>\n</head>\n<body>", EMAIL_STYLE)?;
    writeln!(out, r#"<div class="container">"#)?;

    writeln!(out, r#"<div class="header">"#)?;
    writeln!(out, "<h1>📊 {}</h1>", title)?;
    writeln!(
        out,
        r#"<div class="subtitle">Executive Summary • Generated {}</div>"#,
        generated_at.format("%B %d, %Y at %I:%M %p")
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, r#"<div class="stats-grid">"#)?;
    stat_card(&mut out, &stats.total_decisions.to_string(), "Key Decisions")?;
    stat_card(&mut out, &stats.total_actions.to_string(), "Action Items")?;
    stat_card(&mut out, &stats.high_impact_decisions.to_string(), "High Impact")?;
    stat_card(&mut out, &format!("{:.2}", stats.avg_confidence), "Avg Confidence")?;
    writeln!(out, "</div>")?;

    writeln!(out, r#"<div class="section">"#)?;
    writeln!(out, "<h2>🎯 Strategic Decisions</h2>")?;
    if result.decisions.is_empty() {
        writeln!(out, "<p>No strategic decisions recorded</p>")?;
    }
    for decision in result.decisions.iter().take(options.max_decisions) {
        let class = if decision.impact_level == ImpactLevel::High {
            "decision-item high-impact"
        } else {
            "decision-item"
        };
        writeln!(out, r#"<div class="{}">"#, class)?;
        writeln!(out, "<strong>{}</strong>", html_escape(&decision.content))?;
        writeln!(
            out,
            r#"<div class="confidence">Impact: {} | Confidence: {:.2}</div>"#,
            decision.impact_level, decision.confidence
        )?;
        if !decision.stakeholders.is_empty() {
            let names: Vec<String> = decision
                .stakeholders
                .iter()
                .map(|s| html_escape(s))
                .collect();
            writeln!(
                out,
                "<div style=\"margin-top:8px;\"><small>Stakeholders: {}</small></div>",
                names.join(", ")
            )?;
        }
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, r#"<div class="section">"#)?;
    writeln!(out, "<h2>✅ Action Items &amp; Assignments</h2>")?;
    if result.action_items.is_empty() {
        writeln!(out, "<p>No action items assigned</p>")?;
    }
    for item in result.action_items.iter().take(options.max_actions) {
        let class = if item.priority == Priority::Critical {
            "action-item critical"
        } else {
            "action-item"
        };
        let tier = item.priority.to_string().to_lowercase();
        writeln!(out, r#"<div class="{}">"#, class)?;
        writeln!(
            out,
            r#"<strong>{}</strong>: {} <span class="priority-badge {}-badge">{}</span>"#,
            html_escape(item.assignee.as_deref().unwrap_or("Team")),
            html_escape(&item.task),
            tier,
            tier
        )?;
        writeln!(
            out,
            "<div style=\"margin-top:8px;\"><small>Deadline: {} | Confidence: {:.2}</small></div>",
            html_escape(item.deadline.as_deref().unwrap_or("Not specified")),
            item.confidence
        )?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</div>")?;

    let shares = result.sentiment.percentages();
    writeln!(out, r#"<div class="section">"#)?;
    writeln!(out, "<h2>📈 Meeting Analytics</h2>")?;
    writeln!(
        out,
        r#"<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 20px;">"#
    )?;
    writeln!(
        out,
        "<div><h4>Sentiment Analysis</h4><div>Positive: {}% | Negative: {}% | Neutral: {}%</div></div>",
        shares.positive, shares.negative, shares.neutral
    )?;
    let next = result
        .next_meeting
        .as_ref()
        .map(|m| html_escape(&m.when))
        .unwrap_or_else(|| "Not specified".to_string());
    writeln!(
        out,
        "<div><h4>Meeting Metadata</h4><p><strong>Next Meeting:</strong> {}</p><p><strong>Attendees:</strong> {} participants</p></div>",
        next,
        result.metadata.attendees.len()
    )?;
    writeln!(out, "</div>")?;
    if !result.risks.is_empty() {
        writeln!(out, "<h4>⚠️ Risks</h4>\n<ul>")?;
        for risk in result.risks.iter().take(options.max_risks) {
            writeln!(out, "<li>{}</li>", html_escape(risk))?;
        }
        writeln!(out, "</ul>")?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, r#"<div class="footer">"#)?;
    writeln!(
        out,
        "<p>Generated by minutes v{} | Pattern-based analysis with confidence scoring</p>",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "</div>\n</div>\n</body>\n</html>")?;

    Ok(out)
}
