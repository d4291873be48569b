//! Push message formatting for analysis results.

use serde::Serialize;
use tracing::error;

use super::project::ProjectConfig;
use super::types::{AnalysisEvent, Condition, EvaluationStatus};

/// Maximum title length accepted by DaDaPush.
pub const MAX_TITLE_CHARS: usize = 50;

/// Maximum content length accepted by DaDaPush.
pub const MAX_CONTENT_CHARS: usize = 500;

/// Metrics whose values are rendered as percentages.
const PERCENTAGE_METRICS: &[&str] = &["new_coverage", "new_sqale_debt_ratio"];

/// English display names of common metrics.
const METRIC_NAMES: &[(&str, &str)] = &[
    ("alert_status", "Quality Gate Status"),
    ("blocker_violations", "Blocker Issues"),
    ("bugs", "Bugs"),
    ("code_smells", "Code Smells"),
    ("coverage", "Coverage"),
    ("critical_violations", "Critical Issues"),
    ("duplicated_lines_density", "Duplicated Lines (%)"),
    ("new_blocker_violations", "New Blocker Issues"),
    ("new_bugs", "New Bugs"),
    ("new_code_smells", "New Code Smells"),
    ("new_coverage", "Coverage on New Code"),
    ("new_critical_violations", "New Critical Issues"),
    ("new_duplicated_lines_density", "Duplicated Lines (%) on New Code"),
    ("new_maintainability_rating", "Maintainability Rating on New Code"),
    ("new_reliability_rating", "Reliability Rating on New Code"),
    ("new_security_hotspots_reviewed", "Security Hotspots Reviewed on New Code"),
    ("new_security_rating", "Security Rating on New Code"),
    ("new_sqale_debt_ratio", "Technical Debt Ratio on New Code"),
    ("new_violations", "New Issues"),
    ("new_vulnerabilities", "New Vulnerabilities"),
    ("reliability_rating", "Reliability Rating"),
    ("security_hotspots_reviewed", "Security Hotspots Reviewed"),
    ("security_rating", "Security Rating"),
    ("sqale_rating", "Maintainability Rating"),
    ("vulnerabilities", "Vulnerabilities"),
];

/// Message body sent to the push API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub title: String,
    pub content: String,
    pub need_push: bool,
}

impl PushMessage {
    /// Build the message for `event` under the resolved project `config`.
    pub fn for_analysis(event: &AnalysisEvent, config: &ProjectConfig) -> Self {
        let gate = event.quality_gate.as_ref();

        let title = match gate {
            Some(gate) => gate.status.to_string(),
            None => "Unknown Status".to_string(),
        };

        let mut content = format!("Project: {}\n", event.project.display_name());
        match gate {
            Some(gate) => {
                content.push_str(&format!("Status: {}\n", gate.status));
                let lines: Vec<String> = gate
                    .conditions
                    .iter()
                    .filter(|c| !config.qg_fail_only() || is_failing(c))
                    .map(describe_condition)
                    .collect();
                content.push_str(&lines.join("\n"));
                content.push('\n');
            }
            None => content.push_str("Status: Unknown\n"),
        }

        Self {
            title: truncate(&title, MAX_TITLE_CHARS),
            content: truncate(&content, MAX_CONTENT_CHARS),
            need_push: true,
        }
    }
}

fn is_failing(condition: &Condition) -> bool {
    !matches!(
        condition.status,
        EvaluationStatus::Ok | EvaluationStatus::NoValue
    )
}

/// Display name of a metric, falling back to its key.
pub fn metric_name(metric: &str) -> &str {
    METRIC_NAMES
        .iter()
        .find(|(key, _)| *key == metric)
        .map_or(metric, |(_, name)| *name)
}

/// Two-line description of one condition.
pub fn describe_condition(condition: &Condition) -> String {
    let name = metric_name(&condition.metric);
    if condition.status == EvaluationStatus::NoValue {
        return format!("{}\n{}", name, condition.status.as_str());
    }

    let percent = is_percentage(condition);
    let suffix = if percent { "%" } else { "" };

    let value = match condition.value.as_deref() {
        None | Some("") => "NaN".to_string(),
        Some(v) if percent => format_percentage(v),
        Some(v) => v.to_string(),
    };

    let mut detail = format!("value: {}{}", value, suffix);
    if let Some(threshold) = &condition.warning_threshold {
        detail.push_str(&format!(
            ", warning if {}{}{}",
            condition.operator.symbol(),
            threshold,
            suffix
        ));
    }
    if let Some(threshold) = &condition.error_threshold {
        detail.push_str(&format!(
            ", error if {}{}{}",
            condition.operator.symbol(),
            threshold,
            suffix
        ));
    }

    format!("{}: {}\n{}", name, condition.status.as_str(), detail)
}

fn is_percentage(condition: &Condition) -> bool {
    PERCENTAGE_METRICS.contains(&condition.metric.as_str())
}

/// Format with at most two fraction digits; unparsable input is kept verbatim.
fn format_percentage(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => {
            let fixed = format!("{:.2}", v);
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            match trimmed {
                "-0" => "0".to_string(),
                other => other.to_string(),
            }
        }
        Ok(_) => raw.to_string(),
        Err(e) => {
            error!("Failed to parse [{}] into a number due to [{}]", raw, e);
            raw.to_string()
        }
    }
}

/// Keep at most `max` characters.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
