//! Analysis event types received from the analysis host.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// "Analysis finished" event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEvent {
    pub project: Project,

    /// Absent when no quality gate is associated with the project
    #[serde(default)]
    pub quality_gate: Option<QualityGate>,

    /// Scanner context properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Analyzed project.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,

    /// Display name; falls back to the key when missing
    #[serde(default)]
    pub name: Option<String>,
}

impl Project {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Quality gate verdict with its conditions.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityGate {
    pub status: GateStatus,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Ok,
    Warn,
    Error,
}

impl GateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GateStatus::Ok => "OK",
            GateStatus::Warn => "WARN",
            GateStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric threshold check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(alias = "metricKey")]
    pub metric: String,

    pub operator: Operator,

    /// Measured value; empty or absent when the metric has no value
    #[serde(default)]
    pub value: Option<String>,

    pub status: EvaluationStatus,

    #[serde(default)]
    pub warning_threshold: Option<String>,

    #[serde(default)]
    pub error_threshold: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    Ok,
    Warn,
    Error,
    NoValue,
}

impl EvaluationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationStatus::Ok => "OK",
            EvaluationStatus::Warn => "WARN",
            EvaluationStatus::Error => "ERROR",
            EvaluationStatus::NoValue => "NO_VALUE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
        }
    }
}
