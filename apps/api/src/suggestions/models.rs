use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Potential tier
// ────────────────────────────────────────────────────────────────────────────

/// Growth-trajectory rating of an employee. Drives which goal branch applies.
///
/// An employee without a rating is represented as `Option<Potential>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Potential {
    P1,
    P2,
    P3,
    P4,
}

impl Potential {
    /// Lenient parse used for store values: unknown or blank text means unset.
    pub fn parse_optional(raw: Option<&str>) -> Option<Potential> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(p) => Some(p),
            Err(_) => {
                tracing::warn!("Unrecognised potential tier {raw:?}; treating as unset");
                None
            }
        }
    }
}

impl FromStr for Potential {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Potential::P1),
            "P2" => Ok(Potential::P2),
            "P3" => Ok(Potential::P3),
            "P4" => Ok(Potential::P4),
            other => Err(format!("unknown potential tier: {other}")),
        }
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Potential::P1 => "P1",
            Potential::P2 => "P2",
            Potential::P3 => "P3",
            Potential::P4 => "P4",
        };
        f.write_str(label)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation input / output
// ────────────────────────────────────────────────────────────────────────────

/// Everything a provider needs to produce one goal. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    pub employee_context: String,
    pub project_context: String,
    pub potential: Option<Potential>,
    pub additional_criteria: Option<String>,
}

/// A development goal in the shape the backend is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSuggestion {
    pub title: String,
    pub objective: String,
    pub due_date: String,
    pub success_metrics: String,
    pub manager_support: String,
}

/// Result attached to a completed task.
///
/// A failed generation is still a completed task; the `kind` tag lets
/// clients render it distinctly from a genuine suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedGoal {
    Suggestion(GoalSuggestion),
    Error { message: String },
}

impl GeneratedGoal {
    pub fn error(message: impl Into<String>) -> Self {
        GeneratedGoal::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GeneratedGoal::Error { .. })
    }

    #[cfg(test)]
    pub fn suggestion(&self) -> Option<&GoalSuggestion> {
        match self {
            GeneratedGoal::Suggestion(goal) => Some(goal),
            GeneratedGoal::Error { .. } => None,
        }
    }
}
