//! Suggestion providers: pluggable, trait-based goal generation.
//!
//! Default without credentials: `MockProvider` (deterministic, no network).
//! With a real API key: `LiveProvider` (chat-completions backend via `llm_client`).
//!
//! `AppState` and `TaskRegistry` hold an `Arc<dyn SuggestionProvider>` chosen at
//! startup by `select_provider`. Neither variant returns an error to its caller:
//! generation failures come back as `GeneratedGoal::Error`, skill-gap failures
//! as a readable string.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, MANAGER_ASSISTANT_PERSONA};
use crate::llm_client::LlmClient;
use crate::suggestions::models::{GeneratedGoal, GoalSuggestion, Potential, SuggestionContext};
use crate::suggestions::prompts::{GOAL_PROMPT_TEMPLATE, GOAL_SYSTEM, SKILL_GAP_PROMPT_TEMPLATE};
use crate::suggestions::tier::{self, GoalDirective};

/// Returned (as a goal error or a plain string) when the live provider has no key.
pub const NOT_CONFIGURED: &str = "OpenAI API key not configured.";

/// Simulated backend latency of the mock provider.
pub const MOCK_LATENCY: Duration = Duration::from_secs(2);

/// Values commonly left in `.env` templates. None of them can authenticate.
const PLACEHOLDER_KEYS: &[&str] = &[
    "dummy",
    "placeholder",
    "changeme",
    "your-api-key",
    "your_api_key",
    "sk-...",
];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Mock,
    Live,
}

/// The suggestion provider trait. Implement this to swap generation backends
/// without touching handlers or the task registry.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn generate_goal(&self, ctx: &SuggestionContext) -> GeneratedGoal;

    async fn analyze_skill_gap(&self, team_skills: &[String], requirements: &str) -> String;

    fn kind(&self) -> ProviderKind;
}

// ────────────────────────────────────────────────────────────────────────────
// Factory
// ────────────────────────────────────────────────────────────────────────────

/// Provider-selection inputs, projected out of `Config`.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub mock_latency: Duration,
}

pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || PLACEHOLDER_KEYS.contains(&key.to_ascii_lowercase().as_str())
}

/// Resolves to the live provider only when a real-looking key is configured.
pub fn select_provider(settings: &ProviderSettings) -> Arc<dyn SuggestionProvider> {
    match settings
        .openai_api_key
        .as_deref()
        .filter(|key| !is_placeholder_key(key))
    {
        Some(key) => Arc::new(LiveProvider::new(
            Some(key.trim().to_string()),
            settings.openai_base_url.clone(),
        )),
        None => Arc::new(MockProvider::new(settings.mock_latency)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MockProvider
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic provider with a fixed simulated latency. No external calls.
pub struct MockProvider {
    latency: Duration,
}

impl MockProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MOCK_LATENCY)
    }
}

#[async_trait]
impl SuggestionProvider for MockProvider {
    async fn generate_goal(&self, ctx: &SuggestionContext) -> GeneratedGoal {
        tokio::time::sleep(self.latency).await;

        match tier::directive(ctx.potential) {
            GoalDirective::Fixed(goal) => GeneratedGoal::Suggestion(goal),
            GoalDirective::Generate { .. } => GeneratedGoal::Suggestion(mock_goal(ctx)),
        }
    }

    async fn analyze_skill_gap(&self, team_skills: &[String], requirements: &str) -> String {
        tokio::time::sleep(self.latency).await;

        format!(
            "Team skills: {}\nProject needs: {}\n\nGap Analysis:\n\
             - Missing strong DevOps experience.\n\
             - Need more React expertise.",
            team_skills.join(", "),
            requirements
        )
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }
}

fn mock_goal(ctx: &SuggestionContext) -> GoalSuggestion {
    let criteria = ctx
        .additional_criteria
        .as_deref()
        .map(|c| format!(" Manager criteria: {c}."))
        .unwrap_or_default();

    match ctx.potential {
        Some(Potential::P1) => GoalSuggestion {
            title: "Lead a Strategic Initiative".to_string(),
            objective: format!(
                "Own a strategic, long-term initiative within {}, setting direction beyond the \
                 immediate backlog. Profile: {}.{criteria}",
                ctx.project_context, ctx.employee_context
            ),
            due_date: "12 months".to_string(),
            success_metrics: "Initiative roadmap approved; two cross-team milestones delivered."
                .to_string(),
            manager_support: "Sponsorship in leadership forums and quarterly strategy reviews."
                .to_string(),
        },
        Some(Potential::P2) => GoalSuggestion {
            title: "Acquire a New Core Skill".to_string(),
            objective: format!(
                "Learn and apply one new skill that unlocks more of {}. Profile: {}.{criteria}",
                ctx.project_context, ctx.employee_context
            ),
            due_date: "6 months".to_string(),
            success_metrics: "Course or certification completed; skill applied in one shipped task."
                .to_string(),
            manager_support: "Dedicated learning time and a mentor for the new skill.".to_string(),
        },
        _ => GoalSuggestion {
            title: "General Professional Improvement".to_string(),
            objective: format!(
                "Improve day-to-day effectiveness on {}. Profile: {}.{criteria}",
                ctx.project_context, ctx.employee_context
            ),
            due_date: "3 months".to_string(),
            success_metrics: "Agreed improvement area shows measurable progress at next review."
                .to_string(),
            manager_support: "Monthly feedback on the chosen improvement area.".to_string(),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LiveProvider
// ────────────────────────────────────────────────────────────────────────────

/// Provider backed by the chat-completions API. Holds one long-lived client.
pub struct LiveProvider {
    llm: Option<LlmClient>,
}

impl LiveProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            llm: api_key
                .filter(|k| !k.trim().is_empty())
                .map(|k| LlmClient::new(k, base_url)),
        }
    }
}

#[async_trait]
impl SuggestionProvider for LiveProvider {
    async fn generate_goal(&self, ctx: &SuggestionContext) -> GeneratedGoal {
        let instruction = match tier::directive(ctx.potential) {
            GoalDirective::Fixed(goal) => return GeneratedGoal::Suggestion(goal),
            GoalDirective::Generate { instruction } => instruction,
        };

        let Some(llm) = &self.llm else {
            return GeneratedGoal::error(NOT_CONFIGURED);
        };

        let prompt = build_goal_prompt(ctx, instruction);
        let system = format!("{GOAL_SYSTEM} {JSON_ONLY_SYSTEM}");

        match llm.call_json::<GoalSuggestion>(&prompt, &system).await {
            Ok(goal) => GeneratedGoal::Suggestion(goal),
            Err(e) => {
                warn!("Goal generation failed: {e}");
                GeneratedGoal::error(format!("Goal generation failed: {e}"))
            }
        }
    }

    async fn analyze_skill_gap(&self, team_skills: &[String], requirements: &str) -> String {
        let Some(llm) = &self.llm else {
            return NOT_CONFIGURED.to_string();
        };

        let team_skills = team_skills.join(", ");
        let prompt = fill_template(
            SKILL_GAP_PROMPT_TEMPLATE,
            &[("team_skills", team_skills.as_str()), ("requirements", requirements)],
        );

        match llm.call_text(&prompt, MANAGER_ASSISTANT_PERSONA).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Skill gap analysis failed: {e}");
                format!("Skill gap analysis failed: {e}")
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Live
    }
}

/// Fills the goal template with the request context and tier instruction.
fn build_goal_prompt(ctx: &SuggestionContext, instruction: &str) -> String {
    fill_template(
        GOAL_PROMPT_TEMPLATE,
        &[
            ("employee_context", ctx.employee_context.as_str()),
            ("project_context", ctx.project_context.as_str()),
            ("tier_instruction", instruction),
            (
                "additional_criteria",
                ctx.additional_criteria.as_deref().unwrap_or("None"),
            ),
        ],
    )
}

/// Replaces `{name}` placeholders in a single left-to-right pass.
///
/// Values are free text (notes, descriptions, manager criteria) and are copied
/// verbatim: a placeholder that appears inside a value is never expanded.
/// Braces that do not name a known placeholder are kept as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
