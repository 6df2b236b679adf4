//! Axum route handlers for goal suggestions and skill-gap analysis.

use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::suggestions::context::build_context;
use crate::suggestions::registry::{TaskToken, TaskView};
use crate::state::AppState;

const MAX_CRITERIA_CHARS: usize = 2000;
const NO_REQUIREMENTS: &str = "No stated requirements";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub employee_id: i64,
    /// HTML selects post an empty string for "no project".
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub additional_criteria: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub task_id: TaskToken,
    pub status: &'static str,
    pub poll_url: String,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub project_id: i64,
    pub team_skills: Vec<String>,
    pub analysis: String,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/goals/suggestions
///
/// Validates the form and references, builds context and queues generation.
/// Unknown employees or projects are rejected before any task exists.
pub async fn handle_submit_suggestion(
    State(state): State<AppState>,
    form: Result<Form<SuggestionRequest>, FormRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Form(request) = form?;

    if let Some(criteria) = &request.additional_criteria {
        if criteria.chars().count() > MAX_CRITERIA_CHARS {
            return Err(AppError::Validation(format!(
                "additional_criteria must be at most {MAX_CRITERIA_CHARS} characters"
            )));
        }
    }

    let employee = state
        .directory
        .employee(request.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", request.employee_id)))?;

    let project = match request.project_id {
        Some(project_id) => Some(
            state
                .directory
                .project(project_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?,
        ),
        None => None,
    };

    let ctx = build_context(
        &employee,
        project.as_ref(),
        request.additional_criteria.as_deref(),
    );
    let task_id = state.tasks.submit(ctx);

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            task_id,
            status: "pending",
            poll_url: format!("/api/v1/goals/suggestions/{task_id}"),
        }),
    ))
}

/// GET /api/v1/goals/suggestions/:task_id
///
/// Pending and completed tasks both return 200; unknown tokens return 404.
pub async fn handle_poll_suggestion(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskView>, AppError> {
    let not_found = || AppError::NotFound(format!("Task {task_id} not found"));

    let token: TaskToken = task_id.parse().map_err(|_| not_found())?;
    let view = state.tasks.poll(&token).ok_or_else(not_found)?;

    Ok(Json(view))
}

/// POST /api/v1/projects/:project_id/skill-gap
///
/// Compares the combined skills of the project's team against its description.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let Path(project_id) = path?;

    let team = state
        .directory
        .project_team(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;

    let requirements = team
        .project
        .description
        .as_deref()
        .unwrap_or(NO_REQUIREMENTS);

    info!(
        "Analysing skill gap for project {project_id} ({} team skills)",
        team.skills.len()
    );
    let analysis = state
        .provider
        .analyze_skill_gap(&team.skills, requirements)
        .await;

    Ok(Json(SkillGapResponse {
        project_id,
        team_skills: team.skills,
        analysis,
    }))
}
