//! Context Assembler: turns store records into the two free-text profiles
//! fed to a suggestion provider. Pure and synchronous.

use serde::{Deserialize, Serialize};

use crate::suggestions::models::{Potential, SuggestionContext};

/// Project context used when a request names no project.
pub const GENERAL_PROJECT_CONTEXT: &str = "General Improvement";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub name: String,
    pub role: String,
    pub skills: Vec<String>,
    pub notes: Vec<String>,
    pub potential: Option<Potential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProfile {
    pub name: String,
    pub description: Option<String>,
}

pub fn employee_context(employee: &EmployeeProfile) -> String {
    let skills = if employee.skills.is_empty() {
        "None listed".to_string()
    } else {
        employee.skills.join(", ")
    };
    let notes = if employee.notes.is_empty() {
        "None".to_string()
    } else {
        employee.notes.join("; ")
    };
    format!(
        "Name: {}, Role: {}, Skills: {}, Notes: {}",
        employee.name, employee.role, skills, notes
    )
}

pub fn project_context(project: Option<&ProjectProfile>) -> String {
    match project {
        Some(project) => format!(
            "Project: {}, Description: {}",
            project.name,
            project.description.as_deref().unwrap_or("No description")
        ),
        None => GENERAL_PROJECT_CONTEXT.to_string(),
    }
}

/// Builds the immutable input for one suggestion request.
/// Blank criteria are dropped so providers only see meaningful text.
pub fn build_context(
    employee: &EmployeeProfile,
    project: Option<&ProjectProfile>,
    additional_criteria: Option<&str>,
) -> SuggestionContext {
    SuggestionContext {
        employee_context: employee_context(employee),
        project_context: project_context(project),
        potential: employee.potential,
        additional_criteria: additional_criteria
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}
