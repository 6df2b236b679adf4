//! Read-only view of the people store used by the suggestion feature.
//!
//! Employees, projects and assignments are owned by the CRUD side of the
//! application. This module only reads them and converts rows into the
//! profiles consumed by the context assembler.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::employee::EmployeeRow;
use crate::models::project::ProjectRow;
use crate::suggestions::context::{EmployeeProfile, ProjectProfile};
use crate::suggestions::models::Potential;

/// A project together with the combined skills of everyone assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTeam {
    pub project: ProjectProfile,
    /// De-duplicated and sorted.
    pub skills: Vec<String>,
}

/// Carried in `AppState` as `Arc<dyn Directory>`.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn employee(&self, id: i64) -> Result<Option<EmployeeProfile>, AppError>;

    async fn project(&self, id: i64) -> Result<Option<ProjectProfile>, AppError>;

    async fn project_team(&self, id: i64) -> Result<Option<ProjectTeam>, AppError>;
}

impl From<EmployeeRow> for EmployeeProfile {
    fn from(row: EmployeeRow) -> Self {
        EmployeeProfile {
            potential: Potential::parse_optional(row.potential.as_deref()),
            name: row.name,
            role: row.role,
            skills: row.skills.0,
            notes: row.notes.0,
        }
    }
}

impl From<ProjectRow> for ProjectProfile {
    fn from(row: ProjectRow) -> Self {
        ProjectProfile {
            name: row.name,
            description: row.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

fn merge_skills<I>(skill_lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    skill_lists
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn employee(&self, id: i64) -> Result<Option<EmployeeProfile>, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(EmployeeProfile::from))
    }

    async fn project(&self, id: i64) -> Result<Option<ProjectProfile>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProjectProfile::from))
    }

    async fn project_team(&self, id: i64) -> Result<Option<ProjectTeam>, AppError> {
        let Some(project) = self.project(id).await? else {
            return Ok(None);
        };

        let skill_lists: Vec<Json<Vec<String>>> = sqlx::query_scalar(
            r#"
            SELECT e.skills
            FROM employees e
            JOIN project_assignments pa ON pa.employee_id = e.id
            WHERE pa.project_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ProjectTeam {
            project,
            skills: merge_skills(skill_lists.into_iter().map(|s| s.0)),
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation for handler tests
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn employee_row(potential: Option<&str>) -> EmployeeRow {
        EmployeeRow {
            id: 7,
            name: "Grace Hopper".to_string(),
            role: "Principal Engineer".to_string(),
            email: "grace@example.com".to_string(),
            skills: Json(vec!["COBOL".to_string(), "Compilers".to_string()]),
            notes: Json(vec!["Invented the linker".to_string()]),
            development_plan: None,
            potential: potential.map(str::to_string),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_employee_row_converts_to_profile() {
        let profile = EmployeeProfile::from(employee_row(Some("p1")));
        assert_eq!(profile.name, "Grace Hopper");
        assert_eq!(profile.skills, vec!["COBOL", "Compilers"]);
        assert_eq!(profile.potential, Some(Potential::P1));
    }

    #[test]
    fn test_unknown_potential_is_unset() {
        let profile = EmployeeProfile::from(employee_row(Some("rockstar")));
        assert_eq!(profile.potential, None);
    }

    #[test]
    fn test_blank_project_description_is_none() {
        let profile = ProjectProfile::from(ProjectRow {
            id: 1,
            name: "Atlas".to_string(),
            status: "Active".to_string(),
            description: Some("   ".to_string()),
            created_at: Utc::now(),
        });
        assert_eq!(profile.description, None);
    }

    #[test]
    fn test_merge_skills_dedups_and_sorts() {
        let merged = merge_skills(vec![
            vec!["Rust".to_string(), " SQL ".to_string()],
            vec!["SQL".to_string(), "".to_string(), "Go".to_string()],
        ]);
        assert_eq!(merged, vec!["Go", "Rust", "SQL"]);
    }
}
