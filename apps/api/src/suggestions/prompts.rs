// LLM prompt templates for goal suggestions and skill-gap analysis.

/// System prompt for goal generation. Combined with the JSON-only fragment at call time.
pub const GOAL_SYSTEM: &str = "You are a helpful engineering manager assistant. \
    You write concrete, measurable development goals for individual employees.";

/// Goal prompt template. Replace every `{placeholder}` before sending.
pub const GOAL_PROMPT_TEMPLATE: &str = r#"Suggest ONE professional development goal for the employee below.

EMPLOYEE PROFILE:
{employee_context}

PROJECT CONTEXT:
{project_context}

GOAL DIRECTION:
{tier_instruction}

ADDITIONAL CRITERIA FROM THE MANAGER:
{additional_criteria}

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "short goal title",
  "objective": "what the employee will achieve and why it matters",
  "due_date": "target completion, e.g. 'End of Q3' or 'YYYY-MM-DD'",
  "success_metrics": "how completion will be measured",
  "manager_support": "what the manager will do to help"
}

All five values must be plain strings."#;

/// Skill-gap prompt template. Replace `{team_skills}` and `{requirements}` before sending.
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = "Compare these team skills: {team_skills} \
    against these project requirements: {requirements}. Identify gaps.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_template_names_every_field() {
        for field in [
            "\"title\"",
            "\"objective\"",
            "\"due_date\"",
            "\"success_metrics\"",
            "\"manager_support\"",
        ] {
            assert!(GOAL_PROMPT_TEMPLATE.contains(field), "missing {field}");
        }
    }
}
