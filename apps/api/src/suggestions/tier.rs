//! Tier policy: which kind of goal each potential tier receives.
//!
//! This is a business rule, not a backend detail: both the mock and the live
//! provider consult `directive()` before doing anything else, so P3 and P4
//! always get their fixed goals no matter which backend is configured.

use crate::suggestions::models::{GoalSuggestion, Potential};

pub const STRATEGIC_INSTRUCTION: &str = "\
    This employee is a high-potential (P1) contributor. Suggest a strategic, long-term goal \
    (6-12 months) that stretches them toward broader ownership: shaping technical or business \
    strategy, leading cross-team initiatives, or preparing for a larger role. \
    The objective must explicitly describe the strategic impact.";

pub const SKILL_ACQUISITION_INSTRUCTION: &str = "\
    This employee is a growing (P2) contributor. Suggest a skill-acquisition goal (3-6 months) \
    focused on learning one concrete new skill or technology that closes a gap for their \
    current role or project, with hands-on practice built in.";

pub const GENERAL_INSTRUCTION: &str = "\
    Suggest one general professional improvement goal (3 months) that fits the employee's \
    role and current work.";

/// What a provider should do for a given tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalDirective {
    /// Return this goal as-is; context is ignored.
    Fixed(GoalSuggestion),
    /// Generate a goal following this instruction.
    Generate { instruction: &'static str },
}

#[cfg(test)]
impl GoalDirective {
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            GoalDirective::Fixed(_) => None,
            GoalDirective::Generate { instruction } => Some(*instruction),
        }
    }
}

pub fn directive(potential: Option<Potential>) -> GoalDirective {
    match potential {
        Some(Potential::P1) => GoalDirective::Generate {
            instruction: STRATEGIC_INSTRUCTION,
        },
        Some(Potential::P2) => GoalDirective::Generate {
            instruction: SKILL_ACQUISITION_INSTRUCTION,
        },
        Some(Potential::P3) => GoalDirective::Fixed(maintenance_goal()),
        Some(Potential::P4) => GoalDirective::Fixed(performance_improvement_goal()),
        None => GoalDirective::Generate {
            instruction: GENERAL_INSTRUCTION,
        },
    }
}

fn maintenance_goal() -> GoalSuggestion {
    GoalSuggestion {
        title: "Maintenance & Team Morale".to_string(),
        objective: "Sustain consistent delivery in the current role: keep owned systems \
            healthy, share knowledge with the team, and contribute to a positive team climate."
            .to_string(),
        due_date: "End of current quarter".to_string(),
        success_metrics: "Owned work delivered on schedule; no regressions in owned areas; \
            positive peer feedback in the next review cycle."
            .to_string(),
        manager_support: "Regular 1:1 check-ins, recognition of steady contributions, and \
            protection from unnecessary context switching."
            .to_string(),
    }
}

fn performance_improvement_goal() -> GoalSuggestion {
    GoalSuggestion {
        title: "Performance Improvement Plan".to_string(),
        objective: "Meet the core expectations of the role within a defined improvement \
            window. Failure to meet them may lead to termination of employment."
            .to_string(),
        due_date: "60 days from plan start".to_string(),
        success_metrics: "All agreed deliverables completed to standard; weekly goals met for \
            the full plan period; no repeat of the documented performance issues."
            .to_string(),
        manager_support: "Written expectations, weekly progress reviews with documented \
            outcomes, and HR involvement throughout the plan."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p3_and_p4_are_fixed() {
        match directive(Some(Potential::P3)) {
            GoalDirective::Fixed(goal) => assert!(goal.title.contains("Maintenance")),
            other => panic!("expected fixed goal, got {other:?}"),
        }
        match directive(Some(Potential::P4)) {
            GoalDirective::Fixed(goal) => {
                assert!(goal.title.contains("Performance Improvement"));
                assert!(goal.objective.contains("termination"));
            }
            other => panic!("expected fixed goal, got {other:?}"),
        }
    }

    #[test]
    fn test_generating_tiers_have_distinct_instructions() {
        let p1 = directive(Some(Potential::P1)).instruction().unwrap();
        let p2 = directive(Some(Potential::P2)).instruction().unwrap();
        let unset = directive(None).instruction().unwrap();

        assert_ne!(p1, unset);
        assert_ne!(p2, unset);
        assert_ne!(p1, p2);
        assert!(p1.contains("strategic"));
        assert!(p2.contains("skill-acquisition"));
    }

    #[test]
    fn test_fixed_directives_have_no_instruction() {
        assert!(directive(Some(Potential::P3)).instruction().is_none());
        assert!(directive(Some(Potential::P4)).instruction().is_none());
    }
}
