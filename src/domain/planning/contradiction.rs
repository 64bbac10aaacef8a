//! Cross-stage contradiction checking.
//!
//! After each successful extraction the checker inspects the new record
//! against previously committed stage data. A detected contradiction blocks
//! stage advancement for that turn and surfaces a clarification question;
//! it is a conversational redirect, never an error.
//!
//! Rules are registered per stage as an ordered list; the first rule that
//! fires wins and the rest are not evaluated that turn. Only the
//! tasks-and-subtasks transition has rules today; new cross-stage checks
//! register as additional stage-keyed rule lists in `check`.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use super::stage::PlanningStage;
use super::stage_data::{ConstraintsData, StageRecord, TasksData};

/// Total sequential task days above which the duration rule fires.
const DURATION_FLAG_THRESHOLD_DAYS: u64 = 400;

/// Owner labels that do not count as distinct people.
const PLACEHOLDER_OWNERS: [&str; 5] = ["tbd", "unassigned", "n/a", "various", ""];

/// A detected cross-stage inconsistency.
///
/// Ephemeral: produced and consumed within a single turn, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contradiction {
    pub description: String,
    pub clarification_question: String,
}

/// A single consistency rule for the tasks stage.
type TasksRule = fn(&TasksData, &ConstraintsData) -> Option<Contradiction>;

/// Stage-keyed contradiction rule registry.
#[derive(Debug, Default)]
pub struct ContradictionChecker;

impl ContradictionChecker {
    pub fn new() -> Self {
        Self
    }

    /// Checks a newly extracted record against committed stage data.
    ///
    /// Returns at most one contradiction per turn (first matching rule).
    pub fn check(
        &self,
        stage: PlanningStage,
        record: &StageRecord,
        committed: &BTreeMap<PlanningStage, Value>,
    ) -> Option<Contradiction> {
        match stage {
            PlanningStage::TasksAndSubtasks => {
                let StageRecord::Tasks(tasks) = record else {
                    return None;
                };
                let constraints = Self::committed_constraints(committed)?;
                Self::rules_for_tasks()
                    .iter()
                    .find_map(|rule| rule(tasks, &constraints))
            }
            _ => None,
        }
    }

    /// Ordered rules for the tasks-vs-constraints transition.
    fn rules_for_tasks() -> &'static [TasksRule] {
        &[owner_count_rule, duration_sum_rule]
    }

    /// Parses the committed constraints record.
    ///
    /// A missing or unparseable record makes every tasks rule inapplicable
    /// for this turn; parse failure is logged and swallowed.
    fn committed_constraints(
        committed: &BTreeMap<PlanningStage, Value>,
    ) -> Option<ConstraintsData> {
        let raw = committed.get(&PlanningStage::StrategicConstraints)?;
        match serde_json::from_value(raw.clone()) {
            Ok(constraints) => Some(constraints),
            Err(err) => {
                warn!(error = %err, "could not parse constraints for contradiction check");
                None
            }
        }
    }
}

/// Rule 1: distinct task owners must not exceed the stated team size.
fn owner_count_rule(tasks: &TasksData, constraints: &ConstraintsData) -> Option<Contradiction> {
    let team_size = constraints.team_size?;

    let unique_owners: BTreeSet<String> = tasks
        .tasks
        .iter()
        .filter_map(|t| t.owner.as_deref())
        .map(|o| o.trim().to_lowercase())
        .filter(|o| !PLACEHOLDER_OWNERS.contains(&o.as_str()))
        .collect();

    let owner_count = unique_owners.len();
    if owner_count <= team_size as usize {
        return None;
    }

    let names = unique_owners.into_iter().collect::<Vec<_>>().join(", ");
    Some(Contradiction {
        description: format!(
            "You mentioned a team of {} in Stage 2, but I'm now seeing {} distinct task owners: {}.",
            team_size, owner_count, names
        ),
        clarification_question: "Should I update the team size, or are some of these the same \
                                 person referenced by different names?"
            .to_string(),
    })
}

/// Rule 2: total sequential duration should not dramatically exceed a
/// typical project timeline.
fn duration_sum_rule(tasks: &TasksData, constraints: &ConstraintsData) -> Option<Contradiction> {
    let total_days: u64 = tasks
        .tasks
        .iter()
        .filter_map(|t| t.duration_days)
        .map(u64::from)
        .sum();

    if total_days <= DURATION_FLAG_THRESHOLD_DAYS {
        return None;
    }

    let deadline_str = constraints
        .deadline
        .as_deref()
        .map(|d| format!(" against your deadline of '{}'", d))
        .unwrap_or_default();

    Some(Contradiction {
        description: format!(
            "The sum of all task durations is approximately {} days{}. \
             That seems longer than a typical project timeline.",
            total_days, deadline_str
        ),
        clarification_question: "Are these tasks meant to run in parallel, or should we revisit \
                                 some of the duration estimates?"
            .to_string(),
    })
}
