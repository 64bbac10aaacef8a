//! Structured records extracted per planning stage.
//!
//! Each stage has its own record shape and a completeness predicate that
//! gates stage advancement. Required string fields the oracle could not
//! find in the conversation carry the [`MISSING_SENTINEL`] placeholder;
//! genuinely optional fields are `None` when not yet discussed. The two are
//! deliberately distinct: a sentinel means "asked the oracle, nothing
//! there", absence means "not part of the conversation yet".

use serde::{Deserialize, Serialize};

use super::stage::PlanningStage;

/// Placeholder the oracle writes into required string fields it could not
/// fill from the conversation.
pub const MISSING_SENTINEL: &str = "MISSING";

/// Recognized project type values for [`OutcomeData::project_type`].
pub const PROJECT_TYPE_GENERAL: &str = "general";
pub const PROJECT_TYPE_PROGRAM: &str = "program";

// ═══════════════════════════════════════════════════════════════════════════
// Stage 1: Define Outcome
// ═══════════════════════════════════════════════════════════════════════════

/// Extraction result for the Define Outcome stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeData {
    /// Project name (required; sentinel when not yet discussed).
    pub project_name: String,
    /// `"general"` or `"program"`. Kept as a string so an unrecognized or
    /// sentinel value fails the predicate instead of failing the parse.
    pub project_type: String,
    /// What "done" looks like (required).
    pub success_definition: String,
    /// At least one quantifiable outcome (required).
    pub measurable_result: String,
    /// Key stakeholders named so far.
    #[serde(default)]
    pub key_stakeholders: Vec<String>,
}

impl OutcomeData {
    /// True when all required fields are present and the project type is
    /// one of the two recognized values.
    pub fn is_complete(&self) -> bool {
        fn filled(s: &str) -> bool {
            !s.is_empty() && s != MISSING_SENTINEL
        }

        filled(&self.project_name)
            && filled(&self.success_definition)
            && filled(&self.measurable_result)
            && matches!(
                self.project_type.as_str(),
                PROJECT_TYPE_GENERAL | PROJECT_TYPE_PROGRAM
            )
    }

    /// True when this outcome describes a program (pillar-structured) plan.
    pub fn is_program(&self) -> bool {
        self.project_type == PROJECT_TYPE_PROGRAM
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage 2: Strategic Constraints
// ═══════════════════════════════════════════════════════════════════════════

/// Extraction result for the Strategic Constraints stage.
///
/// All fields are optional; the oracle must not invent values. The stage is
/// satisfied once either a deadline or at least one hard constraint exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintsData {
    /// Target deadline or end date, verbatim as stated (e.g. "Q4 2026").
    #[serde(default)]
    pub deadline: Option<String>,
    /// Budget statement, verbatim.
    #[serde(default)]
    pub budget: Option<String>,
    /// Stated team headcount.
    #[serde(default)]
    pub team_size: Option<u32>,
    /// Preferred methodology (Agile, Kanban, Waterfall, ...).
    #[serde(default)]
    pub methodology: Option<String>,
    /// Non-negotiable constraints (regulatory, tech stack, geography).
    #[serde(default)]
    pub key_constraints: Vec<String>,
    /// Working assumptions the team is making.
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl ConstraintsData {
    /// True when a deadline or at least one key constraint was captured.
    pub fn is_complete(&self) -> bool {
        self.deadline.as_deref().is_some_and(|d| !d.is_empty())
            || !self.key_constraints.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage 3: Phases & Milestones
// ═══════════════════════════════════════════════════════════════════════════

/// One milestone deliverable within a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    /// Milestone name. Program plans use the `"Pillar - Label"` convention.
    pub name: String,
    /// Artifact or result that marks this milestone complete.
    pub deliverable: String,
    /// Approximate timeline, if discussed.
    #[serde(default)]
    pub timeline: Option<String>,
    /// Owner, if known.
    #[serde(default)]
    pub owner: Option<String>,
}

/// Extraction result for the Phases & Milestones stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasesData {
    /// Phase names in declared order.
    #[serde(default)]
    pub phases: Vec<String>,
    /// Milestone definitions in declared order.
    #[serde(default)]
    pub milestones: Vec<MilestoneDefinition>,
}

impl PhasesData {
    /// True with at least two phases and one milestone.
    pub fn is_complete(&self) -> bool {
        self.phases.len() >= 2 && !self.milestones.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage 4: Tasks & Subtasks
// ═══════════════════════════════════════════════════════════════════════════

/// A sub-task under a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTaskDefinition {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub deliverable: Option<String>,
}

/// A task attributed to a phase or milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    /// Phase or milestone name this task belongs to. Matched against
    /// milestone names by exact string comparison at assembly time.
    pub phase: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<SubTaskDefinition>,
}

impl TaskDefinition {
    /// True when the task has a non-empty owner.
    pub fn has_owner(&self) -> bool {
        self.owner.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Extraction result for the Tasks & Subtasks stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksData {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl TasksData {
    /// True with at least one task, at least one of which has an owner.
    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().any(TaskDefinition::has_owner)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage 5: Risk & Governance
// ═══════════════════════════════════════════════════════════════════════════

/// One identified risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDefinition {
    pub description: String,
    /// `"high"`, `"medium"`, or `"low"`.
    pub severity: String,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// One KPI to track project success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub metric: String,
    #[serde(default)]
    pub target: Option<String>,
}

/// Extraction result for the Risk & Governance stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskGovernanceData {
    #[serde(default)]
    pub risks: Vec<RiskDefinition>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<KpiDefinition>,
    #[serde(default)]
    pub external_vendors: Vec<String>,
    #[serde(default)]
    pub review_cadence: Option<String>,
}

impl RiskGovernanceData {
    /// True with at least one risk and one stakeholder.
    pub fn is_complete(&self) -> bool {
        !self.risks.is_empty() && !self.stakeholders.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tagged record over all five shapes
// ═══════════════════════════════════════════════════════════════════════════

/// The structured record extracted for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageRecord {
    Outcome(OutcomeData),
    Constraints(ConstraintsData),
    Phases(PhasesData),
    Tasks(TasksData),
    RiskGovernance(RiskGovernanceData),
}

impl StageRecord {
    /// Parses a raw oracle value into the record shape for `stage`.
    ///
    /// A shape mismatch is an `Err` here; callers in the turn pipeline treat
    /// it as "no structured result", never as a turn failure.
    pub fn from_value(
        stage: PlanningStage,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match stage {
            PlanningStage::DefineOutcome => Self::Outcome(serde_json::from_value(value)?),
            PlanningStage::StrategicConstraints => {
                Self::Constraints(serde_json::from_value(value)?)
            }
            PlanningStage::PhasesAndMilestones => Self::Phases(serde_json::from_value(value)?),
            PlanningStage::TasksAndSubtasks => Self::Tasks(serde_json::from_value(value)?),
            PlanningStage::RiskAndGovernance => {
                Self::RiskGovernance(serde_json::from_value(value)?)
            }
            PlanningStage::Complete => {
                return Err(serde::de::Error::custom(
                    "the complete stage collects no data",
                ))
            }
        })
    }

    /// Runs the completeness predicate of the underlying stage record.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Outcome(d) => d.is_complete(),
            Self::Constraints(d) => d.is_complete(),
            Self::Phases(d) => d.is_complete(),
            Self::Tasks(d) => d.is_complete(),
            Self::RiskGovernance(d) => d.is_complete(),
        }
    }

    /// Serializes the record back to the raw value committed on a session.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("stage records always serialize")
    }
}
