//! Planning stages of the guided conversation.
//!
//! Stages form a strict linear progression. Each data-collecting stage
//! gathers one structured record; `Complete` is terminal and absorbing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the five-stage planning conversation.
///
/// Stages advance strictly in declaration order:
/// `DefineOutcome` → `StrategicConstraints` → `PhasesAndMilestones` →
/// `TasksAndSubtasks` → `RiskAndGovernance` → `Complete`.
///
/// `Complete` collects no data and never advances further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStage {
    /// Stage 1: project name, type, success definition, measurable result.
    DefineOutcome,

    /// Stage 2: deadline, budget, team size, methodology, constraints.
    StrategicConstraints,

    /// Stage 3: major phases and milestone deliverables.
    PhasesAndMilestones,

    /// Stage 4: task decomposition with owners, durations, dependencies.
    TasksAndSubtasks,

    /// Stage 5: risks, stakeholders, KPIs, vendors, review cadence.
    RiskAndGovernance,

    /// Terminal stage: all five records committed, plan retrievable.
    Complete,
}

/// All stages in progression order.
pub const STAGE_ORDER: [PlanningStage; 6] = [
    PlanningStage::DefineOutcome,
    PlanningStage::StrategicConstraints,
    PlanningStage::PhasesAndMilestones,
    PlanningStage::TasksAndSubtasks,
    PlanningStage::RiskAndGovernance,
    PlanningStage::Complete,
];

impl PlanningStage {
    /// Returns the stages that collect structured data, in order.
    pub fn data_stages() -> [PlanningStage; 5] {
        [
            Self::DefineOutcome,
            Self::StrategicConstraints,
            Self::PhasesAndMilestones,
            Self::TasksAndSubtasks,
            Self::RiskAndGovernance,
        ]
    }

    /// Returns this stage's position in the progression order.
    pub fn index(&self) -> usize {
        STAGE_ORDER
            .iter()
            .position(|s| s == self)
            .expect("stage is always in STAGE_ORDER")
    }

    /// Returns the next stage, or `self` when terminal.
    pub fn next(&self) -> Self {
        match self {
            Self::DefineOutcome => Self::StrategicConstraints,
            Self::StrategicConstraints => Self::PhasesAndMilestones,
            Self::PhasesAndMilestones => Self::TasksAndSubtasks,
            Self::TasksAndSubtasks => Self::RiskAndGovernance,
            Self::RiskAndGovernance => Self::Complete,
            Self::Complete => Self::Complete,
        }
    }

    /// Returns true for the terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns the fixed human-readable label for progress display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DefineOutcome => "Stage 1: Define Outcome",
            Self::StrategicConstraints => "Stage 2: Strategic Constraints",
            Self::PhasesAndMilestones => "Stage 3: Phases & Milestones",
            Self::TasksAndSubtasks => "Stage 4: Tasks & Subtasks",
            Self::RiskAndGovernance => "Stage 5: Risk & Governance",
            Self::Complete => "Complete",
        }
    }

    /// Returns overall progress as 0-100.
    ///
    /// Computed as `index / (stage count - 1) * 100`, so the first stage is
    /// 0 and the terminal stage is 100.
    pub fn progress_percent(&self) -> u8 {
        ((self.index() * 100) / (STAGE_ORDER.len() - 1)) as u8
    }
}

impl Default for PlanningStage {
    fn default() -> Self {
        Self::DefineOutcome
    }
}

impl fmt::Display for PlanningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DefineOutcome => "define_outcome",
            Self::StrategicConstraints => "strategic_constraints",
            Self::PhasesAndMilestones => "phases_and_milestones",
            Self::TasksAndSubtasks => "tasks_and_subtasks",
            Self::RiskAndGovernance => "risk_and_governance",
            Self::Complete => "complete",
        };
        write!(f, "{}", s)
    }
}
