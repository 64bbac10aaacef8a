//! Planning module - the staged conversation engine and plan compilation.
//!
//! Owns the stage progression state machine, per-stage structured records
//! and completeness predicates, cross-stage contradiction rules, and the
//! compiler/renderer pair that turns committed records into a plan.

mod compiler;
mod contradiction;
mod errors;
mod plan;
pub mod prompts;
mod renderer;
mod session;
mod stage;
mod stage_data;
mod stage_profile;
mod state_machine;

pub use compiler::PlanCompiler;
pub use contradiction::{Contradiction, ContradictionChecker};
pub use errors::PlanningError;
pub use plan::{
    GovernanceInfo, Kpi, Milestone, Pillar, ProjectPlan, ProjectType, Risk, SubTask, Task,
};
pub use renderer::MarkdownRenderer;
pub use session::{ConversationMessage, PlanningSession, TurnRole};
pub use stage::{PlanningStage, STAGE_ORDER};
pub use stage_data::{
    ConstraintsData, KpiDefinition, MilestoneDefinition, OutcomeData, PhasesData,
    RiskDefinition, RiskGovernanceData, StageRecord, SubTaskDefinition, TaskDefinition,
    TasksData, MISSING_SENTINEL,
};
pub use stage_profile::{stage_profile, StageProfile};
pub use state_machine::PlanningStateMachine;
