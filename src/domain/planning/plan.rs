//! Compiled project plan document.
//!
//! A [`ProjectPlan`] is derived on demand from the five committed stage
//! records; it is never stored or mutated. General plans nest
//! milestone → task → sub-task; program plans add a pillar level above
//! milestones. Exactly one of the two topologies is populated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::Timestamp;

/// The two recognized plan topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Flat ordered milestones, single workstream.
    General,
    /// Pillars grouping milestones, parallel workstreams.
    Program,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Program => write!(f, "program"),
        }
    }
}

impl FromStr for ProjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "program" => Ok(Self::Program),
            _ => Err(()),
        }
    }
}

/// A sub-task in the compiled plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Display-oriented timeline string, e.g. `"3d"`.
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub deliverable: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A task in the compiled plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
}

/// A milestone owning its matched tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    #[serde(default)]
    pub deliverable: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Top-level grouping used only by program plans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub name: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// One identified risk in the governance block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub description: String,
    pub severity: String,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// One KPI in the governance block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    pub metric: String,
    #[serde(default)]
    pub target: Option<String>,
}

/// Governance and risk summary attached to every plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceInfo {
    #[serde(default)]
    pub stakeholders: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub external_vendors: Vec<String>,
    #[serde(default)]
    pub review_cadence: Option<String>,
}

/// The compiled plan document.
///
/// Exactly one of `milestones` (general) and `pillars` (program) is
/// populated, matching `project_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub project_name: String,
    pub project_type: ProjectType,
    pub success_definition: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub methodology: Option<String>,

    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub pillars: Vec<Pillar>,

    pub governance: GovernanceInfo,

    /// When this plan was compiled. The only nondeterministic field.
    pub generated_at: Timestamp,
}
