//! Per-stage behavior table.
//!
//! A fixed lookup table replaces per-stage handler classes: each
//! data-collecting stage maps to its system prompt, extraction instruction,
//! and extraction tool schema. New stages register here; nothing else in the
//! turn pipeline changes shape.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::prompts;
use super::stage::PlanningStage;

/// Everything the turn pipeline needs to drive one data-collecting stage.
#[derive(Debug, Clone)]
pub struct StageProfile {
    pub stage: PlanningStage,
    /// System prompt for the conversational reply call.
    pub system_prompt: String,
    /// Instruction appended as a synthetic user message for extraction.
    pub extraction_prompt: &'static str,
    /// JSON schema of the extraction tool input for this stage.
    pub extraction_schema: Value,
}

static PROFILES: Lazy<Vec<StageProfile>> = Lazy::new(|| {
    PlanningStage::data_stages()
        .into_iter()
        .map(|stage| StageProfile {
            stage,
            system_prompt: prompts::stage_system_prompt(stage)
                .expect("data stages always have a system prompt"),
            extraction_prompt: prompts::stage_extraction_prompt(stage)
                .expect("data stages always have an extraction prompt"),
            extraction_schema: extraction_schema(stage),
        })
        .collect()
});

/// Looks up the profile for a stage; `None` for the terminal stage.
pub fn stage_profile(stage: PlanningStage) -> Option<&'static StageProfile> {
    PROFILES.iter().find(|p| p.stage == stage)
}

fn extraction_schema(stage: PlanningStage) -> Value {
    match stage {
        PlanningStage::DefineOutcome => json!({
            "type": "object",
            "properties": {
                "project_name": { "type": "string" },
                "project_type": { "type": "string", "enum": ["general", "program"] },
                "success_definition": { "type": "string" },
                "measurable_result": { "type": "string" },
                "key_stakeholders": { "type": "array", "items": { "type": "string" } }
            },
            "required": [
                "project_name", "project_type", "success_definition", "measurable_result"
            ]
        }),
        PlanningStage::StrategicConstraints => json!({
            "type": "object",
            "properties": {
                "deadline": { "type": ["string", "null"] },
                "budget": { "type": ["string", "null"] },
                "team_size": { "type": ["integer", "null"], "minimum": 0 },
                "methodology": { "type": ["string", "null"] },
                "key_constraints": { "type": "array", "items": { "type": "string" } },
                "assumptions": { "type": "array", "items": { "type": "string" } }
            },
            "required": []
        }),
        PlanningStage::PhasesAndMilestones => json!({
            "type": "object",
            "properties": {
                "phases": { "type": "array", "items": { "type": "string" } },
                "milestones": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "deliverable": { "type": "string" },
                            "timeline": { "type": ["string", "null"] },
                            "owner": { "type": ["string", "null"] }
                        },
                        "required": ["name", "deliverable"]
                    }
                }
            },
            "required": ["phases", "milestones"]
        }),
        PlanningStage::TasksAndSubtasks => json!({
            "type": "object",
            "properties": {
                "tasks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "phase": { "type": "string" },
                            "owner": { "type": ["string", "null"] },
                            "duration_days": { "type": ["integer", "null"], "minimum": 0 },
                            "dependencies": { "type": "array", "items": { "type": "string" } },
                            "subtasks": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "name": { "type": "string" },
                                        "owner": { "type": ["string", "null"] },
                                        "duration_days": {
                                            "type": ["integer", "null"], "minimum": 0
                                        },
                                        "dependencies": {
                                            "type": "array", "items": { "type": "string" }
                                        },
                                        "deliverable": { "type": ["string", "null"] }
                                    },
                                    "required": ["name"]
                                }
                            }
                        },
                        "required": ["name", "phase"]
                    }
                }
            },
            "required": ["tasks"]
        }),
        PlanningStage::RiskAndGovernance => json!({
            "type": "object",
            "properties": {
                "risks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": { "type": "string" },
                            "severity": { "type": "string", "enum": ["high", "medium", "low"] },
                            "mitigation": { "type": ["string", "null"] }
                        },
                        "required": ["description", "severity"]
                    }
                },
                "stakeholders": { "type": "array", "items": { "type": "string" } },
                "kpis": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "metric": { "type": "string" },
                            "target": { "type": ["string", "null"] }
                        },
                        "required": ["metric"]
                    }
                },
                "external_vendors": { "type": "array", "items": { "type": "string" } },
                "review_cadence": { "type": ["string", "null"] }
            },
            "required": ["risks", "stakeholders", "kpis"]
        }),
        PlanningStage::Complete => Value::Null,
    }
}
