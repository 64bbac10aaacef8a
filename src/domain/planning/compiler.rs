//! Plan compilation from committed stage records.
//!
//! The compiler is a pure function of the five committed records (plus the
//! generation timestamp, the one documented source of nondeterminism).
//! Compiling the same session twice yields identical plans modulo
//! `generated_at`.

use std::collections::HashMap;

use crate::domain::planning::errors::PlanningError;
use crate::domain::planning::plan::{
    GovernanceInfo, Kpi, Milestone, Pillar, ProjectPlan, ProjectType, Risk, SubTask, Task,
};
use crate::domain::planning::session::PlanningSession;
use crate::domain::planning::stage::PlanningStage;
use crate::domain::planning::stage_data::{
    ConstraintsData, OutcomeData, PhasesData, RiskGovernanceData, TaskDefinition, TasksData,
};
use crate::domain::foundation::Timestamp;

use serde::de::DeserializeOwned;
use tracing::debug;

/// Separator splitting program milestone names into pillar and label.
const PILLAR_SEPARATOR: &str = " - ";

/// Pillar name used when a program declares no phases at all.
const FALLBACK_PILLAR: &str = "Program";

/// Assembles a typed [`ProjectPlan`] from all five committed records.
#[derive(Debug, Default)]
pub struct PlanCompiler;

impl PlanCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles the session's committed records into a plan.
    ///
    /// # Errors
    ///
    /// - `PlanNotReady` when the session has not completed all five stages
    /// - `MalformedStageData` when a committed record does not match its
    ///   stage schema; compilation never substitutes defaults for required
    ///   top-level fields
    pub fn compile(&self, session: &PlanningSession) -> Result<ProjectPlan, PlanningError> {
        if !session.is_complete() {
            return Err(PlanningError::PlanNotReady {
                current_stage: session.current_stage(),
            });
        }

        let outcome: OutcomeData = committed(session, PlanningStage::DefineOutcome)?;
        let constraints: ConstraintsData =
            committed(session, PlanningStage::StrategicConstraints)?;
        let phases: PhasesData = committed(session, PlanningStage::PhasesAndMilestones)?;
        let tasks: TasksData = committed(session, PlanningStage::TasksAndSubtasks)?;
        let governance: RiskGovernanceData =
            committed(session, PlanningStage::RiskAndGovernance)?;

        let project_type: ProjectType = outcome.project_type.parse().map_err(|_| {
            PlanningError::MalformedStageData {
                stage: PlanningStage::DefineOutcome,
                reason: format!("unrecognized project type '{}'", outcome.project_type),
            }
        })?;

        // Group tasks by declared phase name for milestone attachment.
        // Matching is exact-string; unmatched names leave empty milestones.
        let mut tasks_by_phase: HashMap<&str, Vec<&TaskDefinition>> = HashMap::new();
        for task in &tasks.tasks {
            tasks_by_phase.entry(task.phase.as_str()).or_default().push(task);
        }
        for phase_name in tasks_by_phase.keys() {
            if !phases.milestones.iter().any(|m| m.name == *phase_name) {
                debug!(phase = %phase_name, "task phase matches no milestone name");
            }
        }

        let (milestones, pillars) = match project_type {
            ProjectType::General => (build_general(&phases, &tasks_by_phase), Vec::new()),
            ProjectType::Program => (Vec::new(), build_program(&phases, &tasks_by_phase)),
        };

        Ok(ProjectPlan {
            project_name: outcome.project_name,
            project_type,
            success_definition: outcome.success_definition,
            deadline: constraints.deadline,
            budget: constraints.budget,
            team_size: constraints.team_size,
            methodology: constraints.methodology,
            milestones,
            pillars,
            governance: GovernanceInfo {
                stakeholders: governance.stakeholders,
                kpis: governance
                    .kpis
                    .into_iter()
                    .map(|k| Kpi {
                        metric: k.metric,
                        target: k.target,
                    })
                    .collect(),
                risks: governance
                    .risks
                    .into_iter()
                    .map(|r| Risk {
                        description: r.description,
                        severity: r.severity,
                        mitigation: r.mitigation,
                    })
                    .collect(),
                external_vendors: governance.external_vendors,
                review_cadence: governance.review_cadence,
            },
            generated_at: Timestamp::now(),
        })
    }
}

/// Reads and parses one committed record off the session.
fn committed<T: DeserializeOwned>(
    session: &PlanningSession,
    stage: PlanningStage,
) -> Result<T, PlanningError> {
    let raw = session
        .stage_record(stage)
        .ok_or_else(|| PlanningError::MalformedStageData {
            stage,
            reason: "record missing from completed session".to_string(),
        })?;
    serde_json::from_value(raw.clone()).map_err(|err| PlanningError::MalformedStageData {
        stage,
        reason: err.to_string(),
    })
}

/// General plan: milestones in declared order, each with its matched tasks.
fn build_general(
    phases: &PhasesData,
    tasks_by_phase: &HashMap<&str, Vec<&TaskDefinition>>,
) -> Vec<Milestone> {
    phases
        .milestones
        .iter()
        .map(|def| Milestone {
            name: def.name.clone(),
            deliverable: Some(def.deliverable.clone()),
            timeline: def.timeline.clone(),
            owner: def.owner.clone(),
            tasks: build_tasks(tasks_by_phase.get(def.name.as_str())),
        })
        .collect()
}

/// Program plan: pillars in first-seen order, grouping milestones.
///
/// Milestone names split on the first `" - "` into (pillar, label). Names
/// without the separator fall back to the first declared phase as pillar,
/// or the literal `"Program"` when no phases were declared.
fn build_program(
    phases: &PhasesData,
    tasks_by_phase: &HashMap<&str, Vec<&TaskDefinition>>,
) -> Vec<Pillar> {
    let mut pillars: Vec<Pillar> = Vec::new();

    for def in &phases.milestones {
        let (pillar_name, label) = match def.name.split_once(PILLAR_SEPARATOR) {
            Some((pillar, label)) => (pillar.to_string(), label.to_string()),
            None => {
                let fallback = phases
                    .phases
                    .first()
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_PILLAR.to_string());
                (fallback, def.name.clone())
            }
        };

        let milestone = Milestone {
            name: label,
            deliverable: Some(def.deliverable.clone()),
            timeline: def.timeline.clone(),
            owner: def.owner.clone(),
            // Tasks declare the full milestone name, separator included.
            tasks: build_tasks(tasks_by_phase.get(def.name.as_str())),
        };

        match pillars.iter_mut().find(|p| p.name == pillar_name) {
            Some(pillar) => pillar.milestones.push(milestone),
            None => pillars.push(Pillar {
                name: pillar_name,
                milestones: vec![milestone],
            }),
        }
    }

    pillars
}

fn build_tasks(defs: Option<&Vec<&TaskDefinition>>) -> Vec<Task> {
    let Some(defs) = defs else {
        return Vec::new();
    };

    defs.iter()
        .map(|t| Task {
            name: t.name.clone(),
            owner: t.owner.clone(),
            duration_days: t.duration_days,
            dependencies: t.dependencies.clone(),
            subtasks: t
                .subtasks
                .iter()
                .map(|st| SubTask {
                    name: st.name.clone(),
                    owner: st.owner.clone(),
                    deliverable: st.deliverable.clone(),
                    timeline: st
                        .duration_days
                        .filter(|d| *d > 0)
                        .map(|d| format!("{}d", d)),
                    dependencies: st.dependencies.clone(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::planning::stage_data::{
        KpiDefinition, MilestoneDefinition, RiskDefinition, StageRecord, SubTaskDefinition,
    };
    use serde_json::json;

    fn complete_session(project_type: &str) -> PlanningSession {
        let mut session = PlanningSession::new();

        session.commit_and_advance(
            StageRecord::Outcome(OutcomeData {
                project_name: "Test Project".to_string(),
                project_type: project_type.to_string(),
                success_definition: "Launch a working product".to_string(),
                measurable_result: "1000 users by Q4".to_string(),
                key_stakeholders: vec!["CEO".to_string(), "CTO".to_string()],
            })
            .to_value(),
        );

        session.commit_and_advance(
            StageRecord::Constraints(ConstraintsData {
                deadline: Some("Q4 2026".to_string()),
                budget: Some("$500,000".to_string()),
                team_size: Some(5),
                methodology: Some("Agile".to_string()),
                ..Default::default()
            })
            .to_value(),
        );

        session.commit_and_advance(
            StageRecord::Phases(PhasesData {
                phases: vec!["Discovery".to_string(), "Development".to_string()],
                milestones: vec![
                    MilestoneDefinition {
                        name: "Discovery".to_string(),
                        deliverable: "Requirements doc".to_string(),
                        timeline: Some("Month 1".to_string()),
                        owner: Some("PM".to_string()),
                    },
                    MilestoneDefinition {
                        name: "Development".to_string(),
                        deliverable: "Working MVP".to_string(),
                        timeline: Some("Month 4".to_string()),
                        owner: Some("Tech Lead".to_string()),
                    },
                ],
            })
            .to_value(),
        );

        session.commit_and_advance(
            StageRecord::Tasks(TasksData {
                tasks: vec![
                    TaskDefinition {
                        name: "Stakeholder interviews".to_string(),
                        phase: "Discovery".to_string(),
                        owner: Some("PM".to_string()),
                        duration_days: Some(5),
                        subtasks: vec![SubTaskDefinition {
                            name: "Schedule interviews".to_string(),
                            owner: Some("PM".to_string()),
                            duration_days: Some(1),
                            deliverable: Some("Calendar invites sent".to_string()),
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                    TaskDefinition {
                        name: "Build API".to_string(),
                        phase: "Development".to_string(),
                        owner: Some("Backend Dev".to_string()),
                        duration_days: Some(20),
                        ..Default::default()
                    },
                ],
            })
            .to_value(),
        );

        session.commit_and_advance(
            StageRecord::RiskGovernance(RiskGovernanceData {
                risks: vec![RiskDefinition {
                    description: "Key engineer leaves".to_string(),
                    severity: "high".to_string(),
                    mitigation: Some("Cross-train team members".to_string()),
                }],
                stakeholders: vec!["CEO".to_string(), "CTO".to_string(), "PM".to_string()],
                kpis: vec![KpiDefinition {
                    metric: "User signups".to_string(),
                    target: Some("1000".to_string()),
                }],
                external_vendors: vec!["Stripe".to_string()],
                review_cadence: Some("Weekly standup, bi-weekly steering".to_string()),
            })
            .to_value(),
        );

        session
    }

    /// Swaps in a pillar-prefixed milestone set for program assembly tests.
    fn with_program_milestones(session: &mut PlanningSession) {
        let mut session2 = PlanningSession::new();
        for stage in PlanningStage::data_stages() {
            let value = if stage == PlanningStage::PhasesAndMilestones {
                StageRecord::Phases(PhasesData {
                    phases: vec!["Technology".to_string(), "People".to_string()],
                    milestones: vec![
                        MilestoneDefinition {
                            name: "Technology - MVP".to_string(),
                            deliverable: "Deployed product".to_string(),
                            timeline: Some("Q3".to_string()),
                            owner: None,
                        },
                        MilestoneDefinition {
                            name: "People - Onboarding".to_string(),
                            deliverable: "Team onboarded".to_string(),
                            timeline: Some("Q2".to_string()),
                            owner: None,
                        },
                    ],
                })
                .to_value()
            } else {
                session.stage_record(stage).unwrap().clone()
            };
            session2.commit_and_advance(value);
        }
        *session = session2;
    }

    mod general_assembly {
        use super::*;

        #[test]
        fn copies_scalar_header_fields() {
            let plan = PlanCompiler::new().compile(&complete_session("general")).unwrap();
            assert_eq!(plan.project_name, "Test Project");
            assert_eq!(plan.project_type, ProjectType::General);
            assert_eq!(plan.deadline.as_deref(), Some("Q4 2026"));
            assert_eq!(plan.team_size, Some(5));
            assert_eq!(plan.methodology.as_deref(), Some("Agile"));
        }

        #[test]
        fn attaches_tasks_to_matching_milestones() {
            let plan = PlanCompiler::new().compile(&complete_session("general")).unwrap();
            assert_eq!(plan.milestones.len(), 2);
            assert!(plan.pillars.is_empty());

            let discovery = &plan.milestones[0];
            assert_eq!(discovery.name, "Discovery");
            assert_eq!(discovery.tasks.len(), 1);
            assert_eq!(discovery.tasks[0].name, "Stakeholder interviews");
            assert_eq!(discovery.tasks[0].subtasks.len(), 1);
            assert_eq!(discovery.tasks[0].subtasks[0].timeline.as_deref(), Some("1d"));
        }

        #[test]
        fn pillar_style_name_stays_whole_under_general() {
            let mut session = complete_session("general");
            with_program_milestones(&mut session);
            let plan = PlanCompiler::new().compile(&session).unwrap();
            assert_eq!(plan.milestones[0].name, "Technology - MVP");
            assert!(plan.pillars.is_empty());
        }

        #[test]
        fn unmatched_task_phase_leaves_milestone_empty() {
            let source = complete_session("general");
            let mut session = PlanningSession::new();
            for stage in PlanningStage::data_stages() {
                let value = if stage == PlanningStage::TasksAndSubtasks {
                    StageRecord::Tasks(TasksData {
                        tasks: vec![TaskDefinition {
                            name: "Orphan".to_string(),
                            phase: "Disovery".to_string(), // typo on purpose
                            owner: Some("PM".to_string()),
                            ..Default::default()
                        }],
                    })
                    .to_value()
                } else {
                    source.stage_record(stage).unwrap().clone()
                };
                session.commit_and_advance(value);
            }

            let plan = PlanCompiler::new().compile(&session).unwrap();
            assert!(plan.milestones.iter().all(|m| m.tasks.is_empty()));
        }

        #[test]
        fn governance_block_is_carried_over() {
            let plan = PlanCompiler::new().compile(&complete_session("general")).unwrap();
            assert_eq!(plan.governance.risks.len(), 1);
            assert_eq!(plan.governance.risks[0].severity, "high");
            assert_eq!(plan.governance.stakeholders.len(), 3);
            assert_eq!(plan.governance.external_vendors, vec!["Stripe".to_string()]);
        }
    }

    mod program_assembly {
        use super::*;

        #[test]
        fn splits_pillar_prefixed_milestones() {
            let mut session = complete_session("program");
            with_program_milestones(&mut session);

            let plan = PlanCompiler::new().compile(&session).unwrap();
            assert_eq!(plan.project_type, ProjectType::Program);
            assert!(plan.milestones.is_empty());
            assert_eq!(plan.pillars.len(), 2);

            let tech = &plan.pillars[0];
            assert_eq!(tech.name, "Technology");
            assert_eq!(tech.milestones[0].name, "MVP");
            let people = &plan.pillars[1];
            assert_eq!(people.name, "People");
            assert_eq!(people.milestones[0].name, "Onboarding");
        }

        #[test]
        fn unprefixed_milestone_falls_back_to_first_phase() {
            let plan = PlanCompiler::new().compile(&complete_session("program")).unwrap();
            // "Discovery" has no " - " separator; first phase is "Discovery".
            assert_eq!(plan.pillars[0].name, "Discovery");
            assert_eq!(plan.pillars[0].milestones.len(), 2);
        }

        #[test]
        fn no_phases_falls_back_to_the_program_pillar() {
            let source = complete_session("program");
            let mut session = PlanningSession::new();
            for stage in PlanningStage::data_stages() {
                let value = if stage == PlanningStage::PhasesAndMilestones {
                    StageRecord::Phases(PhasesData {
                        phases: vec![],
                        milestones: vec![MilestoneDefinition {
                            name: "MVP".to_string(),
                            deliverable: "Deployed product".to_string(),
                            timeline: None,
                            owner: None,
                        }],
                    })
                    .to_value()
                } else {
                    source.stage_record(stage).unwrap().clone()
                };
                session.commit_and_advance(value);
            }

            let plan = PlanCompiler::new().compile(&session).unwrap();
            assert_eq!(plan.pillars.len(), 1);
            assert_eq!(plan.pillars[0].name, "Program");
        }

        #[test]
        fn pillars_keep_first_seen_order() {
            let mut session = complete_session("program");
            with_program_milestones(&mut session);
            let plan = PlanCompiler::new().compile(&session).unwrap();
            let names: Vec<_> = plan.pillars.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["Technology", "People"]);
        }
    }

    mod preconditions {
        use super::*;

        #[test]
        fn incomplete_session_is_not_ready() {
            let session = PlanningSession::new();
            let err = PlanCompiler::new().compile(&session).unwrap_err();
            assert!(matches!(
                err,
                PlanningError::PlanNotReady {
                    current_stage: PlanningStage::DefineOutcome
                }
            ));
        }

        #[test]
        fn malformed_record_is_a_hard_error() {
            let mut session = PlanningSession::new();
            session.commit_and_advance(json!({"project_name": 42}));
            for _ in 0..4 {
                session.commit_and_advance(json!({}));
            }

            let err = PlanCompiler::new().compile(&session).unwrap_err();
            assert!(matches!(
                err,
                PlanningError::MalformedStageData {
                    stage: PlanningStage::DefineOutcome,
                    ..
                }
            ));
        }

        #[test]
        fn compilation_is_idempotent_modulo_timestamp() {
            let session = complete_session("general");
            let compiler = PlanCompiler::new();
            let mut a = compiler.compile(&session).unwrap();
            let mut b = compiler.compile(&session).unwrap();
            a.generated_at = b.generated_at;
            assert_eq!(a, b);
        }
    }
}
