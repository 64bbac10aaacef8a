//! Integration tests for the full five-stage planning flow.
//!
//! Drives the turn pipeline end to end with the mock provider:
//! 1. Each stage advances only on a usable extraction
//! 2. Contradictions block advancement and substitute the reply
//! 3. A completed session compiles and renders a plan
//! 4. Terminal sessions short-circuit without oracle calls

use std::sync::Arc;

use serde_json::json;

use plan_compass::adapters::ai::MockAiProvider;
use plan_compass::adapters::storage::InMemorySessionStore;
use plan_compass::application::handlers::{
    DeleteSessionHandler, GetPlanHandler, ProcessTurnCommand, ProcessTurnHandler,
};
use plan_compass::domain::foundation::SessionId;
use plan_compass::ports::SessionStore;
use plan_compass::domain::planning::{
    PlanningError, PlanningStage, PlanningStateMachine, ProjectType,
};

// =============================================================================
// Test infrastructure
// =============================================================================

fn turn_handler(provider: MockAiProvider, store: Arc<InMemorySessionStore>) -> ProcessTurnHandler {
    ProcessTurnHandler::new(store, PlanningStateMachine::new(Arc::new(provider), 1024))
}

fn outcome_value(project_type: &str) -> serde_json::Value {
    json!({
        "project_name": "Orion Rollout",
        "project_type": project_type,
        "success_definition": "New platform live for all regions",
        "measurable_result": "3 regions migrated by Q3 2027",
        "key_stakeholders": ["COO"]
    })
}

fn constraints_value() -> serde_json::Value {
    json!({
        "deadline": "Q3 2027",
        "budget": "$1.2M",
        "team_size": 4,
        "methodology": "Kanban",
        "key_constraints": ["EU data residency"],
        "assumptions": []
    })
}

fn phases_value() -> serde_json::Value {
    json!({
        "phases": ["Pilot", "Rollout"],
        "milestones": [
            {"name": "Pilot", "deliverable": "One region migrated", "timeline": "Q1 2027"},
            {"name": "Rollout", "deliverable": "All regions migrated", "timeline": "Q3 2027"}
        ]
    })
}

fn tasks_value() -> serde_json::Value {
    json!({
        "tasks": [
            {
                "name": "Migrate pilot region",
                "phase": "Pilot",
                "owner": "Ana",
                "duration_days": 30,
                "subtasks": [
                    {"name": "Data export", "owner": "Ana", "duration_days": 5}
                ]
            },
            {"name": "Migrate remaining regions", "phase": "Rollout", "owner": "Ben",
             "duration_days": 60}
        ]
    })
}

fn governance_value() -> serde_json::Value {
    json!({
        "risks": [
            {"description": "Regional downtime during cutover", "severity": "high",
             "mitigation": "Blue/green deployment"}
        ],
        "stakeholders": ["COO", "Head of IT"],
        "kpis": [{"metric": "Migration defects", "target": "< 10"}],
        "external_vendors": ["CloudCo"],
        "review_cadence": "Weekly steering"
    })
}

/// Runs a full five-stage conversation and returns the session id.
async fn drive_to_completion(store: Arc<InMemorySessionStore>) -> SessionId {
    let stage_payloads = [
        outcome_value("general"),
        constraints_value(),
        phases_value(),
        tasks_value(),
        governance_value(),
    ];

    let mut session_id: Option<SessionId> = None;
    for payload in stage_payloads {
        let provider = MockAiProvider::new()
            .with_reply("Captured.")
            .with_extraction(payload);
        let result = turn_handler(provider, Arc::clone(&store))
            .handle(ProcessTurnCommand {
                session_id,
                message: "here is the next piece".to_string(),
            })
            .await
            .unwrap();
        session_id = Some(*result.session.id());
    }
    session_id.unwrap()
}

// =============================================================================
// Stage progression
// =============================================================================

#[tokio::test]
async fn five_usable_extractions_complete_the_session() {
    let store = Arc::new(InMemorySessionStore::new());
    let session_id = drive_to_completion(Arc::clone(&store)).await;

    let session = store.get(&session_id).await.unwrap().unwrap();
    assert!(session.is_complete());
    assert_eq!(session.current_stage(), PlanningStage::Complete);
    assert_eq!(session.stage_data().len(), 5);
}

#[tokio::test]
async fn stage_index_never_decreases_across_turns() {
    let store = Arc::new(InMemorySessionStore::new());

    // Alternate unusable and usable extractions; the index must only grow.
    let mut session_id: Option<SessionId> = None;
    let mut last_index = 0usize;
    let turns: Vec<MockAiProvider> = vec![
        MockAiProvider::new().with_reply("r").with_extraction_decline(),
        MockAiProvider::new().with_reply("r").with_extraction(outcome_value("general")),
        MockAiProvider::new().with_reply("r").with_extraction(json!({"deadline": ""})),
        MockAiProvider::new().with_reply("r").with_extraction(constraints_value()),
    ];

    for provider in turns {
        let result = turn_handler(provider, Arc::clone(&store))
            .handle(ProcessTurnCommand {
                session_id,
                message: "turn".to_string(),
            })
            .await
            .unwrap();
        session_id = Some(*result.session.id());

        let index = result.session.current_stage().index();
        assert!(index >= last_index);
        last_index = index;

        // Committed data exists exactly for stages before the current one.
        for stage in PlanningStage::data_stages() {
            assert_eq!(
                result.session.stage_record(stage).is_some(),
                stage.index() < index
            );
        }
    }

    assert_eq!(last_index, PlanningStage::PhasesAndMilestones.index());
}

#[tokio::test]
async fn transition_notice_is_appended_on_commit() {
    let store = Arc::new(InMemorySessionStore::new());
    let provider = MockAiProvider::new()
        .with_reply("Got the outcome.")
        .with_extraction(outcome_value("general"));

    let result = turn_handler(provider, store)
        .handle(ProcessTurnCommand {
            session_id: None,
            message: "project details".to_string(),
        })
        .await
        .unwrap();

    assert!(result.reply.starts_with("Got the outcome."));
    assert!(result.reply.contains("---"));
    assert!(result.reply.contains("Stage 2: Strategic Constraints"));
    assert_eq!(result.session.current_stage().progress_percent(), 20);
}

// =============================================================================
// Contradiction handling
// =============================================================================

#[tokio::test]
async fn contradiction_blocks_the_commit_until_clarified() {
    let store = Arc::new(InMemorySessionStore::new());

    // Stages 1-3 with a team size of 2.
    let mut session_id: Option<SessionId> = None;
    let mut constraints = constraints_value();
    constraints["team_size"] = json!(2);
    for payload in [outcome_value("general"), constraints, phases_value()] {
        let provider = MockAiProvider::new().with_reply("ok").with_extraction(payload);
        let result = turn_handler(provider, Arc::clone(&store))
            .handle(ProcessTurnCommand {
                session_id,
                message: "next".to_string(),
            })
            .await
            .unwrap();
        session_id = Some(*result.session.id());
    }

    // Three distinct owners against a team of two.
    let conflicted = MockAiProvider::new().with_reply("ok").with_extraction(json!({
        "tasks": [
            {"name": "A", "phase": "Pilot", "owner": "Ana"},
            {"name": "B", "phase": "Pilot", "owner": "Ben"},
            {"name": "C", "phase": "Rollout", "owner": "Cal"}
        ]
    }));
    let blocked = turn_handler(conflicted, Arc::clone(&store))
        .handle(ProcessTurnCommand {
            session_id,
            message: "task owners".to_string(),
        })
        .await
        .unwrap();

    assert!(blocked.reply.starts_with("I noticed a potential conflict:"));
    assert!(blocked.reply.contains('3'));
    assert!(blocked.reply.contains('2'));
    assert_eq!(
        blocked.session.current_stage(),
        PlanningStage::TasksAndSubtasks
    );
    assert!(blocked
        .session
        .stage_record(PlanningStage::TasksAndSubtasks)
        .is_none());

    // The clarified turn commits.
    let clarified = MockAiProvider::new().with_reply("ok").with_extraction(json!({
        "tasks": [
            {"name": "A", "phase": "Pilot", "owner": "Ana"},
            {"name": "B", "phase": "Pilot", "owner": "Ben"}
        ]
    }));
    let advanced = turn_handler(clarified, Arc::clone(&store))
        .handle(ProcessTurnCommand {
            session_id,
            message: "Cal was a typo, it's Ben".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        advanced.session.current_stage(),
        PlanningStage::RiskAndGovernance
    );
}

// =============================================================================
// Plan retrieval
// =============================================================================

#[tokio::test]
async fn completed_session_compiles_and_renders() {
    let store = Arc::new(InMemorySessionStore::new());
    let session_id = drive_to_completion(Arc::clone(&store)).await;

    let artifacts = GetPlanHandler::new(store).handle(session_id).await.unwrap();

    assert_eq!(artifacts.plan.project_name, "Orion Rollout");
    assert_eq!(artifacts.plan.project_type, ProjectType::General);
    assert_eq!(artifacts.plan.milestones.len(), 2);
    assert_eq!(artifacts.plan.milestones[0].tasks.len(), 1);
    assert_eq!(
        artifacts.plan.milestones[0].tasks[0].subtasks[0]
            .timeline
            .as_deref(),
        Some("5d")
    );
    assert_eq!(artifacts.plan.governance.stakeholders.len(), 2);

    assert!(artifacts.markdown.contains("# Orion Rollout"));
    assert!(artifacts.markdown.contains("## Pilot"));
    assert!(artifacts.markdown.contains("[HIGH] Regional downtime during cutover"));
    assert!(artifacts.markdown.contains("### Review Cadence"));
}

#[tokio::test]
async fn program_sessions_compile_into_pillars() {
    let store = Arc::new(InMemorySessionStore::new());

    let mut session_id: Option<SessionId> = None;
    let payloads = [
        outcome_value("program"),
        constraints_value(),
        json!({
            "phases": ["Technology", "People"],
            "milestones": [
                {"name": "Technology - MVP", "deliverable": "Deployed product"},
                {"name": "People - Onboarding", "deliverable": "Team onboarded"}
            ]
        }),
        json!({
            "tasks": [{"name": "Ship it", "phase": "Technology - MVP", "owner": "Ana"}]
        }),
        governance_value(),
    ];
    for payload in payloads {
        let provider = MockAiProvider::new().with_reply("ok").with_extraction(payload);
        let result = turn_handler(provider, Arc::clone(&store))
            .handle(ProcessTurnCommand {
                session_id,
                message: "next".to_string(),
            })
            .await
            .unwrap();
        session_id = Some(*result.session.id());
    }

    let artifacts = GetPlanHandler::new(Arc::clone(&store) as Arc<dyn plan_compass::ports::SessionStore>)
        .handle(session_id.unwrap())
        .await
        .unwrap();

    assert!(artifacts.plan.milestones.is_empty());
    let pillar_names: Vec<_> = artifacts.plan.pillars.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(pillar_names, vec!["Technology", "People"]);
    // The task declared the full "Pillar - Label" milestone name.
    assert_eq!(artifacts.plan.pillars[0].milestones[0].tasks.len(), 1);
    assert!(artifacts.markdown.contains("## Pillar: Technology"));
    assert!(artifacts.markdown.contains("### MVP"));
}

#[tokio::test]
async fn plan_before_completion_reports_current_stage() {
    let store = Arc::new(InMemorySessionStore::new());
    let provider = MockAiProvider::new()
        .with_reply("ok")
        .with_extraction(outcome_value("general"));
    let result = turn_handler(provider, Arc::clone(&store))
        .handle(ProcessTurnCommand {
            session_id: None,
            message: "start".to_string(),
        })
        .await
        .unwrap();

    let err = GetPlanHandler::new(Arc::clone(&store) as Arc<dyn plan_compass::ports::SessionStore>)
        .handle(*result.session.id())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::PlanNotReady {
            current_stage: PlanningStage::StrategicConstraints
        }
    ));
}

#[tokio::test]
async fn unknown_session_is_reported_distinctly() {
    let store = Arc::new(InMemorySessionStore::new());
    let err = GetPlanHandler::new(store)
        .handle(SessionId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PlanningError::SessionNotFound(_)));
}

// =============================================================================
// Terminal behavior
// =============================================================================

#[tokio::test]
async fn completed_sessions_absorb_turns_without_oracle_calls() {
    let store = Arc::new(InMemorySessionStore::new());
    let session_id = drive_to_completion(Arc::clone(&store)).await;

    let provider = MockAiProvider::new();
    let calls = provider.call_log();

    let result = turn_handler(provider, Arc::clone(&store))
        .handle(ProcessTurnCommand {
            session_id: Some(session_id),
            message: "can we add more?".to_string(),
        })
        .await
        .unwrap();

    assert!(result.reply.contains("already complete"));
    assert!(result.session.is_complete());
    assert_eq!(calls.lock().unwrap().len(), 0);

    // The absorbed turn still lands in the persisted log.
    let session = store.get(&session_id).await.unwrap().unwrap();
    assert_eq!(
        session.messages().last().map(|m| m.content.as_str()),
        Some(result.reply.as_str())
    );
}

#[tokio::test]
async fn delete_removes_the_session() {
    let store = Arc::new(InMemorySessionStore::new());
    let session_id = drive_to_completion(Arc::clone(&store)).await;

    DeleteSessionHandler::new(Arc::clone(&store) as Arc<dyn plan_compass::ports::SessionStore>)
        .handle(session_id)
        .await
        .unwrap();

    assert!(store.get(&session_id).await.unwrap().is_none());
}
