//! GetPlanHandler - compiles and renders a completed session's plan.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::{MarkdownRenderer, PlanCompiler, PlanningError, ProjectPlan};
use crate::ports::SessionStore;

/// The compiled plan together with its rendering.
#[derive(Debug, Clone)]
pub struct PlanArtifacts {
    pub plan: ProjectPlan,
    pub markdown: String,
}

/// Handler for plan retrieval.
///
/// Plans are never stored; every retrieval recompiles from the committed
/// stage records.
pub struct GetPlanHandler {
    store: Arc<dyn SessionStore>,
    compiler: PlanCompiler,
    renderer: MarkdownRenderer,
}

impl GetPlanHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            compiler: PlanCompiler::new(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` for unknown ids
    /// - `PlanNotReady` (carrying the current stage) for incomplete sessions
    /// - `MalformedStageData` when a committed record fails its schema
    pub async fn handle(&self, session_id: SessionId) -> Result<PlanArtifacts, PlanningError> {
        let session = self
            .store
            .get(&session_id)
            .await?
            .ok_or(PlanningError::SessionNotFound(session_id))?;

        let plan = self.compiler.compile(&session)?;
        let markdown = self.renderer.render(&plan);

        Ok(PlanArtifacts { plan, markdown })
    }
}
