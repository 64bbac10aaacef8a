//! The stage progression state machine.
//!
//! Orchestrates one conversational turn: reply generation, structured
//! extraction, contradiction checking, and the commit-or-reprompt decision.
//!
//! Per-turn flow:
//! 1. Terminal session: append the turn, return the fixed notice, no oracle
//!    calls.
//! 2. Append the user message to the log.
//! 3. Oracle call 1: conversational reply (failure is fatal to the turn).
//! 4. Oracle call 2: structured extraction attempt (failure, decline,
//!    schema mismatch, and incomplete records all collapse to "no record").
//! 5. With a usable record, run the contradiction check:
//!    a. contradiction: substitute the clarification reply, discard the
//!       record, do not advance;
//!    b. clean: commit the record, advance the stage, append the
//!       transition notice.
//! 6. Append the assistant reply to the log and return it.
//!
//! The turn log mutates on every path, including short-circuits and
//! rejected commits; only `stage_data` and the current stage mutate on the
//! successful commit path.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::ports::{AiProvider, CompletionRequest, ExtractionRequest, Message};

use super::contradiction::ContradictionChecker;
use super::errors::PlanningError;
use super::prompts;
use super::session::{ConversationMessage, PlanningSession, TurnRole};
use super::stage_data::StageRecord;
use super::stage_profile::{stage_profile, StageProfile};

/// Tool name offered to the model for structured extraction.
const EXTRACTION_TOOL: &str = "record_stage_data";

/// Drives the five-stage planning conversation for one session per turn.
pub struct PlanningStateMachine {
    provider: Arc<dyn AiProvider>,
    checker: ContradictionChecker,
    max_tokens: u32,
}

impl PlanningStateMachine {
    pub fn new(provider: Arc<dyn AiProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            checker: ContradictionChecker::new(),
            max_tokens,
        }
    }

    /// Processes one user turn against a session.
    ///
    /// The session is single-writer for the duration of the call. Returns
    /// the assistant reply; the caller persists the updated session.
    ///
    /// # Errors
    ///
    /// Only reply generation failures propagate ([`PlanningError::Oracle`]).
    /// The user message has already been appended when that happens.
    pub async fn process_message(
        &self,
        session: &mut PlanningSession,
        user_message: &str,
    ) -> Result<String, PlanningError> {
        if session.current_stage().is_terminal() {
            let reply = prompts::ALREADY_COMPLETE_NOTICE.to_string();
            session.append_message(ConversationMessage::user(user_message));
            session.append_message(ConversationMessage::assistant(reply.clone()));
            return Ok(reply);
        }

        session.append_message(ConversationMessage::user(user_message));

        let stage = session.current_stage();
        let profile = stage_profile(stage).expect("non-terminal stages always have a profile");

        let mut reply = self.generate_reply(session, profile).await?;

        if let Some(record) = self.attempt_extraction(session, profile).await {
            match self.checker.check(stage, &record, session.stage_data()) {
                Some(contradiction) => {
                    info!(
                        stage = %stage,
                        description = %contradiction.description,
                        "contradiction detected; blocking stage advance"
                    );
                    reply = prompts::contradiction_reply(
                        &contradiction.description,
                        &contradiction.clarification_question,
                    );
                }
                None => {
                    session.commit_and_advance(record.to_value());
                    let next = session.current_stage();
                    info!(from = %stage, to = %next, "stage committed");
                    reply = format!(
                        "{}\n\n---\n{}",
                        reply,
                        prompts::stage_transition_message(next)
                    );
                }
            }
        }

        session.append_message(ConversationMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Oracle call 1: the conversational reply. Failure propagates.
    async fn generate_reply(
        &self,
        session: &PlanningSession,
        profile: &StageProfile,
    ) -> Result<String, PlanningError> {
        let request = CompletionRequest::new(port_messages(session))
            .with_system_prompt(profile.system_prompt.clone())
            .with_max_tokens(self.max_tokens);

        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }

    /// Oracle call 2: the structured extraction attempt.
    ///
    /// Every failure mode collapses to `None`: transport errors (logged),
    /// model decline, schema mismatch, and records failing the stage's
    /// completeness predicate.
    async fn attempt_extraction(
        &self,
        session: &PlanningSession,
        profile: &StageProfile,
    ) -> Option<StageRecord> {
        let mut messages = port_messages(session);
        messages.push(Message::user(profile.extraction_prompt));

        let request = ExtractionRequest::new(
            messages,
            EXTRACTION_TOOL,
            profile.extraction_schema.clone(),
        )
        .with_system_prompt(prompts::EXTRACTION_SYSTEM_PROMPT)
        .with_tool_description("Record structured planning data from the conversation")
        .with_max_tokens(2048);

        let value = match self.provider.extract(request).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(stage = %profile.stage, "extraction declined");
                return None;
            }
            Err(err) => {
                warn!(stage = %profile.stage, error = %err, "extraction call failed");
                return None;
            }
        };

        let record = match StageRecord::from_value(profile.stage, value) {
            Ok(record) => record,
            Err(err) => {
                warn!(stage = %profile.stage, error = %err, "extracted value failed stage schema");
                return None;
            }
        };

        if !record.is_complete() {
            debug!(stage = %profile.stage, "extracted record incomplete; stage stays open");
            return None;
        }

        Some(record)
    }
}

/// Maps the session turn log into provider messages.
fn port_messages(session: &PlanningSession) -> Vec<Message> {
    session
        .messages()
        .iter()
        .map(|m| match m.role {
            TurnRole::User => Message::user(m.content.clone()),
            TurnRole::Assistant => Message::assistant(m.content.clone()),
        })
        .collect()
}
