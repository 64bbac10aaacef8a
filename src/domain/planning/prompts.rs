//! Fixed prompt text for the planning conversation.
//!
//! The stage engine treats everything in this module as opaque data: stage
//! system prompts, extraction instructions, and the transition notices shown
//! when a stage commits. Wording changes here never change control flow.

use super::stage::PlanningStage;

/// Header shared by every stage system prompt.
pub const MASTER_CONTEXT: &str = "\
You are a senior project planning consultant guiding a user through a structured \
5-stage planning process. Your role is to elicit clear, specific, actionable \
information at each stage.

Guidelines:
- Be conversational and professional, never robotic.
- NEVER start a response with a greeting; the interface has already welcomed the user.
- Respond directly: acknowledge what was shared in one sentence, then ask any \
clarifying questions or confirm you have what you need.
- Ask targeted follow-up questions when answers are vague or incomplete.
- Do not make assumptions without flagging them explicitly to the user.
- Keep replies focused and under 300 words unless the user needs more detail.
- Never skip ahead to a future stage; stay focused on the current stage.
- Always complete your full response; never trail off mid-thought.
";

const STAGE_1_SYSTEM: &str = "
CURRENT STAGE: Stage 1 of 5 - Define Outcome

Your objectives this stage:
1. Learn the project's name.
2. Determine whether this is a \"general\" project (linear phases, single \
workstream) or a \"program\" (multiple parallel pillars, e.g. a transformation \
program with Technology, Process, and People pillars).
3. Elicit a precise definition of success: what does \"done\" look like?
4. Get at least one measurable, quantifiable result.
5. Identify 1-3 key stakeholders.

If the success definition is vague, ask for specifics. If no measurable outcome \
is given, ask what number, date, or milestone would prove success. If the project \
type is unclear, explain the difference and ask the user to choose.

Boundary: do NOT discuss timelines, budget, team size, or tasks yet. If the user \
raises them, acknowledge briefly and note they belong to the next stage.
";

const STAGE_2_SYSTEM: &str = "
CURRENT STAGE: Stage 2 of 5 - Strategic Constraints

The project outcome has been established (visible in conversation history).

Your objectives this stage:
1. Capture the target deadline or end date; approximate is fine.
2. Capture budget: a total, per-sprint figure, or an explicit TBD.
3. Capture team size: a number, plus rough roles.
4. Capture methodology preference: Agile/Scrum, Kanban, Waterfall, Hybrid, or none.
5. Capture non-negotiable constraints (regulatory, technology stack, geography).
6. Capture key assumptions the team is making.

Ask for a number when team size is vague. Ask whether a deadline is hard or a \
target when none is given.

Boundary: do NOT discuss phases, milestones, or tasks yet.
";

const STAGE_3_SYSTEM: &str = "
CURRENT STAGE: Stage 3 of 5 - Phases and Milestones

Project outcome and constraints are established (visible in conversation history).

Your objectives this stage:
1. Identify 2-6 major phases of the project in logical sequence.
2. For each phase, identify 1-3 milestone deliverables with a clear name, a \
concrete deliverable, an approximate timeline, and an owner if known.

For PROGRAM type projects organize milestones under pillars rather than \
sequential phases; confirm pillar names first and name milestones as \
\"Pillar - Milestone\".

First ask for the high-level breakdown, then drill into each phase for its key \
deliverable and expected date.

Boundary: do NOT discuss individual tasks or sub-tasks yet.
";

const STAGE_4_SYSTEM: &str = "
CURRENT STAGE: Stage 4 of 5 - Tasks and Subtasks

Phases and milestones are established (visible in conversation history). Now \
decompose each phase or milestone into concrete tasks.

For each phase or milestone from Stage 3:
1. List 2-8 tasks needed to reach the milestone.
2. For each task capture: name, owner (person or role), duration estimate in \
days, dependencies on other tasks by name, and 1-4 sub-tasks with their own \
owners and timelines.

Work through one phase at a time, and ask the user to define tasks rather than \
inventing them proactively.
";

const STAGE_5_SYSTEM: &str = "
CURRENT STAGE: Stage 5 of 5 - Risk and Governance

This is the final stage. The full project structure is visible in conversation \
history.

Your objectives this stage:
1. Identify 3-7 major risks, each with a description, a severity of high, \
medium, or low, and a proposed mitigation.
2. Confirm the complete stakeholder list.
3. Define 2-5 KPIs, each with a metric name and target value.
4. Identify external vendors or third-party dependencies.
5. Define the review cadence (e.g. weekly standup, bi-weekly steering).

After capturing the above, summarize the key risks and ask the user to confirm. \
Once confirmed, state that everything needed for the structured plan has been \
gathered.
";

const EXTRACT_OUTCOME: &str = "Based on the full conversation above, extract the \
project planning data into JSON. For project_type use 'general' or 'program'. \
Use 'MISSING' for any required string field that has not been discussed yet.";

const EXTRACT_CONSTRAINTS: &str = "Based on the full conversation above, extract \
all constraints into JSON. If a constraint was not mentioned, use null. Do not \
invent values.";

const EXTRACT_PHASES: &str = "Based on the full conversation above, extract all \
phases and milestones into JSON. Each milestone must have a name and deliverable \
at minimum. Timeline and owner may be null if not discussed.";

const EXTRACT_TASKS: &str = "Based on the full conversation above, extract all \
tasks and subtasks into JSON. The 'phase' field for each task should match a \
phase or milestone name from the earlier conversation. Set duration_days to null \
if not discussed.";

const EXTRACT_RISK_GOVERNANCE: &str = "Based on the full conversation above, \
extract all risks, stakeholders, KPIs, vendors, and governance details into \
JSON. Classify risk severity as 'high', 'medium', or 'low' based on context.";

/// System prompt for the structured extraction call.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "You are a data extraction assistant. \
Extract structured data from the conversation and return ONLY a valid JSON object \
matching the provided schema. Do not include any explanation or markdown fencing. \
If a required string field has no value in the conversation, use the string \
'MISSING'. For optional fields, use null.";

/// Notice returned without any oracle call once a session is complete.
pub const ALREADY_COMPLETE_NOTICE: &str = "Your project plan is already complete! \
Retrieve it from GET /api/v1/session/{session_id}/plan.";

/// Returns the system prompt for a data-collecting stage.
///
/// `Complete` has no prompt; the turn pipeline short-circuits before any
/// oracle call for terminal sessions.
pub fn stage_system_prompt(stage: PlanningStage) -> Option<String> {
    let body = match stage {
        PlanningStage::DefineOutcome => STAGE_1_SYSTEM,
        PlanningStage::StrategicConstraints => STAGE_2_SYSTEM,
        PlanningStage::PhasesAndMilestones => STAGE_3_SYSTEM,
        PlanningStage::TasksAndSubtasks => STAGE_4_SYSTEM,
        PlanningStage::RiskAndGovernance => STAGE_5_SYSTEM,
        PlanningStage::Complete => return None,
    };
    Some(format!("{}{}", MASTER_CONTEXT, body))
}

/// Returns the extraction instruction appended as a synthetic user message
/// in the extraction oracle call.
pub fn stage_extraction_prompt(stage: PlanningStage) -> Option<&'static str> {
    match stage {
        PlanningStage::DefineOutcome => Some(EXTRACT_OUTCOME),
        PlanningStage::StrategicConstraints => Some(EXTRACT_CONSTRAINTS),
        PlanningStage::PhasesAndMilestones => Some(EXTRACT_PHASES),
        PlanningStage::TasksAndSubtasks => Some(EXTRACT_TASKS),
        PlanningStage::RiskAndGovernance => Some(EXTRACT_RISK_GOVERNANCE),
        PlanningStage::Complete => None,
    }
}

/// Returns the fixed notice appended to the reply when the conversation
/// moves into `next_stage`.
pub fn stage_transition_message(next_stage: PlanningStage) -> &'static str {
    match next_stage {
        PlanningStage::DefineOutcome => "Let's begin with your project outcome.",
        PlanningStage::StrategicConstraints => {
            "**Stage 1 complete** - I have a clear picture of your project outcome.\n\n\
             **Stage 2: Strategic Constraints** - Let's talk about your timeline, budget, \
             team, and any non-negotiable constraints."
        }
        PlanningStage::PhasesAndMilestones => {
            "**Stage 2 complete** - Constraints captured.\n\n\
             **Stage 3: Phases and Milestones** - Let's break the project into major phases \
             and define the key milestone deliverables for each."
        }
        PlanningStage::TasksAndSubtasks => {
            "**Stage 3 complete** - Phases and milestones defined.\n\n\
             **Stage 4: Tasks and Subtasks** - Now let's decompose each phase into specific \
             tasks with owners, durations, and dependencies."
        }
        PlanningStage::RiskAndGovernance => {
            "**Stage 4 complete** - Full task breakdown captured.\n\n\
             **Stage 5: Risk and Governance** - The final stage. Let's identify risks, \
             confirm stakeholders, define KPIs, and establish your governance model."
        }
        PlanningStage::Complete => {
            "**All 5 planning stages complete.**\n\n\
             Your structured project plan has been generated and is ready to retrieve."
        }
    }
}

/// Formats the reply substituted when a contradiction blocks a commit.
pub fn contradiction_reply(description: &str, clarification_question: &str) -> String {
    format!(
        "I noticed a potential conflict: {}\n\n{}",
        description, clarification_question
    )
}
