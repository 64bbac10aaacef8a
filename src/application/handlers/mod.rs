//! Use-case handlers.
//!
//! One handler per exposed operation: processing a conversational turn,
//! compiling and rendering the plan, and session lookup/deletion.

mod delete_session;
mod get_plan;
mod get_session;
mod process_turn;

pub use delete_session::DeleteSessionHandler;
pub use get_plan::{GetPlanHandler, PlanArtifacts};
pub use get_session::GetSessionHandler;
pub use process_turn::{ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult};
