//! Agent module - the turn-level dispatch logic.
//!
//! The dispatch loop follows a "pick a tool in a loop" pattern:
//! 1. Build context with system prompt, user question, and scratchpad
//! 2. Ask the model for a directive (call a tool, or finish)
//! 3. If it names a tool, execute it and feed the observation back
//! 4. Repeat until a final answer, the retry budget, or the step limit

mod directive;
mod dispatch;
mod prompt;

pub use directive::{parse_directive, Directive};
pub use dispatch::{Dispatcher, ScratchpadEntry, TurnOutcome};
pub use prompt::build_system_prompt;
