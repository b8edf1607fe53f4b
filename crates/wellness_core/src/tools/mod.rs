//! Tool contract exposed to the conversational controller.
//!
//! # Responsibility
//! - Expose `get_last_checkin` and `log_wellness_checkin` over an injected
//!   check-in store.
//! - Translate store results into shapes the controller can speak from.
//! - Describe both tools (name, description, JSON parameter schema) and route
//!   named calls with JSON arguments.
//!
//! # Invariants
//! - Store failures are absorbed here and returned as speakable text.
//! - No call order is enforced; any sequence of calls is valid.
//! - `log_wellness_checkin` never deduplicates; each successful call appends
//!   exactly one record.

pub mod definitions;
pub mod wellness_tools;

pub use definitions::{tool_definitions, ToolDefinition, GET_LAST_CHECKIN, LOG_WELLNESS_CHECKIN};
pub use wellness_tools::{
    LastCheckinResponse, ToolCallError, ToolOutput, WellnessTools, LOG_FAILED_MESSAGE,
    LOG_SAVED_MESSAGE,
};
