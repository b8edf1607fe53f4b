//! Core check-in log and tool contract for the wellness companion.
//! This crate is the single source of truth for check-in persistence rules.

pub mod logging;
pub mod model;
pub mod store;
pub mod tools;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checkin::{CheckinRecord, NewCheckin};
pub use store::{
    AbsentReason, CheckinStore, JsonFileCheckinStore, LatestCheckin, StoreError, StoreResult,
    DEFAULT_LOG_FILE_NAME,
};
pub use tools::{
    tool_definitions, LastCheckinResponse, ToolCallError, ToolDefinition, ToolOutput,
    WellnessTools, LOG_FAILED_MESSAGE, LOG_SAVED_MESSAGE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
