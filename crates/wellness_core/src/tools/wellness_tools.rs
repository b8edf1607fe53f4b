//! Check-in tools over a `CheckinStore`.
//!
//! # Responsibility
//! - Provide the two controller-facing operations.
//! - Route named tool calls with JSON arguments.
//!
//! # Invariants
//! - `get_last_checkin` and `log_wellness_checkin` never fail or panic.
//! - Log events carry metadata only, never check-in text.

use super::definitions::{GET_LAST_CHECKIN, LOG_WELLNESS_CHECKIN};
use crate::model::checkin::{CheckinRecord, NewCheckin};
use crate::store::{AbsentReason, CheckinStore, LatestCheckin};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reply after a check-in was persisted.
pub const LOG_SAVED_MESSAGE: &str = "Your check-in has been saved successfully.";
/// Reply after persisting a check-in failed.
pub const LOG_FAILED_MESSAGE: &str = "I tried to log this check-in, but something went wrong \
on my side. You might want to manually note this somewhere for today.";

/// Result of `get_last_checkin`.
///
/// Serializes to `{"available": true, timestamp, mood, energy, goals, summary}`
/// or `{"available": false, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastCheckinResponse {
    pub available: bool,
    #[serde(flatten)]
    pub checkin: Option<CheckinRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LastCheckinResponse {
    fn found(record: CheckinRecord) -> Self {
        Self {
            available: true,
            checkin: Some(record),
            message: None,
        }
    }

    fn absent(reason: AbsentReason) -> Self {
        Self {
            available: false,
            checkin: None,
            message: Some(reason.message().to_string()),
        }
    }

    /// JSON mapping handed back to the controller.
    pub fn to_json(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=tool_call module=tools tool={} status=degraded error_code=encode_failed error={}",
                    GET_LAST_CHECKIN, err
                );
                json!({
                    "available": false,
                    "message": AbsentReason::Unreadable.message(),
                })
            }
        }
    }
}

/// Output of a routed tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Structured mapping (`get_last_checkin`).
    Json(Value),
    /// Speakable status line (`log_wellness_checkin`).
    Text(String),
}

impl ToolOutput {
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Controller-side mistakes when routing a tool call.
///
/// Store failures are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments { tool: &'static str, message: String },
}

impl Display for ToolCallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "unknown tool: `{name}`"),
            Self::InvalidArguments { tool, message } => {
                write!(f, "invalid arguments for `{tool}`: {message}")
            }
        }
    }
}

impl Error for ToolCallError {}

#[derive(Debug, Deserialize)]
struct LogCheckinArgs {
    mood: String,
    energy: String,
    #[serde(default)]
    goals: Option<Vec<String>>,
    summary: String,
}

/// Controller-facing check-in tools.
pub struct WellnessTools<S: CheckinStore> {
    store: S,
}

impl<S: CheckinStore> WellnessTools<S> {
    /// Creates the tool set over the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches the most recent check-in.
    ///
    /// # Contract
    /// - No prior entry and unreadable log both yield `available = false`
    ///   with a short message.
    /// - Never fails.
    pub fn get_last_checkin(&self) -> LastCheckinResponse {
        match self.store.read_latest() {
            LatestCheckin::Found(record) => {
                info!(
                    "event=tool_call module=tools tool={} status=ok available=true",
                    GET_LAST_CHECKIN
                );
                LastCheckinResponse::found(record)
            }
            LatestCheckin::Absent(reason) => {
                info!(
                    "event=tool_call module=tools tool={} status=ok available=false reason={}",
                    GET_LAST_CHECKIN,
                    reason.label()
                );
                LastCheckinResponse::absent(reason)
            }
        }
    }

    /// Saves one check-in.
    ///
    /// # Contract
    /// - Text fields are stored as given; `goals = None` becomes empty.
    /// - Returns `LOG_SAVED_MESSAGE` on success and `LOG_FAILED_MESSAGE` when
    ///   persistence fails.
    /// - Each successful call appends exactly one record.
    pub fn log_wellness_checkin(
        &self,
        mood: impl Into<String>,
        energy: impl Into<String>,
        goals: Option<Vec<String>>,
        summary: impl Into<String>,
    ) -> String {
        let entry = NewCheckin::new(mood, energy, goals, summary);
        let goal_count = entry.goals.len();

        match self.store.append(entry) {
            Ok(_) => {
                info!(
                    "event=tool_call module=tools tool={} status=ok goals={}",
                    LOG_WELLNESS_CHECKIN, goal_count
                );
                LOG_SAVED_MESSAGE.to_string()
            }
            Err(err) => {
                error!(
                    "event=tool_call module=tools tool={} status=degraded error_code=append_failed error={}",
                    LOG_WELLNESS_CHECKIN, err
                );
                LOG_FAILED_MESSAGE.to_string()
            }
        }
    }

    /// Routes a named tool call with JSON arguments.
    ///
    /// `arguments` must be `null` or `{}` for `get_last_checkin`. `goals` may be
    /// omitted or `null` for `log_wellness_checkin`.
    ///
    /// # Errors
    /// - `UnknownTool` when `name` is not one of the two tools.
    /// - `InvalidArguments` when arguments do not match the tool schema.
    pub fn invoke(&self, name: &str, arguments: &Value) -> Result<ToolOutput, ToolCallError> {
        match name.trim() {
            GET_LAST_CHECKIN => {
                let takes_no_arguments = match arguments {
                    Value::Null => true,
                    Value::Object(fields) => fields.is_empty(),
                    _ => false,
                };
                if !takes_no_arguments {
                    return Err(ToolCallError::InvalidArguments {
                        tool: GET_LAST_CHECKIN,
                        message: "takes no arguments; expected `{}` or null".to_string(),
                    });
                }
                Ok(ToolOutput::Json(self.get_last_checkin().to_json()))
            }
            LOG_WELLNESS_CHECKIN => {
                let args = LogCheckinArgs::deserialize(arguments).map_err(|err| {
                    ToolCallError::InvalidArguments {
                        tool: LOG_WELLNESS_CHECKIN,
                        message: err.to_string(),
                    }
                })?;
                Ok(ToolOutput::Text(self.log_wellness_checkin(
                    args.mood,
                    args.energy,
                    args.goals,
                    args.summary,
                )))
            }
            other => {
                warn!(
                    "event=tool_call module=tools status=rejected error_code=unknown_tool tool_len={}",
                    other.len()
                );
                Err(ToolCallError::UnknownTool(other.to_string()))
            }
        }
    }
}
