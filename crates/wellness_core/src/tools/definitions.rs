//! Declarative tool descriptions handed to the language model.

use serde::Serialize;
use serde_json::{json, Value};

/// Tool name for fetching the previous check-in.
pub const GET_LAST_CHECKIN: &str = "get_last_checkin";
/// Tool name for saving today's check-in.
pub const LOG_WELLNESS_CHECKIN: &str = "log_wellness_checkin";

/// One callable tool as advertised to the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema object describing the call arguments.
    pub parameters: Value,
}

/// Returns both tool definitions in a stable order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_LAST_CHECKIN,
            description: "Fetch the most recent wellness check-in. Use at the start of a \
                          conversation to lightly reference how the user was doing last time.",
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: LOG_WELLNESS_CHECKIN,
            description: "Save today's wellness check-in once the recap has been confirmed. \
                          Call exactly once per conversation.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "mood": {
                        "type": "string",
                        "description": "Self-reported mood in the user's own words or a short phrase."
                    },
                    "energy": {
                        "type": "string",
                        "description": "Short description of energy level, e.g. low, okay, high."
                    },
                    "goals": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "One to three small goals or intentions for the day."
                    },
                    "summary": {
                        "type": "string",
                        "description": "A short one to two sentence summary of the check-in."
                    }
                },
                "required": ["mood", "energy", "goals", "summary"]
            }),
        },
    ]
}
