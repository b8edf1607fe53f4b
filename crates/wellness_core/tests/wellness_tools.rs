use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use wellness_core::model::checkin::checkin_now;
use wellness_core::{
    CheckinStore, JsonFileCheckinStore, ToolCallError, ToolOutput, WellnessTools,
    LOG_FAILED_MESSAGE, LOG_SAVED_MESSAGE,
};

#[test]
fn get_last_checkin_on_empty_store_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    let response = tools.get_last_checkin();
    assert!(!response.available);
    assert_eq!(
        response.to_json(),
        json!({ "available": false, "message": "No previous check-ins found." })
    );
}

#[test]
fn logged_checkin_is_returned_by_get_last_checkin() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    let reply = tools.log_wellness_checkin(
        "a bit tired",
        "okay",
        Some(vec![
            "finish report".to_string(),
            "10-minute walk".to_string(),
        ]),
        "Felt tired but motivated; two goals set.",
    );
    assert_eq!(reply, LOG_SAVED_MESSAGE);

    let response = tools.get_last_checkin();
    assert!(response.available);
    assert!(response.message.is_none());
    let value = response.to_json();
    assert_eq!(value["available"], true);
    assert_eq!(value["mood"], "a bit tired");
    assert_eq!(value["energy"], "okay");
    assert_eq!(value["goals"], json!(["finish report", "10-minute walk"]));
    assert_eq!(value["summary"], "Felt tired but motivated; two goals set.");
    assert!(value.get("message").is_none());

    let record = response.checkin.unwrap();
    assert!((checkin_now() - record.timestamp).num_seconds().abs() < 60);
    assert_eq!(
        value["timestamp"],
        record.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    );
}

#[test]
fn get_last_checkin_on_corrupt_log_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wellness_log.json"), "{{{{").unwrap();
    let tools = tools_at(dir.path());

    let response = tools.get_last_checkin();
    assert!(!response.available);
    assert_eq!(
        response.message.as_deref(),
        Some("Could not read previous entries.")
    );
}

#[test]
fn get_last_checkin_on_non_array_log_reports_no_previous_checkins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wellness_log.json"), r#"{"entries":[]}"#).unwrap();
    let tools = tools_at(dir.path());

    assert_eq!(
        tools.get_last_checkin().to_json(),
        json!({ "available": false, "message": "No previous check-ins found." })
    );
}

#[test]
fn logging_twice_creates_two_records() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    assert_eq!(
        tools.log_wellness_checkin("good", "high", None, "one"),
        LOG_SAVED_MESSAGE
    );
    assert_eq!(
        tools.log_wellness_checkin("good", "high", None, "two"),
        LOG_SAVED_MESSAGE
    );

    let history = tools.store().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].summary, "one");
    assert_eq!(history[1].summary, "two");
    assert!(history[0].goals.is_empty());
}

#[test]
fn write_failure_is_absorbed_into_degraded_reply() {
    let dir = tempfile::tempdir().unwrap();
    let tools = WellnessTools::new(
        JsonFileCheckinStore::new(dir.path().join("wellness_log.json"))
            .with_lock_timeout(Duration::from_millis(50)),
    );
    tools.log_wellness_checkin("fine", "okay", None, "kept");
    fs::write(dir.path().join("wellness_log.json.lock"), "").unwrap();

    let reply = tools.log_wellness_checkin("lost", "low", None, "dropped");
    assert_eq!(reply, LOG_FAILED_MESSAGE);

    let response = tools.get_last_checkin();
    assert!(response.available);
    assert_eq!(response.checkin.unwrap().summary, "kept");
}

#[test]
fn shared_store_is_visible_across_tool_instances() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileCheckinStore::new(
        dir.path().join("wellness_log.json"),
    ));
    let morning = WellnessTools::new(Arc::clone(&store));
    let evening = WellnessTools::new(Arc::clone(&store));

    morning.log_wellness_checkin("rested", "high", None, "morning");

    let response = evening.get_last_checkin();
    assert_eq!(response.checkin.unwrap().summary, "morning");
}

#[test]
fn invoke_routes_both_tools() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    let output = tools
        .invoke(
            "log_wellness_checkin",
            &json!({
                "mood": "okay",
                "energy": "low",
                "goals": null,
                "summary": "Low energy day."
            }),
        )
        .unwrap();
    assert_eq!(output, ToolOutput::Text(LOG_SAVED_MESSAGE.to_string()));

    let output = tools
        .invoke("get_last_checkin", &serde_json::Value::Null)
        .unwrap();
    let value = output.into_value();
    assert_eq!(value["available"], true);
    assert_eq!(value["energy"], "low");
    assert_eq!(value["goals"], json!([]));

    let output = tools.invoke("get_last_checkin", &json!({})).unwrap();
    assert_eq!(output.into_value()["summary"], "Low energy day.");
}

#[test]
fn invoke_accepts_missing_goals() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    let output = tools
        .invoke(
            "log_wellness_checkin",
            &json!({ "mood": "m", "energy": "e", "summary": "s" }),
        )
        .unwrap();
    assert_eq!(output.into_value(), json!(LOG_SAVED_MESSAGE));
    assert!(tools.store().history()[0].goals.is_empty());
}

#[test]
fn invoke_rejects_unknown_tool_and_bad_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools_at(dir.path());

    let err = tools.invoke("delete_everything", &json!({})).unwrap_err();
    assert_eq!(err, ToolCallError::UnknownTool("delete_everything".to_string()));

    let err = tools
        .invoke("log_wellness_checkin", &json!({ "mood": "ok" }))
        .unwrap_err();
    assert!(matches!(
        err,
        ToolCallError::InvalidArguments {
            tool: "log_wellness_checkin",
            ..
        }
    ));

    let err = tools.invoke("get_last_checkin", &json!("now")).unwrap_err();
    assert!(err.to_string().contains("get_last_checkin"));

    let err = tools
        .invoke("get_last_checkin", &json!({ "since": "yesterday" }))
        .unwrap_err();
    assert!(matches!(
        err,
        ToolCallError::InvalidArguments {
            tool: "get_last_checkin",
            ..
        }
    ));

    assert!(tools.store().history().is_empty());
}

fn tools_at(dir: &std::path::Path) -> WellnessTools<JsonFileCheckinStore> {
    WellnessTools::new(JsonFileCheckinStore::new(dir.join("wellness_log.json")))
}
