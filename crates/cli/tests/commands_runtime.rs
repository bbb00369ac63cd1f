use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use speakmark_cli::commands::{config, dispatch, doctor, show, topics};

#[test]
fn topics_lists_every_topic_in_catalog_order() {
    let result = topics::run();
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "topics");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["message"], "audio, break, emphasis, paragraph, prosody, say-as, and sub.");
    assert_eq!(payload["data"]["count"], 7);
    assert_eq!(payload["data"]["topics"][0], "audio");
    assert_eq!(payload["data"]["topics"][6], "sub");
}

#[test]
fn show_prints_the_rendered_document() {
    let result = show::run("Say-As");
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["topic"], "say-as");
    let document = payload["data"]["document"].as_str().expect("document should be a string");
    assert!(document.starts_with("<speak>"));
    assert!(document.contains("R&amp;D"));
}

#[test]
fn show_rejects_unknown_topic() {
    let result = show::run("whisper");
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "unknown_topic");
    assert!(payload["message"].as_str().unwrap_or_default().contains("prosody"));
}

#[test]
fn dispatch_welcome_returns_two_segments() {
    let result = dispatch::run("Default Welcome Intent", None);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["intent"], "welcome");
    assert_eq!(payload["data"]["outcome"], "welcomed");
    assert_eq!(payload["data"]["reply"]["expect_user_response"], true);
    assert_eq!(payload["data"]["reply"]["segments"].as_array().map(Vec::len), Some(2));
}

#[test]
fn dispatch_tell_example_with_unknown_topic_fails_closed() {
    let result = dispatch::run("Tell Example", Some("whisper"));
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["outcome"], "unknown_topic");
    let first = payload["data"]["reply"]["segments"][0].as_str().unwrap_or_default();
    assert!(first.starts_with("Sorry"));
}

#[test]
fn dispatch_rejects_unknown_intent() {
    let result = dispatch::run("Book Flight", None);
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "unknown_intent");
    assert!(payload["message"].as_str().unwrap_or_default().contains("Tell Example"));
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected all doctor checks to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let names = payload["checks"]
            .as_array()
            .expect("checks should be an array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["config_validation", "catalog_build", "catalog_documents", "topic_list"]);
    });
}

#[test]
fn doctor_reports_invalid_config() {
    with_env(&[("SPEAKMARK_WEBHOOK_PATH", "/health")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [ok] catalog_build"));
    });
}

#[test]
fn config_attributes_blank_env_values_to_the_default() {
    with_env(&[("SPEAKMARK_WEBHOOK_PATH", "  "), ("SPEAKMARK_LOG_LEVEL", "")], || {
        let output = config::run();
        assert!(output.contains("- webhook.path = /webhook (source: default)"), "{output}");
        assert!(output.contains("- logging.level = info (source: default)"), "{output}");
    });
}

#[test]
fn config_attributes_set_env_values_to_the_variable() {
    with_env(&[("SPEAKMARK_WEBHOOK_PATH", "/fulfillment")], || {
        let output = config::run();
        assert!(
            output.contains(
                "- webhook.path = /fulfillment (source: env (SPEAKMARK_WEBHOOK_PATH))"
            ),
            "{output}"
        );
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SPEAKMARK_SERVER_BIND_ADDRESS",
        "SPEAKMARK_SERVER_PORT",
        "SPEAKMARK_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "SPEAKMARK_WEBHOOK_PATH",
        "SPEAKMARK_WEBHOOK_TOPIC_PARAMETER",
        "SPEAKMARK_LOGGING_LEVEL",
        "SPEAKMARK_LOGGING_FORMAT",
        "SPEAKMARK_LOGGING_DEBUG_PAYLOADS",
        "SPEAKMARK_LOG_LEVEL",
        "SPEAKMARK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
