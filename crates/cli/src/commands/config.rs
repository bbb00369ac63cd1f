use std::env;
use std::fs;
use std::path::Path;

use speakmark_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct Field<'a> {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: &'a str,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    render(&config, config_file_doc.as_ref(), config_file_path.as_deref())
}

fn render(
    config: &AppConfig,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let port = config.server.port.to_string();
    let shutdown = config.server.graceful_shutdown_secs.to_string();
    let format = format!("{:?}", config.logging.format).to_ascii_lowercase();
    let debug_payloads = config.logging.debug_payloads.to_string();

    let fields = [
        Field {
            key: "server.bind_address",
            env_keys: &["SPEAKMARK_SERVER_BIND_ADDRESS"],
            value: &config.server.bind_address,
        },
        Field { key: "server.port", env_keys: &["SPEAKMARK_SERVER_PORT"], value: &port },
        Field {
            key: "server.graceful_shutdown_secs",
            env_keys: &["SPEAKMARK_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: &shutdown,
        },
        Field {
            key: "webhook.path",
            env_keys: &["SPEAKMARK_WEBHOOK_PATH"],
            value: &config.webhook.path,
        },
        Field {
            key: "webhook.topic_parameter",
            env_keys: &["SPEAKMARK_WEBHOOK_TOPIC_PARAMETER"],
            value: &config.webhook.topic_parameter,
        },
        Field {
            key: "logging.level",
            env_keys: &["SPEAKMARK_LOGGING_LEVEL", "SPEAKMARK_LOG_LEVEL"],
            value: &config.logging.level,
        },
        Field {
            key: "logging.format",
            env_keys: &["SPEAKMARK_LOGGING_FORMAT", "SPEAKMARK_LOG_FORMAT"],
            value: &format,
        },
        Field {
            key: "logging.debug_payloads",
            env_keys: &["SPEAKMARK_LOGGING_DEBUG_PAYLOADS"],
            value: &debug_payloads,
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields {
        let source = field_source(field.key, field.env_keys, config_file_doc, config_file_path);
        lines.push(render_line(field.key, field.value, source));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they do not count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
