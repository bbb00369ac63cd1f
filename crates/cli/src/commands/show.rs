use serde_json::json;
use speakmark_core::Catalog;

use super::{catalog_failure, CommandResult};

pub fn run(topic: &str) -> CommandResult {
    let catalog = match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(error) => return catalog_failure("show", error),
    };

    match catalog.resolve(topic) {
        Some((topic, document)) => CommandResult::success_with_data(
            "show",
            format!("rendered example for `{topic}`"),
            Some(json!({ "topic": topic, "document": document })),
        ),
        None => CommandResult::failure(
            "show",
            "unknown_topic",
            format!(
                "`{}` is not an example topic (known: {})",
                topic.trim(),
                catalog.topics().collect::<Vec<_>>().join(", ")
            ),
            3,
        ),
    }
}
