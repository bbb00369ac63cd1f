use serde_json::json;
use speakmark_core::{Catalog, ResponseComposer};

use super::{catalog_failure, CommandResult};

pub fn run() -> CommandResult {
    let catalog = match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(error) => return catalog_failure("topics", error),
    };
    let composer = ResponseComposer::new(&catalog);
    let topics = catalog.topics().collect::<Vec<_>>();

    CommandResult::success_with_data(
        "topics",
        composer.topic_list(),
        Some(json!({ "count": topics.len(), "topics": topics })),
    )
}
