use std::sync::Arc;

use serde_json::json;
use speakmark_core::{Catalog, Intent, IntentDispatcher, RequestContext};

use super::{catalog_failure, CommandResult};

/// Replays one intent offline, as the webhook would answer it.
pub fn run(intent: &str, topic: Option<&str>) -> CommandResult {
    let intent = match intent.parse::<Intent>() {
        Ok(intent) => intent,
        Err(error) => {
            let known = Intent::ALL.map(Intent::display_name).join(", ");
            return CommandResult::failure(
                "dispatch",
                "unknown_intent",
                format!("{error} (known: {known})"),
                2,
            );
        }
    };

    let mut context = RequestContext::new(intent);
    if let Some(topic) = topic {
        context = context.with_topic(topic);
    }

    let catalog = match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(error) => return catalog_failure("dispatch", error),
    };
    let dispatcher = IntentDispatcher::new(Arc::new(catalog));
    let (reply, outcome) = dispatcher.dispatch_with_outcome(&context);

    CommandResult::success_with_data(
        "dispatch",
        format!("{} produced {} segments", intent.display_name(), reply.segments.len()),
        Some(json!({ "intent": intent, "outcome": outcome, "reply": reply })),
    )
}
