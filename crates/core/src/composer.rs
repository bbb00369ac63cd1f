use crate::catalog::Catalog;

const DID_NOT_UNDERSTAND: &str =
    "Sorry, I didn't catch that. Ask me for an example of any of these markup elements:";
const WELCOME: &str = "Welcome to the speech markup examples! I can show you how each markup \
                       element changes the way I speak. For example, try saying \"Tell me about \
                       prosody.\" Here is what I can demonstrate:";

/// Joins topic names as `a, b, and c.`; a single topic renders as `a.` and
/// no topics render as an empty string.
pub fn topic_list<'a, I>(topics: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let topics = topics.into_iter().collect::<Vec<_>>();
    match topics.split_last() {
        None => String::new(),
        Some((last, [])) => format!("{last}."),
        Some((last, rest)) => format!("{}, and {last}.", rest.join(", ")),
    }
}

/// User-facing reply text derived from a catalog's topic set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseComposer {
    topic_list: String,
}

impl ResponseComposer {
    pub fn new(catalog: &Catalog) -> Self {
        Self { topic_list: topic_list(catalog.topics()) }
    }

    pub fn topic_list(&self) -> &str {
        &self.topic_list
    }

    pub fn did_not_understand(&self) -> &'static str {
        DID_NOT_UNDERSTAND
    }

    pub fn welcome(&self) -> &'static str {
        WELCOME
    }

    pub fn lead_in(&self, topic: &str) -> String {
        format!("Here is an example of {topic}.")
    }
}
