use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::composer::ResponseComposer;
use crate::errors::RequestError;

/// Intents the external classifier can report for this agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Welcome,
    TellExample,
    Fallback,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Welcome, Intent::TellExample, Intent::Fallback];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Welcome => "Default Welcome Intent",
            Self::TellExample => "Tell Example",
            Self::Fallback => "Default Fallback Intent",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|intent| {
            intent.display_name().eq_ignore_ascii_case(name) || intent.action_name() == name
        })
    }

    fn action_name(self) -> &'static str {
        match self {
            Self::Welcome => "input.welcome",
            Self::TellExample => "tell.example",
            Self::Fallback => "input.unknown",
        }
    }
}

impl FromStr for Intent {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().is_empty() {
            return Err(RequestError::MissingIntent);
        }
        Self::from_display_name(value).ok_or_else(|| RequestError::UnknownIntent(value.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub intent: Intent,
    pub topic: Option<String>,
}

impl RequestContext {
    pub fn new(intent: Intent) -> Self {
        Self { intent, topic: None }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    fn requested_topic(&self) -> Option<&str> {
        self.topic.as_deref().map(str::trim).filter(|topic| !topic.is_empty())
    }
}

/// Ordered segments presented to the user for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub segments: Vec<String>,
    pub expect_user_response: bool,
}

impl Reply {
    /// A reply that keeps the conversation open.
    pub fn ask<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect(), expect_user_response: true }
    }
}

/// Which branch produced a reply; useful for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Welcomed,
    Example,
    MissingTopic,
    UnknownTopic,
    NotUnderstood,
}

#[derive(Clone, Debug)]
pub struct IntentDispatcher {
    catalog: Arc<Catalog>,
    composer: ResponseComposer,
}

impl IntentDispatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let composer = ResponseComposer::new(&catalog);
        Self { catalog, composer }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    pub fn dispatch(&self, context: &RequestContext) -> Reply {
        self.dispatch_with_outcome(context).0
    }

    pub fn dispatch_with_outcome(&self, context: &RequestContext) -> (Reply, Outcome) {
        match context.intent {
            Intent::Welcome => self.welcome(),
            Intent::TellExample => self.tell_example(context.requested_topic()),
            Intent::Fallback => (self.not_understood(), Outcome::NotUnderstood),
        }
    }

    fn welcome(&self) -> (Reply, Outcome) {
        let reply = Reply::ask([self.composer.welcome(), self.composer.topic_list()]);
        (reply, Outcome::Welcomed)
    }

    fn tell_example(&self, requested: Option<&str>) -> (Reply, Outcome) {
        let Some(requested) = requested else {
            return (self.not_understood(), Outcome::MissingTopic);
        };

        match self.catalog.resolve(requested) {
            Some((topic, document)) => {
                (Reply::ask([self.composer.lead_in(topic), document.to_string()]), Outcome::Example)
            }
            None => (self.not_understood(), Outcome::UnknownTopic),
        }
    }

    fn not_understood(&self) -> Reply {
        Reply::ask([self.composer.did_not_understand(), self.composer.topic_list()])
    }
}
