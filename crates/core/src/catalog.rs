use std::collections::HashMap;

use thiserror::Error;

use crate::markup;

/// One authored example: literal fragments interleaved with dynamic values
/// that are escaped when the catalog is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExampleTemplate {
    pub topic: &'static str,
    pub fragments: &'static [&'static str],
    pub values: &'static [&'static str],
}

impl ExampleTemplate {
    pub fn render(&self) -> String {
        markup::compose(self.fragments, self.values)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog topic names must not be empty")]
    EmptyTopic,
    #[error("catalog topic `{0}` is defined more than once")]
    DuplicateTopic(String),
}

/// Immutable topic -> rendered document mapping. Topic order is the authoring
/// order of the templates it was built from.
#[derive(Clone, Debug)]
pub struct Catalog {
    topics: Vec<String>,
    documents: HashMap<String, String>,
}

impl Catalog {
    pub fn from_templates(templates: &[ExampleTemplate]) -> Result<Self, CatalogError> {
        let mut topics = Vec::with_capacity(templates.len());
        let mut documents = HashMap::with_capacity(templates.len());

        for template in templates {
            let topic = template.topic.trim();
            if topic.is_empty() {
                return Err(CatalogError::EmptyTopic);
            }
            if documents.contains_key(topic) {
                return Err(CatalogError::DuplicateTopic(topic.to_string()));
            }
            documents.insert(topic.to_string(), template.render());
            topics.push(topic.to_string());
        }

        Ok(Self { topics, documents })
    }

    /// The built-in example set served by the webhook, built with the same
    /// checks as [`Catalog::from_templates`].
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_templates(STANDARD_EXAMPLES)
    }

    pub fn lookup(&self, topic: &str) -> Option<&str> {
        self.documents.get(topic).map(String::as_str)
    }

    /// Case-insensitive lookup on the trimmed topic name, returning the
    /// catalog's own spelling of the topic alongside its document.
    pub fn resolve(&self, requested: &str) -> Option<(&str, &str)> {
        let requested = requested.trim();
        if let Some(document) = self.lookup(requested) {
            let topic = self.topics.iter().find(|topic| topic.as_str() == requested)?;
            return Some((topic.as_str(), document));
        }

        let topic = self.topics.iter().find(|topic| topic.eq_ignore_ascii_case(requested))?;
        self.lookup(topic).map(|document| (topic.as_str(), document))
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.documents.contains_key(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> + '_ {
        self.topics.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

pub const STANDARD_EXAMPLES: &[ExampleTemplate] = &[
    ExampleTemplate {
        topic: "audio",
        fragments: &[r#"
            <speak>
                Here is a sound effect.
                <audio src="https://actions.google.com/sounds/v1/cartoon/clang_and_wobble.ogg">
                    a clang and a wobble
                </audio>
                The text inside the audio element is spoken if the file cannot be played.
            </speak>
        "#],
        values: &[],
    },
    ExampleTemplate {
        topic: "break",
        fragments: &[r#"
            <speak>
                I can pause for three seconds.
                <break time="3s"/>
                Or take a short breath,
                <break strength="weak"/>
                like that.
            </speak>
        "#],
        values: &[],
    },
    ExampleTemplate {
        topic: "emphasis",
        fragments: &[r#"
            <speak>
                I can say this
                <emphasis level="strong">with a lot of stress</emphasis>,
                or this
                <emphasis level="reduced">almost in passing</emphasis>.
            </speak>
        "#],
        values: &[],
    },
    ExampleTemplate {
        topic: "paragraph",
        fragments: &[r#"
            <speak>
                <p>
                    <s>This is the first sentence of a paragraph.</s>
                    <s>This is the second.</s>
                </p>
                <p>
                    <s>A new paragraph gets a longer pause before it.</s>
                </p>
            </speak>
        "#],
        values: &[],
    },
    ExampleTemplate {
        topic: "prosody",
        fragments: &[r#"
            <speak>
                <prosody rate="slow" pitch="-2st">I can speak low and slow,</prosody>
                <prosody rate="fast" pitch="+3st" volume="loud">or high, fast and loud.</prosody>
            </speak>
        "#],
        values: &[],
    },
    ExampleTemplate {
        topic: "say-as",
        fragments: &[
            r#"
            <speak>
                Spelled out, this is
                <say-as interpret-as="characters">"#,
            r#"</say-as>.
                As a date, this is
                <say-as interpret-as="date" format="yyyymmdd" detail="1">"#,
            r#"</say-as>.
                And as a number, this is
                <say-as interpret-as="cardinal">"#,
            r#"</say-as>.
            </speak>
        "#,
        ],
        values: &["R&D", "20261018", "12345"],
    },
    ExampleTemplate {
        topic: "sub",
        fragments: &[r#"
            <speak>
                The
                <sub alias="World Wide Web Consortium">W3C</sub>
                publishes the speech markup standard.
            </speak>
        "#],
        values: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, ExampleTemplate, STANDARD_EXAMPLES};

    #[test]
    fn standard_catalog_keys_match_authored_topics_in_order() {
        let catalog = Catalog::standard().expect("standard catalog");
        let topics = catalog.topics().collect::<Vec<_>>();
        let authored = STANDARD_EXAMPLES.iter().map(|template| template.topic).collect::<Vec<_>>();

        assert_eq!(topics, authored);
        assert_eq!(catalog.len(), STANDARD_EXAMPLES.len());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn standard_catalog_goes_through_strict_construction() {
        let strict = Catalog::from_templates(STANDARD_EXAMPLES).expect("standard set is well formed");
        let standard = Catalog::standard().expect("standard set is well formed");

        assert_eq!(standard.topics().collect::<Vec<_>>(), strict.topics().collect::<Vec<_>>());
        for topic in standard.topics() {
            assert_eq!(strict.lookup(topic), standard.lookup(topic));
        }
    }

    #[test]
    fn every_document_is_compact_speak_markup() {
        let catalog = Catalog::standard().expect("standard catalog");
        for topic in catalog.topics() {
            let document = catalog.lookup(topic).expect("every topic has a document");
            assert!(document.starts_with("<speak>"), "{topic} should open with <speak>");
            assert!(document.ends_with("</speak>"), "{topic} should close with </speak>");
            assert!(!document.contains('\n'), "{topic} should be a single line");
            assert!(!document.contains("  "), "{topic} should not contain double spaces");
            assert!(!document.contains(" <"), "{topic} should not have a space before a tag");
            assert!(!document.contains("> "), "{topic} should not have a space after a tag");
        }
    }

    #[test]
    fn dynamic_values_are_escaped_at_build_time() {
        let catalog = Catalog::standard().expect("standard catalog");
        let document = catalog.lookup("say-as").expect("say-as is a standard topic");

        assert!(document.contains(r#"<say-as interpret-as="characters">R&amp;D</say-as>"#));
        assert!(!document.contains("R&D"));
        assert!(document.contains(">20261018</say-as>"));
    }

    #[test]
    fn lookup_misses_unknown_topics() {
        let catalog = Catalog::standard().expect("standard catalog");
        assert_eq!(catalog.lookup("whisper"), None);
        assert!(!catalog.contains("whisper"));
        assert!(catalog.contains("prosody"));
    }

    #[test]
    fn resolve_is_case_insensitive_and_returns_canonical_topic() {
        let catalog = Catalog::standard().expect("standard catalog");
        let (topic, document) = catalog.resolve("  Say-As ").expect("case-insensitive match");

        assert_eq!(topic, "say-as");
        assert_eq!(Some(document), catalog.lookup("say-as"));
        assert_eq!(catalog.resolve("unknown"), None);
    }

    #[test]
    fn construction_rejects_duplicates_and_blank_topics() {
        let template = ExampleTemplate { topic: "break", fragments: &["<speak/>"], values: &[] };

        assert_eq!(
            Catalog::from_templates(&[template, template]).err(),
            Some(CatalogError::DuplicateTopic("break".to_string()))
        );

        let blank = ExampleTemplate { topic: "  ", ..template };
        assert_eq!(Catalog::from_templates(&[blank]).err(), Some(CatalogError::EmptyTopic));
    }
}
