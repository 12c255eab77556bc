//! Intent classification for incoming user messages.
//!
//! Classification happens in two stages: a local pre-filter that flags
//! obviously unintelligible messages without any provider call, then a
//! completion-provider round trip whose free-form reply is parsed by a strict
//! closed-token scanner. Classification failure is a value, not an error:
//! any provider failure or unrecognized reply resolves to
//! [`Intent::Nonsense`] and is never raised to the caller.

use std::fmt;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::providers::{ChatMessage, CompletionProvider};

/// The classified purpose of a user message. Drives routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    FactualInfo,
    Preference,
    Feedback,
    Correction,
    HistoryQuery,
    Nonsense,
}

impl Intent {
    /// All intents in enumeration order, which is also marker-scan priority
    /// order.
    pub const ALL: [Intent; 6] = [
        Intent::FactualInfo,
        Intent::Preference,
        Intent::Feedback,
        Intent::Correction,
        Intent::HistoryQuery,
        Intent::Nonsense,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Intent::FactualInfo => "factual-info",
            Intent::Preference => "preference",
            Intent::Feedback => "feedback",
            Intent::Correction => "correction",
            Intent::HistoryQuery => "history-query",
            Intent::Nonsense => "nonsense",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification granularity: the full six-way taxonomy, or the simplified
/// three-way grouping (history / factual / general).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Fine,
    Coarse,
}

static HAS_ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[a-zA-Z]").expect("pattern compiles"));
static SYMBOLS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\w\s]+$").expect("pattern compiles"));

/// Local pre-filter: true when the message contains no alphabetic character,
/// or consists entirely of non-word, non-space characters.
#[must_use]
pub fn is_nonsense(message: &str) -> bool {
    !HAS_ALPHABETIC.is_match(message) || SYMBOLS_ONLY.is_match(message)
}

// Marker tables: (intent, numeral marker, canonical phrase), scanned in order.
const FINE_MARKERS: [(Intent, &str, &str); 6] = [
    (Intent::FactualInfo, "1", "factual"),
    (Intent::Preference, "2", "preference"),
    (Intent::Feedback, "3", "feedback"),
    (Intent::Correction, "4", "correction"),
    (Intent::HistoryQuery, "5", "history"),
    (Intent::Nonsense, "6", "nonsense"),
];

const COARSE_MARKERS: [(Intent, &str, &str); 3] = [
    (Intent::HistoryQuery, "1", "history"),
    (Intent::FactualInfo, "2", "factual"),
    (Intent::Preference, "3", "general"),
];

fn classification_prompt(message: &str, granularity: Granularity) -> String {
    match granularity {
        Granularity::Fine => format!(
            "Classify the intent of the following user message: \"{message}\". \
             Decide which category below best represents the message and reply \
             with only the corresponding number:\n\n\
             (1) Factual question: the user asks about the indexed site or its content.\n\
             (2) Preference: the user states a preference or taste.\n\
             (3) Feedback: the user gives feedback on an earlier answer.\n\
             (4) Correction: the user corrects something said earlier.\n\
             (5) History question: the user asks about the history, a summary, \
             or past information from this conversation.\n\
             (6) Nonsense: the message is unintelligible."
        ),
        Granularity::Coarse => format!(
            "Classify the intent of the following user message: \"{message}\". \
             Decide which of the intents below best represents the message and \
             reply with only the corresponding number:\n\n\
             (1) Conversation question: the user asks about the history, a summary, \
             or past information from this conversation.\n\
             (2) Factual question: the user asks about context or details of the \
             indexed site content.\n\
             (3) General conversation: the message is ordinary conversation with no \
             specific relation to the two topics above."
        ),
    }
}

/// Strict parser over the provider's free-form reply: the first intent (in
/// enumeration order) whose numeral or canonical phrase occurs in the reply
/// wins; anything unrecognized is `Nonsense`.
fn parse_reply(reply: &str, granularity: Granularity) -> Intent {
    let lowered = reply.to_lowercase();
    let markers: &[(Intent, &str, &str)] = match granularity {
        Granularity::Fine => &FINE_MARKERS,
        Granularity::Coarse => &COARSE_MARKERS,
    };
    for (intent, numeral, phrase) in markers {
        if lowered.contains(numeral) || lowered.contains(phrase) {
            return *intent;
        }
    }
    Intent::Nonsense
}

/// Classification seam: anything that can map a message to an [`Intent`].
///
/// The router depends on this trait rather than on [`IntentClassifier`]
/// directly, so routing can be exercised with a stub.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, message: &str) -> Intent;
}

/// Maps a user message to an [`Intent`] via the completion provider, with a
/// deterministic local fallback.
pub struct IntentClassifier {
    completion: Arc<dyn CompletionProvider>,
    model_id: String,
    granularity: Granularity,
}

impl IntentClassifier {
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        model_id: impl Into<String>,
        granularity: Granularity,
    ) -> Self {
        Self {
            completion,
            model_id: model_id.into(),
            granularity,
        }
    }

    /// Classifies `message`. Never fails: provider errors and unparseable
    /// replies both resolve to [`Intent::Nonsense`].
    async fn classify_message(&self, message: &str) -> Intent {
        if is_nonsense(message) {
            return Intent::Nonsense;
        }

        let prompt = classification_prompt(message, self.granularity);
        match self
            .completion
            .complete(&[ChatMessage::user(prompt)], &self.model_id)
            .await
        {
            Ok(reply) => {
                let intent = parse_reply(&reply, self.granularity);
                debug!(raw = %reply.trim(), %intent, "classified intent");
                intent
            }
            Err(err) => {
                warn!(error = %err, "intent classification failed; treating as nonsense");
                Intent::Nonsense
            }
        }
    }
}

#[async_trait]
impl Classify for IntentClassifier {
    async fn classify(&self, message: &str) -> Intent {
        self.classify_message(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedCompletion {
        reply: Option<String>,
        calls: Mutex<usize>,
    }

    impl ScriptedCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().expect("lock poisoned")
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
        ) -> Result<String, ProviderError> {
            *self.calls.lock().expect("lock poisoned") += 1;
            self.reply.clone().ok_or_else(|| ProviderError::MalformedResponse(
                "scripted failure".to_string(),
            ))
        }
    }

    #[test]
    fn messages_without_letters_are_nonsense() {
        assert!(is_nonsense("1234"));
        assert!(is_nonsense("!!??"));
        assert!(is_nonsense(""));
        assert!(!is_nonsense("Hello"));
        assert!(!is_nonsense("what is 2+2?"));
    }

    #[test]
    fn parse_fine_replies_by_numeral_or_phrase() {
        assert_eq!(parse_reply("5", Granularity::Fine), Intent::HistoryQuery);
        assert_eq!(parse_reply("(2)", Granularity::Fine), Intent::Preference);
        assert_eq!(
            parse_reply("That reads as feedback.", Granularity::Fine),
            Intent::Feedback
        );
        assert_eq!(
            parse_reply("Category: correction", Granularity::Fine),
            Intent::Correction
        );
        assert_eq!(parse_reply("no match here", Granularity::Fine), Intent::Nonsense);
    }

    #[test]
    fn parse_scans_in_enumeration_order() {
        // Both "1" and "5" occur; FactualInfo comes first in the enumeration.
        assert_eq!(parse_reply("1 or 5", Granularity::Fine), Intent::FactualInfo);
    }

    #[test]
    fn parse_coarse_replies_map_to_representative_intents() {
        assert_eq!(parse_reply("1", Granularity::Coarse), Intent::HistoryQuery);
        assert_eq!(parse_reply("2", Granularity::Coarse), Intent::FactualInfo);
        assert_eq!(parse_reply("3", Granularity::Coarse), Intent::Preference);
        assert_eq!(parse_reply("shrug", Granularity::Coarse), Intent::Nonsense);
    }

    #[tokio::test]
    async fn nonsense_prefilter_short_circuits_before_any_provider_call() {
        let completion = Arc::new(ScriptedCompletion::replying("5"));
        let classifier =
            IntentClassifier::new(completion.clone(), "model-x", Granularity::Fine);

        assert_eq!(classifier.classify("1234").await, Intent::Nonsense);
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn real_messages_go_to_the_provider() {
        let completion = Arc::new(ScriptedCompletion::replying("5"));
        let classifier =
            IntentClassifier::new(completion.clone(), "model-x", Granularity::Fine);

        assert_eq!(classifier.classify("Hello").await, Intent::HistoryQuery);
        assert_eq!(completion.call_count(), 1);
    }

    #[tokio::test]
    async fn provider_failure_resolves_to_nonsense() {
        let completion = Arc::new(ScriptedCompletion::failing());
        let classifier = IntentClassifier::new(completion, "model-x", Granularity::Fine);

        assert_eq!(classifier.classify("a real sentence").await, Intent::Nonsense);
    }
}
