use cellguard_core::DEFAULT_INTENTS;
use std::collections::HashSet;

/// Converts a transcribed voice phrase into the boolean secondary factor.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    intents: HashSet<String>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_INTENTS)
    }
}

impl IntentMatcher {
    pub fn new<I, S>(intents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let intents = intents
            .into_iter()
            .map(|i| canonical(i.as_ref()))
            .filter(|i| !i.is_empty())
            .collect();
        Self { intents }
    }

    /// Whether `phrase` is one of the accepted intents (trimmed, case-insensitive).
    pub fn confirms(&self, phrase: &str) -> bool {
        let phrase = canonical(phrase);
        !phrase.is_empty() && self.intents.contains(&phrase)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

fn canonical(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}
