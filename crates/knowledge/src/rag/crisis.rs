//! Crisis gate run before any retrieval.

use crate::config::SafetyConfig;

/// Phrases that short-circuit normal coaching.
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "self-harm",
    "hurt myself",
    "want to die",
    "cut myself",
    "overdose",
    "can't go on",
];

/// Fixed reply returned instead of a generated answer.
pub const CRISIS_MESSAGE: &str = "I’m really sorry you’re feeling this way. I can’t help with self-harm or suicide plans, \
but you deserve immediate support.\n\n\
If you’re in immediate danger: call emergency services (911 in Canada/US).\n\
Canada: Call or text 988 (Suicide Crisis Helpline).\n\
If you can, reach out right now to a trusted person nearby.\n\n\
If you want, tell me your country/city and I’ll help you find the right crisis resource.";

/// Case-insensitive substring match against a keyword list.
#[derive(Debug, Clone)]
pub struct CrisisGate {
    keywords: Vec<String>,
}

impl CrisisGate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &SafetyConfig) -> Self {
        Self::new(&config.crisis_keywords)
    }

    /// True when the message contains any keyword.
    ///
    /// Plain substring matching: "suicide prevention" also fires.
    pub fn is_crisis(&self, message: &str) -> bool {
        let lower = message.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

impl Default for CrisisGate {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS)
    }
}
