//! UI translations for English, Hindi and Kannada.
//!
//! The active language lives in a [`Translator`] owned by the app and passed
//! to every renderer; there is no global language state.

mod translations;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use translations::TRANSLATIONS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Kn,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Kn];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
        }
    }

    /// Name of the language in its own script, for the language selector
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिंदी",
            Language::Kn => "ಕನ್ನಡ",
        }
    }

    pub fn next(&self) -> Language {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::Kn,
            Language::Kn => Language::En,
        }
    }
}

/// One dictionary entry. Empty strings mean "not translated yet".
pub(crate) struct Entry {
    pub en: &'static str,
    pub hi: &'static str,
    pub kn: &'static str,
}

fn dictionary() -> &'static HashMap<&'static str, Entry> {
    static DICTIONARY: OnceLock<HashMap<&'static str, Entry>> = OnceLock::new();
    DICTIONARY.get_or_init(|| {
        TRANSLATIONS
            .iter()
            .map(|&(key, en, hi, kn)| (key, Entry { en, hi, kn }))
            .collect()
    })
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Look up `key` in the active language.
    ///
    /// Falls back to English when the entry has no translation, and to the
    /// key itself when the key is unknown.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let Some(entry) = dictionary().get(key) else {
            tracing::warn!(key, "Translation missing");
            return key;
        };

        let text = match self.language {
            Language::En => entry.en,
            Language::Hi => entry.hi,
            Language::Kn => entry.kn,
        };

        if text.is_empty() {
            entry.en
        } else {
            text
        }
    }
}
