use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Dub/subtitle track variants the stream portals attach to episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    GerDub,
    GerSub,
    EngDub,
    EngSub,
    EngDubGerSub,
}

impl Language {
    pub(crate) const ALL: [Language; 5] = [
        Language::GerDub,
        Language::GerSub,
        Language::EngDub,
        Language::EngSub,
        Language::EngDubGerSub,
    ];

    fn bit(self) -> u8 {
        match self {
            Language::GerDub => 1,
            Language::GerSub => 1 << 1,
            Language::EngDub => 1 << 2,
            Language::EngSub => 1 << 3,
            Language::EngDubGerSub => 1 << 4,
        }
    }

    /// `data-lang-key` value the stream portals use for this track on
    /// hoster rows. The combined track has no key of its own.
    pub fn lang_key(self) -> Option<&'static str> {
        match self {
            Language::GerDub => Some("1"),
            Language::EngDub => Some("2"),
            Language::GerSub => Some("3"),
            Language::EngSub => Some("4"),
            Language::EngDubGerSub => None,
        }
    }

    /// Map a hoster icon `title` attribute to a track. Unrecognized titles
    /// map to `None` and are ignored by callers.
    pub fn from_icon_title(title: &str) -> Option<Self> {
        match title {
            "Deutsch/German" => Some(Language::GerDub),
            "Englisch" => Some(Language::EngDub),
            "Mit deutschem Untertitel" => Some(Language::GerSub),
            "Englisch mit deutschem Untertitel" => Some(Language::EngDubGerSub),
            _ => None,
        }
    }
}

/// Additive set of language flags.
///
/// Bits are only ever OR-ed in while markup is scanned, never reset, so
/// re-scanning the same page yields the identical set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet(u8);

impl LanguageSet {
    pub const NONE: LanguageSet = LanguageSet(0);

    pub fn insert(&mut self, language: Language) {
        self.0 |= language.bit();
    }

    pub fn contains(self, language: Language) -> bool {
        self.0 & language.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Language> {
        Language::ALL
            .into_iter()
            .filter(move |language| self.contains(*language))
    }
}

impl BitOr<Language> for LanguageSet {
    type Output = LanguageSet;

    fn bitor(mut self, language: Language) -> LanguageSet {
        self.insert(language);
        self
    }
}

impl BitOrAssign<Language> for LanguageSet {
    fn bitor_assign(&mut self, language: Language) {
        self.insert(language);
    }
}

impl From<Language> for LanguageSet {
    fn from(language: Language) -> Self {
        LanguageSet::NONE | language
    }
}
