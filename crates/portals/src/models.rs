use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::{Language, LanguageSet};
use enrich::EnrichedMetadata;

/// One external streaming catalog site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    AniWorld,
    Sto,
    MegaKino,
}

impl Portal {
    pub fn name(&self) -> &'static str {
        match self {
            Portal::AniWorld => "AniWorld",
            Portal::Sto => "S.TO",
            Portal::MegaKino => "MegaKino",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One hit from a portal's own search endpoint, canonicalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Portal-relative URL as the site returned it.
    pub link: String,
    /// Canonical slug; the stable identity key for downstream lookups.
    /// Always carries exactly one leading slash.
    pub path: String,
    #[serde(default)]
    pub cover_art_url: Option<String>,
    pub portal: Portal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Absent for single-release (film-catalog) portals.
    #[serde(default)]
    pub season_count: Option<u32>,
    #[serde(default)]
    pub cover_art_url: Option<String>,
    pub direct_link: String,
    pub path: String,
    pub portal: Portal,
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Cross-reference record from the external metadata index, when one
    /// resolved.
    #[serde(default)]
    pub metadata: Option<EnrichedMetadata>,
}

/// `episode_count` is probed independently of `episodes`; a season with
/// `episode_count == 0` is a confirmed-empty season, not a probe failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: u32,
    pub episode_count: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
    pub name: String,
    #[serde(default)]
    pub languages: LanguageSet,
    /// Populated only by explicit link resolution; detail resolution leaves
    /// it empty.
    #[serde(default)]
    pub direct_view_links: Vec<DirectViewLink>,
}

/// One hoster redirect URL for one language variant of one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectViewLink {
    pub language: Language,
    pub direct_link: String,
}
