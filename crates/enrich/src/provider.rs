use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use anilist::AniListClient;
use tmdb::TmdbClient;

use crate::matching::rank_by_containment;

/// TMDB poster size used for cover art.
const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w300";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Tmdb,
    AniList,
}

/// Cross-referenced metadata for a scraped title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    pub source: MetadataSource,
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Normalized to a 0-10 scale.
    #[serde(default)]
    pub score: Option<f32>,
}

/// One external metadata index.
///
/// A lookup is a single attempt with no retry; an error degrades to the
/// portal's native cover art and never blocks the primary scrape.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn lookup(&self, title: &str) -> crate::Result<Option<EnrichedMetadata>>;

    fn name(&self) -> &'static str;
}

pub struct TmdbEnricher {
    client: Arc<TmdbClient>,
}

impl TmdbEnricher {
    pub fn new(client: Arc<TmdbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Enricher for TmdbEnricher {
    async fn lookup(&self, title: &str) -> crate::Result<Option<EnrichedMetadata>> {
        let response = self.client.search_tv(title).await?;

        let Some(candidate) =
            rank_by_containment(title, &response.results, |show| vec![show.name.as_str()])
        else {
            return Ok(None);
        };

        let detail = self.client.tv(candidate.id).await?;

        Ok(Some(EnrichedMetadata {
            source: MetadataSource::Tmdb,
            external_id: Some(detail.id),
            title: Some(detail.name),
            poster_url: detail
                .poster_path
                .map(|path| format!("{TMDB_IMAGE_BASE_URL}{path}")),
            description: detail.overview,
            score: None,
        }))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

pub struct AniListEnricher {
    client: Arc<AniListClient>,
}

impl AniListEnricher {
    pub fn new(client: Arc<AniListClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Enricher for AniListEnricher {
    async fn lookup(&self, title: &str) -> crate::Result<Option<EnrichedMetadata>> {
        let media = self.client.search_media(title).await?;

        let Some(medium) = rank_by_containment(title, &media, |medium| {
            medium
                .title
                .iter()
                .flat_map(|t| [t.user_preferred.as_deref(), t.english.as_deref()])
                .flatten()
                .collect()
        }) else {
            return Ok(None);
        };

        Ok(Some(EnrichedMetadata {
            source: MetadataSource::AniList,
            external_id: None,
            title: medium
                .title
                .as_ref()
                .and_then(|t| t.user_preferred.clone().or_else(|| t.english.clone())),
            poster_url: medium
                .cover_image
                .as_ref()
                .and_then(|image| image.large.clone()),
            description: medium.description.clone(),
            // Provider reports 0-100.
            score: medium.average_score.map(|score| score / 10.0),
        }))
    }

    fn name(&self) -> &'static str {
        "anilist"
    }
}
