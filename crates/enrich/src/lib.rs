mod cover;
mod error;
mod matching;
mod provider;

pub use cover::cover_art_base64;
pub use error::EnrichError;
pub use matching::rank_by_containment;
pub use provider::{AniListEnricher, EnrichedMetadata, Enricher, MetadataSource, TmdbEnricher};

pub type Result<T> = std::result::Result<T, EnrichError>;
