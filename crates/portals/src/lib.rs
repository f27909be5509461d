mod adapter;
mod error;
mod extract;
mod film;
mod language;
pub mod models;
mod sanitize;
mod strategy;
mod stream;
#[cfg(test)]
mod testing;

pub use adapter::PortalAdapter;
pub use error::PortalError;
pub use film::FilmPortal;
pub use language::{Language, LanguageSet};
pub use models::{DirectViewLink, Episode, Portal, SearchResult, Season, SeriesInfo};
pub use sanitize::search_sanitize;
pub use strategy::{canonical_path, normalize_path, PortalStrategy};
pub use stream::StreamPortal;

pub type Result<T> = std::result::Result<T, PortalError>;
