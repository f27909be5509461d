mod client;
mod error;
pub mod models;

pub use client::AniListClient;
pub use error::AniListError;
pub use models::{CoverImage, Media, MediaTitle};

pub type Result<T> = std::result::Result<T, AniListError>;
