#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("TMDB lookup failed: {0}")]
    Tmdb(#[from] tmdb::TmdbError),

    #[error("AniList lookup failed: {0}")]
    AniList(#[from] anilist::AniListError),
}
