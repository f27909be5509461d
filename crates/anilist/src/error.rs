#[derive(Debug, thiserror::Error)]
pub enum AniListError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AniList API error {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode AniList response at {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}
