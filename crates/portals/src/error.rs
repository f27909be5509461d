#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search response was not valid JSON: {0}")]
    SearchDecode(#[from] serde_json::Error),
}
