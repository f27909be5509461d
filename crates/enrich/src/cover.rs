use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Fetch a portal-hosted cover image and embed it as a base64 data URI.
///
/// Used when no external provider resolves usable poster art. Any transport
/// failure yields `None`; the caller then simply has no cover.
pub async fn cover_art_base64(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(%url, error = %e, "cover art fetch failed");
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(%url, status = %response.status(), "cover art fetch failed");
        return None;
    }

    let bytes = response.bytes().await.ok()?;
    if bytes.is_empty() {
        return None;
    }

    Some(format!("data:image/png;base64, {}", STANDARD.encode(&bytes)))
}
