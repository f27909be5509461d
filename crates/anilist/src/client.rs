use reqwest::Client;

use crate::error::AniListError;
use crate::models::{Media, SearchMediaResponse};

const BASE_URL: &str = "https://graphql.anilist.co";

/// Fixed search document; the title is passed as a GraphQL variable.
const SEARCH_MEDIA_QUERY: &str = r#"
query ($search: String) {
  Page(page: 1, perPage: 10) {
    media(search: $search, type: ANIME) {
      title { userPreferred english }
      coverImage { large }
      averageScore
      description
    }
  }
}
"#;

pub struct AniListClient {
    client: Client,
    base_url: String,
}

impl AniListClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Search media by title, returning candidates in provider order.
    pub async fn search_media(&self, title: &str) -> crate::Result<Vec<Media>> {
        let body = serde_json::json!({
            "query": SEARCH_MEDIA_QUERY,
            "variables": { "search": title },
        });

        let response = self.client.post(&self.base_url).json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AniListError::Api {
                status_code: status.as_u16(),
                message: text,
            });
        }

        let deserializer = &mut serde_json::Deserializer::from_str(&text);
        let parsed: SearchMediaResponse =
            serde_path_to_error::deserialize(deserializer).map_err(|e| AniListError::Json {
                path: e.path().to_string(),
                source: e.into_inner(),
            })?;

        Ok(parsed
            .data
            .and_then(|data| data.page)
            .map(|page| page.media)
            .unwrap_or_default())
    }
}
