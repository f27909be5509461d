use reqwest::Client;

use crate::error::TmdbError;
use crate::models::{SearchTvResponse, TvDetail};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const LANGUAGE: &str = "de-DE";

pub struct TmdbClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl TmdbClient {
    pub fn new(client: Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_base_url(
        client: Client,
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Search TV shows by free-text query.
    pub async fn search_tv(&self, query: &str) -> crate::Result<SearchTvResponse> {
        let response = self
            .client
            .get(self.url("/search/tv"))
            .bearer_auth(&self.access_token)
            .query(&[
                ("query", query),
                ("include_adult", "false"),
                ("language", LANGUAGE),
                ("page", "1"),
            ])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Look up one show by its TMDB id.
    pub async fn tv(&self, id: i64) -> crate::Result<TvDetail> {
        let response = self
            .client
            .get(self.url(&format!("/tv/{id}")))
            .bearer_auth(&self.access_token)
            .query(&[("language", LANGUAGE)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> crate::Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TmdbError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| TmdbError::Json {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }
}
