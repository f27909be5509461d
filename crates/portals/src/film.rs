use async_trait::async_trait;
use rand::seq::SliceRandom;

use markup::{decode_text, inner_text, select_in, Document};

use crate::adapter::PortalAdapter;
use crate::models::{Portal, SearchResult, Season, SeriesInfo};
use crate::strategy::normalize_path;

const BASE_URL: &str = "https://megakino.club";
const FILM_CATEGORY: &str = "/films";

const RESULT_ANCHORS: &str = "div#dle-content a";
const RESULT_TITLE: &str = "h3.poster__title";
const RESULT_IMAGE: &str = "div.poster__img img";
const DETAIL_TITLE: &str = "h1";
const DETAIL_DESCRIPTION: &str = "div.page__text";
const DETAIL_COVER: &str = "div.pmovie__poster img";

/// Adapter for the film catalog portal. Films are single releases; the
/// season and episode surface collapses to confirmed-empty results.
pub struct FilmPortal {
    base_url: String,
    client: reqwest::Client,
}

struct FilmEntry {
    name: String,
    link: String,
    cover_src: Option<String>,
}

struct FilmDetail {
    name: String,
    description: Option<String>,
    cover_src: Option<String>,
}

impl FilmPortal {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_ok(&self, url: &str) -> crate::Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "non-success response");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    async fn search_impl(&self, query: &str, strict: bool) -> crate::Result<Vec<SearchResult>> {
        let response = self
            .client
            .post(format!("{}/index.php?do=search", self.base_url))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(format!(
                "do=search&subaction=search&search_start=0&full_search=0&result_from=1&story={}",
                urlencoding::encode(query)
            ))
            .send()
            .await?;
        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        let html = response.text().await?;

        let entries = parse_film_entries(&html, &self.base_url);
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            if strict && entry.name != query {
                continue;
            }
            results.push(self.to_search_result(entry).await);
        }
        Ok(results)
    }

    async fn to_search_result(&self, entry: FilmEntry) -> SearchResult {
        let cover_art_url = match entry.cover_src {
            Some(src) => enrich::cover_art_base64(&self.client, &src).await,
            None => None,
        };
        SearchResult {
            name: entry.name,
            description: String::new(),
            path: film_path(&entry.link, &self.base_url),
            link: entry.link,
            cover_art_url,
            portal: Portal::MegaKino,
        }
    }

    fn detail_url(&self, path: &str) -> String {
        format!(
            "{}{}{}.html",
            self.base_url,
            FILM_CATEGORY,
            normalize_path(path)
        )
    }

    async fn detail_impl(&self, path: &str) -> crate::Result<Option<SeriesInfo>> {
        let url = self.detail_url(path);
        let Some(html) = self.fetch_ok(&url).await? else {
            return Ok(None);
        };
        let Some(page) = parse_film_detail(&html, &self.base_url) else {
            tracing::debug!(%url, "film page missing title");
            return Ok(None);
        };

        let cover_art_url = match page.cover_src {
            Some(src) => enrich::cover_art_base64(&self.client, &src).await,
            None => None,
        };

        Ok(Some(SeriesInfo {
            name: page.name,
            description: page.description,
            season_count: None,
            cover_art_url,
            direct_link: url,
            path: normalize_path(path),
            portal: Portal::MegaKino,
            seasons: Vec::new(),
            metadata: None,
        }))
    }

    async fn popular_impl(&self, limit: usize) -> crate::Result<Vec<SearchResult>> {
        let Some(html) = self.fetch_ok(&self.base_url).await? else {
            return Ok(Vec::new());
        };

        let mut entries = parse_film_entries(&html, &self.base_url);
        entries.shuffle(&mut rand::rng());
        entries.truncate(limit);

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            results.push(self.to_search_result(entry).await);
        }
        Ok(results)
    }
}

#[async_trait]
impl PortalAdapter for FilmPortal {
    fn portal(&self) -> Portal {
        Portal::MegaKino
    }

    async fn reachable(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(portal = %Portal::MegaKino, error = %e, "portal unreachable");
                false
            }
        }
    }

    async fn search(&self, query: &str, strict: bool) -> Vec<SearchResult> {
        if !self.reachable().await {
            return Vec::new();
        }
        match self.search_impl(query, strict).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(portal = %Portal::MegaKino, %query, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn resolve_detail(&self, path: &str) -> Option<SeriesInfo> {
        match self.detail_impl(path).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(portal = %Portal::MegaKino, %path, error = %e, "detail resolution failed");
                None
            }
        }
    }

    async fn resolve_season_episodes(&self, _path: &str, season: u32) -> Season {
        // Films carry no episode structure.
        Season {
            id: season,
            episode_count: 0,
            episodes: Vec::new(),
        }
    }

    async fn resolve_episode_links(&self, _path: &str, season: Season) -> Season {
        season
    }

    async fn popular(&self, limit: usize) -> Vec<SearchResult> {
        if !self.reachable().await {
            return Vec::new();
        }
        match self.popular_impl(limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(portal = %Portal::MegaKino, error = %e, "popular listing failed");
                Vec::new()
            }
        }
    }
}

fn parse_film_entries(html: &str, base_url: &str) -> Vec<FilmEntry> {
    let doc = Document::parse(html);
    doc.select(RESULT_ANCHORS)
        .into_iter()
        .filter_map(|anchor| {
            let link = anchor.value().attr("href")?.to_string();
            let name = select_in(anchor, RESULT_TITLE)
                .into_iter()
                .map(inner_text)
                .find(|name| !name.is_empty())?;
            let cover_src = select_in(anchor, RESULT_IMAGE)
                .into_iter()
                .find_map(|img| img.value().attr("data-src"))
                .map(|src| absolute_url(src, base_url));
            Some(FilmEntry {
                name: decode_text(&name),
                link,
                cover_src,
            })
        })
        .collect()
}

fn parse_film_detail(html: &str, base_url: &str) -> Option<FilmDetail> {
    let doc = Document::parse(html);

    let title = doc.first(DETAIL_TITLE)?;
    let name = decode_text(&inner_text(title));
    if name.is_empty() {
        return None;
    }

    let description = doc
        .first(DETAIL_DESCRIPTION)
        .map(inner_text)
        .filter(|text| !text.is_empty())
        .map(|text| decode_text(&text));

    let cover_src = doc.first(DETAIL_COVER).and_then(|img| {
        img.value()
            .attr("data-src")
            .or_else(|| img.value().attr("src"))
            .map(|src| absolute_url(src, base_url))
    });

    Some(FilmDetail {
        name,
        description,
        cover_src,
    })
}

/// Canonical slug of a film link: the part after the category segment,
/// without the trailing `.html`.
fn film_path(link: &str, base_url: &str) -> String {
    let relative = link.strip_prefix(base_url).unwrap_or(link);
    let relative = relative.strip_prefix(FILM_CATEGORY).unwrap_or(relative);
    let relative = relative.strip_suffix(".html").unwrap_or(relative);
    normalize_path(relative)
}

fn absolute_url(src: &str, base_url: &str) -> String {
    if src.starts_with('/') {
        format!("{base_url}{src}")
    } else {
        src.to_string()
    }
}
