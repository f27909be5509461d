use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

use enrich::Enricher;
use markup::{decode_text, inner_text, select_in, strip_tags, Document};

use crate::adapter::PortalAdapter;
use crate::extract::{episode_languages, language_redirect_links};
use crate::models::{Portal, SearchResult, Season, SeriesInfo};
use crate::sanitize::search_sanitize;
use crate::strategy::{canonical_path, normalize_path, PortalStrategy, StreamSelectors};

const DESCRIPTION_SHOW_MORE: &str = "mehr anzeigen";

/// Adapter for the two structurally-similar stream-directory portals
/// (AniWorld, S.TO). All site-specific knowledge lives in the strategy.
pub struct StreamPortal {
    strategy: PortalStrategy,
    client: reqwest::Client,
    enricher: Option<Arc<dyn Enricher>>,
}

/// Raw hit from the portal's `/ajax/search` endpoint.
#[derive(Debug, Clone, Deserialize)]
struct RawSearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
}

/// A search hit that survived filtering, before cover-art resolution.
#[derive(Debug, Clone, PartialEq)]
struct SearchHit {
    name: String,
    description: String,
    link: String,
    path: String,
}

/// Plain data pulled from a detail page.
struct DetailPage {
    name: String,
    description: Option<String>,
    season_count: u32,
    cover_src: Option<String>,
}

impl StreamPortal {
    pub fn new(strategy: PortalStrategy, client: reqwest::Client) -> Self {
        Self {
            strategy,
            client,
            enricher: None,
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// GET a page; a non-success status is an absent page, not an error.
    async fn fetch_ok(&self, url: &str) -> crate::Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "non-success response");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    async fn search_impl(&self, query: &str, strict: bool) -> crate::Result<Vec<SearchResult>> {
        // The portals' search endpoint chokes on apostrophes; only the part
        // before the first apostrophe is searchable.
        let query = query.split('\'').next().unwrap_or(query);
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/ajax/search", self.strategy.base_url))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(format!("keyword={}", search_sanitize(query)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        let content = response.text().await?;

        let hits = shortlist_hits(&content, query, strict)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let cover_art_url = self.resolve_cover(&hit.name, &hit.link).await;
            results.push(SearchResult {
                name: hit.name,
                description: hit.description,
                link: hit.link,
                path: hit.path,
                cover_art_url,
                portal: self.strategy.portal,
            });
        }
        Ok(results)
    }

    /// Cover art via the external metadata index, falling back to the
    /// portal's own cover image embedded as a data URI.
    async fn resolve_cover(&self, title: &str, link: &str) -> Option<String> {
        if let Some(enricher) = &self.enricher {
            match enricher.lookup(title).await {
                Ok(Some(metadata)) if metadata.poster_url.is_some() => {
                    return metadata.poster_url;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(provider = enricher.name(), %title, error = %e, "enrichment lookup failed");
                }
            }
        }

        let url = format!("{}{}", self.strategy.base_url, normalize_path(link));
        let html = self.fetch_ok(&url).await.ok().flatten()?;
        let cover_src = parse_cover_src(&html, &self.strategy.selectors)?;
        let cover_url = format!("{}{}", self.strategy.base_url, cover_src);
        enrich::cover_art_base64(&self.client, &cover_url).await
    }

    async fn detail_impl(&self, path: &str) -> crate::Result<Option<SeriesInfo>> {
        let url = self.strategy.series_url(path);
        let Some(html) = self.fetch_ok(&url).await? else {
            return Ok(None);
        };
        let Some(page) = parse_detail(&html, &self.strategy.selectors) else {
            tracing::debug!(%url, "detail page missing season navigation or title");
            return Ok(None);
        };

        let mut seasons = Vec::with_capacity(page.season_count as usize);
        for id in 1..=page.season_count {
            seasons.push(self.probe_season(path, id).await);
        }
        for season in &mut seasons {
            if season.episode_count == 0 {
                // Confirmed empty by the probe.
                continue;
            }
            match self.season_episodes_impl(path, season.id).await {
                Ok(scraped) => *season = scraped,
                Err(e) => {
                    tracing::warn!(portal = %self.strategy.portal, %path, season = season.id, error = %e, "episode scrape failed");
                }
            }
        }

        let metadata = match &self.enricher {
            Some(enricher) => match enricher.lookup(&page.name).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(provider = enricher.name(), name = %page.name, error = %e, "enrichment lookup failed");
                    None
                }
            },
            None => None,
        };

        let cover_art_url = match metadata.as_ref().and_then(|m| m.poster_url.clone()) {
            Some(poster) => Some(poster),
            None => match &page.cover_src {
                Some(src) => {
                    let cover_url = format!("{}{}", self.strategy.base_url, src);
                    enrich::cover_art_base64(&self.client, &cover_url).await
                }
                None => None,
            },
        };

        Ok(Some(SeriesInfo {
            name: page.name,
            description: page.description,
            season_count: Some(page.season_count),
            cover_art_url,
            direct_link: url,
            path: normalize_path(path),
            portal: self.strategy.portal,
            seasons,
            metadata,
        }))
    }

    /// Lightweight existence check: count episode anchors in the season
    /// navigation without scraping the episode table.
    async fn probe_season(&self, path: &str, season: u32) -> Season {
        let url = self.strategy.season_url(path, season);
        let episode_count = match self.fetch_ok(&url).await {
            Ok(Some(html)) => {
                let doc = Document::parse(&html);
                doc.select(&self.strategy.season_anchor_selector(season)).len() as u32
            }
            Ok(None) => 0,
            Err(e) => {
                tracing::debug!(%url, error = %e, "season probe failed");
                0
            }
        };
        Season {
            id: season,
            episode_count,
            episodes: Vec::new(),
        }
    }

    async fn season_episodes_impl(&self, path: &str, season: u32) -> crate::Result<Season> {
        let url = self.strategy.season_url(path, season);
        let Some(html) = self.fetch_ok(&url).await? else {
            return Ok(Season {
                id: season,
                episode_count: 0,
                episodes: Vec::new(),
            });
        };
        let episodes = parse_season_episodes(&html, &self.strategy.selectors, season);
        Ok(Season {
            id: season,
            episode_count: episodes.len() as u32,
            episodes,
        })
    }

    async fn popular_impl(&self, limit: usize) -> crate::Result<Vec<SearchResult>> {
        let Some(html) = self.fetch_ok(&self.strategy.base_url).await? else {
            return Ok(Vec::new());
        };

        let mut entries = parse_popular_entries(&html, &self.strategy);
        entries.shuffle(&mut rand::rng());
        entries.truncate(limit);

        let mut results = Vec::with_capacity(entries.len());
        for (link, name) in entries {
            let cover_art_url = self.resolve_cover(&name, &link).await;
            results.push(SearchResult {
                name,
                description: String::new(),
                path: canonical_path(&link),
                link,
                cover_art_url,
                portal: self.strategy.portal,
            });
        }
        Ok(results)
    }
}

#[async_trait]
impl PortalAdapter for StreamPortal {
    fn portal(&self) -> Portal {
        self.strategy.portal
    }

    async fn reachable(&self) -> bool {
        match self.client.get(&self.strategy.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(portal = %self.strategy.portal, error = %e, "portal unreachable");
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
                tracing::warn!(portal = %self.strategy.portal, %query, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn resolve_detail(&self, path: &str) -> Option<SeriesInfo> {
        match self.detail_impl(path).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(portal = %self.strategy.portal, %path, error = %e, "detail resolution failed");
                None
            }
        }
    }

    async fn resolve_season_episodes(&self, path: &str, season: u32) -> Season {
        match self.season_episodes_impl(path, season).await {
            Ok(season) => season,
            Err(e) => {
                tracing::warn!(portal = %self.strategy.portal, %path, season, error = %e, "season resolution failed");
                Season {
                    id: season,
                    episode_count: 0,
                    episodes: Vec::new(),
                }
            }
        }
    }

    async fn resolve_episode_links(&self, path: &str, mut season: Season) -> Season {
        // One request per episode, sequential on purpose: parallel fetches
        // trip the portals' anti-bot defenses.
        for episode in &mut season.episodes {
            let url = self
                .strategy
                .episode_url(path, episode.season, episode.episode);
            let html = match self.fetch_ok(&url).await {
                Ok(Some(html)) => html,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(%url, error = %e, "episode page fetch failed");
                    continue;
                }
            };
            episode.direct_view_links = language_redirect_links(
                &html,
                self.strategy.redirect_host,
                self.strategy.selectors.hoster_icon,
            );
        }
        season
    }

    async fn popular(&self, limit: usize) -> Vec<SearchResult> {
        if !self.reachable().await {
            return Vec::new();
        }
        match self.popular_impl(limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(portal = %self.strategy.portal, error = %e, "popular listing failed");
                Vec::new()
            }
        }
    }
}

/// Parse and filter the raw search response. The portal's search returns
/// support pages and season/episode fragment links alongside catalog hits;
/// those are dropped, and with `strict` only exact decoded-title matches
/// survive. Source order is preserved.
fn shortlist_hits(content: &str, query: &str, strict: bool) -> crate::Result<Vec<SearchHit>> {
    let hits: Vec<RawSearchHit> = serde_json::from_str(&strip_tags(content))?;

    if !hits.iter().any(|hit| hit.link.contains("/stream")) {
        return Ok(Vec::new());
    }

    Ok(hits
        .into_iter()
        .filter(|hit| {
            !hit.link.is_empty()
                && !hit.link.starts_with("/support")
                && hit.link.contains("/stream")
                && !hit.link.contains("staffel")
                && !hit.link.contains("episode")
        })
        .filter_map(|hit| {
            let name = decode_text(&hit.title);
            if strict && name != query {
                return None;
            }
            Some(SearchHit {
                name,
                description: decode_text(&decode_text(&hit.description)),
                path: canonical_path(&hit.link),
                link: hit.link,
            })
        })
        .collect())
}

fn parse_detail(html: &str, selectors: &StreamSelectors) -> Option<DetailPage> {
    let doc = Document::parse(html);

    let season_nav = doc.first(selectors.season_nav_list)?;
    let last_item = select_in(season_nav, "li").into_iter().last()?;
    let season_count: u32 = inner_text(last_item).parse().ok()?;

    let title = doc.first(selectors.title)?;
    let name = decode_text(&decode_text(&inner_text(title)));
    if name.is_empty() {
        return None;
    }

    Some(DetailPage {
        name,
        description: parse_description(&doc, selectors),
        season_count,
        cover_src: doc
            .first(selectors.cover_image)
            .and_then(|img| img.value().attr("data-src"))
            .map(str::to_string),
    })
}

fn parse_description(doc: &Document, selectors: &StreamSelectors) -> Option<String> {
    let node = doc.by_class(selectors.description_class)?;
    let text = inner_text(node);
    let text = text
        .strip_suffix(DESCRIPTION_SHOW_MORE)
        .unwrap_or(&text)
        .trim();
    if text.is_empty() {
        return None;
    }
    Some(decode_text(&decode_text(text)))
}

fn parse_cover_src(html: &str, selectors: &StreamSelectors) -> Option<String> {
    let doc = Document::parse(html);
    doc.first(selectors.cover_image)
        .and_then(|img| img.value().attr("data-src"))
        .map(str::to_string)
}

fn parse_season_episodes(
    html: &str,
    selectors: &StreamSelectors,
    season: u32,
) -> Vec<crate::models::Episode> {
    let doc = Document::parse(html);
    let mut episodes = Vec::new();
    let mut number = 1u32;

    for anchor in doc.select(selectors.episode_title) {
        // The anchor wraps the title in either <strong> or <span>; only
        // one of them carries text.
        let Some(name) = select_in(anchor, "strong, span")
            .into_iter()
            .map(inner_text)
            .find(|name| !name.is_empty())
        else {
            continue;
        };

        episodes.push(crate::models::Episode {
            season,
            episode: number,
            name: decode_text(&name),
            languages: episode_languages(&doc, number),
            direct_view_links: Vec::new(),
        });
        number += 1;
    }

    episodes
}

fn parse_popular_entries(html: &str, strategy: &PortalStrategy) -> Vec<(String, String)> {
    let doc = Document::parse(html);
    doc.select(strategy.selectors.popular_items)
        .into_iter()
        .filter_map(|anchor| {
            let link = anchor.value().attr("href")?.to_string();
            if !link.starts_with(strategy.category) {
                return None;
            }
            let name = select_in(anchor, "h3")
                .into_iter()
                .map(inner_text)
                .find(|name| !name.is_empty())?;
            Some((link, decode_text(&name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_strict_search_keeps_only_exact_title() {
        let content = r#"[
            {"title": "Example Show", "description": "d", "link": "/anime/stream/example-show"},
            {"title": "Example Show Specials", "description": "d", "link": "/anime/stream/example-show-specials"}
        ]"#;

        let hits = shortlist_hits(content, "Example Show", true).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Example Show");
        assert_eq!(hits[0].path, "/example-show");
    }

    #[test]
    fn test_search_filters_non_catalog_hits() {
        let content = r#"[
            {"title": "Example Show", "description": "", "link": "/anime/stream/example-show"},
            {"title": "FAQ", "description": "", "link": "/support/faq"},
            {"title": "Example Show Staffel 2", "description": "", "link": "/anime/stream/example-show/staffel-2"},
            {"title": "Example Show Episode 1", "description": "", "link": "/anime/stream/example-show/staffel-1/episode-1"}
        ]"#;

        let hits = shortlist_hits(content, "Example Show", false).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].link, "/anime/stream/example-show");
    }

    #[test]
    fn test_search_without_any_stream_link_is_empty() {
        let content = r#"[{"title": "FAQ", "description": "", "link": "/support/faq"}]"#;
        assert!(shortlist_hits(content, "FAQ", false).unwrap().is_empty());
    }

    #[test]
    fn test_search_decodes_titles_and_strips_markup() {
        let content = r#"[
            {"title": "Tom <em>&amp;</em> Jerry", "description": "Cat &amp;amp; mouse", "link": "/serie/stream/tom-jerry"}
        ]"#;

        let hits = shortlist_hits(content, "Tom & Jerry", false).unwrap();
        assert_eq!(hits[0].name, "Tom & Jerry");
        assert_eq!(hits[0].description, "Cat & mouse");
        assert_eq!(hits[0].path, "/tom-jerry");
    }

    const DETAIL_PAGE: &str = r#"
        <html><body>
            <div class="series-title"><h1><span>Example Show</span></h1></div>
            <p class="seri_des">A show about examples. mehr anzeigen</p>
            <div class="seriesCoverBox"><img data-src="/covers/example.jpg"></div>
            <div class="hosterSiteDirectNav">
                <ul><li><a>1</a></li><li><a>2</a></li><li>3</li></ul>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_detail_extracts_count_title_description() {
        let selectors = &PortalStrategy::aniworld().selectors;
        let page = parse_detail(DETAIL_PAGE, selectors).unwrap();
        assert_eq!(page.season_count, 3);
        assert_eq!(page.name, "Example Show");
        assert_eq!(page.description.as_deref(), Some("A show about examples."));
        assert_eq!(page.cover_src.as_deref(), Some("/covers/example.jpg"));
    }

    #[test]
    fn test_parse_detail_without_season_nav_is_none() {
        let selectors = &PortalStrategy::aniworld().selectors;
        let html = r#"<html><body><div class="series-title"><h1><span>X</span></h1></div></body></html>"#;
        assert!(parse_detail(html, selectors).is_none());
    }

    #[test]
    fn test_parse_detail_with_unparsable_count_is_none() {
        let selectors = &PortalStrategy::aniworld().selectors;
        let html = r#"
            <html><body>
                <div class="series-title"><h1><span>X</span></h1></div>
                <div class="hosterSiteDirectNav"><ul><li>Filme</li></ul></div>
            </body></html>
        "#;
        assert!(parse_detail(html, selectors).is_none());
    }

    const SEASON_PAGE: &str = r##"
        <html><body>
            <table><tbody>
                <tr data-episode-season-id="1">
                    <td class="seasonEpisodeTitle"><a href="#"><strong>Der Anfang</strong><span></span></a></td>
                    <td><a href="#"><img title="Deutsch/German"></a></td>
                </tr>
                <tr data-episode-season-id="2">
                    <td class="seasonEpisodeTitle"><a href="#"><strong></strong><span>The Second</span></a></td>
                    <td><a href="#"><img title="Englisch"></a></td>
                    <td><a href="#"><img title="Mit deutschem Untertitel"></a></td>
                </tr>
            </tbody></table>
        </body></html>
    "##;

    #[test]
    fn test_parse_season_episodes() {
        let selectors = &PortalStrategy::sto().selectors;
        let episodes = parse_season_episodes(SEASON_PAGE, selectors, 1);
        assert_eq!(episodes.len(), 2);

        assert_eq!(episodes[0].episode, 1);
        assert_eq!(episodes[0].name, "Der Anfang");
        assert!(episodes[0].languages.contains(Language::GerDub));
        assert!(episodes[0].direct_view_links.is_empty());

        assert_eq!(episodes[1].episode, 2);
        assert_eq!(episodes[1].name, "The Second");
        assert!(episodes[1].languages.contains(Language::EngDub));
        assert!(episodes[1].languages.contains(Language::GerSub));
    }

    #[test]
    fn test_parse_season_episodes_empty_page() {
        let selectors = &PortalStrategy::sto().selectors;
        assert!(parse_season_episodes("<html><body></body></html>", selectors, 1).is_empty());
    }

    #[test]
    fn test_parse_popular_entries_keeps_only_catalog_links() {
        let strategy = PortalStrategy::aniworld();
        let html = r#"
            <html><body><div class="preview rows sevenCols">
                <div class="coverListItem"><a href="/anime/stream/first-show"><h3>First Show</h3></a></div>
                <div class="coverListItem"><a href="/news/some-article"><h3>Not a show</h3></a></div>
                <div class="coverListItem"><a href="/anime/stream/second-show"><h3>Second Show</h3></a></div>
            </div></body></html>
        "#;
        let entries = parse_popular_entries(html, &strategy);
        assert_eq!(
            entries,
            vec![
                ("/anime/stream/first-show".to_string(), "First Show".to_string()),
                ("/anime/stream/second-show".to_string(), "Second Show".to_string()),
            ]
        );
    }

    const SEASON_ONE_PAGE: &str = r##"
        <html><body>
            <div class="hosterSiteDirectNav"><ul>
                <li><a data-season-id="1" href="#">1</a></li>
                <li><a data-season-id="1" href="#">2</a></li>
            </ul></div>
            <table><tbody>
                <tr data-episode-season-id="1">
                    <td class="seasonEpisodeTitle"><a href="#"><strong>Eins</strong></a></td>
                    <td><a href="#"><img title="Deutsch/German"></a></td>
                </tr>
                <tr data-episode-season-id="2">
                    <td class="seasonEpisodeTitle"><a href="#"><strong>Zwei</strong></a></td>
                </tr>
            </tbody></table>
        </body></html>
    "##;

    const SEASON_TWO_PAGE: &str = r#"
        <html><body>
            <div class="hosterSiteDirectNav"><ul></ul></div>
        </body></html>
    "#;

    const SEASON_THREE_PAGE: &str = r##"
        <html><body>
            <div class="hosterSiteDirectNav"><ul>
                <li><a data-season-id="3" href="#">1</a></li>
            </ul></div>
            <table><tbody>
                <tr data-episode-season-id="1">
                    <td class="seasonEpisodeTitle"><a href="#"><strong>Finale</strong></a></td>
                </tr>
            </tbody></table>
        </body></html>
    "##;

    #[tokio::test]
    async fn test_detail_probes_each_season_and_keeps_empty_ones() {
        let server = crate::testing::serve(vec![
            ("/anime/stream/example-show", DETAIL_PAGE),
            ("/anime/stream/example-show/staffel-1", SEASON_ONE_PAGE),
            ("/anime/stream/example-show/staffel-2", SEASON_TWO_PAGE),
            ("/anime/stream/example-show/staffel-3", SEASON_THREE_PAGE),
            ("/covers/example.jpg", "PNG"),
        ])
        .await;

        let portal = StreamPortal::new(
            PortalStrategy::aniworld().with_base_url(&server.base_url),
            reqwest::Client::new(),
        );

        let info = portal.resolve_detail("/example-show").await.unwrap();
        assert_eq!(info.name, "Example Show");
        assert_eq!(info.season_count, Some(3));
        assert_eq!(info.seasons.len(), 3);

        assert_eq!(info.seasons[0].episode_count, 2);
        assert_eq!(info.seasons[0].episodes[0].name, "Eins");
        assert!(info.seasons[0].episodes[0].languages.contains(Language::GerDub));

        // Zero probe anchors: the season survives as confirmed-empty.
        assert_eq!(info.seasons[1].id, 2);
        assert_eq!(info.seasons[1].episode_count, 0);
        assert!(info.seasons[1].episodes.is_empty());

        assert_eq!(info.seasons[2].episode_count, 1);
        assert_eq!(info.seasons[2].episodes[0].name, "Finale");

        // Without an enricher the native cover is embedded as a data URI.
        assert_eq!(
            info.cover_art_url.as_deref(),
            Some("data:image/png;base64, UE5H")
        );

        let requests = server.requests();
        for season in 1..=3 {
            let probe = format!("/staffel-{season}");
            assert!(requests.iter().any(|path| path.ends_with(&probe)));
        }
        // The empty season is probed exactly once and never scraped.
        assert_eq!(
            requests
                .iter()
                .filter(|path| path.ends_with("/staffel-2"))
                .count(),
            1
        );
        assert!(!requests.iter().any(|path| path.contains("/staffel-4")));
    }
}
