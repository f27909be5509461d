use crate::models::Portal;

/// Everything that differs between the two stream-directory portals.
///
/// The adapters share one control flow; a site layout change is absorbed by
/// editing the strategy's selector strings, not the adapter.
#[derive(Debug, Clone)]
pub struct PortalStrategy {
    pub portal: Portal,
    pub base_url: String,
    /// Category segment the portal nests series under.
    pub category: &'static str,
    /// Host used to assemble hoster redirect links.
    pub redirect_host: &'static str,
    pub selectors: StreamSelectors,
}

#[derive(Debug, Clone)]
pub struct StreamSelectors {
    /// Season navigation list on detail and season pages.
    pub season_nav_list: &'static str,
    pub title: &'static str,
    pub description_class: &'static str,
    pub cover_image: &'static str,
    /// Episode title anchors in the season's episode table.
    pub episode_title: &'static str,
    /// Cover list anchors on the portal's front page.
    pub popular_items: &'static str,
    /// Icon identifying the preferred hoster on episode pages.
    pub hoster_icon: &'static str,
}

const STREAM_SELECTORS: StreamSelectors = StreamSelectors {
    season_nav_list: "div.hosterSiteDirectNav ul",
    title: "div.series-title h1 span",
    description_class: "seri_des",
    cover_image: "div.seriesCoverBox img",
    episode_title: "tbody tr td.seasonEpisodeTitle a",
    popular_items: "div.preview.rows.sevenCols div.coverListItem a",
    hoster_icon: r#"i[title="Hoster VOE"]"#,
};

impl PortalStrategy {
    pub fn aniworld() -> Self {
        Self {
            portal: Portal::AniWorld,
            base_url: "https://aniworld.to".to_string(),
            category: "/anime/stream",
            redirect_host: "aniworld.to",
            selectors: STREAM_SELECTORS,
        }
    }

    pub fn sto() -> Self {
        Self {
            portal: Portal::Sto,
            base_url: "https://s.to".to_string(),
            category: "/serie/stream",
            redirect_host: "s.to",
            selectors: STREAM_SELECTORS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn series_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.category, normalize_path(path))
    }

    pub fn season_url(&self, path: &str, season: u32) -> String {
        format!("{}/staffel-{season}", self.series_url(path))
    }

    pub fn episode_url(&self, path: &str, season: u32, episode: u32) -> String {
        format!("{}/staffel-{season}/episode-{episode}", self.series_url(path))
    }

    /// Selector for the episode anchors that confirm a season's existence.
    pub fn season_anchor_selector(&self, season: u32) -> String {
        format!(
            r#"{} li a[data-season-id="{season}"]"#,
            self.selectors.season_nav_list
        )
    }
}

/// Normalize to exactly one leading slash.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Canonical slug of a portal-relative link: the portal-internal routing
/// prefix is removed and the remainder normalized.
pub fn canonical_path(link: &str) -> String {
    for prefix in ["/anime/stream", "/serie/stream"] {
        if let Some(rest) = link.strip_prefix(prefix) {
            return normalize_path(rest);
        }
    }
    normalize_path(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_path_strips_routing_prefix() {
        assert_eq!(canonical_path("/anime/stream/example-show"), "/example-show");
        assert_eq!(canonical_path("/serie/stream/example-show"), "/example-show");
        assert_eq!(canonical_path("/example-show"), "/example-show");
    }

    #[test]
    fn test_normalize_path_single_leading_slash() {
        assert_eq!(normalize_path("example-show"), "/example-show");
        assert_eq!(normalize_path("//example-show"), "/example-show");
        assert_eq!(normalize_path("/example-show"), "/example-show");
    }

    #[test]
    fn test_url_construction() {
        let strategy = PortalStrategy::aniworld();
        assert_eq!(
            strategy.series_url("example-show"),
            "https://aniworld.to/anime/stream/example-show"
        );
        assert_eq!(
            strategy.season_url("/example-show", 2),
            "https://aniworld.to/anime/stream/example-show/staffel-2"
        );
        assert_eq!(
            strategy.episode_url("/example-show", 2, 5),
            "https://aniworld.to/anime/stream/example-show/staffel-2/episode-5"
        );

        let sto = PortalStrategy::sto().with_base_url("http://localhost:9999");
        assert_eq!(
            sto.series_url("/example-show"),
            "http://localhost:9999/serie/stream/example-show"
        );
    }
}
