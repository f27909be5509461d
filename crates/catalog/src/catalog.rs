use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use anilist::AniListClient;
use cache::{detail_key, season_key, MemoryCache, DETAIL_TTL, POPULAR_KEY, POPULAR_TTL, SEASON_TTL};
use enrich::{AniListEnricher, Enricher, TmdbEnricher};
use portals::{
    FilmPortal, Portal, PortalAdapter, PortalStrategy, SearchResult, Season, SeriesInfo,
    StreamPortal,
};
use tmdb::TmdbClient;

use crate::config::Settings;
use crate::http::{build_http_client, egress_ip};

/// Sample size each portal contributes to the popular listing.
const POPULAR_PER_PORTAL: usize = 5;

/// Facade over all configured portal adapters, with one shared TTL cache.
pub struct Catalog {
    adapters: Vec<Arc<dyn PortalAdapter>>,
    cache: MemoryCache,
    client: reqwest::Client,
}

impl Catalog {
    /// Wire adapters and enrichers from settings. The anime portal pairs
    /// with AniList; the series portal pairs with TMDB when a token is
    /// configured. The film portal runs without enrichment.
    pub fn from_settings(settings: &Settings) -> crate::Result<Self> {
        let client = build_http_client(settings)?;

        let mut adapters: Vec<Arc<dyn PortalAdapter>> = Vec::new();

        if settings.portals.aniworld {
            let anilist: Arc<dyn Enricher> =
                Arc::new(AniListEnricher::new(Arc::new(AniListClient::new(
                    client.clone(),
                ))));
            adapters.push(Arc::new(
                StreamPortal::new(PortalStrategy::aniworld(), client.clone())
                    .with_enricher(anilist),
            ));
        }

        if settings.portals.sto {
            let mut portal = StreamPortal::new(PortalStrategy::sto(), client.clone());
            if let Some(tmdb) = &settings.tmdb {
                let enricher: Arc<dyn Enricher> = Arc::new(TmdbEnricher::new(Arc::new(
                    TmdbClient::new(client.clone(), &tmdb.access_token),
                )));
                portal = portal.with_enricher(enricher);
            } else {
                tracing::info!("no TMDB token configured, series enrichment disabled");
            }
            adapters.push(Arc::new(portal));
        }

        if settings.portals.megakino {
            adapters.push(Arc::new(FilmPortal::new(client.clone())));
        }

        Ok(Self::new(adapters, client))
    }

    pub fn new(adapters: Vec<Arc<dyn PortalAdapter>>, client: reqwest::Client) -> Self {
        Self {
            adapters,
            cache: MemoryCache::new(),
            client,
        }
    }

    /// Startup check: log the egress IP and each portal's reachability.
    /// Unreachable portals stay registered; they degrade to empty results
    /// until they come back.
    pub async fn init(&self) {
        match egress_ip(&self.client).await {
            Some(ip) => tracing::info!(%ip, "outbound requests originate from"),
            None => tracing::warn!("could not determine egress ip"),
        }

        let checks = self.adapters.iter().map(|adapter| async move {
            (adapter.portal(), adapter.reachable().await)
        });
        for (portal, reachable) in join_all(checks).await {
            if reachable {
                tracing::info!(%portal, "portal reachable");
            } else {
                tracing::warn!(%portal, "portal unreachable");
            }
        }
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_with(query, false).await
    }

    /// Search keeping only exact title matches.
    pub async fn search_strict(&self, query: &str) -> Vec<SearchResult> {
        self.search_with(query, true).await
    }

    async fn search_with(&self, query: &str, strict: bool) -> Vec<SearchResult> {
        let batches = join_all(
            self.adapters
                .iter()
                .map(|adapter| adapter.search(query, strict)),
        )
        .await;
        merge_results(batches)
    }

    /// Resolve one series with its full season structure, cached per
    /// portal and path.
    pub async fn resolve_detail(&self, portal: Portal, path: &str) -> Option<SeriesInfo> {
        let adapter = self.adapter(portal)?;
        let key = detail_key(portal.name(), path);

        if let Some(cached) = self.cache.get::<SeriesInfo>(&key) {
            return Some(cached);
        }

        let info = adapter.resolve_detail(path).await?;
        self.cache.set(&key, &info, DETAIL_TTL);
        Some(info)
    }

    /// Resolve one season's episodes with their hoster redirect links,
    /// cached per portal, path and season.
    pub async fn resolve_season_links(
        &self,
        portal: Portal,
        path: &str,
        season: u32,
    ) -> Option<Season> {
        let adapter = self.adapter(portal)?;
        let key = season_key(portal.name(), path, season);

        if let Some(cached) = self.cache.get::<Season>(&key) {
            return Some(cached);
        }

        let episodes = adapter.resolve_season_episodes(path, season).await;
        let resolved = adapter.resolve_episode_links(path, episodes).await;
        self.cache.set(&key, &resolved, SEASON_TTL);
        Some(resolved)
    }

    /// Aggregated random sample of every portal's front-page listing.
    pub async fn popular(&self) -> Vec<SearchResult> {
        if let Some(cached) = self.cache.get::<Vec<SearchResult>>(POPULAR_KEY) {
            return cached;
        }

        let batches = join_all(
            self.adapters
                .iter()
                .map(|adapter| adapter.popular(POPULAR_PER_PORTAL)),
        )
        .await;
        let results = merge_results(batches);

        if !results.is_empty() {
            self.cache.set(POPULAR_KEY, &results, POPULAR_TTL);
        }
        results
    }

    fn adapter(&self, portal: Portal) -> Option<&Arc<dyn PortalAdapter>> {
        self.adapters
            .iter()
            .find(|adapter| adapter.portal() == portal)
    }
}

/// Flatten per-portal batches, dropping duplicate (portal, path) pairs
/// while preserving batch order.
fn merge_results(batches: Vec<Vec<SearchResult>>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|result| seen.insert((result.portal, result.path.clone())))
        .collect()
}
