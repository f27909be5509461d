use async_trait::async_trait;

use crate::models::{Portal, SearchResult, Season, SeriesInfo};

/// Common resolver contract, implemented once per portal family.
///
/// Portal downtime and markup drift are expected steady-state conditions:
/// every operation degrades to an empty or absent result instead of
/// surfacing an error to the caller.
#[async_trait]
pub trait PortalAdapter: Send + Sync {
    fn portal(&self) -> Portal;

    /// Lightweight liveness probe; when the portal is down all other
    /// operations short-circuit to "no result".
    async fn reachable(&self) -> bool;

    /// Search the portal's own catalog. With `strict`, only exact
    /// (entity-decoded) title matches survive. Source order is preserved.
    async fn search(&self, query: &str, strict: bool) -> Vec<SearchResult>;

    /// Fetch the canonical detail page and enumerate seasons.
    async fn resolve_detail(&self, path: &str) -> Option<SeriesInfo>;

    /// Scrape one season's episode table with per-episode language flags.
    /// Always returns a season; `episode_count` may legitimately be 0.
    async fn resolve_season_episodes(&self, path: &str, season: u32) -> Season;

    /// The expensive pass: one extra page fetch per episode to extract
    /// hoster redirect targets. Kept separate from language detection so
    /// the cost is only paid when playable links are actually needed.
    async fn resolve_episode_links(&self, path: &str, season: Season) -> Season;

    /// Random sample of the portal's front-page listing.
    async fn popular(&self, limit: usize) -> Vec<SearchResult>;
}
