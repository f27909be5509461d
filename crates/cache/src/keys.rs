use std::time::Duration;

/// Detail pages are re-derivable; re-scrape after three hours.
pub const DETAIL_TTL: Duration = Duration::from_secs(180 * 60);
/// Season/episode link pages share the detail TTL.
pub const SEASON_TTL: Duration = Duration::from_secs(180 * 60);
/// Aggregated popular listings are refreshed twice a day.
pub const POPULAR_TTL: Duration = Duration::from_secs(12 * 60 * 60);

pub const POPULAR_KEY: &str = "popularAtHosters";

pub fn detail_key(portal: &str, path: &str) -> String {
    format!("{path}@{portal}")
}

pub fn season_key(portal: &str, path: &str, season: u32) -> String {
    format!("{path}@{portal}:{season}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_composition() {
        assert_eq!(detail_key("AniWorld", "/example-show"), "/example-show@AniWorld");
        assert_eq!(
            season_key("S.TO", "/example-show", 2),
            "/example-show@S.TO:2"
        );
    }
}
