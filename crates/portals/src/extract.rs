use scraper::ElementRef;

use markup::Document;

use crate::language::{Language, LanguageSet};
use crate::models::DirectViewLink;

/// Languages advertised for one episode row, detected from the hoster
/// flag icons. Unrecognized icon titles are ignored; flags accumulate by
/// OR only, so scanning the same markup twice yields the identical set.
pub(crate) fn episode_languages(doc: &Document, episode: u32) -> LanguageSet {
    let mut languages = LanguageSet::NONE;

    for icon in doc.select(&format!(
        r#"tr[data-episode-season-id="{episode}"] td a img"#
    )) {
        let Some(title) = icon.value().attr("title") else {
            continue;
        };
        if let Some(language) = Language::from_icon_title(title) {
            languages |= language;
        }
    }

    languages
}

/// Hoster redirect links for one episode page.
///
/// Only icons of the preferred hoster are considered. Each icon's ancestor
/// chain carries a `data-lang-key`; the link is taken from the ancestor's
/// `data-link-target`. A language whose row lacks the target attribute is
/// omitted; partial extraction is a normal outcome, not a failure.
pub(crate) fn language_redirect_links(
    html: &str,
    host: &str,
    hoster_icon: &str,
) -> Vec<DirectViewLink> {
    let doc = Document::parse(html);
    let icons = doc.select(hoster_icon);
    if icons.is_empty() {
        return Vec::new();
    }

    let mut links = Vec::new();
    for language in [
        Language::GerDub,
        Language::EngDub,
        Language::EngSub,
        Language::GerSub,
    ] {
        let Some(key) = language.lang_key() else {
            continue;
        };
        if let Some(target) = redirect_target(&icons, key) {
            links.push(DirectViewLink {
                language,
                direct_link: format!("https://{host}{target}"),
            });
        }
    }

    links
}

fn redirect_target(icons: &[ElementRef<'_>], key: &str) -> Option<String> {
    for icon in icons {
        let Some(row) = icon
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().attr("data-lang-key").is_some())
        else {
            continue;
        };
        if row.value().attr("data-lang-key") != Some(key) {
            continue;
        }
        if let Some(target) = row.value().attr("data-link-target") {
            return Some(target.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PortalStrategy;

    const EPISODE_PAGE: &str = r##"
        <html><body>
            <ul>
                <li data-lang-key="1" data-link-target="/redirect/100">
                    <div><a href="#"><i title="Hoster VOE"></i></a></div>
                </li>
                <li data-lang-key="4" data-link-target="/redirect/400">
                    <div><a href="#"><i title="Hoster VOE"></i></a></div>
                </li>
                <li data-lang-key="3">
                    <div><a href="#"><i title="Hoster VOE"></i></a></div>
                </li>
                <li data-lang-key="2" data-link-target="/redirect/999">
                    <div><a href="#"><i title="Hoster Other"></i></a></div>
                </li>
            </ul>
        </body></html>
    "##;

    fn hoster_icon() -> &'static str {
        PortalStrategy::aniworld().selectors.hoster_icon
    }

    #[test]
    fn test_redirect_links_for_languages_with_target() {
        let links = language_redirect_links(EPISODE_PAGE, "aniworld.to", hoster_icon());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].language, Language::GerDub);
        assert_eq!(links[0].direct_link, "https://aniworld.to/redirect/100");
        assert_eq!(links[1].language, Language::EngSub);
        assert_eq!(links[1].direct_link, "https://aniworld.to/redirect/400");
    }

    #[test]
    fn test_language_without_target_is_omitted() {
        let links = language_redirect_links(EPISODE_PAGE, "aniworld.to", hoster_icon());
        assert!(links.iter().all(|l| l.language != Language::GerSub));
    }

    #[test]
    fn test_other_hoster_icons_are_ignored() {
        let links = language_redirect_links(EPISODE_PAGE, "aniworld.to", hoster_icon());
        assert!(links.iter().all(|l| l.language != Language::EngDub));
    }

    #[test]
    fn test_no_hoster_icons_yield_empty() {
        let links =
            language_redirect_links("<html><body></body></html>", "s.to", hoster_icon());
        assert!(links.is_empty());
    }

    const SEASON_ROWS: &str = r##"
        <html><body><table><tbody>
            <tr data-episode-season-id="1">
                <td><a href="#"><img title="Deutsch/German"></a></td>
                <td><a href="#"><img title="Mit deutschem Untertitel"></a></td>
                <td><a href="#"><img title="Deutsch/German"></a></td>
            </tr>
            <tr data-episode-season-id="2">
                <td><a href="#"><img title="Klingonisch"></a></td>
            </tr>
        </tbody></table></body></html>
    "##;

    #[test]
    fn test_episode_languages_accumulate_by_or() {
        let doc = Document::parse(SEASON_ROWS);
        let languages = episode_languages(&doc, 1);
        assert!(languages.contains(Language::GerDub));
        assert!(languages.contains(Language::GerSub));
        assert!(!languages.contains(Language::EngDub));
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let doc = Document::parse(SEASON_ROWS);
        assert_eq!(episode_languages(&doc, 1), episode_languages(&doc, 1));
    }

    #[test]
    fn test_unknown_titles_are_ignored() {
        let doc = Document::parse(SEASON_ROWS);
        assert!(episode_languages(&doc, 2).is_empty());
    }

    #[test]
    fn test_absent_row_is_empty() {
        let doc = Document::parse(SEASON_ROWS);
        assert!(episode_languages(&doc, 7).is_empty());
    }
}
