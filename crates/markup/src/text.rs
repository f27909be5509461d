use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new("<.*?>").unwrap());

/// Remove inline markup the portals embed inside search-result titles
/// and descriptions.
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Decode HTML entities by running the text through the fragment parser.
///
/// The portals double-encode some fields; each call decodes one level, so
/// callers apply it twice where the source does.
pub fn decode_text(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect::<String>()
}

/// Concatenated, trimmed text content of an element.
pub fn inner_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
