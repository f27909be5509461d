/// Encode a title the way the stream portals' search form expects it.
pub fn search_sanitize(text: &str) -> String {
    text.replace('+', "%2B").replace(' ', "+").replace('\'', "")
}
