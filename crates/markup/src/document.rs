use scraper::{ElementRef, Html, Selector};

/// A freshly parsed HTML page with lenient queries.
///
/// Zero matches and malformed selector strings both yield empty results.
/// An absent node means "feature not present on this page", never an error;
/// the scraped sites change layout without notice and callers are expected
/// to degrade to empty results.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All nodes matching the CSS selector, in document order.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::debug!("invalid selector `{css}`: {e}");
                Vec::new()
            }
        }
    }

    /// First node matching the CSS selector.
    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).next(),
            Err(e) => {
                tracing::debug!("invalid selector `{css}`: {e}");
                None
            }
        }
    }

    /// First node carrying the given class.
    pub fn by_class(&self, class: &str) -> Option<ElementRef<'_>> {
        self.first(&format!(".{class}"))
    }
}

/// All descendants of `element` matching the CSS selector.
pub fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(e) => {
            tracing::debug!("invalid selector `{css}`: {e}");
            Vec::new()
        }
    }
}
