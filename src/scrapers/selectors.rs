use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

// Each list is tried in order; the first selector that matches wins.

pub const ITEM_SELECTORS: &[&str] = &["div.list-rst", "li.list-rst"];

pub const NAME_LINK_SELECTORS: &[&str] = &["a.list-rst__rst-name-target", "a[href]"];
pub const RATING_SELECTORS: &[&str] = &["span.c-rating__val"];
pub const REVIEW_COUNT_SELECTORS: &[&str] = &["em.list-rst__rvw-count-num"];
pub const SAVE_COUNT_SELECTORS: &[&str] = &["em.list-rst__save-count-num"];
pub const AREA_SELECTORS: &[&str] = &["span.list-rst__area-genre"];
pub const GENRE_SELECTORS: &[&str] = &["span.list-rst__genre"];
pub const DESCRIPTION_SELECTORS: &[&str] = &["div.list-rst__catch"];
pub const BUDGET_SELECTORS: &[&str] = &["span.list-rst__budget-val"];
pub const VPOINT_BADGE_SELECTORS: &[&str] = &["span.c-badge-tpoint"];
pub const BOOKING_BUTTON_SELECTORS: &[&str] = &["div.list-rst__booking-btn"];
pub const PHOTO_SELECTORS: &[&str] = &["img.list-rst__photo-img"];

pub const TOTAL_COUNT_SELECTORS: &[&str] = &["span.c-page-count__num"];

/// Image attributes, lazy-loaded pages keep the real URL in `data-original`
pub const PHOTO_ATTRIBUTES: &[&str] = &["src", "data-original"];

/// Ordered CSS selector strategies compiled once
pub struct SelectorList {
    selectors: Vec<(&'static str, Selector)>,
}

impl SelectorList {
    /// Compile every source; invalid ones are logged and left out
    pub fn compile(sources: &[&'static str]) -> Self {
        let selectors = sources
            .iter()
            .filter_map(|source| match Selector::parse(source) {
                Ok(selector) => Some((*source, selector)),
                Err(e) => {
                    warn!("Failed to compile selector '{}': {}", source, e);
                    None
                }
            })
            .collect();

        Self { selectors }
    }

    /// Matches of the first selector that finds anything in the document
    pub fn select_all<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        for (index, (source, selector)) in self.selectors.iter().enumerate() {
            let found: Vec<ElementRef<'a>> = html.select(selector).collect();
            if !found.is_empty() {
                if index > 0 {
                    debug!("Fell back to selector '{}' ({} matches)", source, found.len());
                }
                return found;
            }
        }
        Vec::new()
    }

    /// Matches of the first selector that finds anything below `scope`
    pub fn select_within<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|(_, selector)| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    /// First element below `scope`, trying each selector in turn
    pub fn first_within<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|(_, selector)| scope.select(selector).next())
    }

    pub fn exists_within(&self, scope: ElementRef<'_>) -> bool {
        self.first_within(scope).is_some()
    }
}

/// Text content with each text node trimmed and the pieces joined
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Stripped text of the first match, `None` when missing or empty
pub fn text_within(list: &SelectorList, scope: ElementRef<'_>) -> Option<String> {
    list.first_within(scope)
        .map(stripped_text)
        .filter(|text| !text.is_empty())
}

/// First non-empty attribute out of `names`
pub fn first_attr<'a>(element: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Integer display value such as "1,234"; anything else is `None`
pub fn parse_count(text: &str) -> Option<u32> {
    text.trim().replace(',', "").parse().ok()
}

pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_separators_only() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn ratings_reject_placeholders() {
        assert_eq!(parse_rating("3.58"), Some(3.58));
        assert_eq!(parse_rating("N/A"), None);
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating(" - "), None);
    }

    #[test]
    fn invalid_selectors_are_skipped() {
        let list = SelectorList::compile(&["div[", "p.ok"]);
        let html = Html::parse_document("<p class=\"ok\">hi</p>");
        assert_eq!(list.select_all(&html).len(), 1);
    }

    #[test]
    fn stripped_text_joins_trimmed_pieces() {
        let html = Html::parse_fragment("<span> 銀座 <b> 寿司 </b></span>");
        let selector = Selector::parse("span").unwrap();
        let span = html.select(&selector).next().unwrap();
        assert_eq!(stripped_text(span), "銀座寿司");
    }
}
