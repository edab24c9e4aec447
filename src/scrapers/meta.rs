use crate::models::SearchMeta;
use crate::scrapers::parser::ITEMS;
use crate::scrapers::selectors::{self, SelectorList};
use chrono::Utc;
use once_cell::sync::Lazy;
use scraper::Html;

/// Page size the site uses when a page shows no items to count
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 20;

static TOTAL_COUNT: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::TOTAL_COUNT_SELECTORS));

/// Read result count and pagination from a results page.
///
/// Only meaningful on the first page: the page size is taken from the
/// number of items found there.
pub fn parse_meta(html: &str, current_page: u32) -> SearchMeta {
    let document = Html::parse_document(html);
    meta_in(&document, current_page)
}

pub(crate) fn meta_in(document: &Html, current_page: u32) -> SearchMeta {
    let total_count = TOTAL_COUNT
        .select_all(document)
        .into_iter()
        .next()
        .and_then(|node| selectors::parse_count(&selectors::stripped_text(node)))
        .unwrap_or(0);

    let items_found = ITEMS.select_all(document).len() as u32;
    let results_per_page = if items_found > 0 {
        items_found
    } else {
        DEFAULT_RESULTS_PER_PAGE
    };

    let total_pages = if total_count > 0 {
        total_count.div_ceil(results_per_page)
    } else {
        1
    };

    SearchMeta {
        total_count,
        current_page,
        results_per_page,
        total_pages,
        has_next_page: current_page < total_pages,
        has_prev_page: current_page > 1,
        search_time: Utc::now(),
    }
}
