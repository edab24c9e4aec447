//! Restaurant extraction from search result pages.
//!
//! Every field is read independently: a missing node or an unparseable
//! number leaves that one field empty and never drops the record. Only
//! items without a name or link are skipped.

use crate::models::Restaurant;
use crate::scrapers::selectors::{self, SelectorList};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Prefix for relative restaurant links
pub const SITE_ORIGIN: &str = "https://tabelog.com";

pub(crate) static ITEMS: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::ITEM_SELECTORS));
static NAME_LINK: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::NAME_LINK_SELECTORS));
static RATING: Lazy<SelectorList> = Lazy::new(|| SelectorList::compile(selectors::RATING_SELECTORS));
static REVIEW_COUNT: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::REVIEW_COUNT_SELECTORS));
static SAVE_COUNT: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::SAVE_COUNT_SELECTORS));
static AREA: Lazy<SelectorList> = Lazy::new(|| SelectorList::compile(selectors::AREA_SELECTORS));
static GENRE: Lazy<SelectorList> = Lazy::new(|| SelectorList::compile(selectors::GENRE_SELECTORS));
static DESCRIPTION: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::DESCRIPTION_SELECTORS));
static BUDGET: Lazy<SelectorList> = Lazy::new(|| SelectorList::compile(selectors::BUDGET_SELECTORS));
static VPOINT_BADGE: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::VPOINT_BADGE_SELECTORS));
static BOOKING_BUTTON: Lazy<SelectorList> =
    Lazy::new(|| SelectorList::compile(selectors::BOOKING_BUTTON_SELECTORS));
static PHOTO: Lazy<SelectorList> = Lazy::new(|| SelectorList::compile(selectors::PHOTO_SELECTORS));

const LIST_SEPARATOR: char = '、';
const STATION_MARKER: char = '駅';
const LUNCH_MARKER: &str = "ランチ";
const DINNER_MARKER: &str = "ディナー";

/// Parse every restaurant on a results page, in page order.
///
/// A page without item nodes yields an empty list.
pub fn parse_restaurants(html: &str) -> Vec<Restaurant> {
    let document = Html::parse_document(html);
    restaurants_in(&document)
}

pub(crate) fn restaurants_in(document: &Html) -> Vec<Restaurant> {
    let items = ITEMS.select_all(document);
    if items.is_empty() {
        debug!("No restaurant items on page");
        return Vec::new();
    }

    let restaurants: Vec<Restaurant> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let restaurant = parse_item(item);
            if restaurant.is_none() {
                debug!("Skipping item {} without name or link", index);
            }
            restaurant
        })
        .collect();

    debug!("Parsed {} restaurants", restaurants.len());
    restaurants
}

fn parse_item(item: ElementRef<'_>) -> Option<Restaurant> {
    let link = NAME_LINK.first_within(item)?;
    let name = selectors::stripped_text(link);
    let href = link.value().attr("href").map(str::trim).unwrap_or_default();
    if name.is_empty() || href.is_empty() {
        return None;
    }

    let mut restaurant = Restaurant::new(name, absolute_url(href));

    restaurant.rating = selectors::text_within(&RATING, item)
        .as_deref()
        .and_then(selectors::parse_rating);
    restaurant.review_count = selectors::text_within(&REVIEW_COUNT, item)
        .as_deref()
        .and_then(selectors::parse_count);
    restaurant.save_count = selectors::text_within(&SAVE_COUNT, item)
        .as_deref()
        .and_then(selectors::parse_count);

    if let Some(text) = selectors::text_within(&AREA, item) {
        let location = split_location(&text);
        restaurant.area = location.area;
        restaurant.station = location.station;
        restaurant.distance = location.distance;
    }

    restaurant.genres = selectors::text_within(&GENRE, item)
        .map(|text| split_list(&text))
        .unwrap_or_default();

    restaurant.description = selectors::text_within(&DESCRIPTION, item);

    for budget in BUDGET.select_within(item) {
        let text = selectors::stripped_text(budget);
        if text.contains(LUNCH_MARKER) {
            restaurant.lunch_price.get_or_insert(text);
        } else if text.contains(DINNER_MARKER) {
            restaurant.dinner_price.get_or_insert(text);
        }
    }

    restaurant.has_vpoint = VPOINT_BADGE.exists_within(item);
    restaurant.has_reservation = BOOKING_BUTTON.exists_within(item);

    restaurant.image_urls = PHOTO
        .select_within(item)
        .into_iter()
        .filter_map(|img| selectors::first_attr(img, selectors::PHOTO_ATTRIBUTES))
        .map(str::to_string)
        .collect();

    Some(restaurant)
}

/// Prefix site-relative links with the site origin
pub fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", SITE_ORIGIN, href)
    } else {
        format!("{}/{}", SITE_ORIGIN, href)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Location {
    area: Option<String>,
    station: Option<String>,
    distance: Option<String>,
}

/// "銀座、銀座駅 徒歩3分" → area 銀座, station 銀座駅, distance 徒歩3分
fn split_location(text: &str) -> Location {
    let mut parts = text.split(LIST_SEPARATOR);
    let (Some(area), Some(station_info)) = (parts.next(), parts.next()) else {
        return Location::default();
    };

    let mut location = Location {
        area: Some(area.trim().to_string()).filter(|a| !a.is_empty()),
        ..Location::default()
    };

    if station_info.contains(STATION_MARKER) {
        let tokens: Vec<&str> = station_info.split_whitespace().collect();
        if let [station, distance, ..] = tokens.as_slice() {
            location.station = Some(station.to_string());
            location.distance = Some(distance.to_string());
        }
    }

    location
}

fn split_list(text: &str) -> Vec<String> {
    text.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
