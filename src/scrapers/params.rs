use crate::scrapers::types::SearchRequest;
use std::collections::BTreeMap;

/// Query string of one search page, ordered by key
pub type QueryParams = BTreeMap<&'static str, String>;

/// Map a request onto the parameters understood by `/rst/rstsearch`.
///
/// Unset fields produce no key at all: the site reads a missing key as
/// "use the default". Sort type and page are always present.
pub fn build_params(request: &SearchRequest) -> QueryParams {
    let mut params = QueryParams::new();

    if let Some(area) = request.area() {
        params.insert("sa", area.to_string());
    }
    if let Some(keyword) = request.keyword() {
        params.insert("sk", keyword.to_string());
    }

    if let Some(date) = request.reservation_date() {
        params.insert("svd", date.to_string());
    }
    if let Some(time) = request.reservation_time() {
        params.insert("svt", time.to_string());
    }
    if let Some(party_size) = request.party_size() {
        params.insert("svps", party_size.to_string());
    }

    params.insert("SrtT", request.sort_type().code().to_string());
    params.insert("PG", request.page().to_string());

    if let Some(price_range) = request.price_range() {
        params.insert("LstCos", price_range.code().to_string());
    }

    let filters = request.filters();
    let flags = [
        ("ChkOnlineBooking", filters.online_booking_only),
        ("ChkSeatOnly", filters.seat_only),
        ("ChkNewOpen", filters.new_open),
        ("ChkRoom", filters.private_room),
        ("ChkParking", filters.parking),
        ("LstSmoking", filters.smoking_allowed),
        ("ChkCard", filters.card_accepted),
    ];
    for (key, on) in flags {
        if on {
            params.insert(key, "1".to_string());
        }
    }

    params
}
