mod common;

use common::{empty_page, results_page, ScriptedFetcher};
use std::sync::{Arc, Mutex};
use tabelog_scout::{
    FetchedPage, ResponseCache, SearchOrchestrator, SearchRequest, SearchStatus,
};

fn tokyo_sushi(max_pages: u32) -> SearchRequest {
    SearchRequest::builder()
        .area("東京")
        .keyword("寿司")
        .max_pages(max_pages)
        .include_meta(true)
        .build()
        .unwrap()
}

#[tokio::test]
async fn clamps_to_known_pages_and_skips_page_two() {
    let request = tokyo_sushi(2);
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![results_page(Some(15), 1, 15)]));

    let response = orchestrator.execute(&request).await;

    assert_eq!(response.status, SearchStatus::Success);
    assert_eq!(response.restaurants.len(), 15);
    let meta = response.meta.expect("meta requested");
    assert_eq!(meta.total_count, 15);
    assert_eq!(meta.total_pages, 1);
    assert!(!meta.has_next_page);
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1"]);
    // the caller's request is left alone
    assert_eq!(request.max_pages(), 2);
}

#[tokio::test]
async fn server_error_on_first_page_is_an_error_response() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::new(vec![Ok(FetchedPage {
        status: 500,
        body: "Internal Server Error".to_string(),
    })]));

    let response = orchestrator.execute(&tokyo_sushi(3)).await;

    assert_eq!(response.status, SearchStatus::Error);
    assert!(response.restaurants.is_empty());
    assert!(response.meta.is_none());
    let message = response.error_message.expect("error message");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn failure_on_later_page_drops_earlier_results() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::new(vec![
        Ok(FetchedPage::ok(results_page(Some(60), 1, 20))),
        Ok(FetchedPage {
            status: 503,
            body: String::new(),
        }),
    ]));

    let response = orchestrator.execute(&tokyo_sushi(3)).await;

    assert_eq!(response.status, SearchStatus::Error);
    assert!(response.restaurants.is_empty());
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1", "2"]);
}

#[tokio::test]
async fn connection_failure_is_an_error_response() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::new(vec![Err(0)]));

    let response = orchestrator.execute(&tokyo_sushi(1)).await;

    assert_eq!(response.status, SearchStatus::Error);
    assert!(!response.error_message.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn bare_request_with_no_items_is_no_results() {
    let request = SearchRequest::builder().build().unwrap();
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![empty_page()]));

    let response = orchestrator.execute(&request).await;

    assert_eq!(response.status, SearchStatus::NoResults);
    assert!(response.restaurants.is_empty());
    assert!(response.error_message.is_none());

    let requests = orchestrator.fetcher().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].keys().copied().collect::<Vec<_>>(), vec!["PG", "SrtT"]);
}

#[tokio::test]
async fn walks_all_pages_up_to_total() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![
        results_page(Some(45), 1, 20),
        results_page(Some(45), 21, 20),
        results_page(Some(45), 41, 5),
    ]));

    let response = orchestrator.execute(&tokyo_sushi(5)).await;

    assert_eq!(response.status, SearchStatus::Success);
    assert_eq!(response.restaurants.len(), 45);
    assert_eq!(response.restaurants[20].name, "すし処 21");
    assert_eq!(response.meta.unwrap().total_pages, 3);
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn empty_page_ends_pagination() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![
        results_page(Some(100), 1, 20),
        results_page(Some(100), 1, 0),
    ]));

    let response = orchestrator.execute(&tokyo_sushi(4)).await;

    assert_eq!(response.status, SearchStatus::Success);
    assert_eq!(response.restaurants.len(), 20);
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1", "2"]);
}

#[tokio::test]
async fn zero_total_count_stops_after_first_page() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![results_page(Some(0), 1, 3)]));

    let response = orchestrator.execute(&tokyo_sushi(3)).await;

    assert_eq!(response.status, SearchStatus::Success);
    assert_eq!(response.restaurants.len(), 3);
    assert_eq!(response.meta.unwrap().total_count, 0);
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1"]);
}

#[tokio::test]
async fn without_meta_there_is_no_clamping() {
    let request = SearchRequest::builder()
        .keyword("うどん")
        .max_pages(2)
        .include_meta(false)
        .build()
        .unwrap();
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![
        results_page(Some(15), 1, 15),
        results_page(Some(15), 16, 0),
    ]));

    let response = orchestrator.execute(&request).await;

    assert_eq!(response.status, SearchStatus::Success);
    assert!(response.meta.is_none());
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1", "2"]);
}

#[tokio::test]
async fn later_pages_keep_the_filters() {
    let request = SearchRequest::builder()
        .area("京都")
        .parking(true)
        .max_pages(2)
        .build()
        .unwrap();
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![
        results_page(Some(40), 1, 20),
        results_page(Some(40), 21, 20),
    ]));

    orchestrator.execute(&request).await;

    let requests = orchestrator.fetcher().requests();
    assert_eq!(requests.len(), 2);
    for (index, params) in requests.iter().enumerate() {
        assert_eq!(params["sa"], "京都");
        assert_eq!(params["ChkParking"], "1");
        assert_eq!(params["PG"], (index + 1).to_string());
    }
}

#[tokio::test]
async fn blocking_and_async_agree() {
    let pages = || {
        vec![
            results_page(Some(30), 1, 20),
            results_page(Some(30), 21, 10),
        ]
    };
    let request = tokyo_sushi(3);

    let async_response = SearchOrchestrator::new(ScriptedFetcher::pages(pages()))
        .execute(&request)
        .await;

    let blocking_request = request.clone();
    let blocking_response = tokio::task::spawn_blocking(move || {
        SearchOrchestrator::new(ScriptedFetcher::pages(pages())).execute_blocking(&blocking_request)
    })
    .await
    .unwrap();

    assert_eq!(async_response.status, blocking_response.status);
    assert_eq!(async_response.restaurants, blocking_response.restaurants);
    let (a, b) = (async_response.meta.unwrap(), blocking_response.meta.unwrap());
    assert_eq!((a.total_count, a.total_pages), (b.total_count, b.total_pages));
}

#[test]
fn blocking_clamps_too() {
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![results_page(Some(15), 1, 15)]));

    let response = orchestrator.execute_blocking(&tokyo_sushi(2));

    assert_eq!(response.status, SearchStatus::Success);
    assert_eq!(response.restaurants.len(), 15);
    assert_eq!(orchestrator.fetcher().requested_pages(), vec!["1"]);
}

#[tokio::test]
async fn cached_search_is_not_fetched_again() {
    let cache = Arc::new(Mutex::new(ResponseCache::new(4)));
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![results_page(Some(5), 1, 5)]))
        .with_cache(cache.clone());

    let first = orchestrator.execute(&tokyo_sushi(1)).await;
    let second = orchestrator.execute(&tokyo_sushi(1)).await;

    assert_eq!(first, second);
    assert_eq!(orchestrator.fetcher().requests().len(), 1);
    assert_eq!(cache.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn error_responses_are_not_cached() {
    let cache = Arc::new(Mutex::new(ResponseCache::new(4)));
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::new(vec![
        Ok(FetchedPage {
            status: 502,
            body: String::new(),
        }),
        Ok(FetchedPage::ok(results_page(Some(5), 1, 5))),
    ]))
    .with_cache(cache.clone());

    let first = orchestrator.execute(&tokyo_sushi(1)).await;
    let second = orchestrator.execute(&tokyo_sushi(1)).await;

    assert_eq!(first.status, SearchStatus::Error);
    assert_eq!(second.status, SearchStatus::Success);
    assert_eq!(orchestrator.fetcher().requests().len(), 2);
    assert_eq!(cache.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn similar_looking_searches_do_not_share_cache_entries() {
    let cache = Arc::new(Mutex::new(ResponseCache::new(4)));
    let orchestrator = SearchOrchestrator::new(ScriptedFetcher::pages(vec![
        results_page(Some(2), 1, 2),
        results_page(Some(1), 10, 1),
    ]))
    .with_cache(cache.clone());

    let smuggled = SearchRequest::builder().area("a&sk=b").build().unwrap();
    let separate = SearchRequest::builder().area("a").keyword("b").build().unwrap();

    let first = orchestrator.execute(&smuggled).await;
    let second = orchestrator.execute(&separate).await;

    assert_eq!(first.restaurants.len(), 2);
    assert_eq!(second.restaurants.len(), 1);
    assert_eq!(orchestrator.fetcher().requests().len(), 2);
    assert_eq!(cache.lock().unwrap().len(), 2);
}
