#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tabelog_scout::{BlockingPageFetcher, FetchedPage, PageFetcher, QueryParams, TransportError};

/// One restaurant item in the markup the search page serves
pub fn item(id: u32) -> String {
    format!(
        r#"<div class="list-rst js-bookmark">
  <div class="list-rst__wrap">
    <a class="list-rst__rst-name-target" href="/tokyo/A1301/A130101/{id}/">すし処 {id}</a>
    <span class="list-rst__area-genre">銀座、銀座駅 徒歩3分</span>
    <span class="list-rst__genre">寿司、海鮮</span>
    <span class="c-rating__val">3.{rating}</span>
    <em class="list-rst__rvw-count-num">1,2{rating}</em>
    <em class="list-rst__save-count-num">{id}</em>
    <div class="list-rst__catch">旬の魚を握る</div>
    <span class="list-rst__budget-val">ランチ ￥3,000～￥3,999</span>
    <span class="list-rst__budget-val">ディナー ￥15,000～￥19,999</span>
    <img class="list-rst__photo-img" src="https://tblg.k-img.com/{id}.jpg">
  </div>
</div>"#,
        id = id,
        rating = id % 10
    )
}

/// A full results page with `count` items starting at `first_id`
pub fn results_page(total_count: Option<u32>, first_id: u32, count: u32) -> String {
    let items: String = (first_id..first_id + count).map(item).collect();
    let counter = total_count
        .map(|total| format!(r#"<p class="c-page-count"><span class="c-page-count__num">{}</span>件</p>"#, total))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html><head><title>検索結果</title></head>
<body>{counter}<div class="rstlist-info">{items}</div></body></html>"#
    )
}

pub fn empty_page() -> String {
    results_page(Some(0), 1, 0)
}

/// Serves canned responses in order and records what was asked for
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<FetchedPage, u16>>>,
    requests: Mutex<Vec<QueryParams>>,
}

impl ScriptedFetcher {
    /// `Err(code)` entries fail the fetch itself instead of returning a page
    pub fn new(responses: Vec<Result<FetchedPage, u16>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<String>) -> Self {
        Self::new(pages.into_iter().map(|body| Ok(FetchedPage::ok(body))).collect())
    }

    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|params| params.get("PG").cloned().unwrap_or_default())
            .collect()
    }

    fn next(&self, params: &QueryParams) -> Result<FetchedPage, TransportError> {
        self.requests.lock().unwrap().push(params.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(status)) => Err(TransportError::Status {
                status,
                url: "scripted://connection-refused".to_string(),
            }),
            None => panic!("fetched more pages than scripted: {:?}", params),
        }
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, params: &QueryParams, _timeout: Duration) -> Result<FetchedPage, TransportError> {
        self.next(params)
    }

    fn endpoint(&self) -> &str {
        "https://tabelog.com/rst/rstsearch"
    }
}

impl BlockingPageFetcher for ScriptedFetcher {
    fn fetch_blocking(&self, params: &QueryParams, _timeout: Duration) -> Result<FetchedPage, TransportError> {
        self.next(params)
    }

    fn endpoint(&self) -> &str {
        "https://tabelog.com/rst/rstsearch"
    }
}
