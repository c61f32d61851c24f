//! Unit tests for the deduplicating icon cache

use super::*;
use crate::test_support::{svg, StubFetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_test::{assert_pending, assert_ready};

fn create_test_cache() -> (IconCache, Arc<StubFetcher>) {
    let fetcher = Arc::new(StubFetcher::default());
    let cache = IconCache::new(fetcher.clone());
    (cache, fetcher)
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond("home", Ok(svg("home")));
    let gate = fetcher.gate("home");

    let first = cache.get("home");
    let second = cache.get("home.svg");
    let third = cache.get("  home.SVG ");

    let mut pending = tokio_test::task::spawn(first.clone());
    assert_pending!(pending.poll());
    assert!(cache.contains("home"));
    assert_eq!(cache.len(), 1);

    gate.notify_one();
    let (a, b, c) = futures::join!(first, second, third);

    assert_eq!(fetcher.calls("home"), 1);
    assert_eq!(a.as_ref().unwrap().as_str(), "<svg>home</svg>");
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test]
async fn test_empty_names_resolve_without_fetch() {
    let (cache, fetcher) = create_test_cache();

    for name in ["", "   ", "\t\n", ".svg", " .SVG "] {
        let mut handle = tokio_test::task::spawn(cache.get(name));
        let markup = assert_ready!(handle.poll()).unwrap();
        assert!(markup.is_empty(), "name {:?} should give empty markup", name);
    }

    assert_eq!(fetcher.total_calls(), 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_is_evicted_and_retried() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond(
        "report",
        Err(IconError::HttpStatus {
            name: "report".to_string(),
            status: 500,
        }),
    );

    let first = cache.get("report").await;
    assert!(matches!(first, Err(IconError::HttpStatus { status: 500, .. })));
    assert!(!cache.contains("report"));
    assert!(cache.is_empty());

    fetcher.respond("report", Ok(svg("report")));
    let second = cache.get("report.svg").await.unwrap();

    assert_eq!(second.as_str(), "<svg>report</svg>");
    assert_eq!(fetcher.calls("report"), 2);
    assert!(cache.contains("report"));
}

#[tokio::test]
async fn test_every_failure_triggers_a_new_fetch() {
    let (cache, fetcher) = create_test_cache();

    for attempt in 1..=3 {
        assert!(cache.get("missing").await.is_err());
        assert_eq!(fetcher.calls("missing"), attempt);
    }
}

#[tokio::test]
async fn test_successful_fetch_is_never_repeated() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond("wallet", Ok(svg("wallet")));

    let first = cache.get("wallet").await.unwrap();
    for name in ["wallet", "wallet.svg", " wallet "] {
        let again = cache.get(name).await.unwrap();
        assert_eq!(again, first);
    }

    assert_eq!(fetcher.calls("wallet"), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_in_flight_failure_reaches_all_subscribers() {
    let (cache, fetcher) = create_test_cache();
    let gate = fetcher.gate("broken");

    let first = cache.get("broken");
    let second = cache.get("broken");
    gate.notify_one();

    let (a, b) = futures::join!(first, second);
    assert_eq!(
        a,
        Err(IconError::HttpStatus {
            name: "broken".to_string(),
            status: 404,
        })
    );
    assert_eq!(a, b);
    assert_eq!(fetcher.calls("broken"), 1);
    assert!(!cache.contains("broken"));
}

#[tokio::test]
async fn test_malformed_content_is_rejected_and_evicted() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond("page", Ok("<html><body>Not Found</body></html>".to_string()));

    let result = cache.get("page").await;

    assert!(matches!(result, Err(IconError::Malformed(_))));
    assert!(!cache.contains("page"));
}

#[tokio::test]
async fn test_html_page_embedding_an_svg_is_rejected() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond(
        "logo",
        Ok(r#"<html><body><svg class="brand"><path d="M0 0"/></svg><p>Not Found</p></body></html>"#
            .to_string()),
    );

    let result = cache.get("logo").await;

    assert!(matches!(result, Err(IconError::Malformed(_))));
    assert!(!cache.contains("logo"));
}

#[derive(Default)]
struct PanickingFetcher {
    calls: AtomicUsize,
}

impl IconFetcher for PanickingFetcher {
    fn fetch(&self, _name: &str) -> BoxFuture<'static, IconResult<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let crash = || -> IconResult<String> { panic!("asset backend crashed") };
        async move { crash() }.boxed()
    }
}

#[tokio::test]
async fn test_panicked_fetch_is_evicted_and_retried() {
    let fetcher = Arc::new(PanickingFetcher::default());
    let cache = IconCache::new(fetcher.clone());

    let (first, second) = futures::join!(cache.get("crash"), cache.get("crash"));
    assert!(matches!(first, Err(IconError::Cancelled(_))));
    assert_eq!(first, second);
    assert!(!cache.contains("crash"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    assert!(matches!(cache.get("crash").await, Err(IconError::Cancelled(_))));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_fetched_markup_is_sanitized() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond(
        "alert",
        Ok(r#"<svg onload="steal()"><script>alert(1)</script><path d="M0 0"/></svg>"#.to_string()),
    );

    let markup = cache.get("alert").await.unwrap();
    assert_eq!(markup.as_str(), r#"<svg><path d="M0 0"/></svg>"#);
}

#[tokio::test]
async fn test_distinct_names_fetch_independently() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond("a", Ok(svg("a")));
    fetcher.respond("b", Ok(svg("b")));

    let (a, b) = futures::join!(cache.get("a"), cache.get("b"));

    assert_eq!(a.unwrap().as_str(), "<svg>a</svg>");
    assert_eq!(b.unwrap().as_str(), "<svg>b</svg>");
    assert_eq!(fetcher.calls("a"), 1);
    assert_eq!(fetcher.calls("b"), 1);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_fetch_completes_without_subscribers() {
    let (cache, fetcher) = create_test_cache();
    fetcher.respond("detached", Ok(svg("detached")));

    drop(cache.get("detached"));
    // Give the spawned fetch a chance to run
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(fetcher.calls("detached"), 1);
    let markup = cache.get("detached").await.unwrap();
    assert_eq!(markup.as_str(), "<svg>detached</svg>");
    assert_eq!(fetcher.calls("detached"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_requests_on_multi_thread_runtime() {
    let fetcher = Arc::new(StubFetcher::default());
    fetcher.respond("loan", Ok(svg("loan")));
    let gate = fetcher.gate("loan");
    let cache = Arc::new(IconCache::new(fetcher.clone()));

    let mut tasks = Vec::new();
    for i in 0..32 {
        let cache = Arc::clone(&cache);
        let name = if i % 2 == 0 { "loan" } else { "loan.svg" };
        tasks.push(tokio::spawn(async move { cache.get(name).await }));
    }

    // Release the fetch only once some task has started it
    while cache.len() == 0 {
        tokio::task::yield_now().await;
    }
    gate.notify_one();

    for task in tasks {
        let markup = task.await.unwrap().unwrap();
        assert_eq!(markup.as_str(), "<svg>loan</svg>");
    }
    assert_eq!(fetcher.calls("loan"), 1);
}

#[test]
fn test_normalize_uses_cache_extension() {
    let fetcher: Arc<dyn IconFetcher> = Arc::new(StubFetcher::default());
    let cache = IconCache::with_extension(fetcher, "icon");
    assert_eq!(cache.normalize(" bell.ICON "), "bell");
    assert_eq!(cache.normalize("bell.svg"), "bell.svg");
}
