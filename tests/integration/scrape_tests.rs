use async_trait::async_trait;
use course_harvest::catalogue::{AbortReason, FetchFailure, FetchTarget};
use course_harvest::config::{Config, FetchConfig, SectionConfig, TargetConfig};
use course_harvest::output::{CatalogueStatistics, JsonFileSink, OutputResult, OutputSink};
use course_harvest::scrape::{
    run_scrape, Coordinator, DetailEnricher, FallbackFetcher, Fetcher, StaticFetcher,
};
use course_harvest::{CourseRecord, FetchResult, HarvestError, RunOutcome};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYWORD: &str = "/postgraduate/taught/";

/// Stands in for the rendered tier and records the selectors it waits for
struct FakeRenderer {
    result: FetchResult,
    selectors: Arc<Mutex<Vec<String>>>,
}

impl FakeRenderer {
    fn new(result: FetchResult) -> (Self, Arc<Mutex<Vec<String>>>) {
        let selectors = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                result,
                selectors: Arc::clone(&selectors),
            },
            selectors,
        )
    }
}

#[async_trait]
impl Fetcher for FakeRenderer {
    async fn fetch(&self, target: &FetchTarget) -> FetchResult {
        self.selectors.lock().unwrap().push(target.wait_selector());
        self.result.clone()
    }

    fn tier(&self) -> &'static str {
        "fake-rendered"
    }
}

/// Sink that keeps every write in memory
#[derive(Clone, Default)]
struct RecordingSink {
    writes: Arc<Mutex<Vec<(Vec<CourseRecord>, String)>>>,
}

impl OutputSink for RecordingSink {
    fn write(&self, records: &[CourseRecord], output_id: &str) -> OutputResult<String> {
        self.writes
            .lock()
            .unwrap()
            .push((records.to_vec(), output_id.to_string()));
        Ok(format!("memory:{}", output_id))
    }
}

fn fetch_config(detail_timeout_secs: u64, polite_delay_ms: u64) -> FetchConfig {
    FetchConfig {
        static_timeout_secs: 2,
        detail_timeout_secs,
        polite_delay_ms,
        ..FetchConfig::default()
    }
}

fn target_for(server: &MockServer) -> TargetConfig {
    TargetConfig {
        url: format!("{}/postgraduate/taught/", server.uri()),
        base_url: server.uri(),
        link_keyword: KEYWORD.to_string(),
        output_name: "courses.json".to_string(),
    }
}

fn coordinator<O: OutputSink>(
    fetch: &FetchConfig,
    renderer: FakeRenderer,
    sink: O,
) -> Coordinator<FallbackFetcher<StaticFetcher, FakeRenderer>, DetailEnricher, O> {
    Coordinator::new(
        FallbackFetcher::new(StaticFetcher::new(fetch).unwrap(), renderer),
        DetailEnricher::from_config(fetch, &SectionConfig::default()).unwrap(),
        sink,
        Duration::from_millis(fetch.polite_delay_ms),
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(format!("<html><body>{}</body></html>", body), "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .mount(server)
        .await;
}

const LISTING: &str = r#"
    <nav><a href="/undergraduate/">Undergraduate</a></nav>
    <ul>
      <li><a href="/postgraduate/taught/ma-x">MA X</a></li>
      <li><a href="/postgraduate/taught/msc-y"> MSc
          Y </a></li>
      <li><a href="/postgraduate/taught/ma-x">dup</a></li>
    </ul>
"#;

const MA_X_PAGE: &str = r#"
    <section id="entry-requirements"><p>A 2.1 degree</p></section>
    <section id="fees-and-funding"><p>£9,000</p></section>
"#;

const MSC_Y_PAGE: &str = r#"<section id="overview">No details here</section>"#;

#[tokio::test]
async fn test_full_run_with_static_listing() {
    let server = MockServer::start().await;
    mount_page(&server, "/postgraduate/taught/", html(LISTING)).await;
    mount_page(&server, "/postgraduate/taught/ma-x", html(MA_X_PAGE)).await;
    mount_page(&server, "/postgraduate/taught/msc-y", html(MSC_Y_PAGE)).await;

    let dir = TempDir::new().unwrap();
    let (renderer, selectors) =
        FakeRenderer::new(FetchResult::Failure(FetchFailure::Browser("unused".into())));
    let coordinator = coordinator(
        &fetch_config(5, 0),
        renderer,
        JsonFileSink::new(dir.path().join("data")),
    );

    let outcome = coordinator.run(&target_for(&server)).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.record_count(), 2);
    assert!(selectors.lock().unwrap().is_empty());

    let content =
        std::fs::read_to_string(dir.path().join("data").join("courses.json")).unwrap();
    let records: Vec<CourseRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(
        records,
        vec![
            CourseRecord {
                course_name: "MA X".to_string(),
                course_link: format!("{}/postgraduate/taught/ma-x", server.uri()),
                eligibility: Some("A 2.1 degree".to_string()),
                fees: Some("£9,000".to_string()),
            },
            CourseRecord {
                course_name: "MSc Y".to_string(),
                course_link: format!("{}/postgraduate/taught/msc-y", server.uri()),
                eligibility: None,
                fees: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_shell_page_falls_back_to_rendered_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/postgraduate/taught/", html(r#"<div id="app"></div>"#)).await;
    mount_page(&server, "/postgraduate/taught/ma-x", html(MA_X_PAGE)).await;

    let rendered = r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#.to_string();
    let (renderer, selectors) = FakeRenderer::new(FetchResult::Html(rendered));
    let sink = RecordingSink::default();
    let coordinator = coordinator(&fetch_config(5, 0), renderer, sink.clone());

    let outcome = coordinator.run(&target_for(&server)).await.unwrap();

    assert_eq!(
        *selectors.lock().unwrap(),
        vec![r#"a[href*="/postgraduate/taught/"]"#.to_string()]
    );
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            count: 1,
            location: "memory:courses.json".to_string(),
            statistics: CatalogueStatistics {
                total_courses: 1,
                with_eligibility: 1,
                with_fees: 1,
                without_details: 0,
            },
        }
    );

    let writes = sink.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0[0].fees.as_deref(), Some("£9,000"));
}

#[tokio::test]
async fn test_both_tiers_failing_never_touches_sink() {
    let server = MockServer::start().await;
    mount_page(&server, "/postgraduate/taught/", ResponseTemplate::new(503)).await;

    let (renderer, selectors) =
        FakeRenderer::new(FetchResult::Failure(FetchFailure::Browser("no driver".into())));
    let sink = RecordingSink::default();
    let coordinator = coordinator(&fetch_config(5, 0), renderer, sink.clone());

    let outcome = coordinator.run(&target_for(&server)).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Aborted(AbortReason::PageUnreachable {
            reason: FetchFailure::Browser("no driver".into())
        })
    );
    assert_eq!(selectors.lock().unwrap().len(), 1);
    assert!(sink.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_detail_timeout_still_writes_record() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/postgraduate/taught/",
        html(r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/postgraduate/taught/ma-x",
        html(MA_X_PAGE).set_delay(Duration::from_secs(3)),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let (renderer, _) = FakeRenderer::new(FetchResult::Failure(FetchFailure::Timeout));
    let coordinator = coordinator(&fetch_config(1, 0), renderer, JsonFileSink::new(dir.path()));

    let outcome = coordinator.run(&target_for(&server)).await.unwrap();
    assert_eq!(outcome.record_count(), 1);

    let content = std::fs::read_to_string(dir.path().join("courses.json")).unwrap();
    let records: Vec<CourseRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].course_name, "MA X");
    assert_eq!(records[0].eligibility, None);
    assert_eq!(records[0].fees, None);
    assert!(content.contains("\"eligibility\": null"));
}

#[tokio::test]
async fn test_zero_matches_writes_no_file() {
    let server = MockServer::start().await;
    // The keyword appears in text, so the static page is accepted, but no anchor matches
    mount_page(
        &server,
        "/postgraduate/taught/",
        html(r#"<p>See /postgraduate/taught/ for courses</p><a href="/research/">Research</a>"#),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let (renderer, selectors) = FakeRenderer::new(FetchResult::Failure(FetchFailure::Timeout));
    let coordinator = coordinator(&fetch_config(5, 0), renderer, JsonFileSink::new(&data_dir));

    let outcome = coordinator.run(&target_for(&server)).await.unwrap();

    match &outcome {
        RunOutcome::Aborted(reason) => {
            assert_eq!(
                *reason,
                AbortReason::ZeroMatches {
                    keyword: KEYWORD.to_string()
                }
            );
            assert_eq!(reason.stage(), "extracting");
            assert!(reason.to_string().contains("zero matches"));
        }
        other => panic!("expected abort, got {:?}", other),
    }
    assert!(selectors.lock().unwrap().is_empty());
    assert!(!data_dir.exists());
}

#[tokio::test]
async fn test_detail_requests_are_spaced_by_polite_delay() {
    let server = MockServer::start().await;
    mount_page(&server, "/postgraduate/taught/", html(LISTING)).await;
    mount_page(&server, "/postgraduate/taught/ma-x", html(MA_X_PAGE)).await;
    mount_page(&server, "/postgraduate/taught/msc-y", html(MSC_Y_PAGE)).await;

    let (renderer, _) = FakeRenderer::new(FetchResult::Failure(FetchFailure::Timeout));
    let coordinator = coordinator(&fetch_config(5, 300), renderer, RecordingSink::default());

    let start = Instant::now();
    let outcome = coordinator.run(&target_for(&server)).await.unwrap();

    assert_eq!(outcome.record_count(), 2);
    // One pause between the two detail requests, none before the first
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_sink_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/postgraduate/taught/",
        html(r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#),
    )
    .await;
    mount_page(&server, "/postgraduate/taught/ma-x", html(MA_X_PAGE)).await;

    // A regular file where the data directory should be
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let (renderer, _) = FakeRenderer::new(FetchResult::Failure(FetchFailure::Timeout));
    let coordinator = coordinator(
        &fetch_config(5, 0),
        renderer,
        JsonFileSink::new(blocker.path()),
    );

    let result = coordinator.run(&target_for(&server)).await;
    assert!(matches!(result, Err(HarvestError::Output(_))));
}

#[tokio::test]
async fn test_run_scrape_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, "/postgraduate/taught/", html(LISTING)).await;
    mount_page(&server, "/postgraduate/taught/ma-x", html(MA_X_PAGE)).await;
    mount_page(&server, "/postgraduate/taught/msc-y", html(MSC_Y_PAGE)).await;

    let dir = TempDir::new().unwrap();
    let mut config = Config::for_target(target_for(&server));
    config.fetch = fetch_config(5, 0);
    config.output.data_dir = dir.path().display().to_string();

    let outcome = run_scrape(&config).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            count: 2,
            location: dir.path().join("courses.json").display().to_string(),
            statistics: CatalogueStatistics {
                total_courses: 2,
                with_eligibility: 1,
                with_fees: 1,
                without_details: 1,
            },
        }
    );
}
