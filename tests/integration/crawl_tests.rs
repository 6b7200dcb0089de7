//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the directory site and run the
//! full locality crawl end-to-end into CSV files in a temporary directory.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use therapist_crawler::config::{parse_config, Config, LocalityEntry, RecordFailurePolicy};
use therapist_crawler::crawler::{Coordinator, Fetcher};
use therapist_crawler::output::{CsvOutput, RecordSink};
use therapist_crawler::{LocalityTarget, OutputResult, TherapistRecord};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wraps a sink and counts flush events
struct CountingSink<S> {
    inner: S,
    flushes: usize,
}

impl<S: RecordSink> RecordSink for CountingSink<S> {
    fn append(
        &mut self,
        target: &LocalityTarget,
        records: &[TherapistRecord],
    ) -> OutputResult<PathBuf> {
        self.flushes += 1;
        self.inner.append(target, records)
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, localities: &[&str]) -> Config {
    let mut config = Config::default();
    config.crawler.listing_url_template =
        format!("{}/ca/therapists/{{region_code}}/{{locality_name}}", server.uri());
    config.crawler.rate_limit_calls = 1000;
    config.user_agent.value = "TestBot/1.0".to_string();
    config.localities = localities
        .iter()
        .map(|name| LocalityEntry {
            region_code: "on".to_string(),
            locality_name: name.to_string(),
        })
        .collect();
    config
}

fn coordinator(config: Config, dir: &Path) -> Coordinator<CountingSink<CsvOutput>> {
    let fetcher = Fetcher::from_config(&config).expect("Failed to build fetcher");
    let sink = CountingSink {
        inner: CsvOutput::new(dir, "2024-01-31_09:05:00"),
        flushes: 0,
    };
    Coordinator::new(config, fetcher, sink)
}

fn listing_body(server: &MockServer, locality: &str, pages: &[u32], profiles: &[&str]) -> String {
    let rows: String = profiles
        .iter()
        .map(|p| {
            format!(
                r#"<div class="results-row">
                    <a class="profile-title" href="{}/ca/therapists/{}/{}">View</a>
                </div>"#,
                server.uri(),
                p,
                p
            )
        })
        .collect();

    let pagination = if pages.is_empty() {
        String::new()
    } else {
        let links: String = pages
            .iter()
            .map(|n| {
                format!(
                    r#"<a href="/ca/therapists/on/{locality}?category=in-person&page={n}">{n}</a>"#
                )
            })
            .collect();
        format!(r#"<div class="results-pagination-container">{links}</div>"#)
    };

    format!(
        r#"<html><body>
        <div class="results">{rows}</div>
        {pagination}
        </body></html>"#
    )
}

fn profile_body(name: &str, street: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="profile-title">{name}</h1>
        <h2 class="profile-suffix-heading">
            <span class="profile-suffix-container">
                <span class="glossary-tooltip-link">MSW</span>
                <span class="glossary-tooltip-link">RSW</span>
            </span>
        </h2>
        <div class="address">
            <p class="address-line">{street}</p>
            <span>Ottawa, ON K1P 5G4</span>
        </div>
        <div class="fees">Individual Sessions $150</div>
        </body></html>"#
    )
}

async fn mount_listing(server: &MockServer, locality: &str, page: Option<u32>, status: u16, body: String) {
    let mock = Mock::given(method("GET")).and(path(format!("/ca/therapists/on/{}", locality)));
    let mock = match page {
        Some(p) => mock.and(query_param("page", p.to_string())),
        None => mock,
    };
    mock.respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, slug: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/ca/therapists/{}/{}", slug, slug)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open output");
    reader
        .records()
        .map(|r| r.expect("Bad CSV row").iter().map(str::to_string).collect())
        .collect()
}

fn output_file(dir: &Path, locality: &str) -> PathBuf {
    dir.join(format!("therapists_{}_2024-01-31_09:05:00.csv", locality))
}

#[tokio::test]
async fn test_two_page_locality_with_failed_profile() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Page-specific mocks first so they win over the landing mock
    mount_listing(
        &server,
        "ottawa",
        Some(1),
        200,
        listing_body(&server, "ottawa", &[1, 2], &["jane-doe", "broken"]),
    )
    .await;
    mount_listing(
        &server,
        "ottawa",
        Some(2),
        200,
        listing_body(&server, "ottawa", &[1, 2], &["john-roe"]),
    )
    .await;
    mount_listing(
        &server,
        "ottawa",
        None,
        200,
        listing_body(&server, "ottawa", &[1, 2], &["jane-doe", "broken"]),
    )
    .await;

    mount_profile(&server, "jane-doe", 200, profile_body("Jane Doe", "123 Bank Street")).await;
    mount_profile(&server, "broken", 500, String::new()).await;
    mount_profile(&server, "john-roe", 200, profile_body("John Roe", "456 Elgin Street")).await;

    let mut crawler = coordinator(create_test_config(&server, &["ottawa"]), dir.path());
    let stats = crawler.run().await.expect("Crawl failed");

    let report = &stats.localities[0];
    assert!(report.landing_ok);
    assert_eq!(report.page_count, 2);
    assert_eq!(report.pages_flushed, 2);
    assert_eq!(report.details_failed, 1);
    assert_eq!(report.records_written, 2);
    assert_eq!(crawler.sink().flushes, 2);

    let path = output_file(dir.path(), "ottawa");
    assert_eq!(report.output_path.as_deref(), Some(path.as_path()));

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3, "header plus two data rows");
    assert_eq!(rows[0], TherapistRecord::COLUMNS.to_vec());

    assert_eq!(rows[1][0], "on");
    assert_eq!(rows[1][2], "123 Bank Street");
    assert_eq!(rows[1][4], "5G4");
    assert_eq!(rows[1][6], "Jane Doe");
    assert_eq!(rows[1][7], "MSW, RSW");
    assert_eq!(rows[1][11], "150");
    assert_eq!(rows[1][12], "");
    assert_eq!(rows[2][6], "John Roe");
    assert_eq!(rows[2][2], "456 Elgin Street");
}

#[tokio::test]
async fn test_landing_failure_writes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, "ottawa", None, 404, String::new()).await;

    let mut crawler = coordinator(create_test_config(&server, &["ottawa"]), dir.path());
    let stats = crawler.run().await.expect("Crawl failed");

    assert!(!stats.localities[0].landing_ok);
    assert_eq!(crawler.sink().flushes, 0);
    assert!(!output_file(dir.path(), "ottawa").exists());
}

#[tokio::test]
async fn test_empty_locality_creates_header_only_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, "ottawa", None, 200, listing_body(&server, "ottawa", &[], &[])).await;

    let mut crawler = coordinator(create_test_config(&server, &["ottawa"]), dir.path());
    crawler.run().await.expect("Crawl failed");

    let rows = read_rows(&output_file(dir.path(), "ottawa"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "region_code");
}

#[tokio::test]
async fn test_failed_listing_page_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, "ottawa", Some(1), 503, String::new()).await;
    mount_listing(
        &server,
        "ottawa",
        Some(2),
        200,
        listing_body(&server, "ottawa", &[1, 2], &["john-roe"]),
    )
    .await;
    mount_listing(
        &server,
        "ottawa",
        None,
        200,
        listing_body(&server, "ottawa", &[1, 2], &[]),
    )
    .await;
    mount_profile(&server, "john-roe", 200, profile_body("John Roe", "456 Elgin Street")).await;

    let mut crawler = coordinator(create_test_config(&server, &["ottawa"]), dir.path());
    let stats = crawler.run().await.expect("Crawl failed");

    let report = &stats.localities[0];
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_flushed, 1);

    let rows = read_rows(&output_file(dir.path(), "ottawa"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][6], "John Roe");
}

#[tokio::test]
async fn test_missing_name_policies() {
    for (policy, expected_rows) in [
        (RecordFailurePolicy::AbortPage, 1),
        (RecordFailurePolicy::SkipRecord, 2),
    ] {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        let body = listing_body(&server, "ottawa", &[], &["jane-doe", "nameless", "john-roe"]);
        mount_listing(&server, "ottawa", Some(1), 200, body.clone()).await;
        mount_listing(&server, "ottawa", None, 200, body).await;
        mount_profile(&server, "jane-doe", 200, profile_body("Jane Doe", "123 Bank Street")).await;
        mount_profile(&server, "nameless", 200, "<html><body><p>Moved</p></body></html>".into())
            .await;
        mount_profile(&server, "john-roe", 200, profile_body("John Roe", "456 Elgin Street")).await;

        let mut config = create_test_config(&server, &["ottawa"]);
        config.crawler.on_missing_required_field = policy;

        let mut crawler = coordinator(config, dir.path());
        crawler.run().await.expect("Crawl failed");

        let rows = read_rows(&output_file(dir.path(), "ottawa"));
        assert_eq!(rows.len(), 1 + expected_rows, "policy {:?}", policy);
        assert!(rows.iter().all(|r| !r[6].is_empty()), "nameless profile was written");
    }
}

#[tokio::test]
async fn test_localities_get_separate_files() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for (locality, profile) in [("ottawa", "jane-doe"), ("kanata", "john-roe")] {
        let body = listing_body(&server, locality, &[], &[profile]);
        mount_listing(&server, locality, Some(1), 200, body.clone()).await;
        mount_listing(&server, locality, None, 200, body).await;
    }
    mount_profile(&server, "jane-doe", 200, profile_body("Jane Doe", "123 Bank Street")).await;
    mount_profile(&server, "john-roe", 200, profile_body("John Roe", "456 Elgin Street")).await;

    let mut crawler = coordinator(create_test_config(&server, &["ottawa", "kanata"]), dir.path());
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.localities.len(), 2);
    assert_eq!(stats.total_records(), 2);

    let ottawa = read_rows(&output_file(dir.path(), "ottawa"));
    let kanata = read_rows(&output_file(dir.path(), "kanata"));
    assert_eq!(ottawa.len(), 2);
    assert_eq!(kanata.len(), 2);
    assert_eq!(ottawa[1][6], "Jane Doe");
    assert_eq!(kanata[1][6], "John Roe");
}

#[tokio::test]
async fn test_crawl_from_toml_config() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let body = listing_body(&server, "ottawa", &[], &["jane-doe"]);
    mount_listing(&server, "ottawa", Some(1), 200, body.clone()).await;
    mount_listing(&server, "ottawa", None, 200, body).await;
    mount_profile(&server, "jane-doe", 200, profile_body("Jane Doe", "123 Bank Street")).await;

    let toml = format!(
        r#"
        [crawler]
        listing-url-template = "{}/ca/therapists/{{region_code}}/{{locality_name}}"
        rate-limit-calls = 100
        rate-limit-period-ms = 1000

        [output]
        directory = "{}"

        [[locality]]
        region-code = "on"
        locality-name = "ottawa"
        "#,
        server.uri(),
        dir.path().display()
    );
    let config = parse_config(&toml).expect("Config should parse");

    let stats = therapist_crawler::crawler::crawl(config)
        .await
        .expect("Crawl failed");
    assert_eq!(stats.total_records(), 1);

    let path = stats.localities[0]
        .output_path
        .clone()
        .expect("Output should be written");
    assert!(path.starts_with(dir.path()));
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("therapists_ottawa_") && n.ends_with(".csv")));
    assert_eq!(read_rows(&path).len(), 2);
}
