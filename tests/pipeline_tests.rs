//! End-to-end pipeline tests
//!
//! Drives a full run (crawl → download → manifest) against a mock site
//! and checks the manifest's append-only property across runs.

use harvestman::config::{Config, CrawlConfig, DownloadConfig, OutputConfig};
use harvestman::pipeline;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

fn test_config(seed: &str, root_dir: &str) -> Config {
    Config {
        crawl: CrawlConfig {
            seeds: vec![seed.to_string()],
            max_depth: 1,
            timeout_secs: 5,
        },
        download: DownloadConfig {
            max_retries: 2,
            retry_backoff_millis: 10,
            gdown_command: "harvestman-no-such-tool".to_string(),
        },
        output: OutputConfig {
            root_dir: root_dir.to_string(),
        },
    }
}

/// Mounts a two-page site: /index links a CSV and /page2; /page2 links a ZIP
async fn mount_site(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(html_page(&format!(
            r#"<html><body>
                <a href="/a.csv">Data</a>
                <a href="{}/page2">More</a>
            </body></html>"#,
            base
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page(&format!(
            r#"<html><body><a href="{}/b.zip">Archive</a></body></html>"#,
            base
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"id,height\n1,221\n".to_vec())
                .insert_header("content-type", "text/csv"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04])
                .insert_header("content-type", "application/zip"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_downloads_and_records() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let root = tempfile::tempdir().unwrap();
    let config = test_config(
        &format!("{}/index", server.uri()),
        root.path().to_str().unwrap(),
    );

    let summary = pipeline::run(&config).await.expect("pipeline failed");

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.direct_ok, 2);
    assert_eq!(summary.direct_failed, 0);
    assert_eq!(summary.gdrive_ok, 0);
    assert_eq!(summary.gdrive_failed, 0);

    // Files land under raw/
    let raw = root.path().join("raw");
    assert_eq!(
        std::fs::read(raw.join("a.csv")).unwrap(),
        b"id,height\n1,221\n"
    );
    assert_eq!(
        std::fs::read(raw.join("b.zip")).unwrap(),
        vec![0x50, 0x4b, 0x03, 0x04]
    );

    // Header + 2 visited rows + 2 file rows
    let manifest = std::fs::read_to_string(root.path().join("manifest.csv")).unwrap();
    assert_eq!(manifest.lines().count(), 5);
    assert!(manifest.starts_with("timestamp,url,category,status,saved_path,bytes,note"));
    assert_eq!(
        manifest.lines().filter(|l| l.contains(",page,visited,")).count(),
        2
    );
    assert_eq!(
        manifest.lines().filter(|l| l.contains(",file,ok,")).count(),
        2
    );
}

#[tokio::test]
async fn test_rerun_appends_and_preserves_prior_rows() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let root = tempfile::tempdir().unwrap();
    let config = test_config(
        &format!("{}/index", server.uri()),
        root.path().to_str().unwrap(),
    );

    pipeline::run(&config).await.expect("first run failed");
    let first = std::fs::read_to_string(root.path().join("manifest.csv")).unwrap();

    pipeline::run(&config).await.expect("second run failed");
    let second = std::fs::read_to_string(root.path().join("manifest.csv")).unwrap();

    // The manifest is a log: the first run's rows are byte-for-byte intact
    // and the second run doubled the row count (header excluded)
    assert!(second.starts_with(&first));
    let first_rows = first.lines().count() - 1;
    let second_rows = second.lines().count() - 1;
    assert_eq!(second_rows, 2 * first_rows);

    // Second run found every file already on disk
    assert_eq!(
        second
            .lines()
            .filter(|l| l.contains("reqwest (already present)"))
            .count(),
        2
    );
}

#[tokio::test]
async fn test_failed_downloads_still_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(html_page(
            r#"<html><body>
                <a href="/broken.csv">Broken</a>
                <a href="https://drive.google.com/uc?id=1AbC">Drive</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.csv"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = test_config(
        &format!("{}/index", base),
        root.path().to_str().unwrap(),
    );

    let summary = pipeline::run(&config).await.expect("pipeline failed");

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.direct_failed, 1);
    assert_eq!(summary.gdrive_failed, 1);

    let manifest = std::fs::read_to_string(root.path().join("manifest.csv")).unwrap();
    assert_eq!(
        manifest.lines().filter(|l| l.contains(",file,fail,")).count(),
        1
    );
    assert_eq!(
        manifest
            .lines()
            .filter(|l| l.contains(",gdrive,fail,") && l.contains("gdown unavailable"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_unwritable_output_root_is_fatal() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    // /dev/null is not a directory, so creating raw/ under it must fail
    let config = test_config(
        &format!("{}/index", server.uri()),
        "/dev/null/harvestman-out",
    );

    let result = pipeline::run(&config).await;
    assert!(result.is_err());
}
