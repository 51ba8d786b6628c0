use super::*;
use crate::format::PlainFormatter;
use libtagstamp::{Config, OnError};
use mockito::{Mock, ServerGuard};

fn manifest_body(created: &str) -> String {
    let compat = serde_json::json!({ "created": created }).to_string();
    serde_json::json!({
        "schemaVersion": 1,
        "history": [{ "v1Compatibility": compat }]
    })
    .to_string()
}

/// An anonymous registry serving `team/app` with tags `v1` and `v2`.
async fn anonymous_registry(v2_status: usize) -> (ServerGuard, Vec<Mock>) {
    let mut server = mockito::Server::new_async().await;
    let probe = server
        .mock("HEAD", "/v2/")
        .with_status(200)
        .create_async()
        .await;
    let tags = server
        .mock("GET", "/v2/team/app/tags/list")
        .with_status(200)
        .with_body(r#"{"name":"team/app","tags":["v1","v2"]}"#)
        .create_async()
        .await;
    let v1 = server
        .mock("GET", "/v2/team/app/manifests/v1")
        .with_status(200)
        .with_body(manifest_body("2021-05-01T10:00:00.123456Z"))
        .create_async()
        .await;
    let v2 = server
        .mock("GET", "/v2/team/app/manifests/v2")
        .with_status(v2_status)
        .with_body(manifest_body("2021-01-01T00:00:00"))
        .create_async()
        .await;
    (server, vec![probe, tags, v1, v2])
}

fn context(server: &ServerGuard, on_error: OnError) -> AppContext {
    let mut config = Config::default();
    config.registry.url = server.url();
    config.registry.repository = "team/app".to_string();
    config.network.timeout = 5;
    config.scan.on_error = on_error;
    AppContext { config }
}

#[tokio::test]
async fn test_run_prints_one_line_per_tag() {
    let (server, _mocks) = anonymous_registry(200).await;
    let ctx = context(&server, OnError::Abort);

    let mut out = Vec::new();
    let summary = run(&ctx, &PlainFormatter, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Tag: v1 - Last Updated: 2021-05-01 10:00:00\n\
         Tag: v2 - Last Updated: 2021-01-01 00:00:00\n"
    );
    assert_eq!(summary.reported, 2);
}

#[tokio::test]
async fn test_run_abort_keeps_printed_lines() {
    let (server, _mocks) = anonymous_registry(404).await;
    let ctx = context(&server, OnError::Abort);

    let mut out = Vec::new();
    let result = run(&ctx, &PlainFormatter, &mut out).await;

    assert!(result.is_err());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Tag: v1 - Last Updated: 2021-05-01 10:00:00\n"
    );
}

#[tokio::test]
async fn test_run_skip_reports_remaining_tags() {
    let (server, _mocks) = anonymous_registry(500).await;
    let ctx = context(&server, OnError::Skip);

    let mut out = Vec::new();
    let summary = run(&ctx, &PlainFormatter, &mut out).await.unwrap();

    assert_eq!(summary.reported, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].tag, "v2");
    assert!(!summary.is_complete());
}

#[tokio::test]
async fn test_run_rejects_empty_repository() {
    let server = mockito::Server::new_async().await;
    let mut ctx = context(&server, OnError::Abort);
    ctx.config.registry.repository = String::new();

    let mut out = Vec::new();
    let err = run(&ctx, &PlainFormatter, &mut out).await.unwrap_err();

    assert!(err.to_string().contains("Repository"));
    assert!(out.is_empty());
}

/// Writer whose reader has gone away, like stdout piped into `head -0`.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_run_stops_fetching_after_broken_pipe() {
    let mut server = mockito::Server::new_async().await;
    let _probe = server
        .mock("HEAD", "/v2/")
        .with_status(200)
        .create_async()
        .await;
    let _tags = server
        .mock("GET", "/v2/team/app/tags/list")
        .with_status(200)
        .with_body(r#"{"name":"team/app","tags":["v1","v2"]}"#)
        .create_async()
        .await;
    let _v1 = server
        .mock("GET", "/v2/team/app/manifests/v1")
        .with_status(200)
        .with_body(manifest_body("2021-05-01T10:00:00"))
        .create_async()
        .await;
    let v2 = server
        .mock("GET", "/v2/team/app/manifests/v2")
        .expect(0)
        .create_async()
        .await;
    let ctx = context(&server, OnError::Abort);

    let summary = run(&ctx, &PlainFormatter, &mut ClosedPipe).await.unwrap();

    assert!(summary.stopped);
    assert_eq!(summary.reported, 1);
    v2.assert_async().await;
}

/// Writer failing with something other than a closed pipe.
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_run_reports_other_write_errors() {
    let (server, _mocks) = anonymous_registry(200).await;
    let ctx = context(&server, OnError::Abort);

    let err = run(&ctx, &PlainFormatter, &mut FullDisk).await.unwrap_err();

    assert!(err.to_string().contains("no space left"));
}
