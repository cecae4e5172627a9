use crate::{
    CancellationToken, KubeletClient, KubeletClientConfig, KubeletError, KubeletInterface,
    Summary, is_not_found,
};
use std::time::{Duration, Instant};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn create_direct_client(mock_server: &MockServer) -> KubeletClient {
    let config = KubeletClientConfig {
        port: mock_server.address().port(),
        insecure_no_tls: true,
        ..Default::default()
    };
    KubeletClient::new(reqwest::Client::new(), config).unwrap()
}

fn summary_json() -> serde_json::Value {
    serde_json::json!({
        "node": {
            "nodeName": "127.0.0.1",
            "startTime": "2024-05-01T09:59:00Z",
            "cpu": {
                "time": "2024-05-01T12:00:00Z",
                "usageNanoCores": 250000000,
                "usageCoreNanoSeconds": 9876543210_u64
            },
            "memory": {
                "time": "2024-05-01T12:00:00Z",
                "availableBytes": 3221225472_u64,
                "usageBytes": 1073741824,
                "workingSetBytes": 805306368
            }
        },
        "pods": [
            {
                "podRef": { "name": "coredns-7db6d8ff4d-x2k9p", "namespace": "kube-system", "uid": "a1b2c3" },
                "startTime": "2024-05-01T10:00:00Z",
                "containers": [
                    {
                        "name": "coredns",
                        "cpu": { "usageNanoCores": 1200000 },
                        "memory": { "workingSetBytes": 16777216 }
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn test_summary_success() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let summary = client.get_summary(&ctx, "127.0.0.1").await.unwrap();

    assert_eq!(summary.node.node_name, "127.0.0.1");
    assert_eq!(summary.node.cpu.as_ref().unwrap().usage_nano_cores, Some(250000000));
    assert_eq!(summary.pods.len(), 1);
    assert_eq!(summary.pods[0].pod_ref.namespace, "kube-system");
    assert_eq!(summary.pods[0].containers[0].name, "coredns");

    // Decoding keeps every field that was sent.
    assert_eq!(serde_json::to_value(&summary).unwrap(), summary_json());
}

#[tokio::test]
async fn test_summary_not_found() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let err = client.get_summary(&ctx, "127.0.0.1").await.unwrap_err();

    assert!(is_not_found(&err));
    let expected = format!(
        "http://127.0.0.1:{}/stats/summary/",
        mock_server.address().port()
    );
    assert!(err.to_string().contains(&expected), "{err}");
}

#[tokio::test]
async fn test_summary_server_error() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("failed to get root cgroup stats"),
        )
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let err = client.get_summary(&ctx, "127.0.0.1").await.unwrap_err();

    assert!(!is_not_found(&err));
    assert!(matches!(
        err,
        KubeletError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
    let message = err.to_string();
    assert!(message.contains("503 Service Unavailable"), "{message}");
    assert!(message.contains("failed to get root cgroup stats"), "{message}");
}

#[tokio::test]
async fn test_summary_unauthorized_is_not_not_found() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let err = client.get_summary(&ctx, "127.0.0.1").await.unwrap_err();
    assert!(matches!(err, KubeletError::Status { .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_summary_malformed_json() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    let truncated = r#"{"node": {"nodeName": "127.0.0.1", "cpu": {"usageNano"#;
    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(truncated))
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let result: Result<Summary, _> = client.get_summary(&ctx, "127.0.0.1").await;

    match result {
        Err(err @ KubeletError::Decode { .. }) => {
            let message = err.to_string();
            assert!(message.starts_with("failed to parse output"), "{message}");
            assert!(message.contains("usageNano"), "{message}");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_summary_cancelled_while_waiting() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_json())
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.get_summary(&ctx, "127.0.0.1"),
    )
    .await
    .expect("cancellation must not hang");

    assert!(matches!(result, Err(KubeletError::Cancelled { .. })));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_summary_request_timeout() {
    let mock_server = MockServer::start().await;
    let config = KubeletClientConfig {
        port: mock_server.address().port(),
        insecure_no_tls: true,
        request_timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    };
    let client = KubeletClient::new(reqwest::Client::new(), config).unwrap();

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let err = client.get_summary(&ctx, "127.0.0.1").await.unwrap_err();
    match err {
        KubeletError::Transport { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected transport timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_summary_connection_refused() {
    // Bind and drop a listener to get a port that nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = KubeletClientConfig {
        port,
        insecure_no_tls: true,
        ..Default::default()
    };
    let client = KubeletClient::new(reqwest::Client::new(), config).unwrap();

    let ctx = CancellationToken::new();
    let err = client.get_summary(&ctx, "127.0.0.1").await.unwrap_err();
    assert!(matches!(err, KubeletError::Transport { .. }));
    assert!(!is_not_found(&err));
}

#[tokio::test]
async fn test_summary_concurrent_calls() {
    let mock_server = MockServer::start().await;
    let client = create_direct_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/stats/summary/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_json()))
        .expect(4)
        .mount(&mock_server)
        .await;

    let ctx = CancellationToken::new();
    let (a, b, c, d) = tokio::join!(
        client.get_summary(&ctx, "127.0.0.1"),
        client.get_summary(&ctx, "127.0.0.1"),
        client.get_summary(&ctx, "127.0.0.1"),
        client.get_summary(&ctx, "127.0.0.1"),
    );
    for result in [a, b, c, d] {
        assert_eq!(result.unwrap().node.node_name, "127.0.0.1");
    }
}
