//! End-to-end tests: a real relay over TCP, real UDP receivers

mod common;

use common::{assert_no_datagram, recv_datagram, udp_receiver, TestConfigBuilder, TestRelay};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_forward_hello() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;
    let (receiver, port) = udp_receiver().await;

    let response = reqwest::Client::new()
        .post(relay.url("/cot"))
        .header("X-UDP-Host", "127.0.0.1")
        .header("X-UDP-Port", port.to_string())
        .header("Content-Type", "application/xml")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["destination"], format!("127.0.0.1:{}", port));
    assert_eq!(json["size"], 5);

    assert_eq!(recv_datagram(&receiver).await, b"hello");
    assert_no_datagram(&receiver).await;

    relay.stop().await;
}

#[tokio::test]
async fn test_cot_event_forwarded_verbatim() {
    let relay = TestRelay::start(TestConfigBuilder::new().allowed("127.0.0.0/8").build()).await;
    let (receiver, port) = udp_receiver().await;

    let event = r#"<?xml version="1.0" encoding="UTF-8"?><event version="2.0" uid="ANDROID-1" type="a-f-G-U-C" time="2024-01-01T00:00:00Z" start="2024-01-01T00:00:00Z" stale="2024-01-01T00:05:00Z" how="m-g"><point lat="51.5" lon="-0.12" hae="10" ce="9999999" le="9999999"/></event>"#;

    let response = reqwest::Client::new()
        .post(relay.url("/cot"))
        .header("X-UDP-Port", port.to_string())
        .body(event)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["size"], event.len());
    assert_eq!(recv_datagram(&receiver).await, event.as_bytes());

    relay.stop().await;
}

#[tokio::test]
async fn test_invalid_ports_send_nothing() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;
    let (receiver, _) = udp_receiver().await;
    let client = reqwest::Client::new();

    for port in ["0", "-1", "65536", "70000", "not-a-port"] {
        let response = client
            .post(relay.url("/cot"))
            .header("X-UDP-Host", "127.0.0.1")
            .header("X-UDP-Port", port)
            .body("hello")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "port {port}");
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid UDP port number");
    }

    assert_no_datagram(&receiver).await;
    relay.stop().await;
}

#[tokio::test]
async fn test_blocked_destination_sends_nothing() {
    let relay = TestRelay::start(TestConfigBuilder::new().allowed("203.0.113.5").build()).await;
    let (receiver, port) = udp_receiver().await;

    let response = reqwest::Client::new()
        .post(relay.url("/cot"))
        .header("X-UDP-Host", "127.0.0.1")
        .header("X-UDP-Port", port.to_string())
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.headers()["access-control-allow-headers"],
        "Content-Type, X-UDP-Host, X-UDP-Port"
    );
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("UDP destination not allowed"));

    assert_no_datagram(&receiver).await;
    relay.stop().await;
}

#[tokio::test]
async fn test_default_host_is_loopback() {
    let relay = TestRelay::start(TestConfigBuilder::new().allowed("127.0.0.1").build()).await;
    let (receiver, port) = udp_receiver().await;

    let response = reqwest::Client::new()
        .post(relay.url("/cot"))
        .header("X-UDP-Port", port.to_string())
        .body("ping")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["destination"], format!("127.0.0.1:{}", port));
    assert_eq!(recv_datagram(&receiver).await, b"ping");

    relay.stop().await;
}

#[tokio::test]
async fn test_options_preflight() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;
    let client = reqwest::Client::new();

    for path in ["/cot", "/", "/whatever"] {
        let response = client
            .request(reqwest::Method::OPTIONS, relay.url(path))
            .header("Origin", "https://map.example.com")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert!(response.bytes().await.unwrap().is_empty());
    }

    relay.stop().await;
}

#[tokio::test]
async fn test_health_descriptor() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;

    let response = reqwest::get(relay.url("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["service"], "CoT UDP Proxy");
    assert_eq!(json["version"], cotrelay::VERSION);

    relay.stop().await;
}

#[tokio::test]
async fn test_unknown_route() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;

    let response = reqwest::get(relay.url("/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "Not found");

    relay.stop().await;
}

#[tokio::test]
async fn test_same_message_twice_sends_twice() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;
    let (receiver, port) = udp_receiver().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(relay.url("/cot"))
            .header("X-UDP-Port", port.to_string())
            .body("dup")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["success"], true);
    }

    assert_eq!(recv_datagram(&receiver).await, b"dup");
    assert_eq!(recv_datagram(&receiver).await, b"dup");
    assert_no_datagram(&receiver).await;

    relay.stop().await;
}

#[tokio::test]
async fn test_concurrent_requests() {
    let relay = TestRelay::start(TestConfigBuilder::new().build()).await;
    let (receiver, port) = udp_receiver().await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let url = relay.url("/cot");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .header("X-UDP-Port", port.to_string())
                .body(format!("msg-{}", i))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let mut received = Vec::new();
    for _ in 0..8 {
        received.push(String::from_utf8(recv_datagram(&receiver).await).unwrap());
    }
    received.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("msg-{}", i)).collect();
    expected.sort();
    assert_eq!(received, expected);

    relay.stop().await;
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let relay = TestRelay::start(TestConfigBuilder::new().max_body_bytes(8).build()).await;
    let (receiver, port) = udp_receiver().await;

    let response = reqwest::Client::new()
        .post(relay.url("/cot"))
        .header("X-UDP-Port", port.to_string())
        .body("this body is too long")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("Error reading body"));

    assert_no_datagram(&receiver).await;
    relay.stop().await;
}
