// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Integration tests for the HTTP/1.1 server, over real TCP sockets.

use std::{
    sync::Arc,
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::{sleep, timeout},
};

use gheppio_http::{Request, Response, StatusCode};
use gheppio_http_handling::{HandlerController, ServerLimits, ServerSettings};

fn setup_settings() -> ServerSettings {
    let mut handler_controller = HandlerController::new();
    handler_controller.register("/", Arc::new(|_request: &Request| {
        Response::with_status_and_string_body(StatusCode::Ok, "Hello from gheppio!")
    }));

    ServerSettings {
        handler_controller,
        limits: ServerLimits::default(),
        read_headers_timeout: Duration::from_secs(10),
    }
}

async fn start_server_in_background(address: &'static str, settings: ServerSettings) {
    tokio::task::spawn(async move {
        gheppio_http1::start(address, settings).await
    });

    // Wait for the listener to come up.
    for _ in 0..50 {
        if TcpStream::connect(address).await.is_ok() {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("server on {address} did not come up");
}

/// Write the raw request bytes and read the full response, until the server
/// closes the connection.
async fn send_and_receive(address: &str, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(address).await.expect("failed to connect");
    stream.write_all(request).await.expect("failed to write request");

    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await
        .expect("server did not close the connection")
        .expect("failed to read response");
    response
}

#[tokio::test]
async fn test_well_formed_request_is_served() {
    start_server_in_background("127.0.0.1:40631", setup_settings()).await;

    let response = send_and_receive("127.0.0.1:40631", b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    let response = String::from_utf8_lossy(&response);

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "response: {response}");
    assert!(response.contains("\r\nServer: gheppio\r\n"), "response: {response}");
    assert!(response.contains("\r\nConnection: close\r\n"), "response: {response}");
    assert!(response.contains("\r\nContent-Length: 19\r\n"), "response: {response}");
    assert!(response.ends_with("\r\n\r\nHello from gheppio!"), "response: {response}");
}

#[tokio::test]
async fn test_request_split_across_many_writes_is_served() {
    start_server_in_background("127.0.0.1:40632", setup_settings()).await;

    let mut stream = TcpStream::connect("127.0.0.1:40632").await.unwrap();
    for &byte in b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n" {
        stream.write_all(&[byte]).await.unwrap();
        stream.flush().await.unwrap();
    }

    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_malformed_request_line_receives_the_fixed_400() {
    start_server_in_background("127.0.0.1:40633", setup_settings()).await;

    let response = send_and_receive("127.0.0.1:40633", b"GET / HTTP/1.2\r\n\r\n").await;
    let response = String::from_utf8_lossy(&response);

    // The fixed format: status line, Connection, Date, Content-Length,
    // blank line, no body. Only the Date value varies.
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\nConnection: close\r\nDate: "),
        "response: {response}");
    assert!(response.ends_with(" GMT\r\nContent-Length: 0\r\n\r\n"), "response: {response}");
    assert!(!response.contains("Server:"), "response: {response}");
}

#[tokio::test]
async fn test_nul_in_target_receives_400() {
    start_server_in_background("127.0.0.1:40634", setup_settings()).await;

    for request in [&b"GET /\x00 HTTP/1.1\r\n\r\n"[..], &b"GET /%00 HTTP/1.1\r\n\r\n"[..], &b"GET /%E8%85%00 HTTP/1.1\r\n\r\n"[..]] {
        let response = send_and_receive("127.0.0.1:40634", request).await;
        assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }
}

#[tokio::test]
async fn test_request_line_over_the_limit_receives_400() {
    let mut settings = setup_settings();
    settings.limits.set_max_request_line_size(b"GET / HTTP/1.1\r\n".len() - 1).unwrap();
    settings.limits.set_max_request_buffer_size(Some(1024)).unwrap();
    start_server_in_background("127.0.0.1:40635", settings).await;

    let response = send_and_receive("127.0.0.1:40635", b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_folded_header_receives_400() {
    start_server_in_background("127.0.0.1:40636", setup_settings()).await;

    let response = send_and_receive("127.0.0.1:40636", b"GET / HTTP/1.1\r\n Header-1: value1\r\n\r\n").await;
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_unsatisfiable_limits_refuse_to_start() {
    let mut settings = setup_settings();
    settings.limits.set_max_request_line_size(8 * 1024).unwrap();
    settings.limits.set_max_request_buffer_size(Some(1024)).unwrap();

    let error = gheppio_http1::start("127.0.0.1:40637", settings).await
        .expect_err("a buffer smaller than the line limit must not start");
    assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    assert!(error.to_string().contains("max_request_line_size"), "error: {error}");

    // The listener never bound.
    assert!(TcpStream::connect("127.0.0.1:40637").await.is_err());
}

#[tokio::test]
async fn test_slow_client_receives_408() {
    let mut settings = setup_settings();
    settings.read_headers_timeout = Duration::from_millis(200);
    start_server_in_background("127.0.0.1:40638", settings).await;

    let mut stream = TcpStream::connect("127.0.0.1:40638").await.unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\nHost: loc").await.unwrap();

    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 408 Request Timeout\r\n"));
}
