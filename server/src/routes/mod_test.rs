use std::net::SocketAddr;

use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use bridge::Marker;
use host::{PushChannel, SyncClient};

use super::*;

async fn spawn_app() -> SocketAddr {
    let state = AppState::new();
    let router = app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    addr
}

fn marker(id: &str, coords: [f64; 2]) -> Marker {
    Marker { id: id.into(), coords, icon_url: None }
}

#[tokio::test]
async fn download_of_fresh_server_is_empty() {
    let addr = spawn_app().await;
    let client = SyncClient::new(format!("http://{addr}"));
    assert!(client.download().await.expect("download failed").is_empty());
}

#[tokio::test]
async fn upload_then_download_roundtrip() {
    let addr = spawn_app().await;
    let client = SyncClient::new(format!("http://{addr}"));

    client
        .upload(&[marker("a", [1.0, 2.0]), marker("b", [3.0, 4.0])])
        .await
        .expect("upload failed");

    let drafts = client.download().await.expect("download failed");
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].id.as_deref(), Some("a"));
    assert_eq!(drafts[0].coords, [1.0, 2.0]);
}

#[tokio::test]
async fn second_upload_replaces_first() {
    let addr = spawn_app().await;
    let client = SyncClient::new(format!("http://{addr}"));

    client.upload(&[marker("old", [0.0, 0.0])]).await.expect("first upload failed");
    client.upload(&[marker("new", [5.0, 6.0])]).await.expect("second upload failed");

    let drafts = client.download().await.expect("download failed");
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id.as_deref(), Some("new"));
}

#[tokio::test]
async fn push_channel_receives_upload_broadcast() {
    let addr = spawn_app().await;
    let (tx, mut rx) = mpsc::channel(8);
    let push = PushChannel::connect(format!("ws://{addr}/api/ws"), tx);

    // Give the subscription a moment to register before posting.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = SyncClient::new(format!("http://{addr}"));
    client.upload(&[marker("a", [55.76, 37.64])]).await.expect("upload failed");

    let markers = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("push update timed out")
        .expect("push channel closed");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id.as_deref(), Some("a"));
    assert_eq!(markers[0].coords, [55.76, 37.64]);

    push.close();
}

#[tokio::test]
async fn closed_push_channel_stops_producing() {
    let addr = spawn_app().await;
    let (tx, mut rx) = mpsc::channel(8);
    let push = PushChannel::connect(format!("ws://{addr}/api/ws"), tx);
    tokio::time::sleep(Duration::from_millis(100)).await;
    push.close();

    let client = SyncClient::new(format!("http://{addr}"));
    client.upload(&[marker("a", [1.0, 2.0])]).await.expect("upload failed");

    // The closed task dropped its sender; recv drains to None without
    // ever delivering the update.
    let got = timeout(Duration::from_secs(2), rx.recv()).await.expect("recv timed out");
    assert!(got.is_none());
}
