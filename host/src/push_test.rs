use tokio::net::TcpListener;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::accept_async;

use super::*;

/// One-shot websocket server: accepts a single client, sends `frames`,
/// then echoes into the void until the client goes away. Reports any
/// Close frame it receives on `closed`.
async fn spawn_ws_server(frames: Vec<Message>, closed: oneshot::Sender<()>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        for frame in frames {
            ws.send(frame).await.expect("send frame failed");
        }
        while let Some(Ok(frame)) = ws.next().await {
            if matches!(frame, Message::Close(_)) {
                let _ = closed.send(());
                break;
            }
        }
    });
    format!("ws://{addr}")
}

#[tokio::test]
async fn malformed_frames_are_skipped_and_reading_continues() {
    let update = ServerPush::MarkersUpdate {
        markers: vec![MarkerDraft { id: Some("a".into()), coords: [1.0, 2.0], icon_url: None }],
    };
    let (closed_tx, _closed_rx) = oneshot::channel();
    let url = spawn_ws_server(
        vec![
            Message::Text("{not json".into()),
            Message::Text(r#"{"type":"somethingElse"}"#.into()),
            Message::Text(update.to_json().into()),
        ],
        closed_tx,
    )
    .await;

    let (tx, mut rx) = mpsc::channel(8);
    let push = PushChannel::connect(url, tx);

    // The two bad frames are dropped; the valid one still arrives.
    let markers = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("update timed out")
        .expect("push channel closed");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id.as_deref(), Some("a"));

    push.close();
}

#[tokio::test]
async fn close_sends_close_frame() {
    let (closed_tx, closed_rx) = oneshot::channel();
    let url = spawn_ws_server(Vec::new(), closed_tx).await;

    let (tx, _rx) = mpsc::channel(8);
    let push = PushChannel::connect(url, tx);

    // Give the handshake a moment to complete before closing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    push.close();

    timeout(Duration::from_secs(2), closed_rx)
        .await
        .expect("server never saw a close frame")
        .expect("server task dropped");
}
