use tokio::time::{Duration, timeout};

use super::*;

fn draft(id: Option<&str>, coords: [f64; 2]) -> MarkerDraft {
    MarkerDraft { id: id.map(Into::into), coords, icon_url: None }
}

#[tokio::test]
async fn new_state_has_no_markers() {
    let state = AppState::new();
    assert!(state.snapshot().await.is_empty());
}

#[tokio::test]
async fn replace_overwrites_previous_set() {
    let state = AppState::new();
    state.replace(vec![draft(Some("old"), [0.0, 0.0])]).await;
    state.replace(vec![draft(Some("a"), [1.0, 2.0]), draft(Some("b"), [3.0, 4.0])]).await;

    let snapshot = state.snapshot().await;
    let ids: Vec<&str> = snapshot.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn replace_assigns_ids_to_anonymous_entries() {
    let state = AppState::new();
    state.replace(vec![draft(None, [1.0, 2.0])]).await;

    let snapshot = state.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot[0].id.starts_with("m_"));
}

#[tokio::test]
async fn broadcast_reaches_all_subscribers() {
    let state = AppState::new();
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    state.subscribe(tx_a).await;
    state.subscribe(tx_b).await;

    let push = ServerPush::MarkersUpdate { markers: vec![draft(Some("a"), [1.0, 2.0])] };
    state.broadcast(&push).await;

    let got_a = timeout(Duration::from_millis(200), rx_a.recv())
        .await
        .expect("client A timed out")
        .expect("client A channel closed");
    let got_b = timeout(Duration::from_millis(200), rx_b.recv())
        .await
        .expect("client B timed out")
        .expect("client B channel closed");
    assert_eq!(got_a, push);
    assert_eq!(got_b, push);
}

#[tokio::test]
async fn broadcast_skips_full_subscriber_without_stalling() {
    let state = AppState::new();
    let (tx_slow, mut rx_slow) = mpsc::channel(1);
    let (tx_live, mut rx_live) = mpsc::channel(8);
    state.subscribe(tx_slow).await;
    state.subscribe(tx_live).await;

    let push = ServerPush::MarkersUpdate { markers: vec![draft(Some("a"), [1.0, 2.0])] };
    // First delivery fills the slow client's capacity-1 channel.
    state.broadcast(&push).await;
    // The second must return promptly instead of waiting for it to drain.
    timeout(Duration::from_millis(500), state.broadcast(&push))
        .await
        .expect("broadcast stalled on a slow subscriber");

    // The live client got both envelopes, the slow one only the first.
    for _ in 0..2 {
        timeout(Duration::from_millis(200), rx_live.recv())
            .await
            .expect("live client timed out")
            .expect("live client channel closed");
    }
    assert_eq!(rx_slow.recv().await, Some(push));
    assert!(rx_slow.try_recv().is_err());
}

#[tokio::test]
async fn broadcast_prunes_dead_subscribers() {
    let state = AppState::new();
    let (tx_dead, rx_dead) = mpsc::channel(8);
    let (tx_live, mut rx_live) = mpsc::channel(8);
    state.subscribe(tx_dead).await;
    state.subscribe(tx_live).await;
    drop(rx_dead);

    let push = ServerPush::MarkersUpdate { markers: vec![] };
    state.broadcast(&push).await;
    state.broadcast(&push).await;

    // The live client still gets both deliveries.
    for _ in 0..2 {
        timeout(Duration::from_millis(200), rx_live.recv())
            .await
            .expect("live client timed out")
            .expect("live client channel closed");
    }
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let state = AppState::new();
    let (tx, mut rx) = mpsc::channel(8);
    let client_id = state.subscribe(tx).await;
    state.unsubscribe(client_id).await;

    state.broadcast(&ServerPush::MarkersUpdate { markers: vec![] }).await;

    // The registry held the only sender; the channel is now closed.
    let got = timeout(Duration::from_millis(200), rx.recv()).await.expect("recv timed out");
    assert!(got.is_none());
}
