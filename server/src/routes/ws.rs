//! WebSocket push endpoint.
//!
//! On upgrade, the connection is registered as a push client and enters
//! a `select!` loop: broadcast envelopes from the marker resource are
//! forwarded out, and inbound frames are ignored — the channel is
//! strictly one-way. Subscribers see no replay of the current set; they
//! only receive batches from subsequent POSTs.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::info;

use bridge::ServerPush;

use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let (client_tx, mut client_rx) = mpsc::channel::<ServerPush>(64);
    let client_id = state.subscribe(client_tx).await;
    info!(%client_id, "push client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            push = client_rx.recv() => {
                let Some(push) = push else { break };
                if socket.send(Message::Text(push.to_json().into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.unsubscribe(client_id).await;
    info!(%client_id, "push client disconnected");
}
