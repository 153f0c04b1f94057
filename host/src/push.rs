//! Push channel: long-lived subscription to server marker updates.
//!
//! The channel is opened once when the owning screen becomes active and
//! closed when it goes away. Every error — connect failure, transport
//! error, malformed envelope — is ignored after a debug log: the
//! channel simply stops producing updates and there is no reconnect.
//! Whether that best-effort posture masks real failures is an open
//! product question; the behavior is kept as designed.

#[cfg(test)]
#[path = "push_test.rs"]
mod push_test;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use bridge::{MarkerDraft, ServerPush};

/// Handle to a running push subscription.
pub struct PushChannel {
    task: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

impl PushChannel {
    /// Connect to `ws_url` and forward each `markersUpdate` batch to
    /// `updates`. Connection and reads happen on a spawned task; this
    /// call never blocks.
    #[must_use]
    pub fn connect(ws_url: String, updates: mpsc::Sender<Vec<MarkerDraft>>) -> Self {
        let (shutdown, shutdown_rx) = oneshot::channel();
        Self { task: tokio::spawn(run(ws_url, updates, shutdown_rx)), shutdown }
    }

    /// Tear the subscription down: ask the task to send a Close frame
    /// and exit. The one required cleanup when the owning screen is
    /// dismissed.
    pub fn close(self) {
        if self.shutdown.send(()).is_err() {
            // The task already finished on its own.
            self.task.abort();
        }
    }
}

async fn run(
    ws_url: String,
    updates: mpsc::Sender<Vec<MarkerDraft>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (stream, _) = match connect_async(ws_url.as_str()).await {
        Ok(pair) => pair,
        Err(error) => {
            tracing::debug!(%error, url = %ws_url, "push channel connect failed");
            return;
        }
    };
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                // Best-effort: the server treats the frame as the clean
                // disconnect signal, but it may already be gone.
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            message = read.next() => {
                let Some(message) = message else { break };
                let message = match message {
                    Ok(message) => message,
                    Err(error) => {
                        tracing::debug!(%error, "push channel read failed");
                        break;
                    }
                };
                match message {
                    Message::Text(text) => match ServerPush::from_json(text.as_str()) {
                        Ok(ServerPush::MarkersUpdate { markers }) => {
                            if updates.send(markers).await.is_err() {
                                // Receiver gone: the screen no longer cares.
                                break;
                            }
                        }
                        Err(error) => tracing::debug!(%error, "dropping malformed push envelope"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }
}
