//! Host-side marker state and server connectivity.
//!
//! The host application owns the canonical marker list shown to the
//! user. This crate holds everything behind that screen that is not
//! presentation: the [`controller::HostController`] that issues bridge
//! commands and reconciles surface events, the [`sync::SyncClient`]
//! for best-effort upload/download against the marker server, and the
//! [`push::PushChannel`] that subscribes to unsolicited server updates.
//!
//! Sending over the bridge is fire-and-forget: controller methods
//! return the [`bridge::MapCommand`] to post and the surrounding UI
//! layer owns the actual transport, so every decision here stays
//! testable without a web view.

pub mod controller;
pub mod push;
pub mod sync;

pub use controller::{HostController, HostError};
pub use push::PushChannel;
pub use sync::{SyncClient, SyncError};
