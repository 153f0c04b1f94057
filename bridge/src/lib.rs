//! Shared message vocabulary for the map bridge.
//!
//! This crate owns the wire representation used by both the host
//! controller and the embedded map surface: the marker data model, the
//! command/event envelopes carried over the web-view message channel,
//! and the push envelope delivered by the marker server. Everything on
//! the wire is a JSON object with a `"type"` discriminator.
//!
//! The channel is fire-and-forget: no envelope carries a correlation
//! id. Responses are matched by type, with the receiver re-broadcasting
//! the resulting state. Both receivers drop anything that fails to
//! decode — [`BridgeError`] exists so that drop is a visible decision
//! at the call site rather than an accident.

pub mod ids;


use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::ids::IdGen;

/// Opaque marker identifier, unique within one side's marker set.
pub type MarkerId = String;

/// Latitude/longitude pair, retained exactly as received.
pub type Coords = [f64; 2];

/// Error returned when an inbound envelope cannot be decoded.
///
/// Receivers treat this as "silently drop": log and move on, never
/// crash, never notify the peer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The text was not valid JSON, or the `type` tag was unrecognized.
    #[error("malformed bridge message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A placed point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique id within the owning marker set.
    pub id: MarkerId,
    /// `[lat, lon]`, never validated or normalized.
    pub coords: Coords,
    /// Optional icon reference; absent means the default marker style.
    #[serde(rename = "iconUrl", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A marker as it appears in import batches, upload/download bodies and
/// push envelopes, where the id may be left for the receiver to assign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MarkerId>,
    pub coords: Coords,
    #[serde(rename = "iconUrl", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl MarkerDraft {
    /// Turn the draft into a full marker, generating an id if absent.
    pub fn resolve(self, ids: &mut dyn IdGen) -> Marker {
        Marker {
            id: self.id.unwrap_or_else(|| ids.next_id()),
            coords: self.coords,
            icon_url: self.icon_url,
        }
    }
}

impl From<Marker> for MarkerDraft {
    fn from(marker: Marker) -> Self {
        Self { id: Some(marker.id), coords: marker.coords, icon_url: marker.icon_url }
    }
}

/// Command sent by the host controller to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MapCommand {
    /// Create a marker; the surface generates an id when none is given.
    AddMarker {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<MarkerId>,
        coords: Coords,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon_url: Option<String>,
    },
    /// Delete the marker with this id if present; no-op otherwise.
    RemoveMarker { id: MarkerId },
    /// Ask for a full snapshot of the surface's marker set.
    GetAllMarkers,
    /// Recenter the view. Absent zoom keeps the current zoom level.
    /// The surface sends no confirmation for this command.
    SetCenter {
        coords: Coords,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zoom: Option<f64>,
    },
    /// Delete all markers.
    ClearAll,
    /// Create one marker per entry; id collisions overwrite in place.
    ImportMarkers { markers: Vec<MarkerDraft> },
}

/// Event emitted by the map surface back to the host controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MapEvent {
    /// A marker was created — by a direct user tap or a received
    /// add/import command alike.
    MarkerAdded { id: MarkerId, coords: Coords },
    /// A marker was deleted.
    MarkerRemoved { id: MarkerId },
    /// Full snapshot, in response to `getAllMarkers`.
    AllMarkers { markers: Vec<Marker> },
    /// All markers were deleted.
    Cleared,
    /// An import batch was processed; `count` is the number of input
    /// entries, collisions included.
    Imported { count: usize },
}

/// Unsolicited server-originated update delivered over the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerPush {
    /// Replace-the-world marker list from the server.
    MarkersUpdate { markers: Vec<MarkerDraft> },
}

fn encode<T: Serialize>(value: &T) -> String {
    // Serializing these plain data enums cannot fail; an empty string
    // here would be dropped by the receiver like any malformed message.
    serde_json::to_string(value).unwrap_or_default()
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, BridgeError> {
    Ok(serde_json::from_str(text)?)
}

impl MapCommand {
    /// Encode for the bridge channel.
    #[must_use]
    pub fn to_json(&self) -> String {
        encode(self)
    }

    /// Decode one inbound command.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Malformed`] for invalid JSON or an
    /// unknown `type` tag.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        decode(text)
    }
}

impl MapEvent {
    /// Encode for the bridge channel.
    #[must_use]
    pub fn to_json(&self) -> String {
        encode(self)
    }

    /// Decode one inbound event.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Malformed`] for invalid JSON or an
    /// unknown `type` tag.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        decode(text)
    }
}

impl ServerPush {
    /// Encode for the push channel.
    #[must_use]
    pub fn to_json(&self) -> String {
        encode(self)
    }

    /// Decode one push envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Malformed`] for invalid JSON or an
    /// unknown `type` tag.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        decode(text)
    }
}
