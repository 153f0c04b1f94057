//! Canonical marker state and reconciliation.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::collections::HashMap;

use bridge::ids::{IdGen, UuidIds};
use bridge::{Coords, MapCommand, MapEvent, Marker, MarkerDraft, MarkerId};

/// User-visible import failures. Nothing is mutated when these occur.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The pasted text was not valid JSON.
    #[error("import is not valid JSON: {0}")]
    ImportParse(#[from] serde_json::Error),
    /// The JSON decoded to something other than an array.
    #[error("import must be a JSON array of markers")]
    ImportNotArray,
}

/// The host controller: canonical marker list, bridge command issuing,
/// and reconciliation of surface events.
///
/// Both sides keep their own marker set; this one is what the list UI
/// renders and what upload/export serialize. Reconciliation keeps it
/// eventually consistent with the surface without ever blocking on it.
pub struct HostController {
    markers: HashMap<MarkerId, Marker>,
    ids: Box<dyn IdGen>,
}

impl HostController {
    /// Create a controller with UUID-backed id generation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    /// Create a controller with an injected id generator.
    #[must_use]
    pub fn with_ids(ids: Box<dyn IdGen>) -> Self {
        Self { markers: HashMap::new(), ids }
    }

    // --- UI actions: each returns the command to post over the bridge ---

    /// Add a marker at the given coordinates; the surface assigns the id.
    #[must_use]
    pub fn add_marker(&self, coords: Coords) -> MapCommand {
        MapCommand::AddMarker { id: None, coords, icon_url: None }
    }

    /// Delete one marker.
    #[must_use]
    pub fn remove_marker(&self, id: &str) -> MapCommand {
        MapCommand::RemoveMarker { id: id.to_owned() }
    }

    /// Recenter the map on a marker row tap, keeping the current zoom.
    #[must_use]
    pub fn recenter(&self, coords: Coords) -> MapCommand {
        MapCommand::SetCenter { coords, zoom: None }
    }

    /// Request the surface's full snapshot.
    #[must_use]
    pub fn request_all(&self) -> MapCommand {
        MapCommand::GetAllMarkers
    }

    /// Delete every marker.
    #[must_use]
    pub fn clear_all(&self) -> MapCommand {
        MapCommand::ClearAll
    }

    // --- Reconciliation ---

    /// Handle one raw bridge message from the surface. Malformed or
    /// unknown input is dropped without surfacing an error.
    pub fn handle_raw(&mut self, text: &str) {
        match MapEvent::from_json(text) {
            Ok(event) => self.apply_event(event),
            Err(error) => tracing::debug!(%error, "dropping malformed surface event"),
        }
    }

    /// Reconcile one surface event into the canonical list.
    pub fn apply_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::MarkerAdded { id, coords } => {
                // Idempotent against duplicate notifications.
                self.markers
                    .entry(id.clone())
                    .or_insert(Marker { id, coords, icon_url: None });
            }
            MapEvent::MarkerRemoved { id } => {
                self.markers.remove(&id);
            }
            MapEvent::AllMarkers { markers } => {
                // Snapshot is authoritative: full overwrite.
                self.markers.clear();
                for marker in markers {
                    self.markers.insert(marker.id.clone(), marker);
                }
            }
            MapEvent::Cleared => self.markers.clear(),
            MapEvent::Imported { count } => {
                tracing::debug!(count, "surface confirmed import");
            }
        }
    }

    // --- Export / import ---

    /// Serialize the current list as pretty-printed JSON for the
    /// export editor.
    #[must_use]
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.markers()).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Import a pasted JSON array: merge entries whose id is not
    /// already present (generating ids for entries lacking one) and
    /// return the full original batch as the command to forward to the
    /// surface.
    ///
    /// # Errors
    ///
    /// [`HostError::ImportParse`] for invalid JSON or malformed
    /// entries, [`HostError::ImportNotArray`] for a non-array payload.
    /// Local state is untouched on error.
    pub fn import_json(&mut self, text: &str) -> Result<MapCommand, HostError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_array() {
            return Err(HostError::ImportNotArray);
        }
        let drafts: Vec<MarkerDraft> = serde_json::from_value(value)?;

        for draft in &drafts {
            let known = draft.id.as_ref().is_some_and(|id| self.markers.contains_key(id));
            if !known {
                let marker = draft.clone().resolve(self.ids.as_mut());
                self.markers.insert(marker.id.clone(), marker);
            }
        }

        Ok(MapCommand::ImportMarkers { markers: drafts })
    }

    /// Apply a server-provided marker list (download response or push
    /// update): destructive overwrite of local state, plus the command
    /// forwarding the batch to the surface.
    pub fn apply_remote_snapshot(&mut self, markers: Vec<MarkerDraft>) -> MapCommand {
        self.markers.clear();
        for draft in &markers {
            let marker = draft.clone().resolve(self.ids.as_mut());
            self.markers.insert(marker.id.clone(), marker);
        }
        MapCommand::ImportMarkers { markers }
    }

    // --- Queries ---

    /// All markers sorted by id. The set is unordered; sorting keeps
    /// the list and exports deterministic.
    #[must_use]
    pub fn markers(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self.markers.values().collect();
        markers.sort_by(|a, b| a.id.cmp(&b.id));
        markers
    }

    /// Look up one marker by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Number of markers in the canonical list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if the canonical list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Default for HostController {
    fn default() -> Self {
        Self::new()
    }
}
