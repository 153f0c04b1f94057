//! Surface-side command dispatch and view state.

#[cfg(test)]
#[path = "core_test.rs"]
mod core_test;

use bridge::ids::{IdGen, UuidIds};
use bridge::{Coords, MapCommand, MapEvent, Marker};

use crate::store::MarkerStore;

/// Map viewport state. Rendering is the map library's job; the core
/// only tracks what the host last asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Coords,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        // Central Moscow, shown until the first setCenter arrives.
        Self { center: [55.751244, 37.618423], zoom: 10.0 }
    }
}

/// Core surface state — marker set, view, and id generation.
///
/// Separated from the `wasm` wrapper so the full command/event contract
/// can be tested without a browser.
pub struct SurfaceCore {
    store: MarkerStore,
    view: ViewState,
    ids: Box<dyn IdGen>,
}

impl SurfaceCore {
    /// Create a core with UUID-backed id generation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    /// Create a core with an injected id generator.
    #[must_use]
    pub fn with_ids(ids: Box<dyn IdGen>) -> Self {
        Self { store: MarkerStore::new(), view: ViewState::default(), ids }
    }

    /// Handle one raw bridge message. Malformed or unknown input is
    /// dropped: no events, no error back to the host.
    pub fn handle_message(&mut self, text: &str) -> Vec<MapEvent> {
        let Ok(command) = MapCommand::from_json(text) else {
            return Vec::new();
        };
        self.apply(command)
    }

    /// Apply one decoded command and return the events to post back.
    pub fn apply(&mut self, command: MapCommand) -> Vec<MapEvent> {
        match command {
            MapCommand::AddMarker { id, coords, icon_url } => {
                let id = id.unwrap_or_else(|| self.ids.next_id());
                self.store.insert(Marker { id: id.clone(), coords, icon_url });
                vec![MapEvent::MarkerAdded { id, coords }]
            }
            MapCommand::RemoveMarker { id } => {
                if self.store.remove(&id).is_some() {
                    vec![MapEvent::MarkerRemoved { id }]
                } else {
                    // Unknown id: no-op, and deliberately no event.
                    Vec::new()
                }
            }
            MapCommand::GetAllMarkers => vec![MapEvent::AllMarkers { markers: self.store.all() }],
            MapCommand::SetCenter { coords, zoom } => {
                self.view.center = coords;
                if let Some(zoom) = zoom {
                    self.view.zoom = zoom;
                }
                Vec::new()
            }
            MapCommand::ClearAll => {
                self.store.clear();
                vec![MapEvent::Cleared]
            }
            MapCommand::ImportMarkers { markers } => {
                // One `imported` per batch; the count includes entries
                // that overwrote an existing id.
                let count = markers.len();
                for draft in markers {
                    self.store.insert(draft.resolve(self.ids.as_mut()));
                }
                vec![MapEvent::Imported { count }]
            }
        }
    }

    /// A direct user tap creates the marker locally and reports it —
    /// it does not wait for host approval.
    pub fn tap(&mut self, coords: Coords) -> MapEvent {
        let id = self.ids.next_id();
        self.store.insert(Marker { id: id.clone(), coords, icon_url: None });
        MapEvent::MarkerAdded { id, coords }
    }

    /// The current viewport state.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Snapshot of all markers, sorted by id.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        self.store.all()
    }

    /// Number of markers on the surface.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the surface holds no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for SurfaceCore {
    fn default() -> Self {
        Self::new()
    }
}
