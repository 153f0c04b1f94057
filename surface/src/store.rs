//! In-memory store of the surface's markers.
//!
//! The marker set is owned exclusively by [`crate::core::SurfaceCore`];
//! all mutation goes through these explicit operations rather than
//! through ambient shared state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use bridge::{Marker, MarkerId};

/// Owned id→marker map.
pub struct MarkerStore {
    markers: HashMap<MarkerId, Marker>,
}

impl MarkerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { markers: HashMap::new() }
    }

    /// Insert or replace a marker. An existing marker with the same id
    /// is overwritten in place.
    pub fn insert(&mut self, marker: Marker) {
        self.markers.insert(marker.id.clone(), marker);
    }

    /// Remove a marker by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Marker> {
        self.markers.remove(id)
    }

    /// Return a reference to a marker by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Delete all markers.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Owned snapshot of all markers, sorted by id. The set itself is
    /// unordered; sorting keeps snapshots deterministic.
    #[must_use]
    pub fn all(&self) -> Vec<Marker> {
        let mut markers: Vec<Marker> = self.markers.values().cloned().collect();
        markers.sort_by(|a, b| a.id.cmp(&b.id));
        markers
    }

    /// Number of markers currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if the store contains no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self::new()
    }
}
