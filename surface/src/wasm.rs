//! `wasm-bindgen` wrapper exposed to the embedded map page.
//!
//! The page script wires this to the map library: inbound postMessage
//! strings go through [`MapSurface::handle_message`], map click events
//! through [`MapSurface::tap`], and every returned string is posted
//! back to the host verbatim. Events are returned as a JSON array of
//! envelopes so one command can yield zero or more posts.

use wasm_bindgen::prelude::wasm_bindgen;

use crate::core::SurfaceCore;

#[wasm_bindgen]
pub struct MapSurface {
    core: SurfaceCore,
}

#[wasm_bindgen]
impl MapSurface {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self { core: SurfaceCore::new() }
    }

    /// Handle one raw bridge message; returns a JSON array of event
    /// envelopes to post back (empty array for dropped input).
    pub fn handle_message(&mut self, text: &str) -> String {
        let events = self.core.handle_message(text);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Register a user tap at `[lat, lon]`; returns the `markerAdded`
    /// envelope to post.
    pub fn tap(&mut self, lat: f64, lon: f64) -> String {
        self.core.tap([lat, lon]).to_json()
    }

    /// Current view center latitude.
    #[must_use]
    pub fn center_lat(&self) -> f64 {
        self.core.view().center[0]
    }

    /// Current view center longitude.
    #[must_use]
    pub fn center_lon(&self) -> f64 {
        self.core.view().center[1]
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.core.view().zoom
    }
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::new()
    }
}
