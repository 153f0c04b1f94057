//! Map surface core for the embedded map page.
//!
//! This crate is compiled to WebAssembly and runs inside the web view
//! that hosts the third-party map. It owns the surface-side marker set
//! and the view state, consumes [`bridge::MapCommand`] envelopes from
//! the host application, and emits [`bridge::MapEvent`] envelopes back.
//! The JS glue layer owns the actual map library — panning, zooming,
//! placemark rendering and clustering are opaque to this crate; it only
//! decides what exists and what to report.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Owned id→marker map with explicit CRUD operations |
//! | [`core`] | Testable [`core::SurfaceCore`]: command dispatch, tap handling, view state |
//! | [`wasm`] | `wasm-bindgen` wrapper exposing the core to the page script |

pub mod core;
pub mod store;
pub mod wasm;
