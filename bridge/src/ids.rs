//! Marker id generation.
//!
//! Id generation is injected rather than ambient so that marker
//! creation stays deterministic under test and collision-free under
//! rapid inserts (wall-clock ids collide within a millisecond).

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use uuid::Uuid;

use crate::MarkerId;

/// Source of fresh marker ids.
pub trait IdGen: Send {
    /// Return an id not previously produced by this generator.
    fn next_id(&mut self) -> MarkerId;
}

/// UUID-backed generator, the production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGen for UuidIds {
    fn next_id(&mut self) -> MarkerId {
        format!("m_{}", Uuid::new_v4().simple())
    }
}

/// Sequential generator for deterministic tests: `m_1`, `m_2`, ...
#[derive(Debug, Default)]
pub struct SeqIds {
    next: u64,
}

impl SeqIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SeqIds {
    fn next_id(&mut self) -> MarkerId {
        self.next += 1;
        format!("m_{}", self.next)
    }
}
