//! Entity id allocation

use super::components::EntityId;

/// Hands out monotonically increasing ids; an id is never reused.
///
/// Owned by the [`World`](super::World) rather than kept as process-wide
/// state, so two worlds built the same way assign the same ids.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    ///
    /// # Panics
    ///
    /// Panics if the 32-bit id space is exhausted.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.checked_add(1).expect("entity id space exhausted");
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub const fn allocated(&self) -> u32 {
        self.next
    }
}
