use std::sync::atomic::{AtomicBool, Ordering};

/// Dirty flag shared between the library and whoever saves it.
///
/// Mutations call [`mark_dirty`](Self::mark_dirty); the save routine calls
/// [`take_dirty`](Self::take_dirty) and writes only when it returns true.
#[derive(Debug, Default)]
pub struct PersistenceGate {
    dirty: AtomicBool,
}

impl PersistenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Read and clear the flag in one step
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
