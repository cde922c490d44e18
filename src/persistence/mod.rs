//! Deferred persistence: a dirty flag, the state file and the autosave loop

pub mod autosave;
pub mod gate;
pub mod state_file;

pub use autosave::{flush, Autosave, SharedLibrary};
pub use gate::PersistenceGate;
pub use state_file::{LibraryStateFile, STATE_FILE_VERSION};
