pub mod loader;
pub mod types;

pub use loader::MAX_PERMISSION_LEVEL;
pub use types::{PermissionLevels, ServerConfig};
