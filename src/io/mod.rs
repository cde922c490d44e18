pub mod paths;

pub use paths::ShardlibPaths;
