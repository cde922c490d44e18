use super::LibraryStateFile;
use crate::config::ServerConfig;
use crate::io::ShardlibPaths;
use crate::operations::ShardLibrary;
use crate::{Result, ShardlibError};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

/// A library shared between triggers and the autosave task
pub type SharedLibrary = Arc<Mutex<ShardLibrary>>;

/// One lock per state file path, held from snapshot to rename
static FLUSH_LOCKS: Lazy<parking_lot::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(Default::default);

fn flush_lock(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = FLUSH_LOCKS.lock();
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// Save the library if it is dirty. Returns whether a save happened.
///
/// The flag is cleared and the snapshot taken under the library lock, so a
/// mutation that lands after the snapshot marks the library dirty again.
/// A failed write restores the flag for the next attempt.
///
/// Flushes to the same path are serialized: snapshots reach the file in
/// the order they were taken. Paths are compared as given, so two
/// spellings of one file are not serialized against each other.
pub async fn flush(library: &SharedLibrary, path: &Path) -> Result<bool> {
    let path_lock = flush_lock(path);
    let _writing = path_lock.lock().await;

    let (snapshot, gate) = {
        let library = library.lock().await;
        if !library.gate().take_dirty() {
            return Ok(false);
        }
        (library.store().snapshot(), Arc::clone(library.gate()))
    };

    let target = path.to_path_buf();
    let written = tokio::task::spawn_blocking(move || LibraryStateFile::save(&target, snapshot))
        .await
        .map_err(|e| ShardlibError::State(format!("Save task failed: {}", e)))
        .and_then(|result| result);

    if let Err(e) = written {
        gate.mark_dirty();
        return Err(e);
    }
    Ok(true)
}

/// Periodically flushes a shared library to its state file
pub struct Autosave {
    path: PathBuf,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Start saving `library` to `path` every `interval`
    pub fn spawn(library: SharedLibrary, path: PathBuf, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let task_path = path.clone();

        let handle = tokio::spawn(async move {
            let path = task_path;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match flush(&library, &path).await {
                            Ok(true) => tracing::debug!("Autosaved library to {}", path.display()),
                            Ok(false) => {}
                            Err(e) => tracing::warn!("Failed to autosave library: {}", e),
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }

            // Last chance for anything marked since the final tick
            if let Err(e) = flush(&library, &path).await {
                tracing::warn!("Failed to save library on shutdown: {}", e);
            }
        });

        Self {
            path,
            shutdown,
            handle,
        }
    }

    /// Start autosave with the configured state file and interval
    pub fn from_config(
        library: SharedLibrary,
        config: &ServerConfig,
        paths: &ShardlibPaths,
    ) -> Self {
        let path = config.resolve_state_file(paths);
        let interval = config.autosave_interval();
        tracing::info!(
            "Autosaving library to {} every {}ms",
            path.display(),
            interval.as_millis()
        );
        Self::spawn(library, path, interval)
    }

    /// State file this loop writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop the loop after one final save
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!("Autosave task ended abnormally: {}", e);
        }
    }
}
