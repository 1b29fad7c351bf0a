//! Board File Watcher
//!
//! Watches the board directory and pushes a fresh frame whenever the store
//! files change.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::loader::{BoardLoader, Collection, MANIFEST_FILE};
use crate::server::AppState;
use crate::types::Result;

/// File change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// board.toml was modified
    ManifestChanged,
    /// One of the entity JSON files was modified
    CollectionChanged(Collection),
}

/// Board file watcher
pub struct BoardWatcher {
    /// Path to the board
    board_path: PathBuf,
    /// Application state
    state: AppState,
    /// Channel receiver for file events
    rx: mpsc::Receiver<FileChange>,
    /// The underlying watcher (kept alive)
    _watcher: RecommendedWatcher,
}

impl BoardWatcher {
    /// Create a new board watcher
    pub fn new(board_path: impl AsRef<Path>, state: AppState) -> Result<Self> {
        // Canonicalize so event paths can be stripped reliably
        let board_path = board_path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| board_path.as_ref().to_path_buf());
        let (tx, rx) = mpsc::channel(100);

        let board_path_clone = board_path.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if let Some(change) = Self::event_to_change(&board_path_clone, &event) {
                        let _ = tx.blocking_send(change);
                    }
                }
                Err(e) => {
                    error!("File watcher error: {}", e);
                }
            }
        })?;

        // The board directory is flat
        watcher.watch(&board_path, RecursiveMode::NonRecursive)?;
        info!("Watching board directory: {}", board_path.display());

        Ok(Self {
            board_path,
            state,
            rx,
            _watcher: watcher,
        })
    }

    /// Convert a notify event to our FileChange type
    fn event_to_change(board_path: &Path, event: &Event) -> Option<FileChange> {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {}
            _ => {
                debug!("Ignoring event kind: {:?}", event.kind);
                return None;
            }
        }

        let path = event.paths.first()?;
        let rel_path = path.strip_prefix(board_path).ok()?;
        let rel_str = rel_path.to_str()?;

        debug!("File change detected: {}", rel_str);

        if rel_str == MANIFEST_FILE {
            Some(FileChange::ManifestChanged)
        } else {
            Collection::from_file_name(rel_str).map(FileChange::CollectionChanged)
        }
    }

    /// Run the watcher loop
    pub async fn run(mut self) {
        info!("Starting file watcher loop");

        while let Some(change) = self.rx.recv().await {
            self.handle_change(change).await;
        }

        info!("File watcher loop ended");
    }

    /// Handle a file change
    async fn handle_change(&self, change: FileChange) {
        info!("Board file changed: {:?}", change);

        let result = match change {
            FileChange::ManifestChanged => self.reload_board().await,
            FileChange::CollectionChanged(collection) => self.reload_collection(collection).await,
        };

        match result {
            Ok(()) => self.state.publish_current().await,
            Err(e) => warn!("Failed to reload board after {:?}: {}", change, e),
        }
    }

    /// Replace one collection in the store snapshot
    async fn reload_collection(&self, collection: Collection) -> Result<()> {
        let path = &self.board_path;
        match collection {
            Collection::Horses => {
                let horses = BoardLoader::load_horses(path).await?;
                self.state.update_board(move |board| board.horses = horses).await;
            }
            Collection::Feeds => {
                let feeds = BoardLoader::load_feeds(path).await?;
                self.state.update_board(move |board| board.feeds = feeds).await;
            }
            Collection::Diet => {
                let diet = BoardLoader::load_diet(path).await?;
                self.state.update_board(move |board| board.diet = diet).await;
            }
        }
        Ok(())
    }

    /// Reload the entire board
    async fn reload_board(&self) -> Result<()> {
        let board = BoardLoader::load(&self.board_path).await?;
        self.state.set_board(board).await;
        info!("Board reloaded successfully");
        Ok(())
    }
}
