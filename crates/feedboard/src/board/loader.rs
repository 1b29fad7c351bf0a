//! Board Loader
//!
//! Loads a board directory from disk.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, info};

use feedboard_types::{DietEntry, Feed, Horse};

use super::config::*;

/// Environment variable prefix layered over board.toml
pub const ENV_PREFIX: &str = "FEEDBOARD_";

/// Error type for board loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Board path does not exist: {0}")]
    PathNotFound(std::path::PathBuf),

    #[error("Board manifest not found: {0}")]
    ManifestNotFound(std::path::PathBuf),

    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse board config: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Entity collections stored as JSON arrays in the board directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Horses,
    Feeds,
    Diet,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Horses => "horses.json",
            Collection::Feeds => "feeds.json",
            Collection::Diet => "diet.json",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "horses.json" => Some(Collection::Horses),
            "feeds.json" => Some(Collection::Feeds),
            "diet.json" => Some(Collection::Diet),
            _ => None,
        }
    }
}

/// Board manifest file name
pub const MANIFEST_FILE: &str = "board.toml";

/// Board loader
pub struct BoardLoader;

impl BoardLoader {
    /// Load a board from the given path
    pub async fn load(path: impl AsRef<Path>) -> Result<Board, LoadError> {
        let path = path.as_ref();

        // Check path exists
        if !path.exists() {
            return Err(LoadError::PathNotFound(path.to_path_buf()));
        }

        info!("Loading board from: {}", path.display());

        let manifest = Self::load_manifest(path).await?;
        info!("Loaded board manifest: {} ({})", manifest.board.name, manifest.board.id);

        let horses = Self::load_horses(path).await?;
        let feeds = Self::load_feeds(path).await?;
        let diet = Self::load_diet(path).await?;
        info!(
            "Loaded {} horses, {} feeds, {} diet entries",
            horses.len(),
            feeds.len(),
            diet.len()
        );

        Ok(Board {
            path: path.to_path_buf(),
            manifest,
            horses,
            feeds,
            diet,
        })
    }

    /// Load board.toml, with `FEEDBOARD_` environment variables layered on top
    ///
    /// Nested keys use a double underscore, e.g. `FEEDBOARD_DISPLAY__PAGE_SIZE=6`.
    pub async fn load_manifest(board_path: &Path) -> Result<BoardManifest, LoadError> {
        let manifest_path = board_path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(LoadError::ManifestNotFound(manifest_path));
        }

        let content = fs::read_to_string(&manifest_path).await?;
        let manifest: BoardManifest = Figment::new()
            .merge(Toml::string(&content))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(manifest)
    }

    pub async fn load_horses(board_path: &Path) -> Result<Vec<Horse>, LoadError> {
        Self::load_collection(board_path, Collection::Horses).await
    }

    pub async fn load_feeds(board_path: &Path) -> Result<Vec<Feed>, LoadError> {
        Self::load_collection(board_path, Collection::Feeds).await
    }

    pub async fn load_diet(board_path: &Path) -> Result<Vec<DietEntry>, LoadError> {
        Self::load_collection(board_path, Collection::Diet).await
    }

    /// Load one JSON array; a missing file is an empty collection
    async fn load_collection<T: DeserializeOwned>(
        board_path: &Path,
        collection: Collection,
    ) -> Result<Vec<T>, LoadError> {
        let path = board_path.join(collection.file_name());

        if !path.exists() {
            debug!("No {} found", collection.file_name());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let items: Vec<T> = serde_json::from_str(&content)?;
        debug!("Loaded {} items from {}", items.len(), collection.file_name());
        Ok(items)
    }
}
