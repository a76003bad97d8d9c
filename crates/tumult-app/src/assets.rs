//! Asset loader boundary.
//!
//! Loads raw asset bytes from a root directory. Every entry of a batch is
//! attempted; failures are collected and reported once as an aggregate
//! error while the assets that did load stay available. Background loads
//! are tagged with the session generation that requested them so a load
//! that outlives its session is dropped instead of merged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use tumult_core::enums::SoundId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Texture,
    Model,
    Audio,
}

/// One entry of an asset list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub id: String,
    pub kind: AssetKind,
    /// Relative to the loader root.
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {id}: cannot read {}: {source}", .path.display())]
    Io {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {id}: {} is empty", .path.display())]
    Empty { id: String, path: PathBuf },
    #[error("{} of {total} assets failed to load", .failed.len())]
    LoadFailed { failed: Vec<AssetError>, total: usize },
    #[error("background asset load for session {generation} was interrupted")]
    Interrupted { generation: u64 },
}

#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub kind: AssetKind,
    pub bytes: Vec<u8>,
}

/// The default list: one audio clip per sound effect.
pub fn default_manifest() -> Vec<AssetDefinition> {
    SoundId::ALL
        .iter()
        .map(|id| AssetDefinition {
            id: id.as_str().to_string(),
            kind: AssetKind::Audio,
            path: PathBuf::from("sounds").join(format!("{}.mp3", id.as_str())),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
    assets: HashMap<String, LoadedAsset>,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assets: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every entry. Successful entries are stored even when others
    /// fail.
    pub fn load_all(&mut self, list: &[AssetDefinition]) -> Result<(), AssetError> {
        let (loaded, result) = load_batch(&self.root, list);
        self.assets.extend(loaded);
        result
    }

    /// Start loading `list` on a worker thread on behalf of session
    /// `generation`.
    pub fn load_in_background(
        &self,
        list: Vec<AssetDefinition>,
        generation: u64,
    ) -> std::io::Result<PendingLoad> {
        let root = self.root.clone();
        let handle = std::thread::Builder::new()
            .name(format!("tumult-assets-{generation}"))
            .spawn(move || load_batch(&root, &list))?;
        debug!(generation, "background asset load started");
        Ok(PendingLoad { generation, handle })
    }

    /// Wait for a background load and merge it if it still belongs to the
    /// current session. Returns `Ok(false)` when the result was stale and
    /// discarded.
    pub fn finish(
        &mut self,
        pending: PendingLoad,
        current_generation: u64,
    ) -> Result<bool, AssetError> {
        let generation = pending.generation;
        let (loaded, result) = pending
            .handle
            .join()
            .map_err(|_| AssetError::Interrupted { generation })?;
        if generation != current_generation {
            debug!(
                generation,
                current_generation, "discarding assets loaded for a torn-down session"
            );
            return Ok(false);
        }
        self.assets.extend(loaded);
        result.map(|()| true)
    }

    pub fn get(&self, id: &str) -> Option<&LoadedAsset> {
        self.assets.get(id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Loaded assets of one kind, sorted by id.
    pub fn of_kind(&self, kind: AssetKind) -> Vec<(&str, &LoadedAsset)> {
        let mut assets: Vec<_> = self
            .assets
            .iter()
            .filter(|(_, asset)| asset.kind == kind)
            .map(|(id, asset)| (id.as_str(), asset))
            .collect();
        assets.sort_by(|a, b| a.0.cmp(b.0));
        assets
    }

    /// Drop everything loaded so far.
    pub fn release(&mut self) {
        self.assets.clear();
    }
}

/// A background load in flight.
pub struct PendingLoad {
    generation: u64,
    handle: JoinHandle<(Vec<(String, LoadedAsset)>, Result<(), AssetError>)>,
}

impl PendingLoad {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn load_batch(
    root: &Path,
    list: &[AssetDefinition],
) -> (Vec<(String, LoadedAsset)>, Result<(), AssetError>) {
    let mut loaded = Vec::with_capacity(list.len());
    let mut failed = Vec::new();
    for definition in list {
        match load_one(root, definition) {
            Ok(asset) => loaded.push((definition.id.clone(), asset)),
            Err(err) => {
                warn!(error = %err, "asset failed to load");
                failed.push(err);
            }
        }
    }
    info!(loaded = loaded.len(), failed = failed.len(), "asset batch done");

    let result = if failed.is_empty() {
        Ok(())
    } else {
        Err(AssetError::LoadFailed {
            failed,
            total: list.len(),
        })
    };
    (loaded, result)
}

fn load_one(root: &Path, definition: &AssetDefinition) -> Result<LoadedAsset, AssetError> {
    let path = root.join(&definition.path);
    let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
        id: definition.id.clone(),
        path: path.clone(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(AssetError::Empty {
            id: definition.id.clone(),
            path,
        });
    }
    Ok(LoadedAsset {
        kind: definition.kind,
        bytes,
    })
}
