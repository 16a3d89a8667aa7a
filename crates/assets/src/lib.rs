//! Asset requests and their resolution.
//!
//! Every requested resource gets an explicit status (pending, ready or
//! failed) instead of a completion callback. The session resolves all
//! pending requests before its first tick, so gameplay never runs against a
//! half-loaded scene.
//!
//! # Failure policy
//! A failed load is recorded on its entry and logged; callers continue
//! without the asset and fall back to configured defaults.

mod loader;
mod mesh;

pub use mesh::mesh_bounds_from_slice;
pub use loader::{AssetLoader, FileLoader};

use labyrinth_common::Aabb;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Content-addressed asset ID computed from the request kind and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// What kind of resource a request names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Mesh,
    Texture,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Texture => "texture",
            Self::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// A named resource to load, e.g. `models/RobotExpressive.glb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRequest {
    pub path: String,
    pub kind: AssetKind,
}

impl AssetRequest {
    pub fn mesh(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Mesh,
        }
    }

    pub fn texture(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Texture,
        }
    }

    pub fn audio(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Audio,
        }
    }

    /// Content-addressed id: the same kind and path always map to the same id.
    pub fn id(&self) -> AssetId {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.path.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// In-memory result of a successful load. Only the data the game core
/// consumes is kept: the mesh's local bounds and the payload size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedAsset {
    pub request: AssetRequest,
    /// Local-space bounds for meshes; `None` for textures and audio.
    pub bounds: Option<Aabb>,
    pub byte_len: u64,
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load {path}: {reason}")]
    LoadFailure { path: String, reason: String },
    #[error("asset not found: {0:?}")]
    NotFound(AssetId),
    #[error("unsupported asset format: {path}")]
    Unsupported { path: String },
}

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
enum Entry {
    Pending(AssetRequest),
    Ready(LoadedAsset),
    Failed { request: AssetRequest, reason: String },
}

/// Outcome of one [`AssetStore::resolve_pending`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// `(path, reason)` for every request that failed this pass.
    pub failed: Vec<(String, String)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry of requested assets keyed by content-addressed id.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    entries: BTreeMap<AssetId, Entry>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Requesting the same resource twice returns the same
    /// id and does not reset an already resolved entry.
    pub fn request(&mut self, request: AssetRequest) -> AssetId {
        let id = request.id();
        self.entries.entry(id).or_insert_with(|| {
            tracing::debug!(path = %request.path, kind = %request.kind, "asset requested");
            Entry::Pending(request)
        });
        id
    }

    /// Load every pending request with `loader`, best-effort.
    ///
    /// Failures are recorded on their entry and logged at `warn`; the pass
    /// always visits every pending request.
    pub fn resolve_pending<L: AssetLoader + ?Sized>(&mut self, loader: &L) -> LoadReport {
        let _span = tracing::info_span!("resolve_assets").entered();
        let mut report = LoadReport::default();

        for entry in self.entries.values_mut() {
            let Entry::Pending(request) = entry else {
                continue;
            };
            let request = request.clone();
            match loader.load(&request) {
                Ok(asset) => {
                    tracing::debug!(path = %request.path, bytes = asset.byte_len, "asset loaded");
                    report.loaded += 1;
                    *entry = Entry::Ready(asset);
                }
                Err(err) => {
                    let reason = err.to_string();
                    tracing::warn!(path = %request.path, %reason, "asset failed to load; continuing without it");
                    report.failed.push((request.path.clone(), reason.clone()));
                    *entry = Entry::Failed { request, reason };
                }
            }
        }

        tracing::info!(
            loaded = report.loaded,
            failed = report.failed.len(),
            "asset resolution complete"
        );
        report
    }

    pub fn status(&self, id: AssetId) -> Option<AssetStatus> {
        self.entries.get(&id).map(|e| match e {
            Entry::Pending(_) => AssetStatus::Pending,
            Entry::Ready(_) => AssetStatus::Ready,
            Entry::Failed { .. } => AssetStatus::Failed,
        })
    }

    pub fn is_ready(&self, id: AssetId) -> bool {
        self.status(id) == Some(AssetStatus::Ready)
    }

    /// Number of requests still waiting for a resolve pass.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, Entry::Pending(_)))
            .count()
    }

    /// The loaded asset, if its request resolved successfully.
    pub fn get(&self, id: AssetId) -> Option<&LoadedAsset> {
        match self.entries.get(&id) {
            Some(Entry::Ready(asset)) => Some(asset),
            _ => None,
        }
    }

    /// The request behind an id, whatever its status.
    pub fn request_for(&self, id: AssetId) -> Option<&AssetRequest> {
        self.entries.get(&id).map(|e| match e {
            Entry::Pending(r) => r,
            Entry::Ready(a) => &a.request,
            Entry::Failed { request, .. } => request,
        })
    }

    /// Why a request failed, if it did.
    pub fn failure(&self, id: AssetId) -> Option<&str> {
        match self.entries.get(&id) {
            Some(Entry::Failed { reason, .. }) => Some(reason),
            _ => None,
        }
    }

    /// Local bounds of a loaded mesh.
    pub fn mesh_bounds(&self, id: AssetId) -> Result<Aabb, AssetError> {
        self.get(id)
            .and_then(|a| a.bounds)
            .ok_or(AssetError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn crate_info() -> &'static str {
    "labyrinth-assets v0.1.0"
}
