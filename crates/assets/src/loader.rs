use std::path::{Path, PathBuf};

use crate::mesh::mesh_bounds_from_slice;
use crate::{AssetError, AssetKind, AssetRequest, LoadedAsset};

/// Resolves one request into its in-memory form.
///
/// Implementations are synchronous; [`crate::AssetStore::resolve_pending`]
/// drives them before the first frame.
pub trait AssetLoader {
    fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError>;
}

/// Loads requests relative to a root directory on disk.
///
/// Meshes must be `.gltf` or `.glb`; only their bounds are extracted.
/// Textures and audio are checked for presence and size, decoding is left to
/// the host.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_mesh(&self, request: &AssetRequest, full: &Path) -> Result<LoadedAsset, AssetError> {
        let ext = full
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !matches!(ext.as_deref(), Some("gltf" | "glb")) {
            return Err(AssetError::Unsupported {
                path: request.path.clone(),
            });
        }
        let bytes = std::fs::read(full)?;
        let bounds = mesh_bounds_from_slice(&bytes, &request.path)?;
        Ok(LoadedAsset {
            request: request.clone(),
            bounds: Some(bounds),
            byte_len: bytes.len() as u64,
        })
    }
}

impl AssetLoader for FileLoader {
    fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError> {
        let full = self.root.join(&request.path);
        tracing::trace!(path = %full.display(), kind = %request.kind, "loading asset");
        match request.kind {
            AssetKind::Mesh => self.load_mesh(request, &full),
            AssetKind::Texture | AssetKind::Audio => {
                let meta = std::fs::metadata(&full)?;
                if !meta.is_file() {
                    return Err(AssetError::LoadFailure {
                        path: request.path.clone(),
                        reason: "not a regular file".into(),
                    });
                }
                Ok(LoadedAsset {
                    request: request.clone(),
                    bounds: None,
                    byte_len: meta.len(),
                })
            }
        }
    }
}
