use std::fs::File;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context as _;

use crate::{
    assets::decode::{decode_texture, normalize_texture_id},
    assets::{AssetSource, Texture},
    foundation::error::{BlockturnError, BlockturnResult},
};

/// Texture directories probed inside a resource pack, in order.
const TEXTURE_DIRS: &[&str] = &["assets/minecraft/textures/blocks", "textures/blocks", ""];

/// Resource pack unpacked on disk. Texture `id` resolves to `<dir>/<id>.png`.
#[derive(Clone, Debug)]
pub struct DirAssetPack {
    root: PathBuf,
    name: String,
}

impl DirAssetPack {
    /// Open a pack rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> BlockturnResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(BlockturnError::asset(format!(
                "asset pack '{}' is not a directory",
                root.display()
            )));
        }
        let name = root.display().to_string();
        Ok(Self { root, name })
    }

    /// Pack root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, id: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let file = format!("{id}.png");
        TEXTURE_DIRS
            .iter()
            .map(move |dir| self.root.join(dir).join(&file))
    }
}

impl AssetSource for DirAssetPack {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, texture_id: &str) -> BlockturnResult<Option<Texture>> {
        let id = normalize_texture_id(texture_id)?;
        let Some(path) = self.candidates(&id).find(|p| p.is_file()) else {
            return Ok(None);
        };
        let bytes =
            std::fs::read(&path).with_context(|| format!("read texture '{}'", path.display()))?;
        let tex = decode_texture(&bytes).map_err(|e| {
            BlockturnError::asset(format!("texture '{}': {e}", path.display()))
        })?;
        tracing::trace!(id = %id, path = %path.display(), "resolved texture from pack");
        Ok(Some(tex))
    }
}

/// Zipped resource pack. Texture `id` resolves to the first `<dir>/<id>.png` entry found.
pub struct ZipAssetPack {
    archive: Mutex<zip::ZipArchive<File>>,
    name: String,
}

impl std::fmt::Debug for ZipAssetPack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipAssetPack")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ZipAssetPack {
    /// Open the zip archive at `path` and read its central directory.
    pub fn open(path: impl AsRef<Path>) -> BlockturnResult<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("open asset pack '{}'", path.display()))?;
        let archive = zip::ZipArchive::new(file).map_err(|e| {
            BlockturnError::asset(format!("asset pack '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), entries = archive.len(), "opened zip asset pack");
        Ok(Self {
            archive: Mutex::new(archive),
            name: path.display().to_string(),
        })
    }

    fn read_entry(&self, entry: &str) -> BlockturnResult<Option<Vec<u8>>> {
        let mut archive = self
            .archive
            .lock()
            .map_err(|_| BlockturnError::asset(format!("asset pack '{}' is poisoned", self.name)))?;
        let mut file = match archive.by_name(entry) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(BlockturnError::asset(format!(
                    "{}: entry '{entry}': {e}",
                    self.name
                )));
            }
        };
        let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut bytes)
            .with_context(|| format!("read '{entry}' from '{}'", self.name))?;
        Ok(Some(bytes))
    }
}

impl AssetSource for ZipAssetPack {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, texture_id: &str) -> BlockturnResult<Option<Texture>> {
        let id = normalize_texture_id(texture_id)?;
        for dir in TEXTURE_DIRS {
            let entry = if dir.is_empty() {
                format!("{id}.png")
            } else {
                format!("{dir}/{id}.png")
            };
            let Some(bytes) = self.read_entry(&entry)? else {
                continue;
            };
            let tex = decode_texture(&bytes).map_err(|e| {
                BlockturnError::asset(format!("texture '{entry}' in '{}': {e}", self.name))
            })?;
            tracing::trace!(id = %id, entry = %entry, "resolved texture from zip pack");
            return Ok(Some(tex));
        }
        Ok(None)
    }
}

/// Open a resource pack at `path`: a directory is read as-is, a file as a zip archive.
pub fn open_resource_pack(path: impl AsRef<Path>) -> BlockturnResult<Arc<dyn AssetSource>> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Arc::new(DirAssetPack::open(path)?))
    } else if path.is_file() {
        Ok(Arc::new(ZipAssetPack::open(path)?))
    } else {
        Err(BlockturnError::asset(format!(
            "asset pack '{}' does not exist",
            path.display()
        )))
    }
}

/// Layered asset source: later layers override earlier ones for every id they define.
#[derive(Clone, Default)]
pub struct CompositeAssetPack {
    layers: Vec<Arc<dyn AssetSource>>,
}

impl std::fmt::Debug for CompositeAssetPack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|l| l.name()))
            .finish()
    }
}

impl CompositeAssetPack {
    /// Build from layers ordered base first, overlays last.
    pub fn new(layers: Vec<Arc<dyn AssetSource>>) -> Self {
        Self { layers }
    }

    /// Add an overlay on top of the current layers.
    pub fn with_overlay(mut self, overlay: Arc<dyn AssetSource>) -> Self {
        self.layers.push(overlay);
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl AssetSource for CompositeAssetPack {
    fn name(&self) -> &str {
        "composite"
    }

    fn resolve(&self, texture_id: &str) -> BlockturnResult<Option<Texture>> {
        for layer in self.layers.iter().rev() {
            if let Some(tex) = layer.resolve(texture_id)? {
                return Ok(Some(tex));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pack.rs"]
mod tests;
