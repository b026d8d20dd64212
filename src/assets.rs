use std::sync::Arc;

use crate::foundation::error::BlockturnResult;

/// Procedural textures compiled into the binary.
pub mod builtin;
pub(crate) mod decode;
/// Directory and layered asset packs.
pub mod pack;

/// Decoded texture in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Texture {
    /// Return `true` when any texel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).any(|px| px[3] != 255)
    }
}

/// Source of block textures keyed by texture id (for example `"stone"` or `"log_oak_top"`).
///
/// `Ok(None)` means the source does not define the id, which lets layered sources fall back.
pub trait AssetSource: Send + Sync {
    /// Human-readable source name for diagnostics.
    fn name(&self) -> &str;

    /// Resolve one texture id.
    fn resolve(&self, texture_id: &str) -> BlockturnResult<Option<Texture>>;
}
