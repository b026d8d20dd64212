use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::Texture,
    foundation::error::{BlockturnError, BlockturnResult},
    foundation::math::premultiply_rgba8_in_place,
};

pub(crate) fn decode_texture(bytes: &[u8]) -> BlockturnResult<Texture> {
    let dyn_img = image::load_from_memory(bytes).context("decode texture from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(BlockturnError::asset("texture has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Texture {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Normalize and validate pack-relative texture ids.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_texture_id(id: &str) -> BlockturnResult<String> {
    let s = id.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BlockturnError::asset("texture ids must be relative"));
    }
    if s.is_empty() {
        return Err(BlockturnError::asset("texture id must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BlockturnError::asset("texture ids must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BlockturnError::asset("texture id must contain a name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
