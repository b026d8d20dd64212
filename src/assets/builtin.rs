//! Deterministic procedural textures so blocks render without an external resource pack.

use std::sync::Arc;

use crate::{
    assets::{AssetSource, Texture},
    foundation::error::BlockturnResult,
    foundation::math::{hash_texel, premultiply_rgba8_in_place},
};

/// Texture edge length in pixels.
pub const TEXTURE_SIZE: u32 = 16;

#[derive(Clone, Copy, Debug)]
enum Pattern {
    /// Base colour with per-texel brightness noise.
    Noise,
    /// Horizontal boards separated by dark seams.
    Planks,
    /// Vertical bark grain.
    Bark,
    /// Concentric rings.
    Rings,
    /// Staggered bricks with mortar lines.
    Bricks,
    /// Irregular rounded stones.
    Cobble,
    /// Dirt with a grass fringe along the top rows.
    GrassSide,
    /// Mostly transparent pane with an opaque frame.
    Glass,
}

struct Swatch {
    id: &'static str,
    rgb: [u8; 3],
    noise: u8,
    pattern: Pattern,
}

const fn sw(id: &'static str, rgb: [u8; 3], noise: u8, pattern: Pattern) -> Swatch {
    Swatch {
        id,
        rgb,
        noise,
        pattern,
    }
}

const SWATCHES: &[Swatch] = &[
    sw("stone", [125, 125, 125], 24, Pattern::Noise),
    sw("dirt", [134, 96, 67], 30, Pattern::Noise),
    sw("grass_top", [106, 170, 64], 28, Pattern::Noise),
    sw("grass_side", [134, 96, 67], 30, Pattern::GrassSide),
    sw("cobblestone", [122, 122, 122], 20, Pattern::Cobble),
    sw("planks_oak", [162, 130, 78], 14, Pattern::Planks),
    sw("planks_spruce", [114, 84, 48], 14, Pattern::Planks),
    sw("planks_birch", [196, 179, 123], 12, Pattern::Planks),
    sw("planks_jungle", [160, 115, 80], 14, Pattern::Planks),
    sw("bedrock", [85, 85, 85], 60, Pattern::Noise),
    sw("sand", [219, 207, 163], 16, Pattern::Noise),
    sw("gravel", [136, 126, 126], 48, Pattern::Cobble),
    sw("log_oak", [102, 81, 50], 16, Pattern::Bark),
    sw("log_oak_top", [176, 143, 90], 10, Pattern::Rings),
    sw("log_spruce", [58, 37, 17], 14, Pattern::Bark),
    sw("log_spruce_top", [133, 101, 60], 10, Pattern::Rings),
    sw("log_birch", [216, 215, 210], 20, Pattern::Bark),
    sw("log_birch_top", [193, 176, 122], 10, Pattern::Rings),
    sw("glass", [200, 230, 240], 6, Pattern::Glass),
    sw("bricks", [150, 74, 58], 18, Pattern::Bricks),
    sw("stonebrick", [122, 121, 122], 14, Pattern::Bricks),
    sw("wool_white", [233, 236, 236], 10, Pattern::Noise),
    sw("wool_orange", [240, 118, 19], 10, Pattern::Noise),
    sw("wool_red", [160, 39, 34], 10, Pattern::Noise),
];

/// Built-in asset pack covering the ids referenced by the built-in block definitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAssetPack;

impl BuiltinAssetPack {
    /// Create the pack.
    pub fn new() -> Self {
        Self
    }

    /// All texture ids this pack defines.
    pub fn texture_ids() -> impl Iterator<Item = &'static str> {
        SWATCHES.iter().map(|s| s.id)
    }
}

impl AssetSource for BuiltinAssetPack {
    fn name(&self) -> &str {
        "builtin"
    }

    fn resolve(&self, texture_id: &str) -> BlockturnResult<Option<Texture>> {
        Ok(SWATCHES
            .iter()
            .find(|s| s.id == texture_id)
            .map(paint_swatch))
    }
}

fn paint_swatch(swatch: &Swatch) -> Texture {
    let n = TEXTURE_SIZE;
    let mut bytes = vec![0u8; (n * n * 4) as usize];
    for y in 0..n {
        for x in 0..n {
            let idx = ((y * n + x) * 4) as usize;
            let (rgb, alpha) = texel(swatch, x, y);
            bytes[idx..idx + 3].copy_from_slice(&rgb);
            bytes[idx + 3] = alpha;
        }
    }
    premultiply_rgba8_in_place(&mut bytes);
    Texture {
        width: n,
        height: n,
        rgba8_premul: Arc::new(bytes),
    }
}

fn texel(swatch: &Swatch, x: u32, y: u32) -> ([u8; 3], u8) {
    let h = hash_texel(swatch.id, x, y);
    let jitter = (h % (u32::from(swatch.noise) * 2 + 1)) as i32 - i32::from(swatch.noise);
    let n = TEXTURE_SIZE;

    let (shade, alpha): (i32, u8) = match swatch.pattern {
        Pattern::Noise => (jitter, 255),
        Pattern::Planks => {
            let seam = y % 4 == 3 || (y / 4 % 2 == 0 && x == 7) || (y / 4 % 2 == 1 && x == 15);
            (if seam { jitter - 40 } else { jitter / 2 }, 255)
        }
        Pattern::Bark => {
            let groove = (x + (h >> 8) % 2) % 4 == 0;
            (if groove { jitter - 30 } else { jitter }, 255)
        }
        Pattern::Rings => {
            let dx = x as i32 * 2 - (n as i32 - 1);
            let dy = y as i32 * 2 - (n as i32 - 1);
            let ring = (dx * dx + dy * dy) as f64;
            let r = ring.sqrt() as i32;
            if r >= n as i32 - 2 {
                (jitter - 60, 255)
            } else {
                (if r % 6 < 2 { jitter - 25 } else { jitter / 2 }, 255)
            }
        }
        Pattern::Bricks => {
            let row = y / 4;
            let offset = if row % 2 == 0 { 0 } else { 4 };
            let mortar = y % 4 == 3 || (x + offset) % 8 == 0;
            if mortar {
                return ([168, 164, 160], 255);
            }
            (jitter, 255)
        }
        Pattern::Cobble => {
            let cell = hash_texel(swatch.id, x / 4, y / 3) % 3;
            let edge = x % 4 == 0 || y % 3 == 0;
            (if edge { jitter - 45 } else { jitter + cell as i32 * 12 - 12 }, 255)
        }
        Pattern::GrassSide => {
            let fringe = 3 + (hash_texel("grass_fringe", x, 0) % 2);
            if y < fringe {
                let g = [106i32, 170, 64].map(|c| (c + jitter).clamp(0, 255) as u8);
                return (g, 255);
            }
            (jitter, 255)
        }
        Pattern::Glass => {
            let frame = x == 0 || y == 0 || x == n - 1 || y == n - 1;
            let glint = x + y == 6 || x + y == 8;
            if frame {
                (jitter, 255)
            } else if glint {
                (40, 140)
            } else {
                (jitter, 48)
            }
        }
    };

    let rgb = swatch
        .rgb
        .map(|c| (i32::from(c) + shade).clamp(0, 255) as u8);
    (rgb, alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/builtin.rs"]
mod tests;
