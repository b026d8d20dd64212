use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use glam::DVec3;

use crate::foundation::error::{BlockturnError, BlockturnResult};

const BUILTIN_JSON: &str = include_str!("builtin.json");

/// One face of an axis-aligned box. North is -Z, east is +X, up is +Y.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// -Y
    Down,
    /// +Y
    Up,
    /// -Z
    North,
    /// +Z
    South,
    /// -X
    West,
    /// +X
    East,
}

impl Face {
    /// Every face, in drawing-table order.
    pub const ALL: [Face; 6] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    /// Outward unit normal.
    pub fn normal(self) -> DVec3 {
        match self {
            Face::Down => DVec3::NEG_Y,
            Face::Up => DVec3::Y,
            Face::North => DVec3::NEG_Z,
            Face::South => DVec3::Z,
            Face::West => DVec3::NEG_X,
            Face::East => DVec3::X,
        }
    }

    /// Texture anchor corners of this face on the box `[from, to]`, seen from outside:
    /// `[top-left, top-right, bottom-left]`. The texture's u axis runs top-left -> top-right and
    /// its v axis runs top-left -> bottom-left.
    pub fn corners(self, from: DVec3, to: DVec3) -> [DVec3; 3] {
        let (x0, y0, z0) = (from.x, from.y, from.z);
        let (x1, y1, z1) = (to.x, to.y, to.z);
        let p = DVec3::new;
        match self {
            Face::Up => [p(x0, y1, z0), p(x1, y1, z0), p(x0, y1, z1)],
            Face::Down => [p(x0, y0, z1), p(x1, y0, z1), p(x0, y0, z0)],
            Face::North => [p(x1, y1, z0), p(x0, y1, z0), p(x1, y0, z0)],
            Face::South => [p(x0, y1, z1), p(x1, y1, z1), p(x0, y0, z1)],
            Face::West => [p(x0, y1, z0), p(x0, y1, z1), p(x0, y0, z0)],
            Face::East => [p(x1, y1, z1), p(x1, y1, z0), p(x1, y0, z1)],
        }
    }
}

/// Face selector in definition files: a single face or a shorthand group.
///
/// Specific faces override `side`/`end`, which override `all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceKey {
    /// Every face.
    All,
    /// North, south, west and east.
    Side,
    /// Up and down.
    End,
    /// -Y
    Down,
    /// +Y
    Up,
    /// -Z
    North,
    /// +Z
    South,
    /// -X
    West,
    /// +X
    East,
}

impl FaceKey {
    fn priority(self) -> u8 {
        match self {
            FaceKey::All => 0,
            FaceKey::Side | FaceKey::End => 1,
            _ => 2,
        }
    }

    fn covers(self, face: Face) -> bool {
        match self {
            FaceKey::All => true,
            FaceKey::Side => matches!(face, Face::North | Face::South | Face::West | Face::East),
            FaceKey::End => matches!(face, Face::Up | Face::Down),
            FaceKey::Down => face == Face::Down,
            FaceKey::Up => face == Face::Up,
            FaceKey::North => face == Face::North,
            FaceKey::South => face == Face::South,
            FaceKey::West => face == Face::West,
            FaceKey::East => face == Face::East,
        }
    }
}

/// Axis-aligned box in block units (a full block is `[0,0,0]..[1,1,1]`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawElement {
    /// Minimum corner.
    pub from: [f64; 3],
    /// Maximum corner.
    pub to: [f64; 3],
    /// Texture id per face selector.
    pub faces: BTreeMap<FaceKey, String>,
}

impl RawElement {
    /// Resolve face selectors into one texture id per drawn face.
    pub fn expanded_faces(&self) -> Vec<(Face, &str)> {
        Face::ALL
            .iter()
            .filter_map(|&face| {
                self.faces
                    .iter()
                    .filter(|(key, _)| key.covers(face))
                    .max_by_key(|(key, _)| key.priority())
                    .map(|(_, tex)| (face, tex.as_str()))
            })
            .collect()
    }
}

/// One block definition before texture resolution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBlock {
    /// Block type id.
    pub id: u16,
    /// Data value; `None` applies to every data value without an exact entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<u8>,
    /// Display name.
    pub name: String,
    /// Boxes making up the model.
    pub elements: Vec<RawElement>,
}

/// A set of block definitions as read from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBlockDefinitions {
    /// Definitions in file order.
    pub blocks: Vec<RawBlock>,
}

impl RawBlockDefinitions {
    /// Definitions shipped with the crate.
    pub fn builtin() -> BlockturnResult<Self> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Parse definitions from a JSON string.
    pub fn from_json(s: &str) -> BlockturnResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| BlockturnError::validation(format!("block definitions: {e}")))
    }

    /// Load definitions from a JSON file.
    pub fn from_path(path: &Path) -> BlockturnResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read block definitions '{}'", path.display()))?;
        Self::from_json(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blocks/model.rs"]
mod tests;
