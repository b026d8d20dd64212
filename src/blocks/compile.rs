use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;

use crate::{
    assets::{AssetSource, Texture},
    blocks::model::{Face, RawBlock, RawBlockDefinitions, RawElement},
    foundation::core::BlockKey,
    foundation::error::{BlockturnError, BlockturnResult},
};

/// One drawable face with its resolved texture.
#[derive(Clone, Debug)]
pub struct CompiledFace {
    /// Which side of the box.
    pub face: Face,
    /// Texture id as written in the definition.
    pub texture_id: String,
    /// Resolved texture.
    pub texture: Arc<Texture>,
}

/// One box of a compiled model.
#[derive(Clone, Debug)]
pub struct CompiledElement {
    /// Minimum corner in block units.
    pub from: DVec3,
    /// Maximum corner in block units.
    pub to: DVec3,
    /// Faces to draw.
    pub faces: Vec<CompiledFace>,
}

impl CompiledElement {
    /// The 8 box corners.
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.from, self.to);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }
}

/// Renderable block model.
#[derive(Clone, Debug)]
pub struct CompiledBlock {
    /// Display name.
    pub name: String,
    /// Boxes in definition order.
    pub elements: Vec<CompiledElement>,
}

/// Lookup table from block key to renderable model.
#[derive(Clone, Debug, Default)]
pub struct BlockDefinitionTable {
    exact: HashMap<BlockKey, Arc<CompiledBlock>>,
    any_data: HashMap<u16, Arc<CompiledBlock>>,
}

impl BlockDefinitionTable {
    /// Find the model for `key`: an exact `(id, data)` entry wins over the id-wide entry.
    pub fn lookup(&self, key: BlockKey) -> Option<Arc<CompiledBlock>> {
        self.exact
            .get(&key)
            .or_else(|| self.any_data.get(&key.id))
            .cloned()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.exact.len() + self.any_data.len()
    }

    /// Return `true` when the table has no definitions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compile raw definitions into a lookup table, resolving every texture through `assets`.
#[tracing::instrument(skip_all, fields(assets = assets.name(), blocks = raw.blocks.len()))]
pub fn compile(
    assets: &dyn AssetSource,
    raw: &RawBlockDefinitions,
) -> BlockturnResult<BlockDefinitionTable> {
    let mut textures = TextureCache {
        assets,
        resolved: HashMap::new(),
    };
    let mut table = BlockDefinitionTable::default();

    for block in &raw.blocks {
        let compiled = Arc::new(compile_block(block, &mut textures)?);
        let duplicate = match block.data {
            Some(data) => table
                .exact
                .insert(BlockKey::new(block.id, data), compiled)
                .is_some(),
            None => table.any_data.insert(block.id, compiled).is_some(),
        };
        if duplicate {
            return Err(BlockturnError::validation(format!(
                "duplicate definition for block {}{}",
                block.id,
                block.data.map(|d| format!(":{d}")).unwrap_or_default()
            )));
        }
    }

    tracing::debug!(
        definitions = table.len(),
        textures = textures.resolved.len(),
        "compiled block definitions"
    );
    Ok(table)
}

struct TextureCache<'a> {
    assets: &'a dyn AssetSource,
    resolved: HashMap<String, Arc<Texture>>,
}

impl TextureCache<'_> {
    fn get(&mut self, id: &str) -> BlockturnResult<Option<Arc<Texture>>> {
        if let Some(tex) = self.resolved.get(id) {
            return Ok(Some(tex.clone()));
        }
        let Some(tex) = self.assets.resolve(id)? else {
            return Ok(None);
        };
        let tex = Arc::new(tex);
        self.resolved.insert(id.to_string(), tex.clone());
        Ok(Some(tex))
    }
}

fn compile_block(
    block: &RawBlock,
    textures: &mut TextureCache<'_>,
) -> BlockturnResult<CompiledBlock> {
    if block.elements.is_empty() {
        return Err(BlockturnError::validation(format!(
            "block {} ('{}') has no elements",
            block.id, block.name
        )));
    }
    let elements = block
        .elements
        .iter()
        .enumerate()
        .map(|(i, el)| compile_element(block, i, el, textures))
        .collect::<BlockturnResult<Vec<_>>>()?;
    Ok(CompiledBlock {
        name: block.name.clone(),
        elements,
    })
}

fn compile_element(
    block: &RawBlock,
    index: usize,
    el: &RawElement,
    textures: &mut TextureCache<'_>,
) -> BlockturnResult<CompiledElement> {
    let from = DVec3::from_array(el.from);
    let to = DVec3::from_array(el.to);
    if !from.is_finite() || !to.is_finite() || from.cmpgt(to).any() {
        return Err(BlockturnError::validation(format!(
            "block '{}' element {index}: from {:?} must be <= to {:?}",
            block.name, el.from, el.to
        )));
    }

    let faces = el.expanded_faces();
    if faces.is_empty() {
        return Err(BlockturnError::validation(format!(
            "block '{}' element {index} has no faces",
            block.name
        )));
    }

    let faces = faces
        .into_iter()
        .map(|(face, id)| {
            let texture = textures.get(id)?.ok_or_else(|| {
                BlockturnError::asset(format!(
                    "block '{}' references texture '{id}' which no asset source defines",
                    block.name
                ))
            })?;
            Ok(CompiledFace {
                face,
                texture_id: id.to_string(),
                texture,
            })
        })
        .collect::<BlockturnResult<Vec<_>>>()?;

    Ok(CompiledElement { from, to, faces })
}

#[cfg(test)]
#[path = "../../tests/unit/blocks/compile.rs"]
mod tests;
