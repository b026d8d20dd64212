use crate::{
    foundation::core::{CanvasSpec, RenderedExtent},
    foundation::error::{BlockturnError, BlockturnResult},
    render::block::SharedRenderer,
};

/// Unify per-frame extents into one canvas shared by every frame.
///
/// Fails with `InvalidExtent` when there are no extents, when any extent has `min > max` on an
/// axis, or when the union covers no pixels at all.
#[tracing::instrument(skip(extents), fields(frames = extents.len()))]
pub fn resolve_canvas(extents: &[RenderedExtent]) -> BlockturnResult<CanvasSpec> {
    let Some((first, rest)) = extents.split_first() else {
        return Err(BlockturnError::invalid_extent("no frames to unify"));
    };

    for (i, e) in extents.iter().enumerate() {
        if !e.is_well_formed() {
            return Err(BlockturnError::invalid_extent(format!(
                "frame {i} reported malformed extent {e:?}"
            )));
        }
    }

    let unified = rest.iter().fold(*first, |acc, e| acc.union(*e));
    let canvas = CanvasSpec {
        origin_x: unified.min_x,
        origin_y: unified.min_y,
        width: unified.width(),
        height: unified.height(),
    };
    if canvas.width == 0 || canvas.height == 0 {
        return Err(BlockturnError::invalid_extent(format!(
            "unified extent {unified:?} covers no pixels"
        )));
    }

    tracing::debug!(?canvas, "resolved shared canvas");
    Ok(canvas)
}

/// Query every renderer for its extent, then unify.
pub fn resolve_canvas_for(renderers: &[SharedRenderer]) -> BlockturnResult<CanvasSpec> {
    let extents: Vec<RenderedExtent> = renderers.iter().map(|r| r.rendered_extent()).collect();
    resolve_canvas(&extents)
}

#[cfg(test)]
#[path = "../../tests/unit/view/extent.rs"]
mod tests;
