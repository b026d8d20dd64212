use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    blocks::compile::BlockDefinitionTable,
    encode::{
        AnimationEncoder, AnimationSettings,
        assemble::{AnimationSummary, assemble},
    },
    foundation::core::BlockKey,
    foundation::error::{BlockturnError, BlockturnResult},
    render::{
        block::{IsometricBlockRenderer, SharedRenderer},
        dispatch::{Dispatcher, ProgressObserver},
        orchestrate::render_frames,
        workdir::WorkDir,
    },
    view::{
        extent::resolve_canvas_for,
        transform::{DEFAULT_FRAMES, DEFAULT_SCALE, build_turntable, frame_specs},
    },
};

/// Options for one turntable render.
#[derive(Clone, Debug)]
pub struct TurntableOpts {
    pub block: BlockKey,
    pub frames: u32,
    /// Pixels per block unit.
    pub scale: f64,
    pub out_path: PathBuf,
    pub animation: AnimationSettings,
    /// Parent for the working directory; the system temp dir when `None`.
    pub workdir_parent: Option<PathBuf>,
}

impl Default for TurntableOpts {
    fn default() -> Self {
        Self {
            block: BlockKey::new(1, 0),
            frames: DEFAULT_FRAMES,
            scale: DEFAULT_SCALE,
            out_path: PathBuf::from("output.gif"),
            animation: AnimationSettings::default(),
            workdir_parent: None,
        }
    }
}

/// Render `opts.block` through a full turn and write the animation to `opts.out_path`.
///
/// Canvas resolution happens before any directory is created or any job is dispatched, so an
/// empty turntable fails without side effects.
#[tracing::instrument(skip_all, fields(block = %opts.block, frames = opts.frames))]
pub fn render_turntable(
    opts: &TurntableOpts,
    blocks: &BlockDefinitionTable,
    dispatcher: &dyn Dispatcher,
    observer: &dyn ProgressObserver,
    encoder: &dyn AnimationEncoder,
) -> BlockturnResult<AnimationSummary> {
    if !opts.scale.is_finite() || opts.scale <= 0.0 {
        return Err(BlockturnError::validation(format!(
            "scale must be a positive number, got {}",
            opts.scale
        )));
    }

    let transforms = build_turntable(opts.frames, opts.scale);
    let renderers = frame_specs(opts.block, transforms)
        .into_iter()
        .map(|spec| {
            IsometricBlockRenderer::new(spec, blocks).map(|r| Arc::new(r) as SharedRenderer)
        })
        .collect::<BlockturnResult<Vec<_>>>()?;

    let canvas = resolve_canvas_for(&renderers)?;
    tracing::info!(
        width = canvas.width,
        height = canvas.height,
        "rendering {} frames",
        renderers.len()
    );

    let workdir = match &opts.workdir_parent {
        Some(parent) => WorkDir::create_in(parent)?,
        None => WorkDir::create()?,
    };
    let rendered = render_frames(canvas, &renderers, workdir, dispatcher, observer)?;

    assemble(
        &rendered.frames,
        &opts.animation,
        encoder,
        &opts.out_path,
        rendered.workdir,
    )
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
