use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::{CanvasSpec, FrameIndex},
    foundation::error::{BlockturnError, BlockturnResult},
    render::block::SharedRenderer,
};

/// A frame file written to disk. Ordered by `index`, never by file name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameArtifact {
    pub index: FrameIndex,
    pub path: PathBuf,
}

/// One render job: a renderer bound to the shared canvas and its output path.
#[derive(Clone)]
pub struct FrameCanvas {
    pub index: FrameIndex,
    pub canvas: CanvasSpec,
    pub renderer: SharedRenderer,
    pub path: PathBuf,
}

impl std::fmt::Debug for FrameCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCanvas")
            .field("index", &self.index)
            .field("canvas", &self.canvas)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FrameCanvas {
    /// Render the frame and write it as a PNG at `path`.
    pub fn execute(&self) -> BlockturnResult<FrameArtifact> {
        if self.renderer.frame() != self.index {
            return Err(BlockturnError::validation(format!(
                "canvas for frame {} was bound to the renderer of frame {}",
                self.index.0,
                self.renderer.frame().0
            )));
        }

        let frame = self.renderer.render(&self.canvas)?.into_straight_alpha();
        if (frame.width, frame.height) != (self.canvas.width, self.canvas.height) {
            return Err(BlockturnError::validation(format!(
                "frame {} rendered {}x{}, canvas is {}x{}",
                self.index.0, frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        write_png(&self.path, &frame.data, frame.width, frame.height)?;

        Ok(FrameArtifact {
            index: self.index,
            path: self.path.clone(),
        })
    }
}

/// Canonical frame file name inside a working directory.
pub fn frame_path(dir: &Path, index: FrameIndex) -> PathBuf {
    dir.join(format!("frame_{:03}.png", index.0))
}

fn write_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> BlockturnResult<()> {
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
