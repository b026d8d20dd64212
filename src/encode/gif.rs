use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::{AnimationEncoder, AnimationSettings, Disposal, ensure_parent_dir},
    foundation::error::{BlockturnError, BlockturnResult},
};

/// In-process GIF writer built on the `gif` crate.
#[derive(Clone, Copy, Debug)]
pub struct GifEncoder {
    /// NeuQuant speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifEncoder {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl GifEncoder {
    fn validate(&self) -> BlockturnResult<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(BlockturnError::validation(format!(
                "gif quantizer speed must be in 1..=30, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

fn disposal_method(d: Disposal) -> ::gif::DisposalMethod {
    match d {
        Disposal::Keep => ::gif::DisposalMethod::Keep,
        Disposal::Background => ::gif::DisposalMethod::Background,
        Disposal::Previous => ::gif::DisposalMethod::Previous,
    }
}

fn read_rgba(path: &Path) -> BlockturnResult<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("read frame '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

impl AnimationEncoder for GifEncoder {
    fn name(&self) -> &str {
        "gif"
    }

    #[tracing::instrument(skip_all, fields(frames = frames.len(), out = %out.display()))]
    fn encode(
        &self,
        frames: &[PathBuf],
        settings: &AnimationSettings,
        out: &Path,
    ) -> BlockturnResult<()> {
        self.validate()?;
        let Some(first) = frames.first() else {
            return Err(BlockturnError::validation("no frames to encode"));
        };

        let first = read_rgba(first)?;
        let (width, height) = first.dimensions();
        let w: u16 = width
            .try_into()
            .map_err(|_| BlockturnError::validation("gif width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| BlockturnError::validation("gif height exceeds u16"))?;

        // Stage next to `out` so a failed encode never touches an existing file.
        ensure_parent_dir(out)?;
        let dir = match out.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".blockturn-")
            .suffix(".gif.part")
            .tempfile_in(dir)
            .with_context(|| format!("stage output in '{}'", dir.display()))?;
        let mut encoder = ::gif::Encoder::new(BufWriter::new(staged), w, h, &[])
            .map_err(|e| anyhow::anyhow!("gif header: {e}"))?;
        if settings.looping {
            encoder
                .set_repeat(::gif::Repeat::Infinite)
                .map_err(|e| anyhow::anyhow!("gif loop extension: {e}"))?;
        }

        let mut pending = Some(first);
        for (i, path) in frames.iter().enumerate() {
            let img = match pending.take() {
                Some(img) => img,
                None => read_rgba(path)?,
            };
            if img.dimensions() != (width, height) {
                return Err(BlockturnError::validation(format!(
                    "frame {i} is {}x{}, expected {width}x{height}",
                    img.width(),
                    img.height()
                )));
            }

            let mut rgba = img.into_raw();
            let mut frame = ::gif::Frame::from_rgba_speed(w, h, &mut rgba, self.speed);
            frame.delay = settings.delay_cs;
            frame.dispose = disposal_method(settings.disposal);
            encoder
                .write_frame(&frame)
                .map_err(|e| anyhow::anyhow!("gif frame {i}: {e}"))?;
        }

        let staged = encoder
            .into_inner()
            .map_err(|e| anyhow::anyhow!("gif trailer: {e}"))?
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("flush '{}'", out.display()))?;
        staged
            .persist(out)
            .with_context(|| format!("write '{}'", out.display()))?;
        tracing::debug!(frames = frames.len(), width, height, "wrote gif");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
