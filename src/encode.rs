use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BlockturnError, BlockturnResult};

/// Frame sequence to animation muxing with cleanup.
pub mod assemble;
/// ImageMagick `convert` subprocess encoder.
pub mod convert;
/// In-process GIF encoder.
pub mod gif;

/// What happens to a frame's area before the next frame is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposal {
    /// Leave the frame in place.
    Keep,
    /// Clear to the background.
    #[default]
    Background,
    /// Restore what was there before the frame.
    Previous,
}

impl Disposal {
    /// ImageMagick `-dispose` argument.
    pub fn convert_arg(self) -> &'static str {
        match self {
            Disposal::Keep => "None",
            Disposal::Background => "Background",
            Disposal::Previous => "Previous",
        }
    }
}

/// Playback settings for the assembled animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSettings {
    /// Per-frame delay in hundredths of a second.
    pub delay_cs: u16,
    pub disposal: Disposal,
    /// Loop forever when set; play once otherwise.
    pub looping: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            delay_cs: 5,
            disposal: Disposal::Background,
            looping: true,
        }
    }
}

/// Muxes an ordered list of frame images into one animation file.
pub trait AnimationEncoder {
    fn name(&self) -> &str;

    /// Write `frames`, in the given order, to `out`.
    fn encode(
        &self,
        frames: &[PathBuf],
        settings: &AnimationSettings,
        out: &Path,
    ) -> BlockturnResult<()>;
}

/// Encoder selection as exposed on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EncoderKind {
    #[default]
    Gif,
    Convert,
}

impl EncoderKind {
    pub fn create(self) -> Box<dyn AnimationEncoder> {
        match self {
            EncoderKind::Gif => Box::new(self::gif::GifEncoder::default()),
            EncoderKind::Convert => Box::new(self::convert::ConvertEncoder::default()),
        }
    }
}

impl std::str::FromStr for EncoderKind {
    type Err = BlockturnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gif" => Ok(EncoderKind::Gif),
            "convert" => Ok(EncoderKind::Convert),
            other => Err(BlockturnError::validation(format!(
                "unknown encoder '{other}' (expected 'gif' or 'convert')"
            ))),
        }
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> BlockturnResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/encode/settings.rs"]
mod tests;
