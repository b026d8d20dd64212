use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{
    encode::{AnimationEncoder, AnimationSettings, ensure_parent_dir},
    foundation::error::{BlockturnError, BlockturnResult},
};

/// Shells out to ImageMagick's `convert`.
#[derive(Clone, Debug)]
pub struct ConvertEncoder {
    /// Program to run; `convert` by default.
    pub program: PathBuf,
}

impl Default for ConvertEncoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("convert"),
        }
    }
}

impl ConvertEncoder {
    /// Return `true` when the program can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Command line for `frames` and `settings`, excluding the program itself.
    pub fn args(frames: &[PathBuf], settings: &AnimationSettings, out: &Path) -> Vec<String> {
        let mut args = vec![
            "-delay".to_string(),
            settings.delay_cs.to_string(),
            "-dispose".to_string(),
            settings.disposal.convert_arg().to_string(),
        ];
        if settings.looping {
            args.extend(["-loop".to_string(), "0".to_string()]);
        }
        args.extend(frames.iter().map(|p| p.display().to_string()));
        args.push(out.display().to_string());
        args
    }
}

impl AnimationEncoder for ConvertEncoder {
    fn name(&self) -> &str {
        "convert"
    }

    #[tracing::instrument(skip_all, fields(frames = frames.len(), out = %out.display()))]
    fn encode(
        &self,
        frames: &[PathBuf],
        settings: &AnimationSettings,
        out: &Path,
    ) -> BlockturnResult<()> {
        if frames.is_empty() {
            return Err(BlockturnError::validation("no frames to encode"));
        }
        ensure_parent_dir(out)?;

        if !self.is_available() {
            return Err(BlockturnError::Other(anyhow::anyhow!(
                "'{}' is required for the convert encoder, but was not found on PATH",
                self.program.display()
            )));
        }

        let output = Command::new(&self.program)
            .args(Self::args(frames, settings, out))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                anyhow::anyhow!("failed to spawn '{}': {e}", self.program.display())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BlockturnError::Other(anyhow::anyhow!(
                "'{}' exited with status {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/convert.rs"]
mod tests;
