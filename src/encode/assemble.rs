use std::path::{Path, PathBuf};

use crate::{
    encode::{AnimationEncoder, AnimationSettings},
    foundation::core::FrameIndex,
    foundation::error::{BlockturnError, BlockturnResult},
    render::{canvas::FrameArtifact, workdir::WorkDir},
};

/// What was written by [`assemble`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationSummary {
    pub path: PathBuf,
    pub frame_count: usize,
    pub delay_cs: u16,
    pub looping: bool,
}

/// Mux `frames` into `out` and reclaim the working directory.
///
/// `frames` must be exactly `0..N-1` in order; otherwise the frames and directory are removed
/// before the validation error is returned. When the encoder fails, every frame file and the
/// directory stay on disk and the error names the directory.
#[tracing::instrument(skip_all, fields(frames = frames.len(), encoder = encoder.name(), out = %out.display()))]
pub fn assemble(
    frames: &[FrameArtifact],
    settings: &AnimationSettings,
    encoder: &dyn AnimationEncoder,
    out: &Path,
    workdir: WorkDir,
) -> BlockturnResult<AnimationSummary> {
    let paths: Vec<PathBuf> = frames.iter().map(|f| f.path.clone()).collect();
    if let Err(e) = check_order(frames) {
        reclaim(workdir, &paths);
        return Err(e);
    }

    if let Err(e) = encoder.encode(&paths, settings, out) {
        let workdir = workdir.into_path();
        tracing::warn!(path = %workdir.display(), "keeping frames after mux failure");
        return Err(BlockturnError::mux(
            workdir,
            format!("{} encoder: {e}", encoder.name()),
        ));
    }

    reclaim(workdir, &paths);

    let summary = AnimationSummary {
        path: out.to_path_buf(),
        frame_count: frames.len(),
        delay_cs: settings.delay_cs,
        looping: settings.looping,
    };
    tracing::info!(path = %out.display(), frames = summary.frame_count, "animation written");
    Ok(summary)
}

fn check_order(frames: &[FrameArtifact]) -> BlockturnResult<()> {
    if frames.is_empty() {
        return Err(BlockturnError::validation("no frames to assemble"));
    }
    for (i, frame) in frames.iter().enumerate() {
        if frame.index != FrameIndex(i as u32) {
            return Err(BlockturnError::validation(format!(
                "frame at position {i} has index {}; frames must be ordered 0..{}",
                frame.index.0,
                frames.len() - 1
            )));
        }
    }
    Ok(())
}

/// Best-effort removal of `paths` and then the directory itself.
fn reclaim(workdir: WorkDir, paths: &[PathBuf]) {
    let failed = workdir.remove_files(paths.iter().map(PathBuf::as_path));
    if failed > 0 {
        tracing::warn!(failed, "some frame files could not be removed");
    }
    let dir = workdir.path().to_path_buf();
    if let Err(e) = workdir.remove() {
        tracing::warn!(path = %dir.display(), error = %e, "failed to remove working directory");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assemble.rs"]
mod tests;
