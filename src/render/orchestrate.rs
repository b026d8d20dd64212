use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::{CanvasSpec, FrameIndex},
    foundation::error::{BlockturnError, BlockturnResult},
    render::{
        block::SharedRenderer,
        canvas::{FrameArtifact, FrameCanvas, frame_path},
        dispatch::{Dispatcher, ProgressObserver},
        workdir::WorkDir,
    },
};

/// Frame files produced by a successful batch, sorted by index, and the directory holding them.
#[derive(Debug)]
pub struct RenderedFrames {
    pub workdir: WorkDir,
    pub frames: Vec<FrameArtifact>,
}

/// Render every frame onto the shared `canvas` and write it into `workdir`.
///
/// All jobs go to the dispatcher in one batch. On any failure the frame files written so far and
/// the directory are removed, and the error lists every failed frame.
#[tracing::instrument(skip_all, fields(frames = renderers.len(), workdir = %workdir.path().display()))]
pub fn render_frames(
    canvas: CanvasSpec,
    renderers: &[SharedRenderer],
    workdir: WorkDir,
    dispatcher: &dyn Dispatcher,
    observer: &dyn ProgressObserver,
) -> BlockturnResult<RenderedFrames> {
    let mut seen = BTreeSet::new();
    for r in renderers {
        if !seen.insert(r.frame()) {
            let err = BlockturnError::validation(format!(
                "frame {} is bound to more than one renderer",
                r.frame().0
            ));
            discard(workdir, &[]);
            return Err(err);
        }
    }

    let jobs: Vec<FrameCanvas> = renderers
        .iter()
        .map(|r| FrameCanvas {
            index: r.frame(),
            canvas,
            renderer: r.clone(),
            path: frame_path(workdir.path(), r.frame()),
        })
        .collect();

    let outcomes = match dispatcher.dispatch_all(&jobs, observer) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            discard(workdir, &jobs);
            return Err(e);
        }
    };

    let mut by_index = BTreeMap::new();
    for outcome in outcomes {
        if by_index.insert(outcome.index, outcome.result).is_some() {
            tracing::warn!(frame = outcome.index.0, "dispatcher reported a frame twice");
        }
    }

    let mut frames = Vec::with_capacity(jobs.len());
    let mut failures: Vec<(FrameIndex, String)> = Vec::new();
    for job in &jobs {
        match by_index.remove(&job.index) {
            None => failures.push((job.index, "dispatcher reported no outcome".to_string())),
            Some(Err(e)) => failures.push((job.index, e.to_string())),
            Some(Ok(artifact)) => match check_artifact(job, &artifact) {
                Ok(()) => frames.push(artifact),
                Err(msg) => failures.push((job.index, msg)),
            },
        }
    }
    for index in by_index.keys() {
        tracing::warn!(frame = index.0, "dispatcher reported a frame that was never submitted");
    }

    if !failures.is_empty() {
        failures.sort_by_key(|(index, _)| *index);
        let message = failures
            .iter()
            .map(|(index, msg)| format!("frame {}: {msg}", index.0))
            .collect::<Vec<_>>()
            .join("; ");
        let indices = failures.into_iter().map(|(index, _)| index).collect();
        discard(workdir, &jobs);
        return Err(BlockturnError::frame_render(indices, message));
    }

    frames.sort_by_key(|a| a.index);
    tracing::debug!(frames = frames.len(), "all frames rendered");
    Ok(RenderedFrames { workdir, frames })
}

fn check_artifact(job: &FrameCanvas, artifact: &FrameArtifact) -> Result<(), String> {
    if artifact.index != job.index || artifact.path != job.path {
        return Err(format!(
            "artifact {} at '{}' does not match the submitted job",
            artifact.index.0,
            artifact.path.display()
        ));
    }
    match std::fs::metadata(&artifact.path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        Ok(_) => Err(format!("'{}' is empty", artifact.path.display())),
        Err(e) => Err(format!("'{}' is missing: {e}", artifact.path.display())),
    }
}

fn discard(workdir: WorkDir, jobs: &[FrameCanvas]) {
    let failed = workdir.remove_files(jobs.iter().map(|j| j.path.as_path()));
    if failed > 0 {
        tracing::warn!(failed, "some frame files could not be removed");
    }
    let path = workdir.path().to_path_buf();
    if let Err(e) = workdir.remove() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove working directory");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrate.rs"]
mod tests;
