use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::foundation::core::RenderedExtent;
use crate::render::{
    FrameRGBA,
    block::BlockRenderer,
    dispatch::{JobOutcome, NullObserver, RayonDispatcher, SerialDispatcher},
};

struct Solid {
    frame: FrameIndex,
    fail: bool,
}

impl BlockRenderer for Solid {
    fn frame(&self) -> FrameIndex {
        self.frame
    }

    fn rendered_extent(&self) -> RenderedExtent {
        RenderedExtent::new(0, 0, 2, 2)
    }

    fn render(&self, canvas: &CanvasSpec) -> BlockturnResult<FrameRGBA> {
        if self.fail {
            return Err(BlockturnError::validation(format!("cannot draw {}", self.frame.0)));
        }
        let shade = self.frame.0 as u8;
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: [shade, shade, shade, 255].repeat((canvas.width * canvas.height) as usize),
            premultiplied: true,
        })
    }
}

fn canvas() -> CanvasSpec {
    CanvasSpec {
        origin_x: 0,
        origin_y: 0,
        width: 2,
        height: 2,
    }
}

fn renderers(n: u32, failing: &[u32]) -> Vec<SharedRenderer> {
    (0..n)
        .map(|i| {
            Arc::new(Solid {
                frame: FrameIndex(i),
                fail: failing.contains(&i),
            }) as SharedRenderer
        })
        .collect()
}

/// Runs jobs last to first.
struct Reversing;

impl Dispatcher for Reversing {
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        _observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>> {
        Ok(jobs
            .iter()
            .rev()
            .map(|job| JobOutcome {
                index: job.index,
                result: job.execute(),
            })
            .collect())
    }
}

/// Claims success without producing any file contents.
struct Liar;

impl Dispatcher for Liar {
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        _observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>> {
        Ok(jobs
            .iter()
            .map(|job| {
                if job.index.0 == 1 {
                    std::fs::write(&job.path, b"").unwrap();
                } else if job.index.0 != 2 {
                    job.execute().unwrap();
                }
                JobOutcome {
                    index: job.index,
                    result: Ok(FrameArtifact {
                        index: job.index,
                        path: job.path.clone(),
                    }),
                }
            })
            .collect())
    }
}

struct Broken;

impl Dispatcher for Broken {
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        _observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>> {
        jobs[0].execute()?;
        Err(BlockturnError::validation("pool unavailable"))
    }
}

fn workdir() -> (tempfile::TempDir, WorkDir) {
    let parent = tempfile::tempdir().unwrap();
    let dir = WorkDir::create_in(parent.path()).unwrap();
    (parent, dir)
}

#[test]
fn writes_every_frame_at_its_index_path() {
    let (_parent, dir) = workdir();
    let root = dir.path().to_path_buf();
    let out = render_frames(
        canvas(),
        &renderers(6, &[]),
        dir,
        &RayonDispatcher { threads: Some(2) },
        &NullObserver,
    )
    .unwrap();

    assert_eq!(out.workdir.path(), root);
    assert_eq!(out.frames.len(), 6);
    for (i, artifact) in out.frames.iter().enumerate() {
        assert_eq!(artifact.index, FrameIndex(i as u32));
        assert_eq!(artifact.path, root.join(format!("frame_{i:03}.png")));
        assert!(std::fs::metadata(&artifact.path).unwrap().len() > 0);
    }
}

#[test]
fn completion_order_does_not_affect_mapping() {
    let (_parent, dir) = workdir();
    let out = render_frames(canvas(), &renderers(5, &[]), dir, &Reversing, &NullObserver).unwrap();
    for artifact in &out.frames {
        let img = image::open(&artifact.path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[0], artifact.index.0 as u8);
    }
    let indices: Vec<u32> = out.frames.iter().map(|a| a.index.0).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn failed_frames_are_listed_and_everything_is_removed() {
    let (_parent, dir) = workdir();
    let root = dir.path().to_path_buf();
    let err = render_frames(
        canvas(),
        &renderers(8, &[5, 2]),
        dir,
        &SerialDispatcher,
        &NullObserver,
    )
    .unwrap_err();

    match &err {
        BlockturnError::FrameRenderFailure { frames, message } => {
            assert_eq!(frames, &vec![FrameIndex(2), FrameIndex(5)]);
            assert!(message.contains("cannot draw 2"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.exists());
}

#[test]
fn empty_or_missing_files_count_as_failures() {
    let (_parent, dir) = workdir();
    let root = dir.path().to_path_buf();
    let err = render_frames(canvas(), &renderers(4, &[]), dir, &Liar, &NullObserver).unwrap_err();
    match err {
        BlockturnError::FrameRenderFailure { frames, .. } => {
            assert_eq!(frames, vec![FrameIndex(1), FrameIndex(2)]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.exists());
}

#[test]
fn dispatcher_error_propagates_after_cleanup() {
    let (_parent, dir) = workdir();
    let root = dir.path().to_path_buf();
    let err = render_frames(canvas(), &renderers(3, &[]), dir, &Broken, &NullObserver).unwrap_err();
    assert!(err.to_string().contains("pool unavailable"));
    assert!(!root.exists());
}

#[test]
fn duplicate_frame_indices_are_rejected() {
    let (_parent, dir) = workdir();
    let root: PathBuf = dir.path().to_path_buf();
    let mut rs = renderers(2, &[]);
    rs.push(rs[0].clone());
    let err = render_frames(canvas(), &rs, dir, &SerialDispatcher, &NullObserver).unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
    assert!(!root.exists());
}
