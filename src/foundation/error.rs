use std::path::PathBuf;

use crate::foundation::core::FrameIndex;

/// Convenience result type used across blockturn.
pub type BlockturnResult<T> = Result<T, BlockturnError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum BlockturnError {
    /// Invalid user-provided options or block definitions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Texture resolution or decoding failed.
    #[error("asset error: {0}")]
    Asset(String),

    /// Renderer extents were missing or malformed; nothing was rendered.
    #[error("invalid extent: {0}")]
    InvalidExtent(String),

    /// One or more frame jobs failed during dispatch.
    #[error("frame render failure (frames {}): {message}", format_frames(.frames))]
    FrameRenderFailure {
        /// Failed frame indices, ascending.
        frames: Vec<FrameIndex>,
        /// Per-frame failure messages, joined.
        message: String,
    },

    /// The animation encoder failed; intermediate frames were kept.
    #[error("mux failure: {message} (frames preserved in '{}')", .workdir.display())]
    MuxFailure {
        /// Working directory still holding the frame files.
        workdir: PathBuf,
        /// Encoder error message.
        message: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlockturnError {
    /// Build a [`BlockturnError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlockturnError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`BlockturnError::InvalidExtent`] value.
    pub fn invalid_extent(msg: impl Into<String>) -> Self {
        Self::InvalidExtent(msg.into())
    }

    /// Build a [`BlockturnError::FrameRenderFailure`] value.
    pub fn frame_render(frames: Vec<FrameIndex>, msg: impl Into<String>) -> Self {
        Self::FrameRenderFailure {
            frames,
            message: msg.into(),
        }
    }

    /// Build a [`BlockturnError::MuxFailure`] value.
    pub fn mux(workdir: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MuxFailure {
            workdir: workdir.into(),
            message: msg.into(),
        }
    }
}

fn format_frames(frames: &[FrameIndex]) -> String {
    frames
        .iter()
        .map(|f| f.0.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
