//! blockturn renders a single voxel block as a looping turntable animation.
//!
//! The pipeline is leaf-first:
//!
//! - build one viewing transform per frame ([`build_turntable`])
//! - bind each transform to a [`BlockRenderer`] and resolve one shared canvas ([`resolve_canvas`])
//! - render every frame to a PNG in a scratch directory ([`render_frames`])
//! - mux the frames into an animation and reclaim the directory ([`assemble`])
//!
//! [`render_turntable`] wires these together for one invocation.
#![forbid(unsafe_code)]

mod foundation;

/// Texture sources.
pub mod assets;
/// Block definitions and their compiled form.
pub mod blocks;
/// Animation encoders and the frame assembler.
pub mod encode;
/// End-to-end turntable rendering.
pub mod pipeline;
/// Per-frame rendering, dispatch and orchestration.
pub mod render;
/// Viewing transforms and canvas resolution.
pub mod view;

pub use crate::foundation::core::{
    BlockKey, CanvasSpec, FrameIndex, Point, Rect, RenderedExtent,
};
pub use crate::foundation::error::{BlockturnError, BlockturnResult};

pub use crate::assets::builtin::BuiltinAssetPack;
pub use crate::assets::pack::{CompositeAssetPack, DirAssetPack, ZipAssetPack, open_resource_pack};
pub use crate::assets::{AssetSource, Texture};
pub use crate::blocks::compile::{BlockDefinitionTable, compile};
pub use crate::blocks::model::RawBlockDefinitions;
pub use crate::encode::assemble::{AnimationSummary, assemble};
pub use crate::encode::convert::ConvertEncoder;
pub use crate::encode::gif::GifEncoder;
pub use crate::encode::{AnimationEncoder, AnimationSettings, Disposal, EncoderKind};
pub use crate::pipeline::{TurntableOpts, render_turntable};
pub use crate::render::FrameRGBA;
pub use crate::render::block::{BlockRenderer, IsometricBlockRenderer, SharedRenderer};
pub use crate::render::canvas::{FrameArtifact, FrameCanvas};
pub use crate::render::dispatch::{
    Dispatcher, JobOutcome, LogObserver, NullObserver, ProgressBarObserver, ProgressObserver,
    RayonDispatcher, RenderThreading, SerialDispatcher,
};
pub use crate::render::orchestrate::{RenderedFrames, render_frames};
pub use crate::render::workdir::WorkDir;
pub use crate::view::extent::{resolve_canvas, resolve_canvas_for};
pub use crate::view::transform::{FrameSpec, ViewTransform, build_turntable};
