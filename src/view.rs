/// Shared-canvas resolution across frames.
pub mod extent;
/// Per-frame viewing transforms.
pub mod transform;
