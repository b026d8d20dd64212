/// Single-block rasterization.
pub mod block;
/// Frame destinations and written artifacts.
pub mod canvas;
/// Job dispatchers and progress observers.
pub mod dispatch;
/// Batch rendering of a full turntable into frame files.
pub mod orchestrate;
/// Temporary working directory ownership.
pub mod workdir;

/// One rendered frame as RGBA8 pixels, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
    /// Whether colour channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha in place. No-op when already straight.
    pub fn into_straight_alpha(mut self) -> Self {
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }

    /// Return `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}
