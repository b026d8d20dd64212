use glam::{DAffine3, DVec3};

use crate::foundation::core::{BlockKey, FrameIndex, Point};

/// Reference projection size: one block unit spans this many pixels before rotation.
pub const DEFAULT_SCALE: f64 = 500.0;

/// Reference frame count for one full turn.
pub const DEFAULT_FRAMES: u32 = 60;

/// Isometric tilt about X: looks straight down a cube's space diagonal (~35.26 degrees).
pub fn isometric_tilt() -> f64 {
    1.0f64.atan2(2.0f64.sqrt())
}

/// One affine operation in a [`ViewTransform`]. Angles are radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    /// Uniform scale.
    Scale(f64),
    /// Rotation about the X axis.
    RotateX(f64),
    /// Rotation about the Y axis.
    RotateY(f64),
    /// Rotation about the Z axis.
    RotateZ(f64),
    /// Translation.
    Translate(DVec3),
}

impl TransformOp {
    fn affine(self) -> DAffine3 {
        match self {
            Self::Scale(s) => DAffine3::from_scale(DVec3::splat(s)),
            Self::RotateX(a) => DAffine3::from_rotation_x(a),
            Self::RotateY(a) => DAffine3::from_rotation_y(a),
            Self::RotateZ(a) => DAffine3::from_rotation_z(a),
            Self::Translate(t) => DAffine3::from_translation(t),
        }
    }
}

/// Ordered composition of affine operations mapping block-local space into projection space.
///
/// Composition is `op_0 * op_1 * ... * op_k`: each new operation acts in the coordinate frame
/// left by the ones before it, so the last composed op is the first applied to a point.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
    ops: Vec<TransformOp>,
    matrix: DAffine3,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    /// Empty composition.
    pub fn identity() -> Self {
        Self {
            ops: Vec::new(),
            matrix: DAffine3::IDENTITY,
        }
    }

    /// Append one operation.
    pub fn then(mut self, op: TransformOp) -> Self {
        self.matrix = self.matrix * op.affine();
        self.ops.push(op);
        self
    }

    /// Append a uniform scale.
    pub fn scale(self, s: f64) -> Self {
        self.then(TransformOp::Scale(s))
    }

    /// Append a rotation about X.
    pub fn rotate_x(self, radians: f64) -> Self {
        self.then(TransformOp::RotateX(radians))
    }

    /// Append a rotation about Y.
    pub fn rotate_y(self, radians: f64) -> Self {
        self.then(TransformOp::RotateY(radians))
    }

    /// Append a rotation about Z.
    pub fn rotate_z(self, radians: f64) -> Self {
        self.then(TransformOp::RotateZ(radians))
    }

    /// Append a translation.
    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        self.then(TransformOp::Translate(DVec3::new(x, y, z)))
    }

    /// Operations in composition order.
    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    /// Turntable angle in degrees: the first Y rotation composed after the tilt, if any.
    pub fn turntable_degrees(&self) -> Option<f64> {
        self.ops
            .iter()
            .skip_while(|op| !matches!(op, TransformOp::RotateX(_)))
            .find_map(|op| match op {
                TransformOp::RotateY(a) => Some(a.to_degrees()),
                _ => None,
            })
    }

    /// Composed matrix.
    pub fn matrix(&self) -> DAffine3 {
        self.matrix
    }

    /// Map a block-local point to projection space.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.matrix.transform_point3(p)
    }

    /// Map a block-local direction (translation ignored).
    pub fn transform_vector(&self, v: DVec3) -> DVec3 {
        self.matrix.transform_vector3(v)
    }

    /// Project to screen space (y down) and return the depth; larger depth is nearer the viewer.
    pub fn project_point(&self, p: DVec3) -> (Point, f64) {
        let q = self.transform_point(p);
        (Point::new(q.x, -q.y), q.z)
    }
}

/// Per-frame turntable step in whole degrees: `floor(360 / frames)`.
///
/// When `frames` does not divide 360 the last frame's gap back to frame 0 is wider than the
/// others. Zero frames yields a step of 0.
pub fn turntable_step_degrees(frames: u32) -> u32 {
    if frames == 0 { 0 } else { 360 / frames }
}

/// Turntable angle of every frame in degrees.
pub fn turntable_angles(frames: u32) -> Vec<u32> {
    let step = turntable_step_degrees(frames);
    (0..frames).map(|i| i * step).collect()
}

/// Reference isometric view with the block turned `degrees` about the vertical axis.
pub fn turntable_transform(degrees: u32, scale: f64) -> ViewTransform {
    let quarter = 45.0f64.to_radians();
    ViewTransform::identity()
        .scale(scale)
        .rotate_x(isometric_tilt())
        .rotate_y(f64::from(degrees).to_radians())
        .rotate_x(quarter)
        .rotate_y(quarter)
        .translate(-0.5, -0.5, -0.5)
}

/// Build one transform per frame for a full turn.
pub fn build_turntable(frames: u32, scale: f64) -> Vec<ViewTransform> {
    turntable_angles(frames)
        .into_iter()
        .map(|deg| turntable_transform(deg, scale))
        .collect()
}

/// Everything needed to render one frame. Created before rendering, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSpec {
    /// Frame ordinal.
    pub index: FrameIndex,
    /// Block being rendered.
    pub block: BlockKey,
    /// View for this frame.
    pub transform: ViewTransform,
}

/// Pair each transform with the block and its frame index.
pub fn frame_specs(block: BlockKey, transforms: Vec<ViewTransform>) -> Vec<FrameSpec> {
    transforms
        .into_iter()
        .enumerate()
        .map(|(i, transform)| FrameSpec {
            index: FrameIndex(i as u32),
            block,
            transform,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/view/transform.rs"]
mod tests;
