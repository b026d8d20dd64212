use std::sync::Arc;

use crate::{
    assets::Texture,
    blocks::compile::{BlockDefinitionTable, CompiledBlock},
    blocks::model::Face,
    foundation::core::{CanvasSpec, FrameIndex, Point, Rect, RenderedExtent},
    foundation::error::{BlockturnError, BlockturnResult},
    render::FrameRGBA,
    view::transform::FrameSpec,
};

/// Largest nearest-neighbour upscale applied to a texture before it is sampled.
const MAX_TEXEL_UPSCALE: u32 = 16;

/// Renders one block under one fixed transform.
pub trait BlockRenderer: Send + Sync {
    /// Frame this renderer is bound to.
    fn frame(&self) -> FrameIndex;

    /// Screen-space pixel rectangle this renderer draws into.
    fn rendered_extent(&self) -> RenderedExtent;

    /// Draw into a fresh buffer of `canvas` size. Screen point `p` lands on pixel
    /// `p - canvas.origin()`.
    fn render(&self, canvas: &CanvasSpec) -> BlockturnResult<FrameRGBA>;
}

/// Renderer handle shared between the extent resolver and the dispatch jobs.
pub type SharedRenderer = Arc<dyn BlockRenderer>;

#[derive(Clone, Debug)]
struct ProjectedFace {
    face: Face,
    texture: Arc<Texture>,
    // Screen-space anchors: [top-left, top-right, bottom-left].
    anchors: [Point; 3],
    depth: f64,
}

/// Orthographic renderer for compiled block models.
///
/// Projection happens once at construction: faces pointing away from the viewer are culled and the
/// rest are kept sorted back to front, so `render` only paints.
#[derive(Clone, Debug)]
pub struct IsometricBlockRenderer {
    spec: FrameSpec,
    model: Arc<CompiledBlock>,
    faces: Vec<ProjectedFace>,
    extent: RenderedExtent,
}

impl IsometricBlockRenderer {
    /// Bind `spec` to its model in `table`.
    pub fn new(spec: FrameSpec, table: &BlockDefinitionTable) -> BlockturnResult<Self> {
        let model = table.lookup(spec.block).ok_or_else(|| {
            BlockturnError::validation(format!("no definition for block {}", spec.block))
        })?;
        Self::with_model(spec, model)
    }

    /// Bind `spec` to an already resolved model.
    pub fn with_model(spec: FrameSpec, model: Arc<CompiledBlock>) -> BlockturnResult<Self> {
        let extent = project_extent(&spec, &model)?;
        let faces = project_faces(&spec, &model);
        Ok(Self {
            spec,
            model,
            faces,
            extent,
        })
    }

    /// Frame description this renderer was built from.
    pub fn spec(&self) -> &FrameSpec {
        &self.spec
    }

    /// Model being drawn.
    pub fn model(&self) -> &CompiledBlock {
        &self.model
    }

    /// Faces that survive culling, in paint order.
    pub fn visible_faces(&self) -> Vec<Face> {
        self.faces.iter().map(|f| f.face).collect()
    }
}

impl BlockRenderer for IsometricBlockRenderer {
    fn frame(&self) -> FrameIndex {
        self.spec.index
    }

    fn rendered_extent(&self) -> RenderedExtent {
        self.extent
    }

    #[tracing::instrument(skip(self, canvas), fields(frame = self.spec.index.0))]
    fn render(&self, canvas: &CanvasSpec) -> BlockturnResult<FrameRGBA> {
        let (w, h) = canvas.size_u16()?;
        if w == 0 || h == 0 {
            return Err(BlockturnError::validation(format!(
                "canvas {}x{} has no pixels",
                canvas.width, canvas.height
            )));
        }

        let origin = canvas.origin();
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());

        for face in &self.faces {
            draw_face(&mut ctx, face, origin)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Brightness multiplier per face direction, out of 255.
fn face_shade(face: Face) -> u16 {
    match face {
        Face::Up => 255,
        Face::North | Face::South => 204,
        Face::West | Face::East => 153,
        Face::Down => 128,
    }
}

fn project_extent(spec: &FrameSpec, model: &CompiledBlock) -> BlockturnResult<RenderedExtent> {
    let mut bounds: Option<Rect> = None;
    for el in &model.elements {
        for corner in el.corners() {
            let (p, _) = spec.transform.project_point(corner);
            let r = Rect::from_points(p, p);
            bounds = Some(bounds.map_or(r, |b| b.union(r)));
        }
    }
    let bounds = bounds.ok_or_else(|| {
        BlockturnError::invalid_extent(format!(
            "frame {}: model '{}' has no vertices",
            spec.index.0, model.name
        ))
    })?;
    RenderedExtent::from_rect(bounds)
}

fn project_faces(spec: &FrameSpec, model: &CompiledBlock) -> Vec<ProjectedFace> {
    let mut out = Vec::new();
    for el in &model.elements {
        for f in &el.faces {
            if spec.transform.transform_vector(f.face.normal()).z <= 0.0 {
                continue;
            }
            let corners = f.face.corners(el.from, el.to);
            let projected = corners.map(|c| spec.transform.project_point(c));
            let anchors = projected.map(|(p, _)| p);
            let (u, v) = (anchors[1] - anchors[0], anchors[2] - anchors[0]);
            if u.cross(v).abs() < 1e-9 {
                // Zero-thickness side of a flat element.
                continue;
            }
            let far_corner = corners[1] + (corners[2] - corners[0]);
            let (_, far_depth) = spec.transform.project_point(far_corner);
            let depth = (projected.iter().map(|(_, z)| *z).sum::<f64>() + far_depth) / 4.0;
            out.push(ProjectedFace {
                face: f.face,
                texture: f.texture.clone(),
                anchors,
                depth,
            });
        }
    }
    // Larger depth is nearer the viewer, so paint ascending.
    out.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    out
}

fn draw_face(
    ctx: &mut vello_cpu::RenderContext,
    face: &ProjectedFace,
    origin: Point,
) -> BlockturnResult<()> {
    let [tl, tr, bl] = face.anchors;
    let edge = (tr - tl).hypot().max((bl - tl).hypot());
    let tex_edge = f64::from(face.texture.width.max(face.texture.height));
    let factor = ((edge / tex_edge).ceil() as u32).clamp(1, MAX_TEXEL_UPSCALE);

    let pixmap = shaded_pixmap(&face.texture, face_shade(face.face), factor)?;
    let w = f64::from(pixmap.width());
    let h = f64::from(pixmap.height());

    let u = tr - tl;
    let v = bl - tl;
    ctx.set_transform(vello_cpu::kurbo::Affine::new([
        u.x / w,
        u.y / w,
        v.x / h,
        v.y / h,
        tl.x - origin.x,
        tl.y - origin.y,
    ]));
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    Ok(())
}

/// Texture darkened by `shade`/255 and upscaled by `factor` with nearest-neighbour sampling, so
/// the renderer's bilinear filter keeps texel edges crisp.
fn shaded_pixmap(tex: &Texture, shade: u16, factor: u32) -> BlockturnResult<vello_cpu::Pixmap> {
    let width = tex.width * factor;
    let height = tex.height * factor;
    let w: u16 = width
        .try_into()
        .map_err(|_| BlockturnError::asset(format!("texture width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BlockturnError::asset(format!("texture height {height} exceeds u16")))?;
    if tex.rgba8_premul.len() != tex.width as usize * tex.height as usize * 4 {
        return Err(BlockturnError::asset("texture byte length mismatch"));
    }

    let darken = |c: u8| crate::foundation::math::mul_div255_u16(u16::from(c), shade) as u8;
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let row = (y / factor) as usize * tex.width as usize;
        for x in 0..width {
            let i = (row + (x / factor) as usize) * 4;
            let px = &tex.rgba8_premul[i..i + 4];
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: darken(px[0]),
                g: darken(px[1]),
                b: darken(px[2]),
                a: px[3],
            });
        }
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/block.rs"]
mod tests;
