//! Test doubles for the drawing surface, the GL context, the text
//! rasterizer and randomness.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::bitmap::{GlyphBitmap, GlyphRasterizer, TextStyle};
use crate::color::Rgba;
use crate::entropy::Entropy;
use crate::shader::{GpuContext, ShaderStage, UniformValue};
use crate::surface::{BlendMode, GradientStop, StrokeStyle, Surface};

/// Returns the same sample forever.
#[derive(Debug, Clone, Copy)]
pub struct ConstEntropy(pub f32);

impl Entropy for ConstEntropy {
    fn unit(&mut self) -> f32 {
        self.0
    }
}

/// Cycles through a fixed list of samples.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    samples: Vec<f32>,
    next: usize,
}

impl ScriptedEntropy {
    pub fn new(samples: Vec<f32>) -> Self {
        assert!(!samples.is_empty(), "scripted entropy needs samples");
        Self { samples, next: 0 }
    }
}

impl Entropy for ScriptedEntropy {
    fn unit(&mut self) -> f32 {
        let v = self.samples[self.next % self.samples.len()];
        self.next += 1;
        v
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize(u32, u32),
    Blend(BlendMode),
    Alpha(f32),
    Fill(Rgba),
    Stroke { points: Vec<Vec2>, style: StrokeStyle },
    Radial { center: Vec2, radius: f32 },
    Blit { origin: Vec2, columns: u32 },
}

/// Surface that only records what was asked of it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|&op| pred(op)).count()
    }

    /// Column counts of every blit, in order.
    pub fn blits(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Blit { columns, .. } => Some(*columns),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(DrawOp::Resize(width, height));
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.ops.push(DrawOp::Blend(mode));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Fill(color));
    }

    fn stroke_path(&mut self, points: &[Vec2], style: &StrokeStyle) {
        self.ops.push(DrawOp::Stroke {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, _color: Rgba, _stops: &[GradientStop]) {
        self.ops.push(DrawOp::Radial { center, radius });
    }

    fn blit_columns(&mut self, _bitmap: &GlyphBitmap, origin: Vec2, columns: u32) {
        self.ops.push(DrawOp::Blit { origin, columns });
    }
}

/// Opaque black bitmap with the listed `(x, y)` pixels inked in the default
/// logo color. Out-of-range pixels are skipped.
pub fn ink_column_bitmap(width: u32, height: u32, ink: &[(u32, u32)]) -> GlyphBitmap {
    paint(width, height, Rgba::rgb(0xcd, 0x96, 0xfe), ink)
}

fn paint(width: u32, height: u32, color: Rgba, ink: &[(u32, u32)]) -> GlyphBitmap {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..width as usize * height as usize {
        pixels.extend_from_slice(&[0, 0, 0, 255]);
    }
    for &(x, y) in ink {
        if x >= width || y >= height {
            continue;
        }
        let i = (y as usize * width as usize + x as usize) * 4;
        pixels[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
    }
    GlyphBitmap::new(width, height, pixels)
}

/// Draws every non-space character as a rectangle outline in a fixed-advance
/// cell (`0.6 × size`), mimicking a stroke-only text render.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRasterizer;

impl BlockRasterizer {
    pub const ADVANCE: f32 = 0.6;
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&self, style: &TextStyle, _surface_width: u32, _surface_height: u32) -> GlyphBitmap {
        if style.is_blank() {
            return GlyphBitmap::empty();
        }
        let copy = style.padded_text();
        let advance = style.size * Self::ADVANCE;
        let width = (copy.chars().count() as f32 * advance).ceil() as u32;
        let height = style.line_height().ceil() as u32;
        let top = (style.line_height() * 0.2).round() as u32;
        let bottom = style.baseline().round() as u32;

        let mut ink = Vec::new();
        for (i, c) in copy.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = (i as f32 * advance).round() as u32;
            let right = (i as f32 * advance + advance * 0.8).round() as u32;
            for x in left..=right {
                ink.push((x, top));
                ink.push((x, bottom));
            }
            for y in top..=bottom {
                ink.push((left, y));
                ink.push((right, y));
            }
        }
        paint(width, height, style.color, &ink)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlObject {
    Shader(u32),
    Program(u32),
    Buffer(u32),
    VertexArray(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Create(GlObject),
    Delete(GlObject),
    Compile(ShaderStage),
    Link,
    Bind(GlObject),
    Uniform(String, UniformValue),
    Resize(u32, u32),
    Draw(i32),
}

#[derive(Debug, Default)]
struct Journal {
    next_id: u32,
    calls: Vec<GlCall>,
}

/// GL double that journals every call. Clones share the journal, so a test
/// can keep one while the host owns another.
#[derive(Debug, Clone, Default)]
pub struct CountingGl {
    journal: Rc<RefCell<Journal>>,
    fail_compile: Option<ShaderStage>,
    fail_link: Option<String>,
}

impl CountingGl {
    pub fn failing_compile(mut self, stage: ShaderStage) -> Self {
        self.fail_compile = Some(stage);
        self
    }

    pub fn failing_link(mut self, log: impl Into<String>) -> Self {
        self.fail_link = Some(log.into());
        self
    }

    fn create(&self, make: impl FnOnce(u32) -> GlObject) -> u32 {
        let mut journal = self.journal.borrow_mut();
        journal.next_id += 1;
        let id = journal.next_id;
        journal.calls.push(GlCall::Create(make(id)));
        id
    }

    fn record(&self, call: GlCall) {
        self.journal.borrow_mut().calls.push(call);
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.journal.borrow().calls.clone()
    }

    pub fn calls_matching(&self, pred: impl Fn(&GlCall) -> bool) -> Vec<GlCall> {
        self.journal
            .borrow()
            .calls
            .iter()
            .filter(|&c| pred(c))
            .cloned()
            .collect()
    }

    pub fn created(&self) -> Vec<GlObject> {
        self.objects(|c| match c {
            GlCall::Create(o) => Some(*o),
            _ => None,
        })
    }

    pub fn deleted(&self) -> Vec<GlObject> {
        self.objects(|c| match c {
            GlCall::Delete(o) => Some(*o),
            _ => None,
        })
    }

    fn objects(&self, pick: impl Fn(&GlCall) -> Option<GlObject>) -> Vec<GlObject> {
        self.journal.borrow().calls.iter().filter_map(pick).collect()
    }

    /// Objects created and not yet deleted.
    pub fn live_objects(&self) -> usize {
        let deleted = self.deleted();
        self.created()
            .iter()
            .filter(|o| !deleted.contains(o))
            .count()
    }

    pub fn draw_calls(&self) -> usize {
        self.calls_matching(|c| matches!(c, GlCall::Draw(_))).len()
    }

    /// Last value uploaded to the uniform called `name`.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.journal.borrow().calls.iter().rev().find_map(|c| match c {
            GlCall::Uniform(n, v) if n == name => Some(*v),
            _ => None,
        })
    }
}

impl GpuContext for CountingGl {
    type Shader = (u32, ShaderStage);
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Uniform = String;

    fn create_stage(&self, stage: ShaderStage) -> Option<Self::Shader> {
        Some((self.create(GlObject::Shader), stage))
    }

    fn compile_stage(&self, shader: &Self::Shader, _source: &str) -> Result<(), String> {
        self.record(GlCall::Compile(shader.1));
        if self.fail_compile == Some(shader.1) {
            Err(format!("ERROR: 0:1: {} stage rejected", shader.1))
        } else {
            Ok(())
        }
    }

    fn delete_stage(&self, shader: &Self::Shader) {
        self.record(GlCall::Delete(GlObject::Shader(shader.0)));
    }

    fn create_pipeline(&self) -> Option<Self::Program> {
        Some(self.create(GlObject::Program))
    }

    fn link_pipeline(
        &self,
        _program: &Self::Program,
        _vertex: &Self::Shader,
        _fragment: &Self::Shader,
    ) -> Result<(), String> {
        self.record(GlCall::Link);
        match &self.fail_link {
            Some(log) => Err(log.clone()),
            None => Ok(()),
        }
    }

    fn bind_pipeline(&self, program: &Self::Program) {
        self.record(GlCall::Bind(GlObject::Program(*program)));
    }

    fn delete_pipeline(&self, program: &Self::Program) {
        self.record(GlCall::Delete(GlObject::Program(*program)));
    }

    fn create_vertices(&self) -> Option<Self::VertexArray> {
        Some(self.create(GlObject::VertexArray))
    }

    fn bind_vertices(&self, vertex_array: &Self::VertexArray) {
        self.record(GlCall::Bind(GlObject::VertexArray(*vertex_array)));
    }

    fn delete_vertices(&self, vertex_array: &Self::VertexArray) {
        self.record(GlCall::Delete(GlObject::VertexArray(*vertex_array)));
    }

    fn create_vertex_buffer(&self, _positions: &[f32]) -> Option<Self::Buffer> {
        Some(self.create(GlObject::Buffer))
    }

    fn delete_vertex_buffer(&self, buffer: &Self::Buffer) {
        self.record(GlCall::Delete(GlObject::Buffer(*buffer)));
    }

    fn locate_uniform(&self, _program: &Self::Program, name: &str) -> Option<Self::Uniform> {
        Some(name.to_string())
    }

    fn set_uniform(&self, uniform: &Self::Uniform, value: UniformValue) {
        self.record(GlCall::Uniform(uniform.clone(), value));
    }

    fn resize_surface(&self, width: u32, height: u32) {
        self.record(GlCall::Resize(width, height));
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.record(GlCall::Draw(vertex_count));
    }
}
