//! GPU side of the nucleus background: the GL surface the host drives, the
//! shader sources and the pixel-ratio aware viewport tracking.

use std::fmt;

use thiserror::Error;

pub mod host;
pub mod sources;
pub mod viewport;

pub use host::{HostState, PointerButton, PointerState, ShaderHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("WebGL2 context unavailable")]
    ContextUnavailable,
    #[error("failed to allocate {0}")]
    Allocation(&'static str),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {0}")]
    Link(String),
    #[error("shader host already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

/// The slice of a GL context the shader host needs. Handles are owned by
/// the caller and must be passed back to the matching `delete_*` call.
pub trait GpuContext {
    type Shader;
    type Program;
    type Buffer;
    type VertexArray;
    type Uniform;

    fn create_stage(&self, stage: ShaderStage) -> Option<Self::Shader>;
    /// Compile `source` into `shader`; `Err` carries the info log.
    fn compile_stage(&self, shader: &Self::Shader, source: &str) -> Result<(), String>;
    fn delete_stage(&self, shader: &Self::Shader);

    fn create_pipeline(&self) -> Option<Self::Program>;
    /// Attach both stages and link; `Err` carries the info log.
    fn link_pipeline(
        &self,
        program: &Self::Program,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
    ) -> Result<(), String>;
    fn bind_pipeline(&self, program: &Self::Program);
    fn delete_pipeline(&self, program: &Self::Program);

    fn create_vertices(&self) -> Option<Self::VertexArray>;
    fn bind_vertices(&self, vertex_array: &Self::VertexArray);
    fn delete_vertices(&self, vertex_array: &Self::VertexArray);

    /// Upload 2D positions to attribute 0 of the bound vertex array.
    fn create_vertex_buffer(&self, positions: &[f32]) -> Option<Self::Buffer>;
    fn delete_vertex_buffer(&self, buffer: &Self::Buffer);

    fn locate_uniform(&self, program: &Self::Program, name: &str) -> Option<Self::Uniform>;
    fn set_uniform(&self, uniform: &Self::Uniform, value: UniformValue);

    /// Resize the drawing buffer and the viewport to match.
    fn resize_surface(&self, width: u32, height: u32);
    fn draw_triangles(&self, vertex_count: i32);
}
