use super::sources::FULLSCREEN_TRIANGLE;
use super::viewport::{clamp_pixel_ratio, BackingTracker};
use super::{GpuContext, ShaderError, ShaderStage, UniformValue};
use crate::error::FxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    Compiling,
    Running,
    /// Terminal until teardown; the canvas just stays blank.
    CompileFailed,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

impl PointerButton {
    /// Maps `MouseEvent.button`; middle and extra buttons are ignored.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(PointerButton::Left),
            2 => Some(PointerButton::Right),
            _ => None,
        }
    }
}

/// Pointer position in CSS pixels with a bottom-left origin, as the shader
/// expects it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub left: bool,
    pub right: bool,
}

impl PointerState {
    fn as_uniform(&self) -> UniformValue {
        let flag = |down: bool| if down { 1.0 } else { 0.0 };
        UniformValue::Vec4([self.x, self.y, flag(self.left), flag(self.right)])
    }
}

/// GPU objects acquired by `init`, in acquisition order.
struct Resources<G: GpuContext> {
    vertex_array: Option<G::VertexArray>,
    buffer: Option<G::Buffer>,
    vertex: Option<G::Shader>,
    fragment: Option<G::Shader>,
    program: Option<G::Program>,
}

impl<G: GpuContext> Default for Resources<G> {
    fn default() -> Self {
        Self {
            vertex_array: None,
            buffer: None,
            vertex: None,
            fragment: None,
            program: None,
        }
    }
}

impl<G: GpuContext> Resources<G> {
    /// Releases in reverse acquisition order.
    fn release(&mut self, gl: &G) {
        if let Some(program) = self.program.take() {
            gl.delete_pipeline(&program);
        }
        if let Some(fragment) = self.fragment.take() {
            gl.delete_stage(&fragment);
        }
        if let Some(vertex) = self.vertex.take() {
            gl.delete_stage(&vertex);
        }
        if let Some(buffer) = self.buffer.take() {
            gl.delete_vertex_buffer(&buffer);
        }
        if let Some(vertex_array) = self.vertex_array.take() {
            gl.delete_vertices(&vertex_array);
        }
    }
}

struct Uniforms<U> {
    resolution: Option<U>,
    time: Option<U>,
    frame: Option<U>,
    mouse: Option<U>,
}

impl<U> Default for Uniforms<U> {
    fn default() -> Self {
        Self {
            resolution: None,
            time: None,
            frame: None,
            mouse: None,
        }
    }
}

impl<U> Uniforms<U> {
    fn locate<G: GpuContext<Uniform = U>>(gl: &G, program: &G::Program) -> Self {
        Self {
            resolution: gl.locate_uniform(program, "iResolution"),
            time: gl.locate_uniform(program, "iTime"),
            frame: gl.locate_uniform(program, "iFrame"),
            mouse: gl.locate_uniform(program, "iMouse"),
        }
    }
}

/// Drives one fullscreen fragment shader: compiles and links it, feeds
/// `iResolution`/`iTime`/`iFrame`/`iMouse` every frame and releases every
/// GPU object it created on teardown or drop.
pub struct ShaderHost<G: GpuContext> {
    gl: G,
    state: HostState,
    resources: Resources<G>,
    uniforms: Uniforms<G::Uniform>,
    backing: BackingTracker,
    started_at: f64,
    frame: i32,
    pointer: PointerState,
}

impl<G: GpuContext> ShaderHost<G> {
    pub fn new(gl: G) -> Self {
        Self {
            gl,
            state: HostState::Uninitialized,
            resources: Resources::default(),
            uniforms: Uniforms::default(),
            backing: BackingTracker::default(),
            started_at: 0.0,
            frame: 0,
            pointer: PointerState::default(),
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn frame_count(&self) -> i32 {
        self.frame
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn backing(&self) -> &BackingTracker {
        &self.backing
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    /// Compile and link the program. On failure everything acquired so far is
    /// released and the host stays in [`HostState::CompileFailed`].
    pub fn init(&mut self, vertex_src: &str, fragment_src: &str, now_ms: f64) -> Result<(), ShaderError> {
        if self.state != HostState::Uninitialized {
            return Err(ShaderError::AlreadyInitialized);
        }
        self.state = HostState::Compiling;

        match build(&self.gl, &mut self.resources, vertex_src, fragment_src) {
            Ok(uniforms) => {
                self.uniforms = uniforms;
                self.started_at = now_ms;
                self.state = HostState::Running;
                log::info!("nucleus shader linked");
                Ok(())
            }
            Err(err) => {
                log::error!("{}", FxError::from(err.clone()));
                self.resources.release(&self.gl);
                self.state = HostState::CompileFailed;
                Err(err)
            }
        }
    }

    /// Bring the drawing buffer in line with the element's CSS size. The GPU
    /// viewport is only touched when the device-pixel size changed.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        if self.state != HostState::Running {
            return;
        }
        if let Some(size) = self.backing.sync(css_width, css_height, pixel_ratio) {
            log::debug!("nucleus backing store {}x{}", size.width, size.height);
            self.gl.resize_surface(size.width, size.height);
        }
    }

    /// Draw one frame. Returns whether a draw call was issued.
    pub fn frame(&mut self, now_ms: f64, css_width: f64, css_height: f64, pixel_ratio: f64) -> bool {
        if self.state != HostState::Running {
            return false;
        }
        self.resize(css_width, css_height, pixel_ratio);

        let (Some(program), Some(vertex_array)) =
            (self.resources.program.as_ref(), self.resources.vertex_array.as_ref())
        else {
            return false;
        };

        self.frame = self.frame.wrapping_add(1);
        let seconds = ((now_ms - self.started_at) / 1000.0) as f32;
        let ratio = clamp_pixel_ratio(pixel_ratio) as f32;
        let (width, height) = self
            .backing
            .current()
            .map(|size| (size.width as f32, size.height as f32))
            .unwrap_or((1.0, 1.0));

        self.gl.bind_pipeline(program);
        let uploads = [
            (&self.uniforms.resolution, UniformValue::Vec3([width, height, ratio])),
            (&self.uniforms.time, UniformValue::Float(seconds)),
            (&self.uniforms.frame, UniformValue::Int(self.frame)),
            (&self.uniforms.mouse, self.pointer.as_uniform()),
        ];
        for (location, value) in uploads {
            if let Some(location) = location {
                self.gl.set_uniform(location, value);
            }
        }

        self.gl.bind_vertices(vertex_array);
        self.gl.draw_triangles(3);
        true
    }

    /// `x`/`y` relative to the element's top-left corner, in CSS pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32, css_height: f32) {
        self.pointer.x = x;
        self.pointer.y = css_height - y;
    }

    pub fn pointer_pressed(&mut self, button: i16) {
        self.set_button(button, true);
    }

    pub fn pointer_released(&mut self, button: i16) {
        self.set_button(button, false);
    }

    fn set_button(&mut self, button: i16, down: bool) {
        match PointerButton::from_dom(button) {
            Some(PointerButton::Left) => self.pointer.left = down,
            Some(PointerButton::Right) => self.pointer.right = down,
            None => {}
        }
    }

    /// Release every GPU object. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.state == HostState::TornDown {
            return;
        }
        self.resources.release(&self.gl);
        self.state = HostState::TornDown;
    }
}

impl<G: GpuContext> Drop for ShaderHost<G> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn build<G: GpuContext>(
    gl: &G,
    resources: &mut Resources<G>,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<Uniforms<G::Uniform>, ShaderError> {
    let vertex_array = resources
        .vertex_array
        .insert(gl.create_vertices().ok_or(ShaderError::Allocation("vertex array"))?);
    gl.bind_vertices(vertex_array);

    resources.buffer = Some(
        gl.create_vertex_buffer(&FULLSCREEN_TRIANGLE)
            .ok_or(ShaderError::Allocation("vertex buffer"))?,
    );

    let vertex = resources
        .vertex
        .insert(gl.create_stage(ShaderStage::Vertex).ok_or(ShaderError::Allocation("vertex shader"))?);
    gl.compile_stage(vertex, vertex_src)
        .map_err(|log| ShaderError::Compile { stage: ShaderStage::Vertex, log })?;

    let fragment = resources.fragment.insert(
        gl.create_stage(ShaderStage::Fragment)
            .ok_or(ShaderError::Allocation("fragment shader"))?,
    );
    gl.compile_stage(fragment, fragment_src)
        .map_err(|log| ShaderError::Compile { stage: ShaderStage::Fragment, log })?;

    let program = resources
        .program
        .insert(gl.create_pipeline().ok_or(ShaderError::Allocation("program"))?);
    gl.link_pipeline(program, vertex, fragment)
        .map_err(ShaderError::Link)?;
    gl.bind_pipeline(program);

    Ok(Uniforms::locate(gl, program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::sources::{FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT};
    use crate::testing::{CountingGl, GlCall};

    #[test]
    fn init_runs_and_frame_uploads_uniforms() {
        let gl = CountingGl::default();
        let mut host = ShaderHost::new(gl.clone());
        host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 1000.0).unwrap();
        assert_eq!(host.state(), HostState::Running);

        host.pointer_moved(10.0, 30.0, 100.0);
        host.pointer_pressed(0);
        assert!(host.frame(2500.0, 200.0, 100.0, 3.0));

        assert_eq!(gl.uniform("iResolution"), Some(UniformValue::Vec3([400.0, 200.0, 2.0])));
        assert_eq!(gl.uniform("iTime"), Some(UniformValue::Float(1.5)));
        assert_eq!(gl.uniform("iFrame"), Some(UniformValue::Int(1)));
        assert_eq!(gl.uniform("iMouse"), Some(UniformValue::Vec4([10.0, 70.0, 1.0, 0.0])));
        assert_eq!(gl.draw_calls(), 1);
    }

    #[test]
    fn viewport_only_changes_with_backing_size() {
        let gl = CountingGl::default();
        let mut host = ShaderHost::new(gl.clone());
        host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap();
        host.resize(300.0, 150.0, 1.0);
        for t in 0..5 {
            host.frame(t as f64 * 16.0, 300.0, 150.0, 1.0);
        }
        host.frame(100.0, 300.0, 150.0, 2.0);
        assert_eq!(
            gl.calls_matching(|c| matches!(c, GlCall::Resize(..))),
            vec![GlCall::Resize(300, 150), GlCall::Resize(600, 300)]
        );
        assert_eq!(host.frame_count(), 6);
    }

    #[test]
    fn right_button_is_tracked() {
        let mut host = ShaderHost::new(CountingGl::default());
        host.pointer_pressed(2);
        assert!(host.pointer().right);
        host.pointer_pressed(1);
        host.pointer_released(2);
        assert_eq!(host.pointer(), PointerState::default());
    }

    #[test]
    fn link_failure_releases_everything() {
        let gl = CountingGl::default().failing_link("bad varyings");
        let mut host = ShaderHost::new(gl.clone());
        let err = host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap_err();
        assert_eq!(err, ShaderError::Link("bad varyings".into()));
        assert_eq!(host.state(), HostState::CompileFailed);
        assert!(!host.frame(16.0, 10.0, 10.0, 1.0));
        assert_eq!(gl.live_objects(), 0);
        assert_eq!(gl.draw_calls(), 0);
    }

    #[test]
    fn teardown_releases_in_reverse_order() {
        let gl = CountingGl::default();
        let mut host = ShaderHost::new(gl.clone());
        host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap();
        host.teardown();
        host.teardown();

        let created = gl.created();
        let mut deleted = gl.deleted();
        deleted.reverse();
        assert_eq!(created, deleted);
        assert_eq!(host.state(), HostState::TornDown);
        assert!(!host.frame(0.0, 10.0, 10.0, 1.0));
    }

    #[test]
    fn second_init_is_rejected() {
        let mut host = ShaderHost::new(CountingGl::default());
        host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap();
        assert_eq!(
            host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0),
            Err(ShaderError::AlreadyInitialized)
        );
    }
}
