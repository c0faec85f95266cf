use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::shader::{GpuContext, ShaderStage, UniformValue};

impl GpuContext for GL {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type VertexArray = WebGlVertexArrayObject;
    type Uniform = WebGlUniformLocation;

    fn create_stage(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        self.create_shader(kind)
    }

    fn compile_stage(&self, shader: &WebGlShader, source: &str) -> Result<(), String> {
        self.shader_source(shader, source);
        self.compile_shader(shader);
        let ok = self
            .get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(self
                .get_shader_info_log(shader)
                .unwrap_or_else(|| "unknown shader error".to_string()))
        }
    }

    fn delete_stage(&self, shader: &WebGlShader) {
        self.delete_shader(Some(shader));
    }

    fn create_pipeline(&self) -> Option<WebGlProgram> {
        self.create_program()
    }

    fn link_pipeline(
        &self,
        program: &WebGlProgram,
        vertex: &WebGlShader,
        fragment: &WebGlShader,
    ) -> Result<(), String> {
        self.attach_shader(program, vertex);
        self.attach_shader(program, fragment);
        self.link_program(program);
        let ok = self
            .get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(self
                .get_program_info_log(program)
                .unwrap_or_else(|| "unknown program error".to_string()))
        }
    }

    fn bind_pipeline(&self, program: &WebGlProgram) {
        self.use_program(Some(program));
    }

    fn delete_pipeline(&self, program: &WebGlProgram) {
        self.use_program(None);
        self.delete_program(Some(program));
    }

    fn create_vertices(&self) -> Option<WebGlVertexArrayObject> {
        self.create_vertex_array()
    }

    fn bind_vertices(&self, vertex_array: &WebGlVertexArrayObject) {
        self.bind_vertex_array(Some(vertex_array));
    }

    fn delete_vertices(&self, vertex_array: &WebGlVertexArrayObject) {
        self.bind_vertex_array(None);
        self.delete_vertex_array(Some(vertex_array));
    }

    fn create_vertex_buffer(&self, positions: &[f32]) -> Option<WebGlBuffer> {
        let buffer = self.create_buffer()?;
        self.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let view = Float32Array::from(positions);
        self.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        self.enable_vertex_attrib_array(0);
        self.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
        Some(buffer)
    }

    fn delete_vertex_buffer(&self, buffer: &WebGlBuffer) {
        self.bind_buffer(GL::ARRAY_BUFFER, None);
        self.delete_buffer(Some(buffer));
    }

    fn locate_uniform(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn set_uniform(&self, uniform: &WebGlUniformLocation, value: UniformValue) {
        let location = Some(uniform);
        match value {
            UniformValue::Float(v) => self.uniform1f(location, v),
            UniformValue::Int(v) => self.uniform1i(location, v),
            UniformValue::Vec3([x, y, z]) => self.uniform3f(location, x, y, z),
            UniformValue::Vec4([x, y, z, w]) => self.uniform4f(location, x, y, z, w),
        }
    }

    fn resize_surface(&self, width: u32, height: u32) {
        if let Some(canvas) = self
            .canvas()
            .and_then(|c| c.dyn_into::<HtmlCanvasElement>().ok())
        {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        self.viewport(0, 0, width as i32, height as i32);
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.draw_arrays(GL::TRIANGLES, 0, vertex_count);
    }
}
