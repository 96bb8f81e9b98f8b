use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlUniformLocation,
};

use meshlit_core::gpu::{NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE};
use meshlit_core::geometry::{NORMAL_COMPONENTS, NORMAL_OFFSET, POSITION_COMPONENTS};
use meshlit_core::{
    Error, GraphicsContext, Result, ShaderSources, Uniform, UniformValue, Viewport,
    FLOATS_PER_VERTEX,
};

use crate::shader::create_program;

const FLOAT_BYTES: i32 = std::mem::size_of::<f32>() as i32;

/// WebGL2 context of one canvas
pub struct WebGlContext {
    canvas: HtmlCanvasElement,
    gl: Gl,
}

impl WebGlContext {
    pub fn new(canvas_id: &str) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| graphics("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| graphics("missing document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| graphics("canvas not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| graphics("element is not a canvas"))?;

        let gl: Gl = canvas
            .get_context("webgl2")
            .map_err(|_| graphics("failed to request a WebGL2 context"))?
            .ok_or_else(|| graphics("webgl2 context unavailable"))?
            .dyn_into()
            .map_err(|_| graphics("failed to cast WebGL2 context"))?;

        Ok(WebGlContext { canvas, gl })
    }
}

/// Linked program with its resolved locations
pub struct LinkedProgram {
    gl: Gl,
    program: WebGlProgram,
    position_location: u32,
    normal_location: u32,
    // indexed by `Uniform::index`; `None` when the driver optimized the uniform out
    uniforms: Vec<Option<WebGlUniformLocation>>,
}

impl LinkedProgram {
    fn location(&self, uniform: Uniform) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(uniform.index()).and_then(Option::as_ref)
    }
}

impl Drop for LinkedProgram {
    fn drop(&mut self) {
        self.gl.delete_program(Some(&self.program));
    }
}

/// Static interleaved vertex buffer bound to a program's attributes
pub struct VertexBuffer {
    gl: Gl,
    handle: WebGlBuffer,
    position_location: u32,
    normal_location: u32,
}

impl VertexBuffer {
    fn configure_attributes(&self) {
        let stride = FLOATS_PER_VERTEX as i32 * FLOAT_BYTES;

        self.gl.enable_vertex_attrib_array(self.position_location);
        self.gl.vertex_attrib_pointer_with_i32(
            self.position_location,
            POSITION_COMPONENTS as i32,
            Gl::FLOAT,
            false,
            stride,
            0,
        );

        self.gl.enable_vertex_attrib_array(self.normal_location);
        self.gl.vertex_attrib_pointer_with_i32(
            self.normal_location,
            NORMAL_COMPONENTS as i32,
            Gl::FLOAT,
            false,
            stride,
            NORMAL_OFFSET as i32 * FLOAT_BYTES,
        );
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.gl.delete_buffer(Some(&self.handle));
    }
}

impl GraphicsContext for WebGlContext {
    type Program = LinkedProgram;
    type Buffer = VertexBuffer;

    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width(), self.canvas.height())
    }

    fn configure(&mut self, clear_colour: [f32; 4]) {
        let viewport = self.viewport();
        self.gl
            .viewport(0, 0, viewport.width as i32, viewport.height as i32);
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.enable(Gl::CULL_FACE);
        self.gl.cull_face(Gl::BACK);
        let [r, g, b, a] = clear_colour;
        self.gl.clear_color(r, g, b, a);
    }

    fn create_program(&mut self, sources: &ShaderSources) -> Result<LinkedProgram> {
        let program = create_program(&self.gl, sources)?;

        let attribute = |name: &str| -> Result<u32> {
            u32::try_from(self.gl.get_attrib_location(&program, name))
                .map_err(|_| Error::Graphics(format!("{name} attribute missing")))
        };
        let position_location = attribute(POSITION_ATTRIBUTE)?;
        let normal_location = attribute(NORMAL_ATTRIBUTE)?;

        let uniforms = Uniform::ALL
            .iter()
            .map(|uniform| {
                let location = self.gl.get_uniform_location(&program, uniform.name());
                if location.is_none() {
                    log::debug!("uniform {} is not active", uniform.name());
                }
                location
            })
            .collect();

        Ok(LinkedProgram {
            gl: self.gl.clone(),
            program,
            position_location,
            normal_location,
            uniforms,
        })
    }

    fn create_vertex_buffer(
        &mut self,
        program: &LinkedProgram,
        vertices: &[f32],
    ) -> Result<VertexBuffer> {
        let handle = self
            .gl
            .create_buffer()
            .ok_or_else(|| graphics("failed to create vertex buffer"))?;
        let buffer = VertexBuffer {
            gl: self.gl.clone(),
            handle,
            position_location: program.position_location,
            normal_location: program.normal_location,
        };

        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer.handle));
        {
            // the view must not outlive `vertices` and nothing may allocate while it is alive
            let view = unsafe { Float32Array::view(vertices) };
            self.gl
                .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
        }
        buffer.configure_attributes();
        Ok(buffer)
    }

    fn clear(&mut self) {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    fn use_program(&mut self, program: Option<&LinkedProgram>) {
        self.gl.use_program(program.map(|p| &p.program));
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<&VertexBuffer>) {
        match buffer {
            Some(buffer) => {
                self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer.handle));
                buffer.configure_attributes();
            }
            None => self.gl.bind_buffer(Gl::ARRAY_BUFFER, None),
        }
    }

    fn set_uniform(&mut self, program: &LinkedProgram, uniform: Uniform, value: UniformValue) {
        let Some(location) = program.location(uniform) else {
            return;
        };
        let location = Some(location);
        match value {
            UniformValue::Float(v) => self.gl.uniform1f(location, v),
            UniformValue::Vec3(v) => self.gl.uniform3fv_with_f32_array(location, v.as_slice()),
            UniformValue::Mat3(m) => {
                self.gl
                    .uniform_matrix3fv_with_f32_array(location, false, m.as_slice())
            }
            UniformValue::Mat4(m) => {
                self.gl
                    .uniform_matrix4fv_with_f32_array(location, false, m.as_slice())
            }
        }
    }

    fn draw_triangles(&mut self, first: usize, count: usize) {
        self.gl.draw_arrays(Gl::TRIANGLES, first as i32, count as i32);
    }
}

fn graphics(message: &str) -> Error {
    Error::Graphics(message.to_string())
}
