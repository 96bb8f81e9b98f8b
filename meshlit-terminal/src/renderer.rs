/// ASCII rasterizer implementing the graphics context in software
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshlit_core::{
    GraphicsContext, Result, ShaderSources, Uniform, UniformValue, Vertex, Viewport,
    FLOATS_PER_VERTEX,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Handle to a vertex buffer held by [`AsciiRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHandle(usize);

/// The fixed Phong program; shader text is not interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProgram;

/// Uniform block read by the fixed shading model
#[derive(Debug, Clone)]
struct Uniforms {
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    model: Matrix4<f32>,
    normal: Matrix3<f32>,
    ambient_colour: Vector3<f32>,
    light: Vector3<f32>,
    specular: Vector3<f32>,
    ambient: f32,
    diffuse: f32,
    shininess: f32,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            model: Matrix4::identity(),
            normal: Matrix3::identity(),
            ambient_colour: Vector3::zeros(),
            light: Vector3::zeros(),
            specular: Vector3::zeros(),
            ambient: 0.0,
            diffuse: 0.0,
            shininess: 1.0,
        }
    }
}

/// A vertex after the vertex stage
#[derive(Debug, Clone, Copy)]
struct ShadedVertex {
    screen: (f32, f32, f32),
    ndc: Point3<f32>,
    normal: Vector3<f32>,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    buffers: Vec<Vec<f32>>,
    bound_buffer: Option<BufferHandle>,
    program_active: bool,
    uniforms: Uniforms,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            buffers: Vec::new(),
            bound_buffer: None,
            program_active: false,
            uniforms: Uniforms::default(),
        }
    }

    /// Character at a cell, mostly useful for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.char_buffer[y * self.width + x])
    }

    pub fn lit_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    fn vertex_stage(&self, vertex: &Vertex) -> Option<ShadedVertex> {
        let u = &self.uniforms;
        let clip = u.projection * u.view * u.model * vertex.position.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = Point3::from(clip.xyz() / clip.w);
        let screen = self.viewport_cells().to_screen(&ndc);
        Some(ShadedVertex {
            screen,
            ndc,
            normal: u.normal * vertex.normal,
        })
    }

    fn viewport_cells(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32)
    }

    /// Flat Phong term for a triangle, 0..=1
    fn intensity(&self, normal: &Vector3<f32>) -> f32 {
        let u = &self.uniforms;
        let ambient = u.ambient * u.ambient_colour.mean();
        let (Some(n), Some(l)) = (normal.try_normalize(1e-6), u.light.try_normalize(1e-6)) else {
            return ambient.clamp(0.0, 1.0);
        };
        let diffuse = u.diffuse * n.dot(&l).max(0.0);
        let half = (l + Vector3::z()).normalize();
        let specular = u.specular.mean() * n.dot(&half).max(0.0).powf(u.shininess);
        (ambient + diffuse + specular).clamp(0.0, 1.0)
    }

    fn render_triangle(&mut self, corners: [Vertex; 3]) {
        let mut shaded = [None; 3];
        for (slot, vertex) in shaded.iter_mut().zip(corners.iter()) {
            *slot = self.vertex_stage(vertex);
        }
        let [Some(a), Some(b), Some(c)] = shaded else {
            return; // Triangle is behind the camera
        };

        // back faces wind clockwise in NDC
        let area = (b.ndc.x - a.ndc.x) * (c.ndc.y - a.ndc.y)
            - (c.ndc.x - a.ndc.x) * (b.ndc.y - a.ndc.y);
        if area <= 0.0 {
            return;
        }

        let normal = (a.normal + b.normal + c.normal) / 3.0;
        let brightness = self.intensity(&normal);
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);

        self.rasterize_triangle(&[a.screen, b.screen, c.screen], LUMINOSITY_RAMP[char_index]);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// Write the character buffer to the terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl GraphicsContext for AsciiRenderer {
    type Program = FixedProgram;
    type Buffer = BufferHandle;

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32 * CELL_ASPECT)
    }

    fn configure(&mut self, _clear_colour: [f32; 4]) {
        self.clear();
    }

    fn create_program(&mut self, _sources: &ShaderSources) -> Result<FixedProgram> {
        Ok(FixedProgram)
    }

    fn create_vertex_buffer(
        &mut self,
        _program: &FixedProgram,
        vertices: &[f32],
    ) -> Result<BufferHandle> {
        self.buffers.push(vertices.to_vec());
        Ok(BufferHandle(self.buffers.len() - 1))
    }

    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    fn use_program(&mut self, program: Option<&FixedProgram>) {
        self.program_active = program.is_some();
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<&BufferHandle>) {
        self.bound_buffer = buffer.copied();
    }

    fn set_uniform(&mut self, _program: &FixedProgram, uniform: Uniform, value: UniformValue) {
        let u = &mut self.uniforms;
        match (uniform, value) {
            (Uniform::ProjectionMatrix, UniformValue::Mat4(m)) => u.projection = m,
            (Uniform::ViewMatrix, UniformValue::Mat4(m)) => u.view = m,
            (Uniform::ModelMatrix, UniformValue::Mat4(m)) => u.model = m,
            (Uniform::NormalMatrix, UniformValue::Mat3(m)) => u.normal = m,
            (Uniform::AmbientLightColour, UniformValue::Vec3(v)) => u.ambient_colour = v,
            (Uniform::DirectionalLight, UniformValue::Vec3(v)) => u.light = v,
            (Uniform::MaterialSpecular, UniformValue::Vec3(v)) => u.specular = v,
            (Uniform::MaterialAmbient, UniformValue::Float(f)) => u.ambient = f,
            (Uniform::MaterialDiffuse, UniformValue::Float(f)) => u.diffuse = f,
            (Uniform::Shininess, UniformValue::Float(f)) => u.shininess = f,
            (uniform, value) => {
                log::warn!("ignoring {:?} for uniform {}", value, uniform.name());
            }
        }
    }

    fn draw_triangles(&mut self, first: usize, count: usize) {
        let (Some(handle), true) = (self.bound_buffer, self.program_active) else {
            return;
        };
        let data = std::mem::take(&mut self.buffers[handle.0]);
        let start = first * FLOATS_PER_VERTEX;
        let end = ((first + count) * FLOATS_PER_VERTEX).min(data.len());
        if start < end {
            for triangle in data[start..end].chunks_exact(3 * FLOATS_PER_VERTEX) {
                let corners = [
                    Vertex::from_interleaved(&triangle[..FLOATS_PER_VERTEX]),
                    Vertex::from_interleaved(&triangle[FLOATS_PER_VERTEX..]),
                    Vertex::from_interleaved(&triangle[2 * FLOATS_PER_VERTEX..]),
                ];
                self.render_triangle(corners);
            }
        }
        self.buffers[handle.0] = data;
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshlit_core::{parse_obj, InputSnapshot, MeshBuffer, RenderLoop, SceneConfig};

    fn render_loop(mesh: &MeshBuffer) -> RenderLoop<AsciiRenderer> {
        RenderLoop::new(
            AsciiRenderer::new(60, 30),
            mesh,
            &ShaderSources::new("", ""),
            SceneConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_barycentric_centre() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_cube_fills_cells() {
        let mut render_loop = render_loop(&MeshBuffer::cube(2.0));
        let inputs = InputSnapshot::new([30.0, 70.0, 80.0], [7.0, 8.0, 5.0]);
        render_loop.advance(16.0, &inputs);

        let renderer = render_loop.context();
        assert!(renderer.lit_cells() > 0);
        // the cube sits in the middle of the view
        assert_ne!(renderer.cell(30, 15), Some(' '));
        assert_eq!(renderer.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_back_facing_triangle_is_culled() {
        let front =
            parse_obj("v -1 -1 0\nv 1 -1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        let back =
            parse_obj("v -1 -1 0\nv 1 -1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 3//1 2//1\n").unwrap();

        let mut visible = render_loop(&front);
        visible.tick(16.0, 16.0, &InputSnapshot::default());
        assert!(visible.context().lit_cells() > 0);

        let mut hidden = render_loop(&back);
        hidden.tick(16.0, 16.0, &InputSnapshot::default());
        assert_eq!(hidden.context().lit_cells(), 0);
    }

    #[test]
    fn test_triangle_larger_than_view_is_drawn() {
        let text = "v -10 -10 0\nv 10 -10 0\nv 0 10 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mut render_loop = render_loop(&parse_obj(text).unwrap());
        render_loop.tick(16.0, 16.0, &InputSnapshot::default());

        let renderer = render_loop.context();
        assert_ne!(renderer.cell(30, 15), Some(' '));
        assert!(renderer.lit_cells() > 0);
    }

    #[test]
    fn test_present_writes_every_cell() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
