/// Graphics backend seam used by the render loop
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::error::Result;
use crate::projection::Viewport;

/// Vertex attribute carrying the position
pub const POSITION_ATTRIBUTE: &str = "pos";
/// Vertex attribute carrying the normal
pub const NORMAL_ATTRIBUTE: &str = "normal";

/// Uniforms the Phong program exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    ProjectionMatrix,
    ViewMatrix,
    ModelMatrix,
    NormalMatrix,
    AmbientLightColour,
    DirectionalLight,
    MaterialSpecular,
    MaterialAmbient,
    MaterialDiffuse,
    Shininess,
}

impl Uniform {
    pub const ALL: [Uniform; 10] = [
        Uniform::ProjectionMatrix,
        Uniform::ViewMatrix,
        Uniform::ModelMatrix,
        Uniform::NormalMatrix,
        Uniform::AmbientLightColour,
        Uniform::DirectionalLight,
        Uniform::MaterialSpecular,
        Uniform::MaterialAmbient,
        Uniform::MaterialDiffuse,
        Uniform::Shininess,
    ];

    /// Identifier in shader source
    pub fn name(self) -> &'static str {
        match self {
            Uniform::ProjectionMatrix => "projectionMatrix",
            Uniform::ViewMatrix => "viewMatrix",
            Uniform::ModelMatrix => "modelMatrix",
            Uniform::NormalMatrix => "normalMatrix",
            Uniform::AmbientLightColour => "ambientLightColour",
            Uniform::DirectionalLight => "directionalLight",
            Uniform::MaterialSpecular => "materialSpecular",
            Uniform::MaterialAmbient => "materialAmbient",
            Uniform::MaterialDiffuse => "materialDiffuse",
            Uniform::Shininess => "shininess",
        }
    }

    /// Position in [`Uniform::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vector3<f32>),
    Mat3(Matrix3<f32>),
    Mat4(Matrix4<f32>),
}

/// Vertex and fragment shader text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// The slice of a 3D rendering API the viewer needs.
///
/// Vertex buffers are interleaved: six floats per vertex, position at offset 0
/// and normal at offset 3, bound to [`POSITION_ATTRIBUTE`] and [`NORMAL_ATTRIBUTE`].
pub trait GraphicsContext {
    type Program;
    type Buffer;

    fn viewport(&self) -> Viewport;

    /// One-time render state: viewport, depth test, back-face culling, clear colour
    fn configure(&mut self, clear_colour: [f32; 4]);

    /// Compile and link a program, resolving its attribute and uniform locations
    fn create_program(&mut self, sources: &ShaderSources) -> Result<Self::Program>;

    /// Static upload of interleaved vertex data laid out for `program`'s attributes
    fn create_vertex_buffer(
        &mut self,
        program: &Self::Program,
        vertices: &[f32],
    ) -> Result<Self::Buffer>;

    /// Clear colour and depth targets
    fn clear(&mut self);

    fn use_program(&mut self, program: Option<&Self::Program>);

    fn bind_vertex_buffer(&mut self, buffer: Option<&Self::Buffer>);

    /// Write a uniform of the program currently in use
    fn set_uniform(&mut self, program: &Self::Program, uniform: Uniform, value: UniformValue);

    /// Draw `count` vertices of the bound buffer as a triangle list
    fn draw_triangles(&mut self, first: usize, count: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_index_matches_table() {
        for (i, uniform) in Uniform::ALL.iter().enumerate() {
            assert_eq!(uniform.index(), i);
        }
        assert_eq!(Uniform::NormalMatrix.name(), "normalMatrix");
        assert_eq!(Uniform::AmbientLightColour.name(), "ambientLightColour");
    }
}
