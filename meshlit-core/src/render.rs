/// Per-frame update and draw of the single lit mesh
use nalgebra::Vector3;

use crate::config::SceneConfig;
use crate::error::Result;
use crate::geometry::MeshBuffer;
use crate::gpu::{GraphicsContext, ShaderSources, Uniform, UniformValue};
use crate::input::InputSnapshot;
use crate::transform::{frame_delta_angle, TransformState};

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub timestamp: f64,
    /// Rotation applied this frame, `None` when the frame gap was not positive
    pub delta_angle: Option<f32>,
    pub light: Vector3<f32>,
    pub axis: Vector3<f32>,
    pub vertices_drawn: usize,
}

/// Owns the GPU resources and transform state of the viewer.
///
/// The loop never schedules itself: a host timer calls [`RenderLoop::advance`]
/// once per display refresh.
pub struct RenderLoop<G: GraphicsContext> {
    gl: G,
    program: G::Program,
    vertex_buffer: G::Buffer,
    vertex_count: usize,
    transform: TransformState,
    config: SceneConfig,
    previous_timestamp: f64,
}

impl<G: GraphicsContext> RenderLoop<G> {
    /// Build the program, upload the mesh and write the initial uniforms
    pub fn new(
        mut gl: G,
        mesh: &MeshBuffer,
        sources: &ShaderSources,
        config: SceneConfig,
    ) -> Result<Self> {
        config.validate()?;
        let perspective = config.perspective(gl.viewport())?;

        gl.configure(config.clear_colour);
        let program = gl.create_program(sources)?;
        gl.use_program(Some(&program));

        let vertex_buffer = gl.create_vertex_buffer(&program, mesh.vertices())?;
        let transform = TransformState::init(config.model_translation, &perspective);

        let material = mesh.material();
        let initial = [
            (
                Uniform::ProjectionMatrix,
                UniformValue::Mat4(*transform.projection_matrix()),
            ),
            (Uniform::ViewMatrix, UniformValue::Mat4(*transform.view_matrix())),
            (Uniform::ModelMatrix, UniformValue::Mat4(*transform.model_matrix())),
            (Uniform::NormalMatrix, UniformValue::Mat3(transform.normal_matrix())),
            (
                Uniform::AmbientLightColour,
                UniformValue::Vec3(config.ambient_light_colour),
            ),
            (Uniform::DirectionalLight, UniformValue::Vec3(config.initial_light)),
            (
                Uniform::MaterialSpecular,
                UniformValue::Vec3(config.material_specular),
            ),
            (Uniform::Shininess, UniformValue::Float(material.shininess)),
            (Uniform::MaterialAmbient, UniformValue::Float(material.ambient)),
            (Uniform::MaterialDiffuse, UniformValue::Float(material.diffuse)),
        ];
        for (uniform, value) in initial {
            gl.set_uniform(&program, uniform, value);
        }

        gl.bind_vertex_buffer(None);
        gl.use_program(None);

        log::debug!(
            "render loop ready: {} vertices, viewport {:?}",
            mesh.vertex_count(),
            gl.viewport()
        );

        Ok(Self {
            gl,
            program,
            vertex_buffer,
            vertex_count: mesh.vertex_count(),
            transform,
            config,
            previous_timestamp: 0.0,
        })
    }

    /// Run one frame at `now`, using the previous `advance` time as the frame gap
    pub fn advance(&mut self, now: f64, inputs: &InputSnapshot) -> FrameOutput {
        let output = self.tick(now, self.previous_timestamp, inputs);
        self.previous_timestamp = now;
        output
    }

    /// Clear, light, rotate and draw exactly once
    pub fn tick(&mut self, timestamp: f64, previous: f64, inputs: &InputSnapshot) -> FrameOutput {
        self.gl.clear();
        self.gl.use_program(Some(&self.program));

        let light = inputs.light_direction();
        let axis = inputs.rotation_axis();
        self.gl.set_uniform(
            &self.program,
            Uniform::DirectionalLight,
            UniformValue::Vec3(light),
        );

        let delta_angle = frame_delta_angle(
            self.config.rotation_per_frame,
            timestamp - previous,
            self.config.min_frame_millis,
        );
        if let Some(angle) = delta_angle {
            self.transform.update(angle, &axis);
        }

        self.gl.set_uniform(
            &self.program,
            Uniform::ModelMatrix,
            UniformValue::Mat4(*self.transform.model_matrix()),
        );
        self.gl.set_uniform(
            &self.program,
            Uniform::NormalMatrix,
            UniformValue::Mat3(self.transform.normal_matrix()),
        );

        self.gl.bind_vertex_buffer(Some(&self.vertex_buffer));
        self.gl.draw_triangles(0, self.vertex_count);
        self.gl.bind_vertex_buffer(None);
        self.gl.use_program(None);

        FrameOutput {
            timestamp,
            delta_angle,
            light,
            axis,
            vertices_drawn: self.vertex_count,
        }
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn context(&self) -> &G {
        &self.gl
    }

    pub fn context_mut(&mut self) -> &mut G {
        &mut self.gl
    }
}
