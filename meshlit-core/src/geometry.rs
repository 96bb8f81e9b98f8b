/// Render-ready mesh data: interleaved position/normal vertices
use nalgebra::{Point3, Vector3};

use crate::error::MeshError;

pub const POSITION_COMPONENTS: usize = 3;
pub const NORMAL_COMPONENTS: usize = 3;
/// Floats per interleaved vertex (position then normal)
pub const FLOATS_PER_VERTEX: usize = POSITION_COMPONENTS + NORMAL_COMPONENTS;
/// Offset of the normal inside one vertex, in floats
pub const NORMAL_OFFSET: usize = POSITION_COMPONENTS;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    /// Read one vertex from an interleaved slice of at least 6 floats
    pub fn from_interleaved(data: &[f32]) -> Self {
        Self::new(data[0], data[1], data[2], data[3], data[4], data[5])
    }
}

/// Phong material constants shared by every mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub diffuse: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            diffuse: 0.5,
            shininess: 10.0,
        }
    }
}

/// Flat triangle-list vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<f32>, // position (xyz) + normal (xyz) per vertex
    material: Material,
}

impl MeshBuffer {
    pub fn new(vertices: Vec<f32>) -> Result<Self, MeshError> {
        if vertices.len() % FLOATS_PER_VERTEX != 0 {
            return Err(MeshError::UnalignedVertexData(vertices.len()));
        }
        Ok(Self {
            vertices,
            material: Material::default(),
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        let start = index.checked_mul(FLOATS_PER_VERTEX)?;
        let end = start.checked_add(FLOATS_PER_VERTEX)?;
        self.vertices.get(start..end).map(Vertex::from_interleaved)
    }

    /// Create a cube with flat face normals, used when no mesh file is given
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            ([0.0, 0.0, -1.0], [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
            ([0.0, 1.0, 0.0], [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]]),
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            ([1.0, 0.0, 0.0], [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]]),
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        let mut vertices = Vec::with_capacity(faces.len() * 6 * FLOATS_PER_VERTEX);
        for (normal, corners) in &faces {
            for &corner in &[0, 1, 2, 0, 2, 3] {
                vertices.extend_from_slice(&corners[corner]);
                vertices.extend_from_slice(normal);
            }
        }

        Self {
            vertices,
            material: Material::default(),
        }
    }
}
