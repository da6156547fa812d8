/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// A 3D vertex with position, color and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Color,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, color: Color, normal: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            normal,
        }
    }
}

/// Face colors in face order: front, back, top, bottom, right, left
pub const CUBE_FACE_COLORS: [Color; 6] = [
    [1.0, 1.0, 1.0, 1.0], // white
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 1.0, 1.0], // purple
];

/// Unit-cube corners per face, wound counter-clockwise seen from outside
#[rustfmt::skip]
const CUBE_FACES: [([[f32; 3]; 4], [f32; 3]); 6] = [
    // Front
    ([[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]], [ 0.0,  0.0,  1.0]),
    // Back
    ([[-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0]], [ 0.0,  0.0, -1.0]),
    // Top
    ([[-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0]], [ 0.0,  1.0,  0.0]),
    // Bottom
    ([[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]], [ 0.0, -1.0,  0.0]),
    // Right
    ([[ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0]], [ 1.0,  0.0,  0.0]),
    // Left
    ([[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]], [-1.0,  0.0,  0.0]),
];

/// Indexed triangle mesh, uploaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    /// Cube centered on the local origin with corners at `±size`.
    ///
    /// Four vertices per face so every face keeps a flat normal and a single
    /// color.
    pub fn cube(size: f32) -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, ((corners, normal), color)) in
            CUBE_FACES.iter().zip(CUBE_FACE_COLORS).enumerate()
        {
            let normal = Vector3::from(*normal);
            for corner in corners {
                let position = Point3::from(Vector3::from(*corner) * size);
                vertices.push(Vertex::new(position, color, normal));
            }

            let first = (face * 4) as u16;
            indices.extend_from_slice(&[
                first,
                first + 1,
                first + 2,
                first,
                first + 2,
                first + 3,
            ]);
        }

        Self::new(vertices, indices)
    }

    /// Number of indices submitted per draw call
    pub fn triangle_vertex_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.color).collect()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x, v.normal.y, v.normal.z])
            .collect()
    }
}
