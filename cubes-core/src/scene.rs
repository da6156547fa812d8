/// Scene objects and their fixed placement
use nalgebra::Point3;
use std::fmt;
use std::sync::Arc;

use crate::config::SceneConfig;
use crate::geometry::Mesh;

/// Insertion index of an object in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable object. Its base position is fixed at construction.
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    base_position: Point3<f32>,
    mesh: Arc<Mesh>,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn base_position(&self) -> &Point3<f32> {
        &self.base_position
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

/// Objects in insertion order. Objects are never removed.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// One cube per configured base position, all sharing a single mesh
    pub fn from_config(config: &SceneConfig) -> Self {
        let mesh = Arc::new(Mesh::cube(config.cube_size));
        let mut scene = Self::new();
        for position in &config.objects {
            scene.add_shared(Point3::from(*position), Arc::clone(&mesh));
        }
        scene
    }

    pub fn add(&mut self, base_position: Point3<f32>, mesh: Mesh) -> ObjectId {
        self.add_shared(base_position, Arc::new(mesh))
    }

    pub fn add_shared(&mut self, base_position: Point3<f32>, mesh: Arc<Mesh>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        log::debug!("scene object {} at {}", id, base_position);
        self.objects.push(SceneObject {
            id,
            base_position,
            mesh,
        });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
