/// Cubes Core Library - Object transforms and the per-frame driver
///
/// This library holds the stateless transform kernel (spin and the two orbit
/// strategies), the frame driver that feeds it, and the static collaborators
/// every rendering backend shares: cube mesh, scene, camera, lighting and
/// configuration.

pub mod backend;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod scene;
pub mod strategy;
pub mod transform;

// Re-export commonly used types
pub use backend::{DrawCall, RenderBackend};
pub use config::{ConfigError, DemoConfig};
pub use frame::{FrameDriver, FrameTimer, RotationAngle};
pub use geometry::{Mesh, Vertex};
pub use lighting::DirectionalLight;
pub use projection::{Camera, ProjectionMode};
pub use scene::{ObjectId, Scene, SceneObject};
pub use strategy::{StrategySelector, TransformStrategy};
