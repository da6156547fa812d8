/// Boundary between the frame driver and a rendering backend
use nalgebra::Matrix4;

use crate::geometry::Mesh;
use crate::lighting::DirectionalLight;
use crate::scene::ObjectId;

/// Everything a backend needs for one draw call.
///
/// Matrices are column-major, ready for upload as-is.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub object: ObjectId,
    pub mesh: &'a Mesh,
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub light: &'a DirectionalLight,
}

impl DrawCall<'_> {
    pub fn model_view(&self) -> Matrix4<f32> {
        self.view * self.model
    }
}

/// A rendering backend driven once per tick.
///
/// Backends own every platform failure (context loss, shader errors, I/O);
/// the driver only forwards them.
pub trait RenderBackend {
    type Error;

    /// Clear color and depth for a new frame
    fn begin_frame(&mut self) -> Result<(), Self::Error>;

    /// Draw one object
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), Self::Error>;

    /// Flush the finished frame
    fn end_frame(&mut self) -> Result<(), Self::Error>;
}
