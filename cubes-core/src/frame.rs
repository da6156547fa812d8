/// Per-frame angle accumulation and draw submission
use nalgebra::{Matrix4, Point3, Vector3};

use crate::backend::{DrawCall, RenderBackend};
use crate::lighting::DirectionalLight;
use crate::projection::Camera;
use crate::scene::Scene;
use crate::strategy::TransformStrategy;
use crate::transform;

/// Elapsed-time sample clamped to a usable increment
fn clamp_elapsed(elapsed: f32) -> f32 {
    // NaN fails the comparison and is dropped together with regressions.
    if elapsed > 0.0 {
        elapsed
    } else {
        0.0
    }
}

/// Rotation angle in radians, grown by elapsed seconds. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationAngle(f32);

impl RotationAngle {
    pub fn radians(self) -> f32 {
        self.0
    }

    /// Add one frame's elapsed seconds. Negative samples add nothing.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        self.0 += clamp_elapsed(elapsed);
        self.0
    }
}

/// Turns host tick timestamps into per-frame elapsed seconds
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous timestamp.
    ///
    /// The first sample only sets the baseline. A timestamp older than the
    /// previous one yields zero and becomes the new baseline.
    pub fn delta(&mut self, now_secs: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) if now_secs < last => {
                log::debug!("clock went backwards by {:.6}s", last - now_secs);
                0.0
            }
            Some(last) => (now_secs - last) as f32,
            None => 0.0,
        };
        self.last = Some(now_secs);
        elapsed
    }
}

/// Drives every object's transform once per tick
#[derive(Debug, Clone)]
pub struct FrameDriver {
    angle: RotationAngle,
    pub axis: Vector3<f32>,
    pub pivot: Point3<f32>,
    /// Multiplier on elapsed time
    pub speed: f32,
    frame_index: u64,
}

impl FrameDriver {
    pub fn new(axis: Vector3<f32>, pivot: Point3<f32>) -> Self {
        Self {
            angle: RotationAngle::default(),
            axis,
            pivot,
            speed: 1.0,
            frame_index: 0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle.radians()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Model matrix of every object at the current angle, in insertion order
    pub fn model_matrices(&self, scene: &Scene, strategy: TransformStrategy) -> Vec<Matrix4<f32>> {
        scene
            .objects()
            .iter()
            .map(|object| {
                transform::model_matrix(
                    object.base_position(),
                    self.angle.radians(),
                    &self.axis,
                    &self.pivot,
                    strategy,
                )
            })
            .collect()
    }

    /// Render one frame with `strategy`, then advance the angle.
    ///
    /// The strategy is fixed for the whole frame. On a backend error the
    /// frame is abandoned and the angle is left untouched.
    pub fn frame<B: RenderBackend>(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        light: &DirectionalLight,
        strategy: TransformStrategy,
        elapsed: f32,
        backend: &mut B,
    ) -> Result<(), B::Error> {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        backend.begin_frame()?;
        for (object, model) in scene
            .objects()
            .iter()
            .zip(self.model_matrices(scene, strategy))
        {
            backend.draw(&DrawCall {
                object: object.id(),
                mesh: object.mesh(),
                model,
                view,
                projection,
                light,
            })?;
        }
        backend.end_frame()?;

        self.angle.advance(clamp_elapsed(elapsed) * self.speed);
        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(())
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(Vector3::y(), Point3::new(-2.0, 0.0, -10.0))
    }
}
