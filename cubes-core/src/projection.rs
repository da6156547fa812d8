/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Eye at the origin looking down -Z, so the view matrix is the identity
    /// and scene coordinates are already in view space.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width as f32, height as f32).unwrap_or(1.0),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            position: Point3::from(config.position),
            target: Point3::from(config.target),
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            mode: if config.orthographic {
                ProjectionMode::Orthographic
            } else {
                ProjectionMode::Perspective
            },
            ..Self::new(width, height)
        }
    }

    /// Update the aspect ratio after a resize.
    ///
    /// A collapsed or non-finite viewport keeps the previous aspect.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        match aspect_ratio(width, height) {
            Some(aspect) => self.aspect = aspect,
            None => log::debug!("ignoring degenerate viewport {}x{}", width, height),
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a model-space point to screen space.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        project_point(&mvp, point, width as f32, height as f32)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Map a point through a complete model-view-projection to screen space.
///
/// Returns `(x, y, depth)` with depth in NDC. Points behind the eye or
/// outside the near/far range are rejected; x/y may fall off screen and
/// are left to the rasterizer to clip.
pub fn project_point(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: f32,
    height: f32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero or negative w
    if clip.w <= 1e-6 {
        return None;
    }

    let depth = clip.z / clip.w;
    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (clip.x / clip.w + 1.0) * 0.5 * width;
    let screen_y = (1.0 - clip.y / clip.w) * 0.5 * height;

    Some((screen_x, screen_y, depth))
}

/// `None` unless both sides are positive and finite
fn aspect_ratio(width: f32, height: f32) -> Option<f32> {
    let aspect = width / height;
    (width > 0.0 && height > 0.0 && aspect.is_finite() && aspect > 0.0).then_some(aspect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_view_is_identity() {
        let camera = Camera::new(800, 600);
        assert!((camera.view_matrix() - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let camera = Camera::new(800, 600);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -10.0), &Matrix4::identity(), 800, 600)
            .expect("point in front of the camera");
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = Camera::new(800, 600);
        let projected =
            camera.project_to_screen(&Point3::new(0.0, 0.0, 5.0), &Matrix4::identity(), 800, 600);
        assert!(projected.is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(800, 600);
        let depth = |z: f32| {
            camera
                .project_to_screen(&Point3::new(0.0, 0.0, z), &Matrix4::identity(), 800, 600)
                .map(|(_, _, d)| d)
        };
        assert!(depth(-5.0) < depth(-20.0));
    }

    #[test]
    fn test_zero_height_keeps_previous_aspect() {
        let mut camera = Camera::default();
        camera.set_aspect(640.0, 0.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(Camera::new(640, 0).aspect, 1.0);
    }

    #[test]
    fn test_degenerate_viewport_still_projects() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::default();
            camera.mode = mode;
            camera.target = Point3::new(0.0, 0.0, -10.0);
            for (width, height) in [(0.0, 600.0), (0.0, 0.0), (-4.0, 30.0), (f32::NAN, 1.0)] {
                camera.set_aspect(width, height);
                assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
                assert!(camera.projection_matrix().iter().all(|v| v.is_finite()));
            }
        }
    }
}
