/// Directional lighting shared by every backend
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::geometry::Color;

/// Ambient term plus one directional light
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub ambient: [f32; 3],
    pub color: [f32; 3],
    /// Direction pointing towards the light
    pub direction: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(ambient: [f32; 3], color: [f32; 3], direction: Vector3<f32>) -> Self {
        Self {
            ambient,
            color,
            direction,
        }
    }

    /// Per-channel light intensity for a view-space normal
    pub fn intensity(&self, normal: &Vector3<f32>) -> [f32; 3] {
        let lambert = match (
            normal.try_normalize(f32::EPSILON),
            self.direction.try_normalize(f32::EPSILON),
        ) {
            (Some(n), Some(d)) => n.dot(&d).max(0.0),
            _ => 0.0,
        };
        [
            self.ambient[0] + self.color[0] * lambert,
            self.ambient[1] + self.color[1] * lambert,
            self.ambient[2] + self.color[2] * lambert,
        ]
    }

    /// Apply the light to a vertex color; alpha is passed through.
    pub fn shade(&self, color: &Color, normal: &Vector3<f32>) -> Color {
        let light = self.intensity(normal);
        [
            (color[0] * light[0]).min(1.0),
            (color[1] * light[1]).min(1.0),
            (color[2] * light[2]).min(1.0),
            color[3],
        ]
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            ambient: [0.3, 0.3, 0.3],
            color: [1.0, 1.0, 1.0],
            direction: Vector3::new(0.85, 0.8, 0.75),
        }
    }
}

/// Inverse-transpose of a model-view matrix, for transforming normals.
///
/// Falls back to the identity for singular matrices.
pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix4<f32> {
    model_view
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::identity)
}

/// Rotate a normal by the upper 3x3 of a normal matrix
pub fn transform_normal(normal_matrix: &Matrix4<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    let upper: Matrix3<f32> = normal_matrix.fixed_view::<3, 3>(0, 0).clone_owned();
    upper * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform;

    #[test]
    fn test_facing_away_gets_ambient_only() {
        let light = DirectionalLight::default();
        let back = -light.direction;
        assert_eq!(light.intensity(&back), light.ambient);
    }

    #[test]
    fn test_facing_light_gets_full_intensity() {
        let light = DirectionalLight::default();
        let lit = light.intensity(&light.direction);
        for channel in lit {
            assert!((channel - 1.3).abs() < 1e-5);
        }
    }

    #[test]
    fn test_shade_clamps_and_keeps_alpha() {
        let light = DirectionalLight::default();
        let shaded = light.shade(&[1.0, 0.5, 0.0, 0.75], &light.direction);
        assert_eq!(shaded[0], 1.0);
        assert!((shaded[1] - 0.65).abs() < 1e-5);
        assert_eq!(shaded[2], 0.0);
        assert_eq!(shaded[3], 0.75);
    }

    #[test]
    fn test_normal_matrix_ignores_translation() {
        let m = transform::spin(&nalgebra::Point3::new(4.0, 5.0, 6.0), 0.0, &Vector3::y());
        let n = transform_normal(&normal_matrix(&m), &Vector3::z());
        assert!((n - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_follows_rotation() {
        let m = transform::rotation(std::f32::consts::FRAC_PI_2, &Vector3::y());
        let n = transform_normal(&normal_matrix(&m), &Vector3::x());
        assert!((n + Vector3::z()).norm() < 1e-5);
    }
}
