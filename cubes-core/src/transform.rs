/// Model transform composition for scene objects
///
/// Every function here is pure: it takes a matrix (or builds one from the
/// identity) and returns a new one. Composition is post-multiplying, so in
/// `m * op` the `op` acts on the vertex first. Rotations are right-handed and
/// measured in radians.
use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::strategy::TransformStrategy;

/// Right-handed rotation of `angle` radians about `axis`.
///
/// A zero-length axis has no direction to rotate about and yields the identity.
pub fn rotation(angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
    match Unit::try_new(*axis, f32::EPSILON) {
        Some(axis) => Matrix4::from_axis_angle(&axis, angle),
        None => Matrix4::identity(),
    }
}

/// Create a translation matrix
pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(offset)
}

/// `m` followed (in object space) by a translation of `offset`.
pub fn translate(m: &Matrix4<f32>, offset: &Vector3<f32>) -> Matrix4<f32> {
    m * translation_matrix(offset)
}

/// `m` followed (in object space) by a rotation of `angle` about `axis`.
pub fn rotate(m: &Matrix4<f32>, angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
    m * rotation(angle, axis)
}

/// Translate by `-offset`, rotate, then translate back by `offset`.
///
/// Appended to an already positioned matrix this rotates the object about the
/// point that lies `offset` behind its current origin.
pub fn rotate_around(
    m: &Matrix4<f32>,
    angle: f32,
    axis: &Vector3<f32>,
    offset: &Vector3<f32>,
) -> Matrix4<f32> {
    let m = translate(m, &-offset);
    let m = rotate(&m, angle, axis);
    translate(&m, offset)
}

/// Identity translated to the object's base position.
pub fn place_at_base(base: &Point3<f32>) -> Matrix4<f32> {
    translation_matrix(&base.coords)
}

/// Rotate the object about its own center.
pub fn spin(base: &Point3<f32>, angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
    rotate(&place_at_base(base), angle, axis)
}

/// Rotate the object about `pivot`, a world-space point shared by every object.
///
/// The pivot rotation is inserted before the base placement in the cumulative
/// product. Swapping the two makes the object spin in place instead.
pub fn orbit_around_fixed_point(
    base: &Point3<f32>,
    angle: f32,
    axis: &Vector3<f32>,
    pivot: &Point3<f32>,
) -> Matrix4<f32> {
    let about_pivot = rotate(&translation_matrix(&pivot.coords), angle, axis);
    let about_pivot = translate(&about_pivot, &-pivot.coords);
    about_pivot * place_at_base(base)
}

/// Rotate the object about `pivot` using the object's own offset from it.
///
/// Starts from the placed matrix and appends translate(-d), rotate,
/// translate(d) where `d = base - pivot`. A pivot equal to the base position
/// gives `d = 0`, which is a plain spin.
pub fn orbit_around_relative_point(
    base: &Point3<f32>,
    angle: f32,
    axis: &Vector3<f32>,
    pivot: &Point3<f32>,
) -> Matrix4<f32> {
    let offset = base - pivot;
    rotate_around(&place_at_base(base), angle, axis, &offset)
}

/// Model matrix for one object for one frame.
pub fn model_matrix(
    base: &Point3<f32>,
    angle: f32,
    axis: &Vector3<f32>,
    pivot: &Point3<f32>,
    strategy: TransformStrategy,
) -> Matrix4<f32> {
    match strategy {
        TransformStrategy::Spin => spin(base, angle, axis),
        TransformStrategy::OrbitFixed => orbit_around_fixed_point(base, angle, axis, pivot),
        TransformStrategy::OrbitRelative => orbit_around_relative_point(base, angle, axis, pivot),
    }
}

/// Translation column of an affine matrix.
pub fn translation_of(m: &Matrix4<f32>) -> Vector3<f32> {
    Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    fn bases() -> Vec<Point3<f32>> {
        vec![
            Point3::origin(),
            Point3::new(3.0, 0.0, -14.0),
            Point3::new(-1.5, 2.0, -7.25),
        ]
    }

    #[test]
    fn test_zero_angle_is_placement_only() {
        let pivot = Point3::new(-2.0, 0.0, -10.0);
        for base in bases() {
            let placed = place_at_base(&base);
            for strategy in TransformStrategy::ALL {
                let m = model_matrix(&base, 0.0, &Vector3::y(), &pivot, strategy);
                assert!((m - placed).norm() < EPS, "{strategy} at {base}");
            }
        }
    }

    #[test]
    fn test_spin_keeps_translation() {
        let base = Point3::new(1.0, 2.0, 3.0);
        let m = spin(&base, 1.3, &Vector3::y());
        assert!((translation_of(&m) - base.coords).norm() < EPS);
    }

    #[test]
    fn test_spin_rotates_right_handed() {
        // +X rotated a quarter turn about +Y lands on -Z.
        let m = spin(&Point3::origin(), FRAC_PI_2, &Vector3::y());
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn test_relative_orbit_degenerates_to_spin() {
        for base in bases() {
            for step in 0..16 {
                let angle = step as f32 * 0.7;
                let spun = spin(&base, angle, &Vector3::y());
                let orbit = orbit_around_relative_point(&base, angle, &Vector3::y(), &base);
                assert!((spun - orbit).norm() < EPS);
            }
        }
    }

    #[test]
    fn test_fixed_orbit_preserves_distance_to_pivot() {
        let pivot = Point3::new(-2.0, 0.0, -10.0);
        let a = Point3::new(0.0, 0.0, -10.0);
        let b = Point3::new(4.0, 1.0, -16.0);
        for step in 0..32 {
            let angle = step as f32 * 0.37;
            for base in [a, b] {
                let m = orbit_around_fixed_point(&base, angle, &Vector3::y(), &pivot);
                let radius = (translation_of(&m) - pivot.coords).norm();
                assert!((radius - (base - pivot).norm()).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_fixed_orbit_half_turn_closed_form() {
        let base = Point3::origin();
        let pivot = Point3::new(-2.0, 0.0, -10.0);
        let m = orbit_around_fixed_point(&base, PI, &Vector3::y(), &pivot);
        let t = translation_of(&m);
        assert!((t - Vector3::new(-4.0, 0.0, -20.0)).norm() < EPS);
    }

    #[test]
    fn test_fixed_orbit_actually_moves_object() {
        let base = Point3::new(1.0, 0.0, 0.0);
        let m = orbit_around_fixed_point(&base, FRAC_PI_2, &Vector3::y(), &Point3::origin());
        assert!((translation_of(&m) - Vector3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn test_relative_orbit_circles_pivot() {
        let base = Point3::new(3.0, 0.0, -14.0);
        let pivot = Point3::new(0.0, 0.0, -14.0);
        let m = orbit_around_relative_point(&base, PI, &Vector3::y(), &pivot);
        assert!((translation_of(&m) - Vector3::new(-3.0, 0.0, -14.0)).norm() < EPS);
    }

    #[test]
    fn test_orbit_strategies_agree_on_placement() {
        let pivot = Point3::new(-2.0, 0.5, -10.0);
        for base in bases() {
            let fixed = orbit_around_fixed_point(&base, 2.1, &Vector3::y(), &pivot);
            let relative = orbit_around_relative_point(&base, 2.1, &Vector3::y(), &pivot);
            assert!((fixed - relative).norm() < 1e-4);
        }
    }

    #[test]
    fn test_zero_axis_is_identity_rotation() {
        let m = rotation(1.0, &Vector3::zeros());
        assert!((m - Matrix4::identity()).norm() < EPS);
    }

    #[test]
    fn test_mvp_order() {
        let model = translation_matrix(&Vector3::new(1.0, 0.0, 0.0));
        let view = translation_matrix(&Vector3::new(0.0, 0.0, -5.0));
        let mvp = mvp_matrix(&model, &view, &Matrix4::identity());
        assert!((translation_of(&mvp) - Vector3::new(1.0, 0.0, -5.0)).norm() < EPS);
    }
}
