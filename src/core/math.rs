// Conversions between the scene side (glam) and the engine side (nalgebra via rapier3d)

use glam::{Mat4, Quat, Vec3};
use rapier3d::prelude::{Isometry, Point, Real, Vector};

/// Convert a glam vector into an engine vector
pub fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

/// Convert a glam vector into an engine point
pub fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Convert an engine pose into a column-major 4x4 matrix for scene nodes
pub fn isometry_to_mat4(pose: &Isometry<Real>) -> Mat4 {
    let t = pose.translation.vector;
    let q = pose.rotation.quaternion();
    Mat4::from_rotation_translation(Quat::from_xyzw(q.i, q.j, q.k, q.w), Vec3::new(t.x, t.y, t.z))
}

/// Check that every component of a vector is strictly positive and finite
pub fn all_positive(v: Vec3) -> bool {
    v.is_finite() && v.min_element() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rapier3d::prelude::{nalgebra, vector};

    #[test]
    fn test_identity_pose() {
        let mat = isometry_to_mat4(&Isometry::identity());
        assert_eq!(mat, Mat4::IDENTITY);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let pose = Isometry::translation(1.0, 2.0, 3.0);
        let cols = isometry_to_mat4(&pose).to_cols_array();
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(cols[15], 1.0);
    }

    #[test]
    fn test_rotation_matches_engine() {
        let pose = Isometry::new(
            vector![0.0, 1.0, 0.0],
            vector![0.0, std::f32::consts::FRAC_PI_2, 0.0],
        );
        let mat = isometry_to_mat4(&pose);

        // Rotating +X by 90 degrees around +Y points at -Z
        let rotated = mat.transform_point3(Vec3::X);
        let expected = from_point(&(pose * to_point(Vec3::X)));
        assert_relative_eq!(rotated.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, expected.z, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_all_positive() {
        assert!(all_positive(Vec3::new(1.0, 0.5, 2.0)));
        assert!(!all_positive(Vec3::new(1.0, 0.0, 2.0)));
        assert!(!all_positive(Vec3::new(f32::NAN, 1.0, 1.0)));
    }
}
