//! Math utilities and types
//!
//! Provides the 2D vector and 4x4 matrix types used by gameplay, physics
//! synchronisation and sprite rendering.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Orthographic projection over a pixel viewport with the origin at the
/// bottom-left corner and +Y pointing up.
pub fn orthographic(width: f32, height: f32) -> Mat4 {
    Mat4::new_orthographic(0.0, width, 0.0, height, -1.0, 1.0)
}

/// Model matrix for a 2D position and scale (translate, then scale).
pub fn translate_scale(position: Vec2, scale: Vec2) -> Mat4 {
    Mat4::new_translation(&Vec3::new(position.x, position.y, 0.0))
        * Mat4::new_nonuniform_scaling(&Vec3::new(scale.x, scale.y, 1.0))
}

/// Sign of `value` as -1, 0 or 1.
pub fn signum_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orthographic_maps_viewport_corners() {
        let projection = orthographic(640.0, 368.0);

        let bottom_left = projection * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);
        let top_right = projection * nalgebra::Vector4::new(640.0, 368.0, 0.0, 1.0);

        assert_relative_eq!(bottom_left.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(bottom_left.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(top_right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(top_right.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translate_scale_order() {
        let matrix = translate_scale(Vec2::new(10.0, 20.0), Vec2::new(2.0, 3.0));
        let corner = matrix * nalgebra::Vector4::new(1.0, 1.0, 0.0, 1.0);

        // Scale applies first, then translation
        assert_relative_eq!(corner.x, 12.0);
        assert_relative_eq!(corner.y, 23.0);
    }

    #[test]
    fn test_signum_or_zero() {
        assert_relative_eq!(signum_or_zero(3.5), 1.0);
        assert_relative_eq!(signum_or_zero(-0.2), -1.0);
        assert_relative_eq!(signum_or_zero(0.0), 0.0);
    }
}
