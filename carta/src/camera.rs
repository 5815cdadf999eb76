//! Camera descriptors and projection parameters.

use nalgebra::Vector2;

use crate::stops::ZoomDependent;

/// The projection model of the map camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraType {
    /// Central projection with a configurable field of view and vanishing
    /// point.
    Perspective,
    /// Orthographic projection with the ground plane sheared along an
    /// oblique axis.
    Isometric,
    /// Plain top-down orthographic projection.
    Flat,
}

/// Projection-specific camera parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraProjection {
    /// Central projection.
    Perspective {
        /// Vertical field of view in radians, optionally varying with zoom.
        field_of_view: ZoomDependent,
        /// Offset of the vanishing point from the viewport center, in
        /// pixels.
        vanishing_point: Vector2<f32>,
    },
    /// Oblique orthographic projection.
    Isometric {
        /// Shear applied to the ground plane per unit of geometry height.
        oblique_axis: Vector2<f32>,
    },
    /// Top-down orthographic projection.
    Flat,
}

impl CameraProjection {
    /// The camera type this projection selects.
    pub fn camera_type(&self) -> CameraType {
        match self {
            CameraProjection::Perspective { .. } => CameraType::Perspective,
            CameraProjection::Isometric { .. } => CameraType::Isometric,
            CameraProjection::Flat => CameraType::Flat,
        }
    }
}

/// A complete camera description, applied with
/// [`View::set_camera`](crate::view::View::set_camera).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    /// Projection model and its parameters.
    pub projection: CameraProjection,
    /// Maximum pitch angle in degrees, optionally varying with zoom.
    pub max_pitch: ZoomDependent,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: CameraProjection::Perspective {
                field_of_view: ZoomDependent::Fixed(std::f32::consts::FRAC_PI_4),
                vanishing_point: Vector2::new(0.0, 0.0),
            },
            max_pitch: ZoomDependent::Fixed(90.0),
        }
    }
}

/// Converts a focal length, in multiples of the viewport height, into the
/// equivalent vertical field of view in radians.
pub fn focal_length_to_field_of_view(length: f32) -> f32 {
    2.0 * (0.5 / length).atan()
}

/// Inverse of [`focal_length_to_field_of_view`].
pub fn field_of_view_to_focal_length(radians: f32) -> f32 {
    0.5 / (radians * 0.5).tan()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn focal_length_and_field_of_view_are_inverses() {
        for &length in &[0.5, 1.0, 2.0, 28.0] {
            let fov = focal_length_to_field_of_view(length);
            assert_relative_eq!(field_of_view_to_focal_length(fov), length, epsilon = 1e-5);
        }
    }

    #[test]
    fn default_camera_is_perspective() {
        let camera = Camera::default();
        assert_eq!(camera.projection.camera_type(), CameraType::Perspective);
        assert_relative_eq!(camera.max_pitch.eval(10.0), 90.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn camera_round_trips_through_json() {
        let camera = Camera {
            projection: CameraProjection::Isometric {
                oblique_axis: Vector2::new(0.5, 1.0),
            },
            max_pitch: ZoomDependent::Fixed(60.0),
        };
        let json = serde_json::to_string(&camera).expect("serializable");
        let back: Camera = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, camera);
    }
}
