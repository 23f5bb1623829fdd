use glam::{Mat4, Vec2, Vec3};
use oasis_common::Ray;

/// Where the camera sits and what it looks at.
///
/// Each world designates one; the engine owns everything else about the
/// camera. The core only needs it to turn a pointer position into a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 20.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

impl CameraPose {
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, Self::NEAR, Self::FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Unproject a pointer position in normalized device coordinates
    /// ([-1, 1] on both axes, +Y up) into a world-space ray.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inverse = self.view_projection(aspect).inverse();
        // perspective_rh maps depth to [0, 1].
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }
}
