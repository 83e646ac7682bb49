//! Pinhole camera for primary ray generation.

use crate::{RenderError, RenderResult};
use glint_math::{Ray, Vec3};

/// Camera for generating one ray through the centre of each pixel.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 600,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 45.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            half_width: 0.0,
            half_height: 0.0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    ///
    /// Fails on an empty image, a field of view outside (0, 180) degrees,
    /// or a view direction that is zero or parallel to `vup`.
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::DegenerateCamera("field of view must be in (0, 180) degrees"));
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() <= f32::EPSILON {
            return Err(RenderError::DegenerateCamera("eye and look-at point coincide"));
        }
        self.w = view.normalize();

        let side = self.vup.cross(self.w);
        if side.length_squared() <= f32::EPSILON {
            return Err(RenderError::DegenerateCamera("up vector is parallel to the view direction"));
        }
        self.u = side.normalize();
        self.v = self.w.cross(self.u);

        let aspect = self.image_width as f32 / self.image_height as f32;
        self.half_height = (self.vfov.to_radians() / 2.0).tan();
        self.half_width = aspect * self.half_height;

        Ok(())
    }

    /// Primary ray through the centre of pixel (x, y). Row 0 is the top.
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        let ndc_x = (x as f32 + 0.5) / self.image_width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (y as f32 + 0.5) / self.image_height as f32 * 2.0;

        let direction = self.u * ndc_x * self.half_width + self.v * ndc_y * self.half_height - self.w;
        Ray::new(self.look_from, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(45.0);
        camera.initialize().unwrap();
        camera
    }

    #[test]
    fn test_camera_basis() {
        let camera = scenario_camera(800, 600);

        let expected_w = Vec3::new(0.0, 2.0, 4.0).normalize();
        assert!((camera.w - expected_w).length() < 1e-5);
        assert!((camera.u - Vec3::X).length() < 1e-5);
        assert!(camera.v.dot(camera.w).abs() < 1e-5);
        assert!(camera.v.y > 0.0);
    }

    #[test]
    fn test_centre_ray_points_at_target() {
        // Even resolution: average the four centre pixels
        let camera = scenario_camera(2, 2);
        let mut sum = Vec3::ZERO;
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            sum += camera.get_ray(x, y).direction;
        }
        let target = (Vec3::new(0.0, 0.0, -1.0) - Vec3::new(0.0, 2.0, 3.0)).normalize();
        assert!(sum.normalize().dot(target) > 0.9999);
    }

    #[test]
    fn test_row_zero_is_top() {
        let camera = scenario_camera(100, 100);
        let top = camera.get_ray(50, 0);
        let bottom = camera.get_ray(50, 99);
        assert!(top.direction.y > bottom.direction.y);

        let left = camera.get_ray(0, 50);
        let right = camera.get_ray(99, 50);
        assert!(left.direction.x < right.direction.x);
    }

    #[test]
    fn test_fov_spans_image() {
        let camera = scenario_camera(1, 1000);
        let top = camera.get_ray(0, 0).direction;
        let bottom = camera.get_ray(0, 999).direction;
        let angle = top.dot(bottom).acos().to_degrees();
        assert!((angle - 45.0).abs() < 0.2, "angle {}", angle);
    }

    #[test]
    fn test_degenerate_cameras_fail() {
        let mut zero = Camera::new().with_resolution(0, 10);
        assert!(matches!(
            zero.initialize(),
            Err(RenderError::InvalidResolution { .. })
        ));

        let mut same_point = Camera::new().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(matches!(
            same_point.initialize(),
            Err(RenderError::DegenerateCamera(_))
        ));

        let mut looking_up = Camera::new().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(looking_up.initialize().is_err());

        let mut flat = Camera::new().with_fov(0.0);
        assert!(flat.initialize().is_err());
    }
}
