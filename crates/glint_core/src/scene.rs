//! Scene container and builder.
//!
//! A `Scene` owns its surfaces and lights and is read-only once built. All
//! intersection queries used by the photon tracer and the renderer go
//! through here.

use crate::hittable::{HitRecord, Hittable};
use crate::{Light, Sphere};
use glint_math::{Color, Interval, Ray, Vec3};
use thiserror::Error;

/// Closest parametric distance accepted for any scene query.
pub const RAY_T_MIN: f32 = 0.001;

/// Farthest parametric distance considered for camera and photon rays.
pub const RAY_T_MAX: f32 = 10_000.0;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Refractive index must be positive and finite, got {0}")]
    InvalidRefractiveIndex(f32),

    #[error("Light power must be finite and non-negative, got {0:?}")]
    InvalidLightPower(Color),

    #[error("Light has no sample positions")]
    NoLightSamples,

    #[error("Non-finite position {0:?}")]
    NonFinitePosition(Vec3),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene description error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Surfaces and lights of a renderable scene.
pub struct Scene {
    surfaces: Vec<Box<dyn Hittable>>,
    lights: Vec<Light>,
}

impl Scene {
    /// Start building a scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Sum of all light powers.
    pub fn total_light_power(&self) -> Color {
        self.lights.iter().map(Light::power).sum()
    }

    /// Closest hit among surfaces that are not light emitters.
    ///
    /// Photon paths use this so a photon leaving a light sample placed
    /// inside its own emitter sphere is not absorbed by it.
    pub fn hit_non_emissive(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        self.closest_hit(ray, ray_t, rec, false)
    }

    /// True if any non-emissive surface blocks `ray` before `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        let ray_t = Interval::new(RAY_T_MIN, max_distance);
        let mut rec = HitRecord::default();
        self.surfaces
            .iter()
            .filter(|s| !s.is_emissive())
            .any(|s| s.hit(ray, ray_t, &mut rec))
    }

    fn closest_hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        include_emitters: bool,
    ) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for surface in &self.surfaces {
            if !include_emitters && surface.is_emissive() {
                continue;
            }
            if surface.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        self.closest_hit(ray, ray_t, rec, true)
    }
}

/// Validating builder for [`Scene`].
///
/// Validation happens in [`SceneBuilder::build`]; the first invalid
/// surface or light is reported.
#[derive(Default)]
pub struct SceneBuilder {
    spheres: Vec<Sphere>,
    custom: Vec<Box<dyn Hittable>>,
    lights: Vec<Light>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere.
    pub fn sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    /// Add a surface of any other shape. It is not validated.
    pub fn surface(mut self, surface: Box<dyn Hittable>) -> Self {
        self.custom.push(surface);
        self
    }

    /// Add a light.
    pub fn light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Validate everything and freeze the scene.
    pub fn build(self) -> SceneResult<Scene> {
        for sphere in &self.spheres {
            sphere.validate()?;
        }
        for light in &self.lights {
            light.validate()?;
        }

        let mut surfaces: Vec<Box<dyn Hittable>> = Vec::with_capacity(self.spheres.len() + self.custom.len());
        surfaces.extend(
            self.spheres
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn Hittable>),
        );
        surfaces.extend(self.custom);

        log::debug!(
            "Built scene with {} surfaces and {} lights",
            surfaces.len(),
            self.lights.len()
        );

        Ok(Scene {
            surfaces,
            lights: self.lights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Color::ONE, Material::Diffuse)
    }

    #[test]
    fn test_closest_hit_wins() {
        let scene = Scene::builder()
            .sphere(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0))
            .sphere(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0))
            .sphere(sphere(Vec3::new(0.0, 0.0, -6.0), 1.0))
            .build()
            .unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(scene.hit(&ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::builder().build().unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();

        assert!(!scene.hit(&ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec));
        assert!(!scene.occluded(&ray, RAY_T_MAX));
        assert_eq!(scene.total_light_power(), Color::ZERO);
    }

    #[test]
    fn test_emitters_skipped_by_photon_and_shadow_queries() {
        let scene = Scene::builder()
            .sphere(sphere(Vec3::new(0.0, 5.0, 0.0), 0.5).with_emission(Color::splat(10.0)))
            .sphere(sphere(Vec3::new(0.0, 10.0, 0.0), 1.0))
            .build()
            .unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();

        // Camera-style query sees the emitter first
        assert!(scene.hit(&ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec));
        assert!(rec.is_emissive());

        // Photon-style query passes through it
        assert!(scene.hit_non_emissive(&ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec));
        assert!(!rec.is_emissive());
        assert!((rec.t - 9.0).abs() < 1e-4);

        // Shadow rays to a sample inside the emitter are not blocked by it
        assert!(!scene.occluded(&ray, 5.0));
        assert!(scene.occluded(&ray, 9.5));
    }

    #[test]
    fn test_occluded_respects_distance() {
        let scene = Scene::builder()
            .sphere(sphere(Vec3::new(0.0, 2.0, 0.0), 0.5))
            .build()
            .unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(scene.occluded(&ray, 5.0));
        assert!(!scene.occluded(&ray, 1.0));
    }

    #[test]
    fn test_builder_reports_invalid_input() {
        let bad_sphere = Scene::builder().sphere(sphere(Vec3::ZERO, -1.0)).build();
        assert!(matches!(bad_sphere, Err(SceneError::InvalidRadius(_))));

        let bad_light = Scene::builder()
            .light(Light::point(Vec3::ZERO, Color::splat(-1.0)))
            .build();
        assert!(matches!(bad_light, Err(SceneError::InvalidLightPower(_))));
    }

    #[test]
    fn test_total_light_power() {
        let scene = Scene::builder()
            .light(Light::point(Vec3::Y, Color::splat(100.0)))
            .light(Light::point(Vec3::X, Color::new(1.0, 2.0, 3.0)))
            .build()
            .unwrap();

        assert_eq!(scene.light_count(), 2);
        assert_eq!(scene.total_light_power(), Color::new(101.0, 102.0, 103.0));
    }
}
