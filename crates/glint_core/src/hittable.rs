//! Hittable trait and HitRecord for ray-surface intersection.

use crate::Material;
use glint_math::{Color, Interval, Ray, Vec3};

/// Record of a ray-surface intersection.
///
/// Everything the tracers need is copied out of the surface, so a record
/// never borrows from the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, pointing out of the surface
    pub normal: Vec3,
    /// Whether the ray arrived from the outside of the surface
    pub front_face: bool,
    /// Reflectance colour of the surface
    pub color: Color,
    /// Scattering behaviour of the surface
    pub material: Material,
    /// Emitted radiance if the surface is a light
    pub emission: Option<Color>,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            t: 0.0,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            front_face: true,
            color: Color::ZERO,
            material: Material::Diffuse,
            emission: None,
        }
    }
}

impl HitRecord {
    /// Record which side of the surface the ray came from.
    pub fn set_face(&mut self, ray: &Ray) {
        self.front_face = ray.direction().dot(self.normal) < 0.0;
    }

    /// The normal flipped to face against the incoming ray.
    pub fn face_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }

    pub fn refractive_index(&self) -> f32 {
        self.material.refractive_index()
    }
}

/// Trait for surfaces that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this surface strictly inside `ray_t`.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;

    /// Emissive surfaces are skipped by shadow rays and photon paths.
    fn is_emissive(&self) -> bool {
        false
    }
}
