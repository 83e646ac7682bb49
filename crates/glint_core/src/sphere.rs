//! Sphere primitive.

use crate::hittable::{HitRecord, Hittable};
use crate::scene::{SceneError, SceneResult};
use crate::Material;
use glint_math::{Color, Interval, Ray, Vec3};

/// A sphere with a reflectance colour, a material tag and optional emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    color: Color,
    material: Material,
    emission: Option<Color>,
}

impl Sphere {
    /// Create a new non-emissive sphere.
    pub fn new(center: Vec3, radius: f32, color: Color, material: Material) -> Self {
        Self {
            center,
            radius,
            color,
            material,
            emission: None,
        }
    }

    /// Turn the sphere into a visible emitter.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = Some(emission);
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn emission(&self) -> Option<Color> {
        self.emission
    }

    /// Check radius, centre and refractive index.
    pub fn validate(&self) -> SceneResult<()> {
        if !self.center.is_finite() {
            return Err(SceneError::NonFinitePosition(self.center));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SceneError::InvalidRadius(self.radius));
        }
        if let Material::Refractive { ior } = self.material {
            if !(ior.is_finite() && ior > 0.0) {
                return Err(SceneError::InvalidRefractiveIndex(ior));
            }
        }
        Ok(())
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root first; the far root covers rays starting inside
        let mut root = (-b - sqrtd) / (2.0 * a);
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / (2.0 * a);
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.point = ray.at(root);
        rec.normal = (rec.point - self.center).normalize();
        rec.set_face(ray);
        rec.color = self.color;
        rec.material = self.material;
        rec.emission = self.emission;

        true
    }

    fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
}
