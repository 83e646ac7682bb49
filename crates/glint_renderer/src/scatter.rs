//! Scattering directions shared by the photon tracer and the camera pass.

use crate::RefractionModel;
use glint_core::HitRecord;
use glint_math::{Onb, Ray, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Refracted vectors shorter than this signal total internal reflection.
const TIR_EPSILON: f32 = 0.001;

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `incident` through a surface with unit normal `n`.
///
/// `eta` is the ratio of indices on the incident side over the far side.
/// Returns `Vec3::ZERO` on total internal reflection.
#[inline]
pub fn refract(incident: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_i = n.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident - (eta * cos_i + k.sqrt()) * n
    }
}

/// Direction uniformly distributed over the unit sphere.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let theta = 2.0 * PI * gen_f32(rng);
    let phi = (1.0 - 2.0 * gen_f32(rng)).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Cosine-weighted direction on the hemisphere around unit `normal`.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = 2.0 * PI * gen_f32(rng);
    let r2 = gen_f32(rng);
    let r2s = r2.sqrt();

    let onb = Onb::from_w(normal);
    onb.local(r1.cos() * r2s, r1.sin() * r2s, (1.0 - r2).sqrt())
        .normalize()
}

/// Normal used for offsets and shading: facing the incoming ray under
/// `Physical`, outward under `Legacy`.
pub fn shading_normal(rec: &HitRecord, model: RefractionModel) -> Vec3 {
    match model {
        RefractionModel::Physical => rec.face_normal(),
        RefractionModel::Legacy => rec.normal,
    }
}

/// Continuation ray for a perfect mirror.
pub fn mirror_ray(ray: &Ray, rec: &HitRecord, model: RefractionModel, bias: f32) -> Ray {
    let n = shading_normal(rec, model);
    Ray::new(rec.point + n * bias, reflect(ray.direction(), n))
}

/// Continuation ray through a dielectric, falling back to mirror
/// reflection on total internal reflection.
pub fn refraction_ray(ray: &Ray, rec: &HitRecord, model: RefractionModel, bias: f32) -> Ray {
    let ior = rec.refractive_index();
    let d = ray.direction();

    match model {
        RefractionModel::Physical => {
            let n = rec.face_normal();
            let eta = if rec.front_face { 1.0 / ior } else { ior };
            let refracted = refract(d, n, eta);
            if refracted.length() < TIR_EPSILON {
                Ray::new(rec.point + n * bias, reflect(d, n))
            } else {
                Ray::new(rec.point - n * bias, refracted)
            }
        }
        RefractionModel::Legacy => {
            let n = rec.normal;
            let eta = if ior > 1.0 { 1.0 / ior } else { ior };
            let mut refracted = refract(d, n, eta);
            if refracted.length() < TIR_EPSILON {
                refracted = reflect(d, n);
            }
            Ray::new(rec.point - n * bias, refracted)
        }
    }
}
