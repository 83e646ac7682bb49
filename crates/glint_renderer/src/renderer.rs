//! Camera pass of the photon mapper.
//!
//! Each camera ray finds its closest hit and combines:
//! - shadow-ray direct lighting from every light sample
//! - the photon map density estimate (indirect)
//! - recursive mirror and glass contributions

use crate::scatter::{mirror_ray, refraction_ray, shading_normal};
use crate::{Camera, PhotonMap, RefractionModel, RenderConfig, RenderMode};
use glint_core::scene::{RAY_T_MAX, RAY_T_MIN};
use glint_core::{HitRecord, Hittable, Material, Scene};
use glint_math::{Color, Interval, Ray};
use std::f32::consts::PI;

/// Radiance arriving along `ray`.
///
/// Depth counts from 0 at the camera; anything deeper than
/// `config.max_ray_depth` is black.
pub fn trace(ray: &Ray, scene: &Scene, photon_map: &PhotonMap, config: &RenderConfig, depth: u32) -> Color {
    if depth > config.max_ray_depth {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene.hit(ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec) {
        return config.background;
    }

    if let Some(emission) = rec.emission {
        return emission;
    }

    let direct = direct_lighting(scene, &rec, config.shadow_bias, config.refraction);
    let indirect = match config.mode {
        RenderMode::Combined => photon_map.estimate_radiance(
            rec.point,
            shading_normal(&rec, config.refraction),
            config.search_radius,
            config.max_photons_per_estimate,
        ),
        RenderMode::DirectOnly => Color::ZERO,
    };

    let mut color = rec.color * (direct + indirect);

    match rec.material {
        Material::Diffuse => {}
        Material::Specular => {
            let reflected = mirror_ray(ray, &rec, config.refraction, config.shadow_bias);
            color += trace(&reflected, scene, photon_map, config, depth + 1);
        }
        Material::Refractive { .. } => {
            let refracted = refraction_ray(ray, &rec, config.refraction, config.shadow_bias);
            color += trace(&refracted, scene, photon_map, config, depth + 1);
        }
    }

    color
}

/// Inverse-square lighting from every light, averaged over each light's
/// samples. Occluded samples contribute nothing.
pub fn direct_lighting(scene: &Scene, rec: &HitRecord, bias: f32, model: RefractionModel) -> Color {
    let normal = shading_normal(rec, model);
    let origin = rec.point + normal * bias;
    let mut total = Color::ZERO;

    for light in scene.lights() {
        let mut sum = Color::ZERO;
        for &sample in light.samples() {
            let to_light = sample - rec.point;
            let distance = to_light.length();
            if distance <= f32::EPSILON {
                continue;
            }
            let light_dir = to_light / distance;

            let shadow_ray = Ray::new(origin, light_dir);
            if scene.occluded(&shadow_ray, distance) {
                continue;
            }

            let cosine = normal.dot(light_dir).max(0.0);
            sum += light.power() * cosine / (4.0 * PI * distance * distance);
        }
        total += sum / light.sample_count() as f32;
    }

    total
}

/// Colour of pixel (x, y): one ray through the pixel centre.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    photon_map: &PhotonMap,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let ray = camera.get_ray(x, y);
    trace(&ray, scene, photon_map, config, 0)
}

/// Linear RGB image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered tile into place.
    pub fn write_bucket(&mut self, result: &crate::BucketResult) {
        let bucket = &result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                self.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    /// Gamma-corrected 8-bit RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&crate::color_to_rgba(*color));
        }
        bytes
    }
}

/// Render the entire image on the calling thread.
///
/// `camera` must already be initialized.
pub fn render(camera: &Camera, scene: &Scene, photon_map: &PhotonMap, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            image.set(x, y, render_pixel(camera, scene, photon_map, x, y, config));
        }
    }

    image
}
