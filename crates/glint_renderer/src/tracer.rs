//! Photon emission pass.
//!
//! Photons leave the lights in uniformly random directions, bounce through
//! the scene and are stored on diffuse surfaces. Work is split into
//! fixed-size chunks, each with its own seeded generator, so the resulting
//! map depends only on the scene and the configuration.

use crate::scatter::{cosine_hemisphere, gen_f32, mirror_ray, refraction_ray, uniform_sphere};
use crate::{DepositPolicy, Photon, PhotonConfig, PhotonMap};
use glint_core::scene::{RAY_T_MAX, RAY_T_MIN};
use glint_core::{HitRecord, Light, Material, Scene};
use glint_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Lights with their selection probabilities, proportional to power.
struct LightTable<'a> {
    lights: Vec<(&'a Light, f32)>,
}

impl<'a> LightTable<'a> {
    fn new(scene: &'a Scene) -> Option<Self> {
        let total: f32 = scene.lights().iter().map(Light::total_power).sum();
        if total <= 0.0 {
            return None;
        }
        let lights = scene
            .lights()
            .iter()
            .filter(|l| l.total_power() > 0.0)
            .map(|l| (l, l.total_power() / total))
            .collect();
        Some(Self { lights })
    }

    fn pick(&self, rng: &mut dyn RngCore) -> (&'a Light, f32) {
        let u = gen_f32(rng);
        let mut cumulative = 0.0;
        for &(light, probability) in &self.lights {
            cumulative += probability;
            if u < cumulative {
                return (light, probability);
            }
        }
        // Rounding can leave u just above the last cumulative value
        self.lights[self.lights.len() - 1]
    }
}

/// Seed for one chunk of photons.
fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed ^ (chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Shoot `config.photon_count` photons through `scene` and freeze the result.
///
/// A scene without lights, or with lights of zero power, yields an empty map.
pub fn emit_photons(scene: &Scene, config: &PhotonConfig) -> PhotonMap {
    let start = Instant::now();

    let Some(table) = LightTable::new(scene) else {
        log::info!("No emitting lights, photon map is empty");
        return PhotonMap::empty();
    };
    if config.photon_count == 0 {
        return PhotonMap::empty();
    }

    let chunk_size = config.chunk_size.max(1);
    let chunks = config.photon_count.div_ceil(chunk_size);
    let photon_count = config.photon_count as f32;

    let buffers: Vec<Vec<Photon>> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = StdRng::seed_from_u64(chunk_seed(config.seed, chunk));
            let count = chunk_size.min(config.photon_count - chunk * chunk_size);
            let mut stored = Vec::with_capacity(count);

            for _ in 0..count {
                let (light, probability) = table.pick(&mut rng);
                let samples = light.samples();
                let index = ((gen_f32(&mut rng) * samples.len() as f32) as usize).min(samples.len() - 1);
                let power = light.power() / (photon_count * probability);
                let ray = Ray::new(samples[index], uniform_sphere(&mut rng));
                trace_photon(scene, config, ray, power, &mut rng, &mut stored);
            }

            log::debug!("Photon chunk {}: {} emitted, {} stored", chunk, count, stored.len());
            stored
        })
        .collect();

    let photons: Vec<Photon> = buffers.into_iter().flatten().collect();
    log::info!(
        "Emitted {} photons, stored {} in {:.2?}",
        config.photon_count,
        photons.len(),
        start.elapsed()
    );

    PhotonMap::new(photons)
}

/// Follow one photon until it escapes, is absorbed or runs out of bounces,
/// appending every deposit to `stored`.
pub fn trace_photon(
    scene: &Scene,
    config: &PhotonConfig,
    mut ray: Ray,
    mut power: Color,
    rng: &mut dyn RngCore,
    stored: &mut Vec<Photon>,
) {
    let mut specular_bounce = false;

    for depth in 0..config.max_bounces {
        let mut rec = HitRecord::default();
        if !scene.hit_non_emissive(&ray, Interval::new(RAY_T_MIN, RAY_T_MAX), &mut rec) {
            break;
        }

        let deposit = match config.deposit {
            DepositPolicy::SkipAfterSpecular => !specular_bounce,
            DepositPolicy::AllDiffuse => true,
        };
        if rec.material.is_diffuse() && deposit {
            stored.push(Photon::new(rec.point, power, -ray.direction()));
        }

        if depth > config.roulette_start_depth {
            let survival = (power.max_element() * 10.0).min(1.0);
            if gen_f32(rng) > survival {
                break;
            }
            power /= survival;
        }

        match rec.material {
            Material::Diffuse => {
                let direction = cosine_hemisphere(rec.normal, rng);
                power *= rec.color;
                ray = Ray::new(rec.point + rec.normal * config.shadow_bias, direction);
                specular_bounce = false;
            }
            Material::Specular => {
                ray = mirror_ray(&ray, &rec, config.refraction, config.shadow_bias);
                specular_bounce = true;
            }
            Material::Refractive { .. } => {
                ray = refraction_ray(&ray, &rec, config.refraction, config.shadow_bias);
                specular_bounce = true;
            }
        }
    }
}
