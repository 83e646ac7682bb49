//! Photon map lifetime and repeatable renders.
//!
//! A `RenderSession` owns a scene and the photon map emitted for it, so the
//! camera pass can be rerun with different search settings without paying
//! for another photon pass.

use crate::bucket::render_parallel;
use crate::tracer::emit_photons;
use crate::{Camera, ImageBuffer, PhotonConfig, PhotonMap, RenderConfig, RenderResult};
use glint_core::Scene;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared flag that stops a render in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A scene paired with its photon map.
pub struct RenderSession {
    scene: Scene,
    photon_map: PhotonMap,
    photon_config: PhotonConfig,
}

impl RenderSession {
    /// Validate `photon_config` and run the photon pass.
    pub fn new(scene: Scene, photon_config: PhotonConfig) -> RenderResult<Self> {
        photon_config.validate()?;
        let photon_map = emit_photons(&scene, &photon_config);
        Ok(Self {
            scene,
            photon_map,
            photon_config,
        })
    }

    /// Use an already emitted photon map.
    pub fn with_photon_map(scene: Scene, photon_map: PhotonMap, photon_config: PhotonConfig) -> Self {
        Self {
            scene,
            photon_map,
            photon_config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn photon_map(&self) -> &PhotonMap {
        &self.photon_map
    }

    pub fn photon_config(&self) -> &PhotonConfig {
        &self.photon_config
    }

    /// Replace the photon map with a fresh pass under `photon_config`.
    pub fn reemit(&mut self, photon_config: PhotonConfig) -> RenderResult<()> {
        photon_config.validate()?;
        self.photon_map = emit_photons(&self.scene, &photon_config);
        self.photon_config = photon_config;
        Ok(())
    }

    /// Render the scene through `camera` on all cores.
    pub fn render(&self, camera: &Camera, config: &RenderConfig) -> RenderResult<ImageBuffer> {
        self.render_cancellable(camera, config, &CancelToken::new())
    }

    /// Like [`RenderSession::render`], stopping early once `cancel` fires.
    pub fn render_cancellable(
        &self,
        camera: &Camera,
        config: &RenderConfig,
        cancel: &CancelToken,
    ) -> RenderResult<ImageBuffer> {
        config.validate()?;
        let mut camera = camera.clone();
        camera.initialize()?;

        let start = Instant::now();
        let image = render_parallel(&camera, &self.scene, &self.photon_map, config, cancel)?;
        log::debug!(
            "Camera pass with radius {} took {:.2?}",
            config.search_radius,
            start.elapsed()
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, Photon, RenderError, RenderMode, MAX_RAY_DEPTH_LIMIT};
    use glint_core::{Light, Material, Sphere};
    use glint_math::{Color, Vec3};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small_scene() -> Scene {
        Scene::builder()
            .sphere(Sphere::new(
                Vec3::new(0.0, -1000.5, -1.0),
                1000.0,
                Color::splat(0.8),
                Material::Diffuse,
            ))
            .sphere(Sphere::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                Color::new(0.8, 0.3, 0.3),
                Material::Diffuse,
            ))
            .light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::splat(300.0)))
            .build()
            .unwrap()
    }

    fn small_camera() -> Camera {
        Camera::new()
            .with_resolution(40, 30)
            .with_position(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
    }

    fn photons(count: usize) -> PhotonConfig {
        PhotonConfig {
            photon_count: count,
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        init_logging();
        let session = RenderSession::new(small_scene(), photons(2_000)).unwrap();
        let config = RenderConfig {
            bucket_size: 8,
            ..Default::default()
        };

        let parallel = session.render(&small_camera(), &config).unwrap();

        let mut camera = small_camera();
        camera.initialize().unwrap();
        let serial = render(&camera, session.scene(), session.photon_map(), &config);

        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_cancelled_render() {
        let session = RenderSession::new(small_scene(), photons(100)).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = session.render_cancellable(&small_camera(), &RenderConfig::default(), &cancel);
        assert_eq!(result, Err(RenderError::Cancelled));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_photons = PhotonConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(RenderSession::new(small_scene(), bad_photons).is_err());

        let session = RenderSession::new(small_scene(), photons(100)).unwrap();
        let bad_render = RenderConfig {
            search_radius: -1.0,
            ..Default::default()
        };
        assert!(session.render(&small_camera(), &bad_render).is_err());

        let flat = small_camera().with_resolution(0, 0);
        assert!(matches!(
            session.render(&flat, &RenderConfig::default()),
            Err(RenderError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_rerender_with_new_radius_keeps_photons() {
        let session = RenderSession::new(small_scene(), photons(2_000)).unwrap();
        let before = session.photon_map().photons().to_vec();

        let narrow = RenderConfig {
            search_radius: 0.1,
            ..Default::default()
        };
        let wide = RenderConfig {
            search_radius: 1.0,
            ..Default::default()
        };
        let a = session.render(&small_camera(), &narrow).unwrap();
        let b = session.render(&small_camera(), &wide).unwrap();

        assert_ne!(a, b);
        assert_eq!(session.photon_map().photons(), before.as_slice());
    }

    #[test]
    fn test_direct_only_is_never_brighter() {
        let session = RenderSession::new(small_scene(), photons(5_000)).unwrap();
        let combined = session.render(&small_camera(), &RenderConfig::default()).unwrap();
        let direct = session
            .render(
                &small_camera(),
                &RenderConfig {
                    mode: RenderMode::DirectOnly,
                    ..Default::default()
                },
            )
            .unwrap();

        for (c, d) in combined.pixels.iter().zip(&direct.pixels) {
            assert!(d.x <= c.x && d.y <= c.y && d.z <= c.z);
        }
    }

    #[test]
    fn test_oversized_ray_depth_rejected() {
        // Two mirrors facing each other along the view axis
        let scene = Scene::builder()
            .sphere(Sphere::new(Vec3::new(0.0, 0.0, -1001.0), 1000.0, Color::ONE, Material::Specular))
            .sphere(Sphere::new(Vec3::new(0.0, 0.0, 1005.0), 1000.0, Color::ONE, Material::Specular))
            .light(Light::point(Vec3::new(0.0, 1.0, 0.0), Color::splat(10.0)))
            .build()
            .unwrap();
        let session = RenderSession::new(scene, photons(0)).unwrap();
        let camera = Camera::new()
            .with_resolution(4, 4)
            .with_position(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y);

        let config = RenderConfig {
            max_ray_depth: 5_000_000,
            ..Default::default()
        };
        assert!(matches!(
            session.render(&camera, &config),
            Err(RenderError::InvalidConfig(_))
        ));

        let config = RenderConfig {
            max_ray_depth: MAX_RAY_DEPTH_LIMIT,
            ..Default::default()
        };
        let image = session.render(&camera, &config).unwrap();
        assert!(image.pixels.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_render_with_supplied_photon_map() {
        // A dense patch of photons on the floor under the small sphere
        let patch: Vec<Photon> = (0..400)
            .map(|i| {
                let x = (i % 20) as f32 * 0.1 - 1.0;
                let z = (i / 20) as f32 * 0.1 - 2.0;
                Photon::new(Vec3::new(x, -0.5, z), Color::splat(0.05), Vec3::Y)
            })
            .collect();
        let config = photons(0);

        let lit = RenderSession::with_photon_map(small_scene(), PhotonMap::new(patch), config.clone());
        let dark = RenderSession::with_photon_map(small_scene(), PhotonMap::empty(), config);
        assert_eq!(lit.photon_map().len(), 400);
        assert_eq!(lit.photon_config().photon_count, 0);

        let render_config = RenderConfig {
            search_radius: 0.3,
            ..Default::default()
        };
        let with_map = lit.render(&small_camera(), &render_config).unwrap();
        let without = dark.render(&small_camera(), &render_config).unwrap();

        assert_ne!(with_map, without);
        for (a, b) in with_map.pixels.iter().zip(&without.pixels) {
            assert!(a.x >= b.x && a.y >= b.y && a.z >= b.z);
        }
    }

    #[test]
    fn test_reemit_replaces_map() {
        let mut session = RenderSession::new(small_scene(), photons(1_000)).unwrap();
        let first = session.photon_map().len();
        session.reemit(photons(4_000)).unwrap();
        assert!(session.photon_map().len() > first);
        assert_eq!(session.photon_config().photon_count, 4_000);
    }
}
