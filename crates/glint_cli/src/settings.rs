//! Photon and render settings assembled from a JSON file and flags.

use crate::cli::Args;
use crate::scenes;
use anyhow::{Context, Result};
use glint_math::Vec3;
use glint_renderer::{Camera, PhotonConfig, RenderConfig, RenderMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file layout. Missing fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub photons: PhotonConfig,
    pub render: RenderConfig,
    pub camera: CameraSettings,
}

/// Camera placement. Resolution comes from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 3.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            fov: 45.0,
        }
    }
}

impl CameraSettings {
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        Camera::new()
            .with_resolution(width, height)
            .with_position(self.eye, self.look_at, self.up)
            .with_fov(self.fov)
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Settings file (if any), then the scene's preferred radius, then flags.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut settings = match &args.settings {
            Some(path) => Self::load(path)?,
            None => {
                let mut defaults = Self::default();
                if let Some(radius) = scenes::preferred_search_radius(&args.scene) {
                    defaults.render.search_radius = radius;
                }
                defaults
            }
        };
        settings.apply_overrides(args);
        Ok(settings)
    }

    fn apply_overrides(&mut self, args: &Args) {
        if let Some(count) = args.photons {
            self.photons.photon_count = count;
        }
        if let Some(depth) = args.roulette_depth {
            self.photons.roulette_start_depth = depth;
        }
        if let Some(seed) = args.seed {
            self.photons.seed = seed;
        }
        if let Some(radius) = args.search_radius {
            self.render.search_radius = radius;
        }
        if let Some(max) = args.max_photons {
            self.render.max_photons_per_estimate = max;
        }
        if let Some(depth) = args.max_depth {
            self.render.max_ray_depth = depth;
        }
        if let Some(bias) = args.bias {
            self.photons.shadow_bias = bias;
            self.render.shadow_bias = bias;
        }
        if args.direct_only {
            self.render.mode = RenderMode::DirectOnly;
        }
        if let Some(eye) = args.eye {
            self.camera.eye = eye;
        }
        if let Some(look_at) = args.look_at {
            self.camera.look_at = look_at;
        }
        if let Some(fov) = args.fov {
            self.camera.fov = fov;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_scene_radius_then_flags() {
        let args = Args::parse_from(["glint", "--scene", "showcase"]);
        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.render.search_radius, 0.3);

        let args = Args::parse_from(["glint", "--scene", "showcase", "--search-radius", "0.7", "--bias", "0.01"]);
        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.render.search_radius, 0.7);
        assert_eq!(settings.photons.shadow_bias, 0.01);
        assert_eq!(settings.render.shadow_bias, 0.01);
    }

    #[test]
    fn test_partial_settings_json() {
        let json = r#"{ "photons": { "photon_count": 123, "deposit": "all_diffuse" }, "render": { "mode": "direct_only" } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.photons.photon_count, 123);
        assert_eq!(settings.photons.max_bounces, PhotonConfig::default().max_bounces);
        assert_eq!(settings.render.mode, RenderMode::DirectOnly);
        assert_eq!(settings.render.search_radius, RenderConfig::default().search_radius);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn test_camera_block_then_flags() {
        let json = r#"{ "camera": { "eye": [1.0, 1.0, 4.0], "fov": 30.0 } }"#;
        let mut settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.camera.eye, Vec3::new(1.0, 1.0, 4.0));
        assert_eq!(settings.camera.look_at, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(settings.camera.fov, 30.0);

        let args = Args::parse_from(["glint", "--look-at", "0,1,0", "--fov", "50"]);
        settings.apply_overrides(&args);
        assert_eq!(settings.camera.eye, Vec3::new(1.0, 1.0, 4.0));
        assert_eq!(settings.camera.look_at, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(settings.camera.fov, 50.0);

        let mut camera = settings.camera.camera(64, 48);
        assert_eq!((camera.image_width, camera.image_height), (64, 48));
        assert!(camera.initialize().is_ok());
    }
}
