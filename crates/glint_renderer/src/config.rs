//! Tunable parameters and renderer errors.

use glint_math::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the photon pass and the renderer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Render cancelled")]
    Cancelled,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// How refraction picks its index ratio and offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefractionModel {
    /// Ratio depends on which side the ray arrives from (`1/ior` entering,
    /// `ior` leaving), using the normal that faces the incoming ray.
    #[default]
    Physical,
    /// Always `1/ior` for `ior > 1`, always the outward normal. Shading
    /// (direct light and the photon estimate) also uses the outward normal.
    Legacy,
}

/// Which diffuse hits store a photon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositPolicy {
    /// Skip the diffuse hit that directly follows a mirror or glass bounce.
    #[default]
    SkipAfterSpecular,
    /// Store on every diffuse hit, including caustic paths.
    AllDiffuse,
}

/// What the camera pass adds up at each diffuse hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Direct lighting plus the photon map estimate.
    #[default]
    Combined,
    /// Direct lighting only, for comparison images.
    DirectOnly,
}

/// Largest accepted `max_bounces`. Photon paths recurse once per bounce.
pub const MAX_BOUNCES_LIMIT: u32 = 64;

/// Largest accepted `max_ray_depth`. Mirror and glass rays recurse once per
/// level, so the limit bounds stack use on render threads.
pub const MAX_RAY_DEPTH_LIMIT: u32 = 64;

/// Photon emission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    /// Photons emitted across all lights
    pub photon_count: usize,
    /// Maximum surface interactions per photon
    pub max_bounces: u32,
    /// Russian roulette applies once the bounce index exceeds this
    pub roulette_start_depth: u32,
    /// Offset along the normal for continuation rays
    pub shadow_bias: f32,
    /// Seed for the per-chunk generators
    pub seed: u64,
    /// Photons per parallel work unit
    pub chunk_size: usize,
    pub refraction: RefractionModel,
    pub deposit: DepositPolicy,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            photon_count: 10_000,
            max_bounces: 5,
            roulette_start_depth: 3,
            shadow_bias: 0.001,
            seed: 0,
            chunk_size: 4096,
            refraction: RefractionModel::default(),
            deposit: DepositPolicy::default(),
        }
    }
}

impl PhotonConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.chunk_size == 0 {
            return Err(RenderError::InvalidConfig("chunk_size must be at least 1".into()));
        }
        if self.max_bounces > MAX_BOUNCES_LIMIT {
            return Err(RenderError::InvalidConfig(format!(
                "max_bounces must be at most {}, got {}",
                MAX_BOUNCES_LIMIT, self.max_bounces
            )));
        }
        if !(self.shadow_bias.is_finite() && self.shadow_bias >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "shadow_bias must be non-negative, got {}",
                self.shadow_bias
            )));
        }
        Ok(())
    }
}

/// Camera pass settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Radius of the photon gathering disk
    pub search_radius: f32,
    /// Cap on photons used by one radiance estimate
    pub max_photons_per_estimate: usize,
    /// Recursion limit for mirror and glass rays
    pub max_ray_depth: u32,
    /// Offset along the normal for shadow and secondary rays
    pub shadow_bias: f32,
    /// Colour returned by rays that hit nothing
    pub background: Color,
    pub mode: RenderMode,
    /// Tile edge length in pixels
    pub bucket_size: u32,
    pub refraction: RefractionModel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            search_radius: 0.5,
            max_photons_per_estimate: 100,
            max_ray_depth: 5,
            shadow_bias: 0.001,
            background: Color::new(0.1, 0.1, 0.3),
            mode: RenderMode::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
            refraction: RefractionModel::default(),
        }
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

impl RenderConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "search_radius must be positive, got {}",
                self.search_radius
            )));
        }
        if self.max_photons_per_estimate == 0 {
            return Err(RenderError::InvalidConfig(
                "max_photons_per_estimate must be at least 1".into(),
            ));
        }
        if self.max_ray_depth > MAX_RAY_DEPTH_LIMIT {
            return Err(RenderError::InvalidConfig(format!(
                "max_ray_depth must be at most {}, got {}",
                MAX_RAY_DEPTH_LIMIT, self.max_ray_depth
            )));
        }
        if !(self.shadow_bias.is_finite() && self.shadow_bias >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "shadow_bias must be non-negative, got {}",
                self.shadow_bias
            )));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig("bucket_size must be at least 1".into()));
        }
        Ok(())
    }
}
