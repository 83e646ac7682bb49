//! Light sources.

use crate::scene::{SceneError, SceneResult};
use glint_math::{Color, Vec3};

/// A light radiating `power` from one or more sample positions.
///
/// A single sample is a point light. Several samples approximate an area
/// light: direct lighting averages over them and photons leave from one
/// of them chosen uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    samples: Vec<Vec3>,
    power: Color,
}

impl Light {
    /// A point light.
    pub fn point(position: Vec3, power: Color) -> Self {
        Self {
            samples: vec![position],
            power,
        }
    }

    /// An area light approximated by a fixed set of sample positions.
    pub fn area(samples: Vec<Vec3>, power: Color) -> Self {
        Self { samples, power }
    }

    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Radiant power (RGB) of the whole light.
    pub fn power(&self) -> Color {
        self.power
    }

    /// Scalar weight used to share the photon budget between lights.
    pub fn total_power(&self) -> f32 {
        self.power.x + self.power.y + self.power.z
    }

    /// Check power and sample positions.
    pub fn validate(&self) -> SceneResult<()> {
        if self.samples.is_empty() {
            return Err(SceneError::NoLightSamples);
        }
        if let Some(bad) = self.samples.iter().find(|p| !p.is_finite()) {
            return Err(SceneError::NonFinitePosition(*bad));
        }
        if !self.power.is_finite() || self.power.min_element() < 0.0 {
            return Err(SceneError::InvalidLightPower(self.power));
        }
        Ok(())
    }
}
