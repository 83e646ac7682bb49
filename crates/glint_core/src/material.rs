//! Surface material tags.

use serde::{Deserialize, Serialize};

/// How a surface scatters light.
///
/// Reflectance colour lives on the surface; the material only decides the
/// scattering lobe.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Lambertian reflector. Photons are deposited here.
    #[default]
    Diffuse,
    /// Perfect mirror.
    Specular,
    /// Dielectric that transmits by Snell's law.
    Refractive {
        /// Index of refraction (1.0 = air, 1.5 = glass)
        ior: f32,
    },
}

impl Material {
    /// Glass with the usual index of 1.5.
    pub fn glass() -> Self {
        Material::Refractive { ior: 1.5 }
    }

    pub fn is_diffuse(&self) -> bool {
        matches!(self, Material::Diffuse)
    }

    pub fn is_specular(&self) -> bool {
        matches!(self, Material::Specular)
    }

    pub fn is_refractive(&self) -> bool {
        matches!(self, Material::Refractive { .. })
    }

    /// Index of refraction; 1.0 for anything that does not transmit.
    pub fn refractive_index(&self) -> f32 {
        match self {
            Material::Refractive { ior } => *ior,
            _ => 1.0,
        }
    }
}
