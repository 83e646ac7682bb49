//! JSON scene descriptions.
//!
//! A description is plain data; it becomes a `Scene` only after going
//! through the validating builder.
//!
//! ```json
//! {
//!   "spheres": [
//!     { "center": [0.0, -1000.5, -1.0], "radius": 1000.0, "color": [0.8, 0.8, 0.8] },
//!     { "center": [1.0, 0.0, -1.0], "radius": 0.5, "color": [0.8, 0.8, 0.8],
//!       "material": { "type": "refractive", "ior": 1.5 } }
//!   ],
//!   "lights": [ { "samples": [[0.0, 5.0, 0.0]], "power": [300.0, 300.0, 300.0] } ]
//! }
//! ```

use std::path::Path;

use glint_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Light, Material, Scene, SceneResult, Sphere};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
    #[serde(default)]
    pub material: Material,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub samples: Vec<Vec3>,
    pub power: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Parse a description from a JSON string.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON description file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let description = Self::from_json(&contents)?;
        log::info!(
            "Loaded scene description {} ({} spheres, {} lights)",
            path.display(),
            description.spheres.len(),
            description.lights.len()
        );
        Ok(description)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and build the scene.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut builder = Scene::builder();
        for desc in &self.spheres {
            let mut sphere = Sphere::new(desc.center, desc.radius, desc.color, desc.material);
            if let Some(emission) = desc.emission {
                sphere = sphere.with_emission(emission);
            }
            builder = builder.sphere(sphere);
        }
        for desc in &self.lights {
            builder = builder.light(Light::area(desc.samples.clone(), desc.power));
        }
        builder.build()
    }
}
