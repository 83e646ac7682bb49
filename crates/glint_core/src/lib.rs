//! Glint Core - scene model for the photon-mapping renderer.
//!
//! This crate provides:
//!
//! - **Surfaces**: `Sphere`, with a `Material` tag and optional emission
//! - **Lights**: point and sampled area lights with RGB power
//! - **Intersection**: `Hittable`, `HitRecord` and closest-hit scene queries
//! - **Construction**: a validating `SceneBuilder` and JSON `SceneDescription`s
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{Light, Material, Scene, Sphere};
//! use glint_math::{Color, Vec3};
//!
//! let scene = Scene::builder()
//!     .sphere(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Color::new(0.8, 0.3, 0.3), Material::Diffuse))
//!     .light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::splat(300.0)))
//!     .build()?;
//! ```

pub mod description;
pub mod hittable;
pub mod light;
pub mod material;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use description::{LightDescription, SceneDescription, SphereDescription};
pub use hittable::{HitRecord, Hittable};
pub use light::Light;
pub use material::Material;
pub use scene::{Scene, SceneBuilder, SceneError, SceneResult};
pub use sphere::Sphere;

/// Re-export math types from glint_math
pub use glint_math::{Color, Interval, Ray, Vec3};
