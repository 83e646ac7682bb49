//! Built-in scenes and scene selection.

use anyhow::{Context, Result};
use glint_core::{Light, Material, Scene, SceneDescription, SceneResult, Sphere};
use glint_math::{Color, Vec3};

/// Floor sphere shared by the built-in scenes.
fn floor() -> Sphere {
    Sphere::new(Vec3::new(0.0, -1000.5, -1.0), 1000.0, Color::splat(0.8), Material::Diffuse)
}

/// Red, mirror and glass spheres in a row on the floor.
fn spheres() -> [Sphere; 3] {
    [
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Color::new(0.8, 0.3, 0.3), Material::Diffuse),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Color::splat(0.8), Material::Specular),
        Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, Color::splat(0.8), Material::glass()),
    ]
}

/// Floor, three spheres and a point light.
pub fn basic() -> SceneResult<Scene> {
    let [red, mirror, glass] = spheres();
    Scene::builder()
        .sphere(floor())
        .sphere(red)
        .sphere(mirror)
        .sphere(glass)
        .light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::splat(300.0)))
        .build()
}

/// The basic scene plus a green sphere for colour bleeding and a visible
/// emitter sampled at five points for soft shadows.
pub fn showcase() -> SceneResult<Scene> {
    let [red, mirror, glass] = spheres();
    let light_center = Vec3::new(0.0, 4.9, 0.0);
    let samples = vec![
        light_center,
        light_center + Vec3::new(-0.3, 0.0, -0.3),
        light_center + Vec3::new(0.3, 0.0, -0.3),
        light_center + Vec3::new(-0.3, 0.0, 0.3),
        light_center + Vec3::new(0.3, 0.0, 0.3),
    ];

    Scene::builder()
        .sphere(Sphere::new(light_center, 0.5, Color::ONE, Material::Diffuse).with_emission(Color::splat(300.0)))
        .sphere(floor())
        .sphere(red)
        .sphere(mirror)
        .sphere(glass)
        .sphere(Sphere::new(Vec3::new(-2.0, 0.0, -1.0), 0.5, Color::new(0.2, 0.8, 0.2), Material::Diffuse))
        .light(Light::area(samples, Color::splat(300.0)))
        .build()
}

/// Search radius that suits a scene when none is given.
pub fn preferred_search_radius(name: &str) -> Option<f32> {
    match name {
        "basic" => Some(0.5),
        "showcase" => Some(0.3),
        _ => None,
    }
}

/// Resolve a built-in scene name or load a JSON description from a path.
pub fn load(name: &str) -> Result<Scene> {
    match name {
        "basic" => basic().context("Failed to build the basic scene"),
        "showcase" => showcase().context("Failed to build the showcase scene"),
        path => {
            let description = SceneDescription::load(path)
                .with_context(|| format!("Failed to read scene description {}", path))?;
            description
                .build()
                .with_context(|| format!("Invalid scene in {}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenes() {
        let basic = load("basic").unwrap();
        assert_eq!(basic.surface_count(), 4);
        assert_eq!(basic.light_count(), 1);

        let showcase = load("showcase").unwrap();
        assert_eq!(showcase.surface_count(), 6);
        assert_eq!(showcase.lights()[0].sample_count(), 5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load("/nonexistent/scene.json").is_err());
    }

    #[test]
    fn test_bundled_description_parses() {
        let json = include_str!("../scenes/cornell_spheres.json");
        let scene = SceneDescription::from_json(json).unwrap().build().unwrap();
        assert!(scene.surface_count() > 0);
        assert!(scene.light_count() > 0);
    }
}
