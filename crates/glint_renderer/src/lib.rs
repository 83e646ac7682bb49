//! Glint Renderer - CPU photon mapping.
//!
//! A two-pass global illumination renderer:
//! 1. Photons are shot from the lights and stored on diffuse surfaces.
//! 2. Camera rays are traced recursively; each diffuse hit combines shadow-ray
//!    direct lighting with a density estimate over nearby photons.
//!
//! Both passes run in parallel with rayon and are reproducible for a fixed seed.

mod bucket;
mod camera;
mod config;
mod output;
mod photon;
mod radiance;
mod renderer;
mod scatter;
mod session;
mod tracer;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult};
pub use camera::Camera;
pub use config::{
    DepositPolicy, PhotonConfig, RefractionModel, RenderConfig, RenderError, RenderMode,
    RenderResult, DEFAULT_BUCKET_SIZE, MAX_BOUNCES_LIMIT, MAX_RAY_DEPTH_LIMIT,
};
pub use output::{
    color_to_rgba, linear_to_gamma, MemorySink, OutputError, OutputResult, OutputSink, PfmSink, PngSink, PpmSink,
};
pub use photon::{Photon, PhotonMap};
pub use radiance::Gathered;
pub use renderer::{direct_lighting, render, render_pixel, trace, ImageBuffer};
pub use scatter::{
    cosine_hemisphere, gen_f32, mirror_ray, reflect, refract, refraction_ray, shading_normal, uniform_sphere,
};
pub use session::{CancelToken, RenderSession};
pub use tracer::{emit_photons, trace_photon};

/// Re-export scene and math types
pub use glint_core::{HitRecord, Hittable, Light, Material, Scene, Sphere};
pub use glint_math::{Color, Interval, Ray, Vec3};
