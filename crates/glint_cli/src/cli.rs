use clap::{Parser, ValueEnum};
use glint_math::Vec3;
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render a scene with photon mapping.
#[derive(Debug, Parser)]
#[clap(name = "glint", version, about = "CPU photon-mapping renderer")]
pub struct Args {
    /// Built-in scene (basic, showcase) or path to a JSON scene description
    #[clap(long, default_value = "basic")]
    pub scene: String,

    /// JSON file with photon and render settings; flags override it
    #[clap(long)]
    pub settings: Option<PathBuf>,

    /// Output file (.png, .pfm or .ppm)
    #[clap(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[clap(long, default_value = "800")]
    pub width: u32,

    /// Image height in pixels
    #[clap(long, default_value = "600")]
    pub height: u32,

    /// Camera position as x,y,z
    #[clap(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub eye: Option<Vec3>,

    /// Point the camera looks at, as x,y,z
    #[clap(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub look_at: Option<Vec3>,

    /// Vertical field of view in degrees
    #[clap(long)]
    pub fov: Option<f32>,

    /// Photons emitted across all lights
    #[clap(long)]
    pub photons: Option<usize>,

    /// Radius of the photon gathering disk
    #[clap(long)]
    pub search_radius: Option<f32>,

    /// Cap on photons per radiance estimate
    #[clap(long)]
    pub max_photons: Option<usize>,

    /// Recursion limit for mirror and glass rays
    #[clap(long)]
    pub max_depth: Option<u32>,

    /// Bounce index after which Russian roulette starts
    #[clap(long)]
    pub roulette_depth: Option<u32>,

    /// Normal offset for shadow and continuation rays
    #[clap(long)]
    pub bias: Option<f32>,

    /// Seed for photon emission
    #[clap(long)]
    pub seed: Option<u64>,

    /// Skip the photon map estimate and render direct light only
    #[clap(long)]
    pub direct_only: bool,

    /// Also write a direct-only image next to the output for comparison
    #[clap(long)]
    pub compare: bool,

    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Parse `x,y,z` into a vector.
fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", value, e))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{}'", value)),
    }
}
