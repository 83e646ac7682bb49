// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod interval;
mod onb;
mod ray;

pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// RGB triple in linear space. Components are unbounded above.
pub type Color = Vec3;
