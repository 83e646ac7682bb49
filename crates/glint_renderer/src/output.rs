//! Destinations for rendered images.
//!
//! The renderer produces unclamped linear RGB. Sinks that write 8-bit
//! formats tone map with a clamp and gamma 2; the PFM sink keeps the raw
//! floats.

use crate::ImageBuffer;
use glint_math::Color;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer has {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Something that consumes a finished image.
pub trait OutputSink {
    fn write(&mut self, image: &ImageBuffer) -> OutputResult<()>;
}

fn check_size(image: &ImageBuffer) -> OutputResult<()> {
    let expected = (image.width * image.height) as usize;
    if image.pixels.len() != expected {
        return Err(OutputError::SizeMismatch {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear colour to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Writes an 8-bit PNG.
#[derive(Debug, Clone)]
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for PngSink {
    fn write(&mut self, image: &ImageBuffer) -> OutputResult<()> {
        check_size(image)?;
        let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba()).ok_or(
            OutputError::SizeMismatch {
                expected: (image.width * image.height) as usize,
                actual: image.pixels.len(),
            },
        )?;
        rgba.save(&self.path)?;
        log::info!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Writes linear float RGB as a Portable Float Map.
#[derive(Debug, Clone)]
pub struct PfmSink {
    path: PathBuf,
}

impl PfmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Encode `image` into `writer`. Rows go bottom to top, in native byte
    /// order as flagged by the sign of the scale.
    pub fn encode(image: &ImageBuffer, writer: &mut impl Write) -> OutputResult<()> {
        check_size(image)?;
        let scale = if cfg!(target_endian = "little") { -1.0 } else { 1.0 };
        write!(writer, "PF\n{} {}\n{:.1}\n", image.width, image.height, scale)?;

        let width = image.width as usize;
        if width > 0 {
            for row in image.pixels.chunks(width).rev() {
                let floats: &[f32] = bytemuck::cast_slice(row);
                writer.write_all(bytemuck::cast_slice(floats))?;
            }
        }
        Ok(())
    }
}

impl OutputSink for PfmSink {
    fn write(&mut self, image: &ImageBuffer) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        Self::encode(image, &mut writer)?;
        writer.flush()?;
        log::info!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Writes a plain-text 8-bit PPM.
#[derive(Debug, Clone)]
pub struct PpmSink {
    path: PathBuf,
}

impl PpmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for PpmSink {
    fn write(&mut self, image: &ImageBuffer) -> OutputResult<()> {
        check_size(image)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);

        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", image.width, image.height)?;
        writeln!(writer, "255")?;
        for color in &image.pixels {
            let rgba = color_to_rgba(*color);
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
        writer.flush()?;

        log::info!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Keeps every image it is given. Used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub images: Vec<ImageBuffer>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ImageBuffer> {
        self.images.last()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, image: &ImageBuffer) -> OutputResult<()> {
        check_size(image)?;
        self.images.push(image.clone());
        Ok(())
    }
}
