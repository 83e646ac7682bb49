//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon, centre first.

use crate::renderer::render_pixel;
use crate::session::CancelToken;
use crate::{Camera, ImageBuffer, PhotonMap, RenderConfig, RenderError, RenderResult};
use glint_core::Scene;
use glint_math::Color;
use rayon::prelude::*;
use std::time::Instant;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Tile the image and order the tiles from the centre outward.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += size;
        }
        y += size;
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centre from the image centre.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order among equidistant tiles
    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pixels of one rendered bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colours in row-major order within the bucket
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    photon_map: &PhotonMap,
    config: &RenderConfig,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            pixels.push(render_pixel(camera, scene, photon_map, x, y, config));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render every bucket on the rayon pool.
///
/// `camera` must already be initialized. Buckets that start after `cancel`
/// fires are skipped and the whole render reports
/// [`RenderError::Cancelled`].
pub fn render_parallel(
    camera: &Camera,
    scene: &Scene,
    photon_map: &PhotonMap,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<ImageBuffer> {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets of {}px",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        config.bucket_size
    );

    let results: Vec<Option<BucketResult>> = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(render_bucket(bucket, camera, scene, photon_map, config))
        })
        .collect();

    if cancel.is_cancelled() {
        log::warn!("Render cancelled after {:.2?}", start.elapsed());
        return Err(RenderError::Cancelled);
    }

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in results.iter().flatten() {
        image.write_bucket(result);
    }

    log::info!("Rendered image in {:.2?}", start.elapsed());
    Ok(image)
}
