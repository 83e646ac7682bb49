//! `glint`: render a scene with photon mapping and write the image.

mod cli;
mod scenes;
mod settings;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Args;
use glint_renderer::{
    ImageBuffer, OutputSink, PfmSink, PngSink, PpmSink, RenderConfig, RenderMode, RenderSession,
};
use settings::Settings;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let settings = Settings::from_args(&args)?;
    let scene = scenes::load(&args.scene)?;
    log::info!(
        "Scene '{}': {} surfaces, {} lights",
        args.scene,
        scene.surface_count(),
        scene.light_count()
    );

    let start = Instant::now();
    let session =
        RenderSession::new(scene, settings.photons.clone()).context("Photon pass failed")?;
    log::info!(
        "Photon map holds {} photons ({:.2?})",
        session.photon_map().len(),
        start.elapsed()
    );

    let camera = settings.camera.camera(args.width, args.height);

    let image = session.render(&camera, &settings.render).context("Render failed")?;
    write_image(&args.output, &image)?;

    if args.compare && settings.render.mode == RenderMode::Combined {
        let direct = RenderConfig {
            mode: RenderMode::DirectOnly,
            ..settings.render.clone()
        };
        let image = session.render(&camera, &direct).context("Direct-only render failed")?;
        write_image(&comparison_path(&args.output), &image)?;
    }

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

/// Pick a sink from the file extension and write `image`.
fn write_image(path: &Path, image: &ImageBuffer) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut sink: Box<dyn OutputSink> = match extension.as_str() {
        "png" => Box::new(PngSink::new(path)),
        "pfm" => Box::new(PfmSink::new(path)),
        "ppm" => Box::new(PpmSink::new(path)),
        other => bail!("Unsupported output format '{}' (use .png, .pfm or .ppm)", other),
    };
    sink.write(image)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// `render.png` -> `render_direct.png`
fn comparison_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("render");
    let mut name = format!("{}_direct", stem);
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(extension);
    }
    path.with_file_name(name)
}
