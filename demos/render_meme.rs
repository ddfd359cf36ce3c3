//! Meme Renderer
//!
//! Fits an image onto the drawing surface, draws top/bottom captions and
//! writes the result as PNG.
//!
//! Usage:
//!   cargo run --example render_meme -- <image> <font.ttf> <top> <bottom> [output.png] [config.json]
//!
//! Examples:
//!   cargo run --example render_meme -- cat.jpg fonts/DejaVuSans.ttf "WHEN THE CODE" "COMPILES FIRST TRY"
//!   RUST_LOG=debug cargo run --example render_meme -- dog.png fonts/Impact.ttf "TOP" "BOTTOM" output/dog.png

use meme_core::{
    MemeConfig, MemeController, MemoryImageSource, RasterSurface, SelectedFile, SilentSpeech,
    UiEvent,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} <image> <font.ttf> <top> <bottom> [output.png] [config.json]",
            args[0]
        );
        std::process::exit(1);
    }

    let image_path = &args[1];
    let font_path = &args[2];
    let output_path = args
        .get(5)
        .cloned()
        .unwrap_or_else(|| "output/meme.png".to_string());

    let config = match args.get(6) {
        Some(path) => MemeConfig::from_json(
            &std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config '{}': {}", path, e))?,
        )?,
        None => MemeConfig::default(),
    };

    let mut surface = RasterSurface::new(config.canvas.width, config.canvas.height);
    let font_bytes = std::fs::read(font_path)
        .map_err(|e| format!("Failed to read font '{}': {}", font_path, e))?;
    surface.add_font(&config.caption.font_family, font_bytes)?;

    let image_bytes = std::fs::read(image_path)
        .map_err(|e| format!("Failed to read image '{}': {}", image_path, e))?;
    let file_name = Path::new(image_path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    let mut meme = MemeController::new(config, surface, MemoryImageSource::new(), SilentSpeech);
    meme.dispatch(UiEvent::ImageSelected(SelectedFile::new(
        file_name,
        image_bytes,
    )))?;
    meme.dispatch(UiEvent::GenerateClicked {
        top: args[3].clone(),
        bottom: args[4].clone(),
    })?;

    if let Some(parent) = Path::new(&output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, meme.surface().to_png()?)?;

    println!("Generated: {}", output_path);

    Ok(())
}
