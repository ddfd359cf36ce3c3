//! Meme Core - image fitting, captions and UI state
//!
//! This crate provides functionality for:
//! - Fitting a source image into a fixed-size drawing surface
//! - Drawing top/bottom captions onto the fitted image
//! - Tracking which controls (generate / clear / read) are available
//! - Reading captions aloud through a pluggable speech synthesizer
//!
//! # Example
//!
//! ```ignore
//! use meme_core::{MemeConfig, MemeController, MemoryImageSource, RasterSurface, SelectedFile, SilentSpeech, UiEvent};
//!
//! let config = MemeConfig::default();
//! let mut surface = RasterSurface::new(config.canvas.width, config.canvas.height);
//! surface.add_font("sans-serif", std::fs::read("fonts/DejaVuSans.ttf")?)?;
//!
//! let mut meme = MemeController::new(config, surface, MemoryImageSource::new(), SilentSpeech);
//! meme.dispatch(UiEvent::ImageSelected(SelectedFile::new("cat.png", std::fs::read("cat.png")?)))?;
//! meme.dispatch(UiEvent::GenerateClicked { top: "TOP".into(), bottom: "BOTTOM".into() })?;
//! std::fs::write("meme.png", meme.surface().to_png()?)?;
//! ```

mod config;
mod controller;
mod fit;
mod font;
mod source;
mod speech;
mod state;
mod surface;
mod text;
mod volume;

pub use config::{CanvasConfig, CaptionStyle, MemeConfig, SpeechConfig};
pub use controller::{MemeController, UiEvent};
pub use fit::{fit, Fit, PixelRect};
pub use font::FontData;
pub use source::{
    detect_format, DecodedImage, ImageFormat, ImageHandle, ImageSource, MemoryImageSource,
    SelectedFile,
};
pub use speech::{SilentSpeech, SpeechSynth, Utterance, Voice, VoiceSelector};
pub use state::{Buttons, Transition, UiState};
pub use surface::{Color, DrawingSurface, RasterSurface, TextMetrics, TextStyle};
pub use text::{caption_position, calculate_x_offset, CaptionPlacement};
pub use volume::{VolumeLevel, VolumeSlider};

use thiserror::Error;

/// Errors that can occur while building a meme
#[derive(Debug, Error)]
pub enum MemeError {
    #[error("Invalid dimension: {name} = {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("No speech voices available")]
    NoVoicesAvailable,

    #[error("Invalid voice index: {0} (only {1} voices available)")]
    InvalidVoice(usize, usize),

    #[error("Speech error: {0}")]
    SpeechError(String),

    #[error("No image loaded")]
    MissingImage,

    #[error("Control is disabled: {0}")]
    ControlDisabled(&'static str),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Unknown image handle: {0}")]
    UnknownHandle(u64),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for meme operations
pub type Result<T> = std::result::Result<T, MemeError>;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}
