//! Drawing surfaces

use crate::fit::Fit;
use crate::font::FontData;
use crate::source::DecodedImage;
use crate::{MemeError, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    /// Create an opaque color
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn black() -> Self {
        Self::from_rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::from_rgb(255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Font and fill used to draw text
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font family name
    pub family: String,
    /// Font size in pixels
    pub size: f32,
    pub color: Color,
}

/// Measured extent of a line of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width
    pub width: f64,
    /// Distance from the baseline to the top of the tallest glyph
    pub actual_ascent: f64,
    /// Distance from the baseline to the bottom of the lowest glyph
    pub actual_descent: f64,
}

/// Fixed-size 2D surface that images and captions are composited onto
pub trait DrawingSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Reset every pixel to transparent
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Draw an image scaled into the fitted rectangle
    fn draw_image(&mut self, image: &DecodedImage, rect: &Fit);

    /// Draw a single line of text with its baseline starting at (x, y)
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<()>;

    fn measure_text(&self, text: &str, style: &TextStyle) -> Result<TextMetrics>;

    /// Describe the surface content, e.g. with the selected file name
    fn set_alt(&mut self, _alt: &str) {}
}

/// In-memory RGBA drawing surface
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: RgbaImage,
    fonts: HashMap<String, FontData>,
    alt: String,
}

impl RasterSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width.max(1), height.max(1)),
            fonts: HashMap::new(),
            alt: String::new(),
        }
    }

    /// Register a TrueType font under a family name
    pub fn add_font(&mut self, family: &str, ttf_data: Vec<u8>) -> Result<()> {
        let font = FontData::from_ttf(family, ttf_data)?;
        self.fonts.insert(family.to_string(), font);
        Ok(())
    }

    pub fn has_font(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    fn font(&self, family: &str) -> Result<&FontData> {
        self.fonts
            .get(family)
            .ok_or_else(|| MemeError::FontNotFound(family.to_string()))
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// Raw RGBA bytes, row major
    pub fn pixels(&self) -> &[u8] {
        self.canvas.as_raw()
    }

    /// Encode the surface as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.canvas
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
        Ok(buffer)
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0) * (color.a as f32 / 255.0);
        if alpha <= 0.0 {
            return;
        }

        let dst = self.canvas.get_pixel_mut(x as u32, y as u32);
        let src = [color.r, color.g, color.b];
        for (channel, value) in src.iter().enumerate() {
            let mixed = *value as f32 * alpha + dst.0[channel] as f32 * (1.0 - alpha);
            dst.0[channel] = mixed.round() as u8;
        }
        let out_alpha = alpha * 255.0 + dst.0[3] as f32 * (1.0 - alpha);
        dst.0[3] = out_alpha.round().min(255.0) as u8;
    }
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Color::transparent().to_rgba();
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let x0 = x.round().max(0.0) as i64;
        let y0 = y.round().max(0.0) as i64;
        let x1 = ((x + width).round() as i64).min(self.canvas.width() as i64);
        let y1 = ((y + height).round() as i64).min(self.canvas.height() as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                if color.a == 255 {
                    self.canvas.put_pixel(px as u32, py as u32, color.to_rgba());
                } else {
                    self.blend(px, py, color, 1.0);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, rect: &Fit) {
        let target = rect.to_pixel_rect();
        let resized = imageops::resize(
            &image.pixels,
            target.width,
            target.height,
            FilterType::Triangle,
        );
        imageops::overlay(&mut self.canvas, &resized, target.x, target.y);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<()> {
        let glyphs = self
            .font(&style.family)?
            .outline_line(text, style.size, x as f32, y as f32)?;

        for outlined in glyphs {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                self.blend(
                    bounds.min.x as i64 + gx as i64,
                    bounds.min.y as i64 + gy as i64,
                    style.color,
                    coverage,
                );
            });
        }

        log::debug!("Drew text '{}' at ({:.1}, {:.1})", text, x, y);
        Ok(())
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> Result<TextMetrics> {
        self.font(&style.family)?.measure(text, style.size)
    }

    fn set_alt(&mut self, alt: &str) {
        self.alt = alt.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyle {
        TextStyle {
            family: "sans-serif".to_string(),
            size: 50.0,
            color: Color::white(),
        }
    }

    fn surface_with_font(width: u32, height: u32) -> RasterSurface {
        let ttf = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fonts/DejaVuSans.ttf"
        ))
        .expect("Failed to read test font file");
        let mut surface = RasterSurface::new(width, height);
        surface.add_font("sans-serif", ttf).unwrap();
        surface
    }

    /// First and last canvas columns with any ink
    fn ink_columns(surface: &RasterSurface) -> Option<(u32, u32)> {
        let canvas = surface.canvas();
        let columns: Vec<u32> = (0..canvas.width())
            .filter(|&x| (0..canvas.height()).any(|y| canvas.get_pixel(x, y).0[3] > 0))
            .collect();
        Some((*columns.first()?, *columns.last()?))
    }

    fn assert_centered(text: &str) {
        let mut surface = surface_with_font(600, 120);
        let metrics = surface.measure_text(text, &style()).unwrap();
        let x = crate::text::calculate_x_offset(metrics.width, 600.0, crate::Align::Center);
        surface.fill_text(text, x, 80.0, &style()).unwrap();

        let (first, last) = ink_columns(&surface).expect("text left no ink");
        let left_margin = first as i64;
        let right_margin = 600 - last as i64 - 1;
        assert!(
            (left_margin - right_margin).abs() <= 3,
            "{text}: left margin {left_margin}, right margin {right_margin}"
        );
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = RasterSurface::new(4, 3);
        assert_eq!(surface.width(), 4.0);
        assert_eq!(surface.height(), 3.0);
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_and_clear() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_rect(0.0, 0.0, 4.0, 4.0, Color::black());
        assert_eq!(surface.canvas().get_pixel(3, 3), &Rgba([0, 0, 0, 255]));

        surface.clear();
        assert_eq!(surface.canvas().get_pixel(3, 3), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_rect(2.0, -5.0, 10.0, 7.0, Color::white());
        assert_eq!(surface.canvas().get_pixel(3, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.canvas().get_pixel(3, 1), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.canvas().get_pixel(3, 2), &Rgba([0, 0, 0, 0]));
        assert_eq!(surface.canvas().get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_into_fit() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, Color::black());

        let red = DecodedImage::from_rgba(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255])));
        let rect = crate::fit(10.0, 10.0, 4.0, 2.0).unwrap();
        surface.draw_image(&red, &rect);

        // Letterboxed: rows 0..2 and 8..10 stay black
        assert_eq!(surface.canvas().get_pixel(5, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.canvas().get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
        assert_eq!(surface.canvas().get_pixel(5, 9), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_text_requires_font() {
        let mut surface = RasterSurface::new(10, 10);
        assert!(matches!(
            surface.measure_text("hi", &style()),
            Err(MemeError::FontNotFound(_))
        ));
        assert!(matches!(
            surface.fill_text("hi", 0.0, 0.0, &style()),
            Err(MemeError::FontNotFound(_))
        ));
    }

    #[test]
    fn test_measured_text_is_centered_when_drawn() {
        assert_centered("HOXOH");
        assert_centered("AVAVAVAV");
    }

    #[test]
    fn test_missing_glyphs_are_centered_when_drawn() {
        assert_centered("日本語XX");
    }

    #[test]
    fn test_fill_text_leaves_ink_above_baseline() {
        let mut surface = surface_with_font(200, 100);
        surface.fill_text("Ag", 10.0, 60.0, &style()).unwrap();

        let metrics = surface.measure_text("Ag", &style()).unwrap();
        let top = (60.0 - metrics.actual_ascent).floor() as u32;
        let bottom = (60.0 + metrics.actual_descent).ceil() as u32;
        let canvas = surface.canvas();
        let inked = |y: u32| (0..canvas.width()).any(|x| canvas.get_pixel(x, y).0[3] > 0);

        assert!((top..60).any(inked));
        assert!((61..bottom).any(inked));
        assert!(!(0..top.saturating_sub(1)).any(inked));
        assert!(!(bottom + 1..100).any(inked));
    }

    #[test]
    fn test_add_font_rejects_garbage() {
        let mut surface = RasterSurface::new(10, 10);
        assert!(surface.add_font("sans-serif", vec![1, 2, 3]).is_err());
        assert!(!surface.has_font("sans-serif"));
    }

    #[test]
    fn test_png_export() {
        let surface = RasterSurface::new(2, 2);
        let png = surface.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_color_from_json_defaults_alpha() {
        let color: Color = serde_json::from_str(r#"{"r": 1, "g": 2, "b": 3}"#).unwrap();
        assert_eq!(color, Color::from_rgb(1, 2, 3));
    }
}
