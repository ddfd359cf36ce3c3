//! Image selection, decoding and handle lifetime

use crate::{MemeError, Result};
use image::RgbaImage;
use std::collections::HashMap;

impl From<image::ImageError> for MemeError {
    fn from(err: image::ImageError) -> Self {
        MemeError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

impl ImageFormat {
    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 12 {
        return Err(MemeError::ImageError("Image data too short".to_string()));
    }

    // JPEG starts with FF D8 FF
    if data[0..3] == [0xFF, 0xD8, 0xFF] {
        return Ok(ImageFormat::Jpeg);
    }

    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    if &data[0..6] == b"GIF87a" || &data[0..6] == b"GIF89a" {
        return Ok(ImageFormat::Gif);
    }

    if &data[0..2] == b"BM" {
        return Ok(ImageFormat::Bmp);
    }

    // RIFF container with a WEBP form type
    if &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Ok(ImageFormat::WebP);
    }

    Err(MemeError::ImageError("Unknown image format".to_string()))
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// File name, used as the surface's alt text
    pub name: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

/// Token for an acquired image resource
///
/// Handles cannot be cloned; releasing consumes the handle.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(u64);

impl ImageHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Decoded image with its natural dimensions
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

impl DecodedImage {
    /// Decode image bytes into RGBA pixels
    pub fn decode(data: &[u8]) -> Result<Self> {
        let format = detect_format(data)?;
        let image = image::load_from_memory_with_format(data, format.to_image_format())?;
        let pixels = image.to_rgba8();
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }
}

/// Provider of selected-image resources
pub trait ImageSource {
    /// Register a selected file and return a handle to it
    fn acquire(&mut self, file: SelectedFile) -> Result<ImageHandle>;

    /// Decode the image behind a handle
    ///
    /// The result carries the natural dimensions needed for fitting.
    fn decode(&self, handle: &ImageHandle) -> Result<DecodedImage>;

    /// Release the resource behind a handle
    fn release(&mut self, handle: ImageHandle);
}

/// In-memory image source keyed by handle
#[derive(Debug, Default)]
pub struct MemoryImageSource {
    next_id: u64,
    files: HashMap<u64, SelectedFile>,
    released: usize,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired but not yet released
    pub fn live_handles(&self) -> usize {
        self.files.len()
    }

    /// Number of handles released so far
    pub fn released_count(&self) -> usize {
        self.released
    }
}

impl ImageSource for MemoryImageSource {
    fn acquire(&mut self, file: SelectedFile) -> Result<ImageHandle> {
        self.next_id += 1;
        let id = self.next_id;
        log::debug!("Acquired image handle {} for '{}'", id, file.name);
        self.files.insert(id, file);
        Ok(ImageHandle(id))
    }

    fn decode(&self, handle: &ImageHandle) -> Result<DecodedImage> {
        let file = self
            .files
            .get(&handle.0)
            .ok_or(MemeError::UnknownHandle(handle.0))?;
        DecodedImage::decode(&file.bytes)
    }

    fn release(&mut self, handle: ImageHandle) {
        if self.files.remove(&handle.0).is_some() {
            self.released += 1;
            log::debug!("Released image handle {}", handle.0);
        } else {
            log::warn!("Release of unknown image handle {}", handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn create_test_png(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .expect("Failed to create PNG");
        buffer
    }

    #[test]
    fn test_detect_png() {
        let png = create_test_png(4, 4);
        assert_eq!(detect_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        jpeg.extend_from_slice(&[0u8; 12]);
        assert_eq!(detect_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_gif_and_webp() {
        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&[0u8; 10]);
        assert_eq!(detect_format(&gif).unwrap(), ImageFormat::Gif);

        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0u8; 4]);
        webp.extend_from_slice(b"WEBP");
        assert_eq!(detect_format(&webp).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format(&[0u8; 16]).is_err());
        assert!(detect_format(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn test_decode_reports_natural_dimensions() {
        let decoded = DecodedImage::decode(&create_test_png(30, 20)).unwrap();
        assert_eq!(decoded.width, 30);
        assert_eq!(decoded.height, 20);
        assert_eq!(decoded.pixels.get_pixel(0, 0), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_acquire_decode_release() {
        let mut source = MemoryImageSource::new();
        let handle = source
            .acquire(SelectedFile::new("red.png", create_test_png(8, 16)))
            .unwrap();
        assert_eq!(source.live_handles(), 1);

        let decoded = source.decode(&handle).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 16));

        source.release(handle);
        assert_eq!(source.live_handles(), 0);
        assert_eq!(source.released_count(), 1);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut source = MemoryImageSource::new();
        let a = source.acquire(SelectedFile::new("a", vec![])).unwrap();
        let b = source.acquire(SelectedFile::new("b", vec![])).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_decode_corrupt_file() {
        let mut source = MemoryImageSource::new();
        let handle = source
            .acquire(SelectedFile::new("bad.png", vec![0u8; 32]))
            .unwrap();
        assert!(matches!(
            source.decode(&handle),
            Err(MemeError::ImageError(_))
        ));
    }
}
