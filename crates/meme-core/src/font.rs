//! Font loading, line layout and text measurement

use crate::surface::TextMetrics;
use crate::{MemeError, Result};
use ab_glyph::{point, Font, FontRef, GlyphId, OutlinedGlyph, PxScale, ScaleFont};

/// TrueType font loaded for captions
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font family name used to look the font up
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
}

/// Glyphs of a single line with their pen offsets from the line start
struct LineLayout {
    scale: PxScale,
    glyphs: Vec<(GlyphId, f32)>,
    width: f32,
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Font family name
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: Vec<u8>) -> Result<Self> {
        ttf_parser::Face::parse(&ttf_data, 0)
            .map_err(|e| MemeError::FontParseError(format!("{name}: {e:?}")))?;
        FontRef::try_from_slice(&ttf_data)
            .map_err(|e| MemeError::FontParseError(format!("{name}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data,
        })
    }

    fn font_ref(&self) -> Result<FontRef<'_>> {
        FontRef::try_from_slice(&self.ttf_data)
            .map_err(|e| MemeError::FontParseError(format!("{}: {e}", self.name)))
    }

    fn face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.ttf_data, 0)
            .map_err(|e| MemeError::FontParseError(format!("{}: {e:?}", self.name)))
    }

    /// Lay out one line at `font_size` pixels per em
    ///
    /// Characters without a glyph advance by the font's .notdef glyph, which
    /// is also what gets drawn for them.
    fn layout(&self, font: &FontRef<'_>, text: &str, font_size: f32) -> LineLayout {
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let scale = PxScale::from(font_size * font.height_unscaled() / units_per_em);
        let scaled = font.as_scaled(scale);

        let mut caret = 0.0;
        let mut previous = None;
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            let id = font.glyph_id(c);
            if id.0 == 0 {
                log::warn!("Font '{}' has no glyph for {:?}", self.name, c);
            }
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        LineLayout {
            scale,
            glyphs,
            width: caret,
        }
    }

    /// Measure text at a font size
    ///
    /// Width is the pen advance of the laid out line, kerning included.
    /// Ascent and descent come from the union of the glyph outlines, not the
    /// font-wide ascender/descender, so "ace" measures shorter than "Ag".
    pub fn measure(&self, text: &str, font_size: f32) -> Result<TextMetrics> {
        let font = self.font_ref()?;
        let face = self.face()?;
        let line = self.layout(&font, text, font_size);

        let mut bounds: Option<(i16, i16)> = None;
        for (id, _) in &line.glyphs {
            if let Some(rect) = face.glyph_bounding_box(ttf_parser::GlyphId(id.0)) {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(rect.y_min), hi.max(rect.y_max)),
                    None => (rect.y_min, rect.y_max),
                });
            }
        }

        let scale = font_size as f64 / face.units_per_em() as f64;
        let (y_min, y_max) = bounds.unwrap_or((0, 0));
        Ok(TextMetrics {
            width: line.width as f64,
            actual_ascent: y_max as f64 * scale,
            actual_descent: -(y_min as f64) * scale,
        })
    }

    /// Outline every visible glyph of a line whose baseline starts at (x, y)
    ///
    /// Uses the same layout as [`FontData::measure`], so the drawn advance
    /// matches the measured width.
    pub fn outline_line(
        &self,
        text: &str,
        font_size: f32,
        x: f32,
        y: f32,
    ) -> Result<Vec<OutlinedGlyph>> {
        let font = self.font_ref()?;
        let line = self.layout(&font, text, font_size);
        Ok(line
            .glyphs
            .into_iter()
            .filter_map(|(id, offset)| {
                font.outline_glyph(id.with_scale_and_position(line.scale, point(x + offset, y)))
            })
            .collect())
    }
}
