//! Generator configuration

use crate::surface::{Color, TextStyle};
use crate::volume::DEFAULT_SLIDER_MAX;
use crate::{Align, MemeError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration, loadable from JSON
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemeConfig {
    pub canvas: CanvasConfig,
    pub caption: CaptionStyle,
    pub speech: SpeechConfig,
}

/// Drawing surface size and letterbox color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Fill behind the fitted image
    pub background: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: Color::black(),
        }
    }
}

/// Caption font and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptionStyle {
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f32,
    pub color: Color,
    /// Gap between captions and the surface edges
    pub pad: f64,
    pub align: Align,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 50.0,
            color: Color::white(),
            pad: 15.0,
            align: Align::Center,
        }
    }
}

impl CaptionStyle {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            family: self.font_family.clone(),
            size: self.font_size,
            color: self.color,
        }
    }
}

/// Read-aloud settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Spoken before the top caption
    pub top_prefix: String,
    /// Spoken before the bottom caption
    pub bottom_prefix: String,
    pub slider_max: u8,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            top_prefix: "top text is. ".to_string(),
            bottom_prefix: "bottom text is. ".to_string(),
            slider_max: DEFAULT_SLIDER_MAX,
        }
    }
}

impl MemeConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MemeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the canvas and caption sizes are usable
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 {
            return Err(MemeError::InvalidDimension {
                name: "canvas.width",
                value: 0.0,
            });
        }
        if self.canvas.height == 0 {
            return Err(MemeError::InvalidDimension {
                name: "canvas.height",
                value: 0.0,
            });
        }
        if !(self.caption.font_size.is_finite() && self.caption.font_size > 0.0) {
            return Err(MemeError::InvalidDimension {
                name: "caption.fontSize",
                value: self.caption.font_size as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = MemeConfig::from_json("{}").unwrap();
        assert_eq!(config, MemeConfig::default());
        assert_eq!(config.canvas.width, 400);
        assert_eq!(config.caption.font_size, 50.0);
        assert_eq!(config.caption.pad, 15.0);
    }

    #[test]
    fn test_partial_json() {
        let config = MemeConfig::from_json(
            r#"{
                "canvas": { "width": 800, "height": 600 },
                "caption": { "fontFamily": "impact", "align": "left" },
                "speech": { "topPrefix": "" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.background, Color::black());
        assert_eq!(config.caption.font_family, "impact");
        assert_eq!(config.caption.align, Align::Left);
        assert_eq!(config.caption.font_size, 50.0);
        assert_eq!(config.speech.top_prefix, "");
        assert_eq!(config.speech.bottom_prefix, "bottom text is. ");
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let err = MemeConfig::from_json(r#"{ "canvas": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            MemeError::InvalidDimension {
                name: "canvas.width",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MemeConfig::from_json("{ canvas"),
            Err(MemeError::JsonError(_))
        ));
    }

    #[test]
    fn test_text_style() {
        let style = CaptionStyle::default().text_style();
        assert_eq!(style.family, "sans-serif");
        assert_eq!(style.color, Color::white());
    }
}
