//! Caption placement

use crate::surface::TextMetrics;
use crate::Align;

/// Which caption is being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPlacement {
    Top,
    Bottom,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in pixels
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Baseline origin for a single-line caption
///
/// The top caption sits one measured text height plus `pad` below the top
/// edge. The bottom caption baseline is fixed at `pad` above the bottom edge
/// regardless of how tall the text measures.
///
/// # Returns
/// (x, y) of the text baseline start
pub fn caption_position(
    metrics: &TextMetrics,
    canvas_width: f64,
    canvas_height: f64,
    pad: f64,
    align: Align,
    placement: CaptionPlacement,
) -> (f64, f64) {
    let x = calculate_x_offset(metrics.width, canvas_width, align);
    let y = match placement {
        CaptionPlacement::Top => metrics.actual_ascent + metrics.actual_descent + pad,
        CaptionPlacement::Bottom => canvas_height - pad,
    };
    (x, y)
}
