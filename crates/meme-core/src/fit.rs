//! Aspect-preserving image fit

use crate::{MemeError, Result};
use serde::Serialize;

/// Placement of a scaled image inside a container
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fit {
    /// Scaled image width
    pub width: f64,
    /// Scaled image height
    pub height: f64,
    /// Left edge of the scaled image inside the container
    pub start_x: f64,
    /// Top edge of the scaled image inside the container
    pub start_y: f64,
}

/// Whole-pixel rectangle used for raster drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Fit {
    /// Round the fit to whole pixels
    ///
    /// Width and height never round below one pixel.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: self.start_x.round() as i64,
            y: self.start_y.round() as i64,
            width: (self.width.round() as u32).max(1),
            height: (self.height.round() as u32).max(1),
        }
    }
}

fn check_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MemeError::InvalidDimension { name, value })
    }
}

/// Compute the largest rectangle with the source's aspect ratio that fits the container
///
/// Portrait sources (aspect ratio below 1) fill the container height and are
/// centered horizontally. Everything else, squares included, fills the
/// container width and is centered vertically. A square source in a
/// non-square container therefore takes the full container width even when
/// that overflows the container height.
///
/// # Arguments
/// * `container_width` - Drawing surface width
/// * `container_height` - Drawing surface height
/// * `source_width` - Natural width of the image
/// * `source_height` - Natural height of the image
pub fn fit(
    container_width: f64,
    container_height: f64,
    source_width: f64,
    source_height: f64,
) -> Result<Fit> {
    let container_width = check_dimension("container_width", container_width)?;
    let container_height = check_dimension("container_height", container_height)?;
    let source_width = check_dimension("source_width", source_width)?;
    let source_height = check_dimension("source_height", source_height)?;

    let aspect_ratio = source_width / source_height;

    if aspect_ratio < 1.0 {
        let width = container_height * aspect_ratio;
        Ok(Fit {
            width,
            height: container_height,
            start_x: (container_width - width) / 2.0,
            start_y: 0.0,
        })
    } else {
        let height = container_width / aspect_ratio;
        Ok(Fit {
            width: container_width,
            height,
            start_x: 0.0,
            start_y: (container_height - height) / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape() {
        let result = fit(800.0, 600.0, 400.0, 200.0).unwrap();
        assert_eq!(
            result,
            Fit {
                width: 800.0,
                height: 300.0,
                start_x: 0.0,
                start_y: 150.0,
            }
        );
    }

    #[test]
    fn test_fit_portrait() {
        let result = fit(800.0, 600.0, 100.0, 400.0).unwrap();
        assert_eq!(
            result,
            Fit {
                width: 150.0,
                height: 600.0,
                start_x: 325.0,
                start_y: 0.0,
            }
        );
    }

    #[test]
    fn test_fit_square_takes_landscape_branch() {
        // Square source in a tall container keeps full width
        let result = fit(400.0, 600.0, 50.0, 50.0).unwrap();
        assert_eq!(result.width, 400.0);
        assert_eq!(result.height, 400.0);
        assert_eq!(result.start_x, 0.0);
        assert_eq!(result.start_y, 100.0);
    }

    #[test]
    fn test_fit_square_overflows_short_container() {
        let result = fit(600.0, 400.0, 10.0, 10.0).unwrap();
        assert_eq!(result.height, 600.0);
        assert_eq!(result.start_y, -100.0);
    }

    #[test]
    fn test_fit_is_pure() {
        let a = fit(640.0, 480.0, 1920.0, 1080.0).unwrap();
        let b = fit(640.0, 480.0, 1920.0, 1080.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_properties_over_grid() {
        let sizes = [1.0, 3.0, 17.0, 200.0, 999.0];
        for &cw in &sizes {
            for &ch in &sizes {
                for &sw in &sizes {
                    for &sh in &sizes {
                        let r = fit(cw, ch, sw, sh).unwrap();
                        let aspect = sw / sh;
                        if aspect < 1.0 {
                            assert_eq!(r.height, ch);
                            assert_eq!(r.width, ch * aspect);
                            assert_eq!(r.start_y, 0.0);
                            assert_eq!(r.start_x, (cw - r.width) / 2.0);
                        } else {
                            assert_eq!(r.width, cw);
                            assert_eq!(r.height, cw / aspect);
                            assert_eq!(r.start_x, 0.0);
                            assert_eq!(r.start_y, (ch - r.height) / 2.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fit_rejects_zero_height() {
        let err = fit(800.0, 600.0, 400.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            MemeError::InvalidDimension {
                name: "source_height",
                ..
            }
        ));
    }

    #[test]
    fn test_fit_rejects_negative_and_nan() {
        assert!(fit(-1.0, 600.0, 400.0, 200.0).is_err());
        assert!(fit(800.0, 600.0, f64::NAN, 200.0).is_err());
        assert!(fit(800.0, f64::INFINITY, 400.0, 200.0).is_err());
    }

    #[test]
    fn test_to_pixel_rect() {
        let rect = fit(400.0, 400.0, 300.0, 200.0).unwrap().to_pixel_rect();
        assert_eq!(
            rect,
            PixelRect {
                x: 0,
                y: 67,
                width: 400,
                height: 267,
            }
        );
    }
}
