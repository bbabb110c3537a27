//! Fitting the image into the plotter surface.
//!
//! Three coordinate frames are involved in a render pass:
//!
//! - **local**: pixels of the fitted rectangle, origin at its top-left
//!   corner. Line families walk in this frame.
//! - **relative**: normalized image coordinates, `[0, 1]²` covering the
//!   fitted rectangle. The sampler is addressed in this frame.
//! - **absolute**: plotter pixels. Plotters receive points in this frame.
//!
//! [`ImageFitting::zoom_factor`] is the single scalar that keeps spacing,
//! amplitude and frequency visually constant whatever the output
//! resolution.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Size};

/// Placement of the image inside a plotter surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFitting {
    /// Size of the fitted rectangle in plotter pixels.
    pub size_in_plotter: Size,
    /// Top-left corner of the fitted rectangle in plotter pixels.
    pub offset: Point,
    /// Resolution-independence scalar, always positive.
    pub zoom_factor: f64,
}

impl ImageFitting {
    /// Local (fitted-rectangle) pixel to normalized image coordinates.
    #[must_use]
    pub fn local_to_relative(&self, local: Point) -> Point {
        Point::new(
            local.x / f64::from(self.size_in_plotter.width),
            local.y / f64::from(self.size_in_plotter.height),
        )
    }

    /// Normalized image coordinates to plotter pixels.
    #[must_use]
    pub fn relative_to_absolute(&self, relative: Point) -> Point {
        Point::new(
            relative
                .x
                .mul_add(f64::from(self.size_in_plotter.width), self.offset.x),
            relative
                .y
                .mul_add(f64::from(self.size_in_plotter.height), self.offset.y),
        )
    }

    /// Plotter pixels to normalized image coordinates; inverse of
    /// [`relative_to_absolute`](Self::relative_to_absolute).
    #[must_use]
    pub fn pixel_to_relative(&self, pixel: Point) -> Point {
        self.local_to_relative(Point::new(
            pixel.x - self.offset.x,
            pixel.y - self.offset.y,
        ))
    }

    /// Whether a normalized coordinate lies inside the image.
    #[must_use]
    pub fn is_inside(relative: Point) -> bool {
        (0.0..=1.0).contains(&relative.x) && (0.0..=1.0).contains(&relative.y)
    }
}

/// Fit an image of the given aspect ratio (width / height) into a plotter
/// surface.
///
/// Returns the largest rectangle with the image's aspect ratio and integer
/// dimensions that fits in `plotter_size`, centered. The axis along which
/// the aspect ratios agree is copied from the plotter unscaled. A
/// non-finite or non-positive aspect ratio is treated as square, and both
/// fitted dimensions are at least 1.
#[must_use]
pub fn fit_image(plotter_size: Size, image_aspect_ratio: f64) -> ImageFitting {
    let aspect = if image_aspect_ratio.is_finite() && image_aspect_ratio > 0.0 {
        image_aspect_ratio
    } else {
        1.0
    };

    let plotter_w = f64::from(plotter_size.width.max(1));
    let plotter_h = f64::from(plotter_size.height.max(1));
    let plotter_aspect = plotter_w / plotter_h;

    let (fit_w, fit_h) = if aspect > plotter_aspect {
        (plotter_w, (plotter_w / aspect).floor().max(1.0))
    } else if aspect < plotter_aspect {
        ((plotter_h * aspect).floor().max(1.0), plotter_h)
    } else {
        (plotter_w, plotter_h)
    };

    // Shorter side of the aspect rectangle inscribed in the unit square.
    let unit_shorter_side = if aspect >= 1.0 { 1.0 / aspect } else { aspect };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let size_in_plotter = Size::new(fit_w as u32, fit_h as u32);

    ImageFitting {
        size_in_plotter,
        offset: Point::new(0.5 * (plotter_w - fit_w), 0.5 * (plotter_h - fit_h)),
        zoom_factor: fit_w.min(fit_h) / unit_shorter_side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspect_fills_plotter() {
        let fitting = fit_image(Size::new(100, 100), 1.0);
        assert_eq!(fitting.size_in_plotter, Size::new(100, 100));
        assert_eq!(fitting.offset, Point::new(0.0, 0.0));
        assert!((fitting.zoom_factor - 100.0).abs() < 1e-9);
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let fitting = fit_image(Size::new(400, 400), 2.0);
        assert_eq!(fitting.size_in_plotter, Size::new(400, 200));
        assert_eq!(fitting.offset, Point::new(0.0, 100.0));
        // Shorter side 200 over unit shorter side 0.5.
        assert!((fitting.zoom_factor - 400.0).abs() < 1e-9);
    }

    #[test]
    fn tall_image_is_pillarboxed() {
        let fitting = fit_image(Size::new(300, 200), 0.5);
        assert_eq!(fitting.size_in_plotter, Size::new(100, 200));
        assert_eq!(fitting.offset, Point::new(100.0, 0.0));
        assert!((fitting.zoom_factor - 200.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_factor_scales_linearly_with_output() {
        let small = fit_image(Size::new(250, 250), 1.5);
        let large = fit_image(Size::new(1000, 1000), 1.5);
        let ratio = large.zoom_factor / small.zoom_factor;
        assert!((ratio - 4.0).abs() < 0.02, "ratio = {ratio}");
    }

    #[test]
    fn degenerate_inputs_still_fit() {
        let fitting = fit_image(Size::new(0, 0), f64::NAN);
        assert_eq!(fitting.size_in_plotter, Size::new(1, 1));
        assert!(fitting.zoom_factor > 0.0);

        let thin = fit_image(Size::new(10, 10), 1000.0);
        assert_eq!(thin.size_in_plotter, Size::new(10, 1));
        assert!(thin.zoom_factor > 0.0);
    }

    #[test]
    fn relative_absolute_round_trip() {
        let fitting = fit_image(Size::new(640, 480), 1.0);
        for &(x, y) in &[(80.0, 0.0), (80.0, 480.0), (320.0, 240.0), (559.5, 13.25)] {
            let p = Point::new(x, y);
            let back = fitting.relative_to_absolute(fitting.pixel_to_relative(p));
            assert!(p.distance(back) < 1e-9, "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn local_corners_map_to_unit_square() {
        let fitting = fit_image(Size::new(300, 200), 0.5);
        let origin = fitting.local_to_relative(Point::new(0.0, 0.0));
        let corner = fitting.local_to_relative(Point::new(100.0, 200.0));
        assert_eq!(origin, Point::new(0.0, 0.0));
        assert_eq!(corner, Point::new(1.0, 1.0));
        assert_eq!(fitting.relative_to_absolute(corner), Point::new(200.0, 200.0));
    }

    #[test]
    fn inside_check_is_inclusive() {
        assert!(ImageFitting::is_inside(Point::new(0.0, 1.0)));
        assert!(!ImageFitting::is_inside(Point::new(-0.01, 0.5)));
        assert!(!ImageFitting::is_inside(Point::new(0.5, 1.01)));
    }
}
