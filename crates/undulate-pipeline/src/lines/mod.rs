//! Line families: the geometric skeleton walked across the image.
//!
//! This module defines the [`LineFamily`] trait shared by every family and
//! the [`Lines`] enum that selects one at runtime from the
//! [`LineStyle`] of the current [`RenderConfig`].
//!
//! # Walk contract
//!
//! [`LineFamily::walk_on_line`] calls the visitor with `(point, normal)`
//! pairs in the fitted rectangle's local pixel frame, spaced roughly `step`
//! apart by arc length and never backtracking. The true final point of the
//! line is always visited exactly once, even when `step` is longer than the
//! whole line. A non-positive or non-finite `step` visits the final point
//! only. Normals are unit vectors oriented consistently within a family so
//! that displacement along them is coherent from one sample to the next.

mod polygon;
mod sines;
mod spiral;
mod straight;

pub use polygon::PolygonLines;
pub use sines::SineLines;
pub use spiral::SpiralLines;
pub use straight::StraightLines;

use crate::types::{LineStyle, Point, RenderConfig, Size};

/// Visitor receiving `(point, normal)` samples of a walk.
pub type LineWalker<'a> = dyn FnMut(Point, Point) + 'a;

/// A family of lines covering the image rectangle.
pub trait LineFamily {
    /// Grid resolution the sampler should use for this family: fine enough
    /// along the lines, no finer than the spacing across them where the
    /// geometry allows it.
    fn suggested_image_size(&self) -> Size;

    /// Number of logical lines, always at least 1.
    fn line_count(&self) -> usize;

    /// Walk logical line `line_id`, visiting samples about `step` apart.
    ///
    /// Out-of-range ids visit nothing.
    fn walk_on_line(&self, line_id: usize, step: f64, visit: &mut LineWalker<'_>);
}

/// Runtime selection of a line family.
#[derive(Debug, Clone)]
pub enum Lines {
    /// Parallel straight lines clipped to the image.
    Straight(StraightLines),
    /// Interleaved spiral.
    Spiral(SpiralLines),
    /// Concentric regular polygon.
    Polygon(PolygonLines),
    /// Sine-shaped carriers.
    Sines(SineLines),
}

impl Lines {
    /// Build the family selected by `config.line_style` for an image
    /// rectangle of `target_size` local pixels and the given spacing.
    #[must_use]
    pub fn choose(config: &RenderConfig, target_size: Size, spacing: f64) -> Self {
        match config.line_style {
            LineStyle::Straight => {
                Self::Straight(StraightLines::new(target_size, spacing, config.orientation))
            }
            LineStyle::Spiral => {
                Self::Spiral(SpiralLines::new(target_size, spacing, config.orientation))
            }
            LineStyle::Polygon => Self::Polygon(PolygonLines::new(
                target_size,
                spacing,
                config.polygon_sides,
                config.orientation,
            )),
            LineStyle::Sines => Self::Sines(SineLines::new(
                target_size,
                spacing,
                config.orientation,
                config.sines_amplitude,
                config.sines_frequency,
            )),
        }
    }

    fn family(&self) -> &dyn LineFamily {
        match self {
            Self::Straight(lines) => lines,
            Self::Spiral(lines) => lines,
            Self::Polygon(lines) => lines,
            Self::Sines(lines) => lines,
        }
    }
}

impl LineFamily for Lines {
    fn suggested_image_size(&self) -> Size {
        self.family().suggested_image_size()
    }

    fn line_count(&self) -> usize {
        self.family().line_count()
    }

    fn walk_on_line(&self, line_id: usize, step: f64, visit: &mut LineWalker<'_>) {
        self.family().walk_on_line(line_id, step, visit);
    }
}

/// Whether a walk step is usable (positive and finite).
pub(crate) fn is_valid_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

/// Visit samples every `step` along the parameter range `[0, length)` of a
/// path, without its endpoint.
///
/// `point_at` receives the completion in `[0, 1)`. Callers visit the true
/// endpoint themselves once the whole line is done, which keeps
/// multi-segment walks free of duplicated joints.
pub(crate) fn walk_open_range(
    length: f64,
    step: f64,
    mut point_at: impl FnMut(f64) -> (Point, Point),
    visit: &mut LineWalker<'_>,
) {
    if !is_valid_step(step) || length.is_nan() || length <= 0.0 {
        return;
    }

    let mut travelled = 0.0;
    let mut index: u32 = 0;
    while travelled < length {
        let (point, normal) = point_at(travelled / length);
        visit(point, normal);
        index += 1;
        travelled = f64::from(index) * step;
    }
}

/// Walk a straight segment with a constant normal, endpoint included.
pub(crate) fn walk_segment(
    start: Point,
    end: Point,
    normal: Point,
    step: f64,
    visit: &mut LineWalker<'_>,
) {
    walk_open_range(
        start.distance(end),
        step,
        |t| (start.lerp(end, t), normal),
        visit,
    );
    visit(end, normal);
}

/// Enumeration order of parallel lines: `0, +1, -1, +2, -2, ...`.
pub(crate) fn alternating_offset(index: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let magnitude = index.div_ceil(2) as f64;
    if index % 2 == 1 { magnitude } else { -magnitude }
}


#[cfg(test)]
mod tests {
    use super::test_support::collect;
    use super::*;

    #[test]
    fn alternating_offsets_start_at_center() {
        let offsets: Vec<f64> = (0..5).map(alternating_offset).collect();
        assert_eq!(offsets, vec![0.0, 1.0, -1.0, 2.0, -2.0]);
    }

    #[test]
    fn segment_walk_ends_exactly_once_on_endpoint() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        let normal = Point::new(0.0, 1.0);
        for step in [0.3, 1.0, 2.5, 10.0, 25.0] {
            let mut points = Vec::new();
            walk_segment(start, end, normal, step, &mut |p, _| points.push(p));
            assert_eq!(points.first(), Some(&start), "step {step}");
            assert_eq!(points.last(), Some(&end), "step {step}");
            assert_eq!(points.iter().filter(|&&p| p == end).count(), 1, "step {step}");
            assert!(points.windows(2).all(|w| w[1].x > w[0].x), "step {step}");
        }
    }

    #[test]
    fn segment_walk_with_invalid_step_visits_endpoint_only() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut points = Vec::new();
            walk_segment(
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0),
                Point::new(1.0, 0.0),
                step,
                &mut |p, _| points.push(p),
            );
            assert_eq!(points, vec![Point::new(5.0, 5.0)], "step {step}");
        }
    }

    #[test]
    fn orientation_turns_every_family_the_same_way() {
        let size = Size::new(120, 80);
        let (sin, cos) = 30f64.to_radians().sin_cos();
        let tangent = Point::new(cos, -sin);
        let parallel = |from: Point, to: Point| {
            let (dx, dy) = (to.x - from.x, to.y - from.y);
            let cross = dx.mul_add(tangent.y, -dy * tangent.x);
            cross.abs() < 1e-6 * dx.hypot(dy)
        };
        // An empty walk yields NaN ends, which are never parallel.
        let ends = |samples: &[(Point, Point)]| {
            let missing = Point::new(f64::NAN, f64::NAN);
            (
                samples.first().map_or(missing, |s| s.0),
                samples.last().map_or(missing, |s| s.0),
            )
        };

        let (first, last) = ends(&collect(&StraightLines::new(size, 10.0, 30.0), 0, 1.0));
        assert!(parallel(first, last), "straight");

        let (first, last) = ends(&collect(&SineLines::new(size, 10.0, 30.0, 0.0, 3.0), 0, 1.0));
        assert!(parallel(first, last), "sines");

        // The first polygon side leaves the center along the tangent.
        let polygon = collect(&PolygonLines::new(size, 10.0, 6, 30.0), 0, 0.1);
        assert!(parallel(polygon[0].0, polygon[1].0), "polygon");

        // The spiral starts on the orientation axis, off the center.
        let spiral = collect(&SpiralLines::new(size, 10.0, 30.0), 0, 1.0);
        assert!(parallel(size.center(), spiral[0].0), "spiral");
    }

    #[test]
    fn every_family_visits_final_point_once_for_huge_step() {
        let size = Size::new(120, 80);
        for style in [
            LineStyle::Straight,
            LineStyle::Spiral,
            LineStyle::Polygon,
            LineStyle::Sines,
        ] {
            let config = RenderConfig {
                line_style: style,
                orientation: 30.0,
                ..RenderConfig::default()
            };
            let lines = Lines::choose(&config, size, 10.0);
            let small = collect(&lines, 0, 0.5);
            let huge = collect(&lines, 0, 1.0e6);
            let last = small.last().map(|s| s.0);
            assert!(last.is_some(), "{style:?} produced an empty walk");
            assert_eq!(huge.last().map(|s| s.0), last, "{style:?}");
            let repeats = small.iter().filter(|s| Some(s.0) == last).count();
            assert_eq!(repeats, 1, "{style:?} visited its final point {repeats} times");
        }
    }

    #[test]
    fn out_of_range_line_id_visits_nothing() {
        let config = RenderConfig::default();
        let lines = Lines::choose(&config, Size::new(50, 50), 10.0);
        assert!(collect(&lines, lines.line_count() + 3, 1.0).is_empty());
    }
}
