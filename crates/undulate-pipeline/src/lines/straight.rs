//! Parallel straight lines clipped to the image rectangle.

use super::{LineFamily, LineWalker, alternating_offset, walk_segment};
use crate::types::{Point, Size};

/// Slack allowed when deciding whether a line still touches the rectangle.
const CLIP_TOLERANCE: f64 = 1e-6;

/// Parallel lines at a given orientation, `spacing` apart, enumerated from
/// the center line outward (`0, +1, -1, +2, -2, ...`).
///
/// The normal is `(sin θ, cos θ)` and lines run along `(cos θ, -sin θ)`:
/// at 0° lines are horizontal with normal `(0, 1)`, at 90° they are
/// vertical with normal `(1, 0)`.
#[derive(Debug, Clone)]
pub struct StraightLines {
    segments: Vec<(Point, Point)>,
    normal: Point,
    suggested_image_size: Size,
}

impl StraightLines {
    /// Build the family for an image rectangle of `size` local pixels.
    ///
    /// A non-positive or non-finite `spacing` yields the center line only.
    #[must_use]
    pub fn new(size: Size, spacing: f64, orientation_degrees: f64) -> Self {
        let orientation = if orientation_degrees.is_finite() {
            orientation_degrees.rem_euclid(180.0)
        } else {
            0.0
        };

        let clip = Clipper::new(size, orientation);
        let center = size.center();
        let line_at = |index: usize| {
            if index == 0 {
                return clip.line_through(center);
            }
            let offset = alternating_offset(index) * spacing;
            clip.line_through(center.offset(clip.normal, offset))
        };

        // The center line always crosses the rectangle.
        let mut segments: Vec<(Point, Point)> = line_at(0).into_iter().collect();
        if spacing.is_finite() && spacing > 0.0 {
            for k in 1.. {
                let above = line_at(2 * k - 1);
                let below = line_at(2 * k);
                if above.is_none() && below.is_none() {
                    break;
                }
                segments.extend(above);
                segments.extend(below);
            }
        }

        let count = u32::try_from(segments.len()).unwrap_or(u32::MAX).max(1);
        let suggested_image_size = match clip.axis {
            Axis::Horizontal => Size::new(size.width, count),
            Axis::Vertical => Size::new(count, size.height),
            Axis::Oblique => size,
        };

        Self {
            segments,
            normal: clip.normal,
            suggested_image_size,
        }
    }

    /// Shared unit normal of every line.
    #[must_use]
    pub const fn normal(&self) -> Point {
        self.normal
    }

    /// Clipped `(start, end)` of every line, in enumeration order.
    #[must_use]
    pub fn segments(&self) -> &[(Point, Point)] {
        &self.segments
    }
}

impl LineFamily for StraightLines {
    fn suggested_image_size(&self) -> Size {
        self.suggested_image_size
    }

    fn line_count(&self) -> usize {
        self.segments.len()
    }

    fn walk_on_line(&self, line_id: usize, step: f64, visit: &mut LineWalker<'_>) {
        if let Some(&(start, end)) = self.segments.get(line_id) {
            walk_segment(start, end, self.normal, step, visit);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Oblique,
}

/// Clips infinite lines of one orientation to `[0, w] x [0, h]`.
struct Clipper {
    axis: Axis,
    normal: Point,
    tangent: Point,
    width: f64,
    height: f64,
}

impl Clipper {
    fn new(size: Size, orientation_degrees: f64) -> Self {
        let (axis, normal, tangent) = if orientation_degrees == 0.0 {
            (Axis::Horizontal, Point::new(0.0, 1.0), Point::new(1.0, 0.0))
        } else if orientation_degrees == 90.0 {
            (Axis::Vertical, Point::new(1.0, 0.0), Point::new(0.0, -1.0))
        } else {
            let (sin, cos) = orientation_degrees.to_radians().sin_cos();
            (Axis::Oblique, Point::new(sin, cos), Point::new(cos, -sin))
        };

        Self {
            axis,
            normal,
            tangent,
            width: f64::from(size.width),
            height: f64::from(size.height),
        }
    }

    /// Clip the line passing through `through`, or `None` when it misses
    /// the rectangle.
    fn line_through(&self, through: Point) -> Option<(Point, Point)> {
        match self.axis {
            Axis::Horizontal => {
                let y = through.y;
                Self::within(y, self.height).then(|| {
                    let y = y.clamp(0.0, self.height);
                    (Point::new(0.0, y), Point::new(self.width, y))
                })
            }
            Axis::Vertical => {
                let x = through.x;
                Self::within(x, self.width).then(|| {
                    let x = x.clamp(0.0, self.width);
                    (Point::new(x, self.height), Point::new(x, 0.0))
                })
            }
            Axis::Oblique => self.clip_oblique(through),
        }
    }

    /// Parametric intersection of `through + u * tangent` with the slabs
    /// `0 <= x <= w` and `0 <= y <= h`.
    fn clip_oblique(&self, through: Point) -> Option<(Point, Point)> {
        let mut u_min = f64::NEG_INFINITY;
        let mut u_max = f64::INFINITY;

        for (origin, direction, extent) in [
            (through.x, self.tangent.x, self.width),
            (through.y, self.tangent.y, self.height),
        ] {
            let a = (0.0 - origin) / direction;
            let b = (extent - origin) / direction;
            u_min = u_min.max(a.min(b));
            u_max = u_max.min(a.max(b));
        }

        let span = u_max - u_min;
        if span.is_nan() || span <= CLIP_TOLERANCE {
            return None;
        }

        let clamp = |p: Point| {
            Point::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
        };
        let start = clamp(through.offset(self.tangent, u_min));
        let end = clamp(through.offset(self.tangent, u_max));
        Some((start, end))
    }

    fn within(value: f64, extent: f64) -> bool {
        (-CLIP_TOLERANCE..=extent + CLIP_TOLERANCE).contains(&value)
    }
}
