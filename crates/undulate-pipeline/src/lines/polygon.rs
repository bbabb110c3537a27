//! A single regular-polygon spiral growing from the image center.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::{LineFamily, LineWalker, walk_open_range};
use crate::types::{Point, Size};

/// One logical line winding outward as a regular `N`-gon.
///
/// Side `i` runs along the angle `π + (i mod N)·2π/N` with length
/// `(i + 0.5)·d`, where `d = 2·spacing / tan(interior / 2) / N`. With that
/// growth each side sits exactly `spacing` away from the parallel side one
/// turn inside it. The whole figure is rotated by the orientation about
/// the center, counterclockwise on screen like straight lines; normals
/// point inward.
#[derive(Debug, Clone)]
pub struct PolygonLines {
    size: Size,
    corners: Vec<Point>,
    normals: Vec<Point>,
}

impl PolygonLines {
    /// Build the spiral for an image rectangle of `size` local pixels.
    ///
    /// Fewer than 3 sides, or a non-positive or non-finite `spacing`,
    /// yield the center point only.
    #[must_use]
    pub fn new(size: Size, spacing: f64, sides: u32, orientation_degrees: f64) -> Self {
        let center = size.center();
        let mut corners = vec![center];
        let mut normals = Vec::new();

        if sides >= 3 && spacing.is_finite() && spacing > 0.0 {
            let n = f64::from(sides);
            let interior = PI * (n - 2.0) / n;
            let side_growth = 2.0 * spacing / (0.5 * interior).tan() / n;
            let segments = (n * size.diagonal() / spacing).ceil();

            // Screen y points down, so a counterclockwise turn is negative.
            let orientation = if orientation_degrees.is_finite() {
                -orientation_degrees.to_radians()
            } else {
                0.0
            };
            let (sin_o, cos_o) = orientation.sin_cos();

            let mut start = center;
            let mut index: u32 = 0;
            while f64::from(index) < segments {
                let length = (f64::from(index) + 0.5) * side_growth;
                let tangent = f64::from(index % sides).mul_add(TAU / n, PI);
                let (sin_t, cos_t) = tangent.sin_cos();
                let end = start.offset(Point::new(cos_t, sin_t), length);

                corners.push(end.rotate_about(center, cos_o, sin_o));
                let (sin_n, cos_n) = (tangent + orientation + FRAC_PI_2).sin_cos();
                normals.push(Point::new(cos_n, sin_n));

                start = end;
                index += 1;
            }
        }

        Self {
            size,
            corners,
            normals,
        }
    }

    /// Number of sides walked, across every turn.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.normals.len()
    }

    /// Corners of the spiral, starting at the center.
    #[must_use]
    pub fn corners(&self) -> &[Point] {
        &self.corners
    }
}

impl LineFamily for PolygonLines {
    fn suggested_image_size(&self) -> Size {
        self.size
    }

    fn line_count(&self) -> usize {
        1
    }

    fn walk_on_line(&self, line_id: usize, step: f64, visit: &mut LineWalker<'_>) {
        if line_id != 0 {
            return;
        }

        for (pair, &normal) in self.corners.windows(2).zip(&self.normals) {
            let (start, end) = (pair[0], pair[1]);
            walk_open_range(
                start.distance(end),
                step,
                |t| (start.lerp(end, t), normal),
                visit,
            );
        }

        let last = self.corners.last().copied().unwrap_or_else(|| self.size.center());
        let normal = self.normals.last().copied().unwrap_or(Point::new(0.0, 1.0));
        visit(last, normal);
    }
}
