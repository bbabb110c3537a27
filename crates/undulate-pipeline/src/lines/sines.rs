//! Parallel carriers, each bent into a sine wave.

use std::f64::consts::TAU;

use super::{LineFamily, LineWalker, alternating_offset, walk_open_range};
use crate::types::{Point, Size};

/// Parallel sine-shaped carriers enumerated from the center outward.
///
/// Carriers are straight segments as long as the rectangle diagonal,
/// centered on the image center shifted by a multiple of the spacing along
/// the normal, and never clipped. Each carrier is displaced along its
/// normal by `A·sin(2π·t·F)` where `t` is the completion along the carrier.
/// Normals follow the straight-line convention: `(sin θ, cos θ)`.
#[derive(Debug, Clone)]
pub struct SineLines {
    size: Size,
    carriers: Vec<(Point, Point)>,
    normal: Point,
    length: f64,
    amplitude: f64,
    frequency: f64,
}

impl SineLines {
    /// Build the carriers for an image rectangle of `size` local pixels.
    ///
    /// `amplitude` is a fraction of `0.2 * max(width, height)` and
    /// `frequency` the number of periods along one carrier. A non-positive
    /// or non-finite `spacing` yields the center carrier only.
    #[must_use]
    pub fn new(
        size: Size,
        spacing: f64,
        orientation_degrees: f64,
        amplitude: f64,
        frequency: f64,
    ) -> Self {
        let orientation = if orientation_degrees.is_finite() {
            orientation_degrees.to_radians()
        } else {
            0.0
        };
        let (sin, cos) = orientation.sin_cos();
        let normal = Point::new(sin, cos);
        let tangent = Point::new(cos, -sin);

        let longest_side = f64::from(size.width.max(size.height));
        let amplitude = if amplitude.is_finite() {
            amplitude.max(0.0) * 0.2 * longest_side
        } else {
            0.0
        };
        let frequency = if frequency.is_finite() { frequency } else { 0.0 };

        let length = size.diagonal();
        let center = size.center();
        let carrier_at = |offset: f64| {
            let mid = center.offset(normal, offset);
            (
                mid.offset(tangent, -0.5 * length),
                mid.offset(tangent, 0.5 * length),
            )
        };

        let mut carriers = vec![carrier_at(0.0)];
        if spacing.is_finite() && spacing > 0.0 {
            let expanded_w = 2.0f64.mul_add(amplitude, f64::from(size.width));
            let expanded_h = 2.0f64.mul_add(amplitude, f64::from(size.height));
            let needed = (expanded_w.hypot(expanded_h) / spacing).ceil();
            let max_offset = 0.5f64.mul_add(needed, 1.0);

            let mut index = 1;
            while alternating_offset(index) < max_offset {
                carriers.push(carrier_at(alternating_offset(index) * spacing));
                carriers.push(carrier_at(alternating_offset(index + 1) * spacing));
                index += 2;
            }
        }

        Self {
            size,
            carriers,
            normal,
            length,
            amplitude,
            frequency,
        }
    }

    /// Displacement amplitude in local pixels.
    #[must_use]
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Shared unit normal of every carrier.
    #[must_use]
    pub const fn normal(&self) -> Point {
        self.normal
    }

    /// Point of carrier `(start, end)` at completion `t`.
    fn point_at(&self, (start, end): (Point, Point), t: f64) -> Point {
        let wave = self.amplitude * (TAU * t * self.frequency).sin();
        start.lerp(end, t).offset(self.normal, wave)
    }
}

impl LineFamily for SineLines {
    fn suggested_image_size(&self) -> Size {
        self.size
    }

    fn line_count(&self) -> usize {
        self.carriers.len()
    }

    fn walk_on_line(&self, line_id: usize, step: f64, visit: &mut LineWalker<'_>) {
        let Some(&carrier) = self.carriers.get(line_id) else {
            return;
        };

        walk_open_range(
            self.length,
            step,
            |t| (self.point_at(carrier, t), self.normal),
            visit,
        );
        visit(self.point_at(carrier, 1.0), self.normal);
    }
}
