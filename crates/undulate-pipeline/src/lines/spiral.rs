//! A single spiral built from half-circles of growing radius.

use std::f64::consts::PI;

use super::{LineFamily, LineWalker, is_valid_step};
use crate::types::{Point, Size};

/// One logical line spiralling out from the image center.
///
/// The spiral is a chain of half-circles: half-turn `k` covers the angles
/// `[kπ, (k + 1)π)` with radius `(k + 1.125) * spacing / 2`. Each
/// half-circle is centered slightly off the image center, alternating
/// sides, so consecutive half-circles join exactly and the arms of
/// successive turns sit exactly `spacing` apart. Normals point towards the
/// center of the current half-circle.
///
/// A positive orientation turns the figure counterclockwise on screen
/// (y pointing down), the same way it turns straight lines.
#[derive(Debug, Clone)]
pub struct SpiralLines {
    size: Size,
    center: Point,
    radius_gap: f64,
    max_angle: f64,
    orientation: f64,
}

impl SpiralLines {
    /// Build the spiral for an image rectangle of `size` local pixels.
    ///
    /// A non-positive or non-finite `spacing` yields a single point at the
    /// center.
    #[must_use]
    pub fn new(size: Size, spacing: f64, orientation_degrees: f64) -> Self {
        let valid = spacing.is_finite() && spacing > 0.0;
        let (radius_gap, max_angle) = if valid {
            let half_circles = (size.diagonal() / spacing).ceil();
            (0.5 * spacing, half_circles * PI)
        } else {
            (0.0, 0.0)
        };

        Self {
            size,
            center: size.center(),
            radius_gap,
            max_angle,
            orientation: if orientation_degrees.is_finite() {
                -orientation_degrees.to_radians()
            } else {
                0.0
            },
        }
    }

    /// Angle (radians, before orientation) at which the spiral ends.
    #[must_use]
    pub const fn max_angle(&self) -> f64 {
        self.max_angle
    }

    /// Radius of half-circle `half_turn`.
    fn radius(&self, half_turn: u32) -> f64 {
        (f64::from(half_turn) + 1.125) * self.radius_gap
    }

    /// Unrotated angle reached by moving `step` along the arc from `angle`,
    /// which lies on half-circle `half_turn`.
    ///
    /// Crossing into the next half-circle spends the rest of the step at
    /// its larger radius. Returns the new angle and its half-circle.
    fn advance(&self, mut angle: f64, mut half_turn: u32, step: f64) -> (f64, u32) {
        let mut remaining = step;
        while angle < self.max_angle {
            let radius = self.radius(half_turn);
            let boundary = f64::from(half_turn + 1) * PI;
            let reach = (boundary - angle) * radius;
            if remaining < reach {
                return (angle + remaining / radius, half_turn);
            }
            remaining -= reach;
            angle = boundary;
            half_turn += 1;
        }
        (angle, half_turn)
    }

    /// Point, normal and radius at a given unrotated angle.
    fn point_at(&self, angle: f64) -> (Point, Point, f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let half_turn = (angle / PI).floor().max(0.0) as u32;
        self.point_on(angle, half_turn)
    }

    /// Point, normal and radius at `angle` on half-circle `half_turn`.
    fn point_on(&self, angle: f64, half_turn: u32) -> (Point, Point, f64) {
        let radius = self.radius(half_turn);
        let center_offset = if half_turn % 2 == 0 {
            -0.5 * self.radius_gap
        } else {
            0.5 * self.radius_gap
        };

        let (sin_o, cos_o) = self.orientation.sin_cos();
        let (sin_a, cos_a) = (angle + self.orientation).sin_cos();

        let point = self
            .center
            .offset(Point::new(cos_o, sin_o), center_offset)
            .offset(Point::new(cos_a, sin_a), radius);
        (point, Point::new(-cos_a, -sin_a), radius)
    }
}

impl LineFamily for SpiralLines {
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

        if is_valid_step(step) && self.radius_gap > 0.0 {
            let (mut angle, mut half_turn) = (0.0, 0);
            while angle < self.max_angle {
                let (point, normal, _) = self.point_on(angle, half_turn);
                visit(point, normal);
                (angle, half_turn) = self.advance(angle, half_turn, step);
            }
        }

        let (last, normal, _) = self.point_at(self.max_angle);
        visit(last, normal);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_unit_normals, collect, path_length};
    use super::*;

    #[test]
    fn spiral_is_a_single_line() {
        let spiral = SpiralLines::new(Size::new(200, 100), 10.0, 0.0);
        assert_eq!(spiral.line_count(), 1);
        assert_eq!(spiral.suggested_image_size(), Size::new(200, 100));
        assert!(collect(&spiral, 1, 1.0).is_empty());
    }

    #[test]
    fn terminates_after_enough_half_turns_to_cover_diagonal() {
        let spiral = SpiralLines::new(Size::new(30, 40), 10.0, 0.0);
        // Diagonal 50, spacing 10 -> 5 half-circles.
        assert!((spiral.max_angle() - 5.0 * PI).abs() < 1e-12);
        let (last, _, radius) = spiral.point_at(spiral.max_angle());
        assert!(radius * 2.0 >= 50.0);
        let samples = collect(&spiral, 0, 0.5);
        assert_eq!(samples.last().map(|s| s.0), Some(last));
    }

    #[test]
    fn successive_turns_are_one_spacing_apart() {
        for orientation in [0.0, 37.0] {
            let spiral = SpiralLines::new(Size::new(300, 300), 12.0, orientation);
            for i in 0..40 {
                let angle = f64::from(i) * 0.37;
                let (inner, _, _) = spiral.point_at(angle);
                let (outer, _, _) = spiral.point_at(angle + 2.0 * PI);
                assert!(
                    (inner.distance(outer) - 12.0).abs() < 1e-9,
                    "angle {angle}, orientation {orientation}"
                );
            }
        }
    }

    #[test]
    fn half_circles_join_without_gaps() {
        let spiral = SpiralLines::new(Size::new(300, 300), 12.0, 20.0);
        for k in 1..10 {
            let boundary = f64::from(k) * PI;
            let (before, _, _) = spiral.point_at(boundary - 1e-9);
            let (after, _, _) = spiral.point_at(boundary);
            assert!(before.distance(after) < 1e-6, "half-turn {k}");
        }
    }

    #[test]
    fn samples_are_roughly_step_apart() {
        let spiral = SpiralLines::new(Size::new(100, 100), 8.0, 0.0);
        let samples = collect(&spiral, 0, 2.0);
        assert_unit_normals(&samples);
        for pair in samples.windows(2) {
            // Chords never exceed the arc, including across half-circle
            // joins.
            assert!(pair[0].0.distance(pair[1].0) <= 2.0 + 1e-9);
        }
        let expected_count = path_length(&samples) / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let actual = samples.len() as f64;
        assert!((actual - expected_count).abs() < 0.02f64.mul_add(expected_count, 2.0));
    }

    #[test]
    fn step_across_a_join_keeps_its_arc_length() {
        let spiral = SpiralLines::new(Size::new(100, 100), 8.0, 0.0);
        // 1 px before the first join on radius 4.5, then 2 px more.
        let start = PI - 1.0 / spiral.radius(0);
        let (angle, half_turn) = spiral.advance(start, 0, 2.0);
        assert_eq!(half_turn, 1);
        assert!((angle - (PI + 1.0 / spiral.radius(1))).abs() < 1e-12);

        // The closing sample at the end angle may fall close to the last step.
        let samples = collect(&spiral, 0, 2.0);
        for pair in samples[..samples.len() - 1].windows(2) {
            assert!(pair[0].0.distance(pair[1].0) > 1.9, "{pair:?}");
        }
    }

    #[test]
    fn degenerate_spacing_is_a_single_center_point() {
        let spiral = SpiralLines::new(Size::new(60, 40), 0.0, 0.0);
        let samples = collect(&spiral, 0, 1.0);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, Point::new(30.0, 20.0));
    }
}
