//! Plotter abstraction and the shared point decimation.
//!
//! A [`Plotter`] wraps a [`Backend`] (raster canvas, SVG serializer, ...)
//! and owns the per-line decimation state, so every backend receives the
//! exact same point stream for the same input.
//!
//! # Protocol
//!
//! ```text
//! initialize -> (start_line -> add_point_to_line* -> end_line)* -> finalize
//! ```
//!
//! Breaking the nesting is a caller defect; debug builds assert on it.
//!
//! # Decimation
//!
//! The first point of a line is always drawn. Every further point goes
//! through a one-slot lookahead: when a new point arrives, the turn angle
//! at the lookahead vertex is compared with [`ANGLE_THRESHOLD`]. A sharper
//! turn draws the lookahead; a flatter one drops it. Either way the new
//! point takes its place. `end_line` flushes whatever is left in the slot.

use std::f64::consts::{PI, TAU};

use crate::types::{Point, Size};

/// Turns flatter than this (radians, about 1.8°) are dropped.
pub const ANGLE_THRESHOLD: f64 = PI * 0.01;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Shape of stroke ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Half-disc past each end.
    #[default]
    Round,
    /// Flat cut exactly at each end.
    Butt,
}

/// Drawing parameters chosen by a pattern modulator for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotterInfo {
    /// Fill of the whole surface.
    pub background: Color,
    /// Stroke color.
    pub line_color: Color,
    /// Stroke width in plotter pixels.
    pub line_thickness: f64,
    /// Display blur radius in plotter pixels (0 disables).
    pub blur: f64,
    /// Stroke end shape.
    pub line_cap: LineCap,
}

impl PlotterInfo {
    /// Black on white, or white on black when `invert_colors` is set.
    #[must_use]
    pub const fn with_colors(
        invert_colors: bool,
        line_thickness: f64,
        blur: f64,
        line_cap: LineCap,
    ) -> Self {
        let (background, line_color) = if invert_colors {
            (Color::BLACK, Color::WHITE)
        } else {
            (Color::WHITE, Color::BLACK)
        };
        Self {
            background,
            line_color,
            line_thickness,
            blur,
            line_cap,
        }
    }
}

/// Output surface receiving decimated draw calls.
///
/// Backends never see the decimation: they just draw what they are given.
pub trait Backend {
    /// Logical size of the surface in plotter pixels.
    fn size(&self) -> Size;

    /// Prepare a fresh drawing with the given parameters.
    fn initialize(&mut self, info: &PlotterInfo);

    /// Complete the drawing.
    fn finalize(&mut self);

    /// A new line begins.
    fn begin_line(&mut self);

    /// First point of the current line.
    fn move_to(&mut self, point: Point);

    /// Next point of the current line.
    fn line_to(&mut self, point: Point);

    /// The current line is complete.
    fn end_line(&mut self);
}

/// Decimation state of the line being drawn.
#[derive(Debug, Clone, Copy, Default)]
struct LineState {
    started: bool,
    last_drawn: Option<Point>,
    lookahead: Option<Point>,
}

/// Turn angle at `corner`, in `[0, π]`.
fn turn_angle(from: Point, corner: Point, to: Point) -> f64 {
    let incoming = (corner.y - from.y).atan2(corner.x - from.x);
    let outgoing = (to.y - corner.y).atan2(to.x - corner.x);
    let diff = (incoming - outgoing).abs();
    diff.min(TAU - diff)
}

/// A backend plus the line protocol and decimation shared by all backends.
#[derive(Debug)]
pub struct Plotter<B> {
    backend: B,
    state: LineState,
    lines_drawn: usize,
    points_drawn: usize,
}

impl<B: Backend> Plotter<B> {
    /// Wrap a backend.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            state: LineState {
                started: false,
                last_drawn: None,
                lookahead: None,
            },
            lines_drawn: 0,
            points_drawn: 0,
        }
    }

    /// Logical size of the underlying surface.
    pub fn size(&self) -> Size {
        self.backend.size()
    }

    /// Start a new drawing.
    pub fn initialize(&mut self, info: &PlotterInfo) {
        self.state = LineState::default();
        self.lines_drawn = 0;
        self.points_drawn = 0;
        self.backend.initialize(info);
    }

    /// Complete the drawing.
    pub fn finalize(&mut self) {
        debug_assert!(!self.state.started, "finalize called with an open line");
        self.backend.finalize();
    }

    /// Whether a line is currently open.
    pub const fn has_started_a_line(&self) -> bool {
        self.state.started
    }

    /// Open a new line.
    pub fn start_line(&mut self) {
        debug_assert!(!self.state.started, "start_line called twice");
        self.state = LineState {
            started: true,
            ..LineState::default()
        };
        self.backend.begin_line();
    }

    /// Add a point to the open line, in plotter pixels.
    pub fn add_point_to_line(&mut self, point: Point) {
        debug_assert!(self.state.started, "add_point_to_line without start_line");

        let Some(last_drawn) = self.state.last_drawn else {
            self.state.last_drawn = Some(point);
            self.draw(point, true);
            return;
        };

        if let Some(lookahead) = self.state.lookahead
            && turn_angle(last_drawn, lookahead, point) > ANGLE_THRESHOLD
        {
            self.draw(lookahead, false);
            self.state.last_drawn = Some(lookahead);
        }
        self.state.lookahead = Some(point);
    }

    /// Close the open line, flushing the pending lookahead point.
    pub fn end_line(&mut self) {
        debug_assert!(self.state.started, "end_line without start_line");

        if let Some(lookahead) = self.state.lookahead {
            self.draw(lookahead, false);
        }
        self.state = LineState::default();
        self.lines_drawn += 1;
        self.backend.end_line();
    }

    /// Lines closed since the last [`initialize`](Self::initialize).
    pub const fn lines_drawn(&self) -> usize {
        self.lines_drawn
    }

    /// Points forwarded to the backend since the last
    /// [`initialize`](Self::initialize).
    pub const fn points_drawn(&self) -> usize {
        self.points_drawn
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Unwrap the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn draw(&mut self, point: Point, first: bool) {
        self.points_drawn += 1;
        if first {
            self.backend.move_to(point);
        } else {
            self.backend.line_to(point);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Call, Recorder};
    use super::*;

    fn draw_line(points: &[Point]) -> Vec<Call> {
        let mut plotter = Plotter::new(Recorder::default());
        plotter.start_line();
        for &p in points {
            plotter.add_point_to_line(p);
        }
        plotter.end_line();
        plotter.into_backend().calls
    }

    #[test]
    fn colinear_points_keep_first_and_last() {
        let calls = draw_line(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]);
        assert_eq!(
            calls,
            vec![
                Call::Begin,
                Call::MoveTo(Point::new(0.0, 0.0)),
                Call::LineTo(Point::new(2.0, 2.0)),
                Call::End,
            ]
        );
    }

    #[test]
    fn right_angle_keeps_all_three() {
        let calls = draw_line(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        assert_eq!(
            calls,
            vec![
                Call::Begin,
                Call::MoveTo(Point::new(0.0, 0.0)),
                Call::LineTo(Point::new(10.0, 0.0)),
                Call::LineTo(Point::new(10.0, 10.0)),
                Call::End,
            ]
        );
    }

    #[test]
    fn gentle_curve_accumulates_until_threshold() {
        // Each point turns by 1° relative to the last drawn one: the first
        // lookahead is dropped, the turn then exceeds 1.8° and is kept.
        let mut points = vec![Point::new(0.0, 0.0)];
        let mut heading = 0.0_f64;
        let mut p = Point::new(0.0, 0.0);
        for _ in 0..6 {
            heading += 1.0_f64.to_radians();
            p = p.offset(Point::new(heading.cos(), heading.sin()), 10.0);
            points.push(p);
        }
        let calls = draw_line(&points);
        let drawn = calls
            .iter()
            .filter(|c| matches!(c, Call::MoveTo(_) | Call::LineTo(_)))
            .count();
        assert!(drawn > 2 && drawn < points.len(), "drawn {drawn}");
        assert_eq!(calls[calls.len() - 2], Call::LineTo(p));
    }

    #[test]
    fn single_point_line_is_just_a_move() {
        let calls = draw_line(&[Point::new(4.0, 2.0)]);
        assert_eq!(
            calls,
            vec![Call::Begin, Call::MoveTo(Point::new(4.0, 2.0)), Call::End]
        );
    }

    #[test]
    fn state_resets_between_lines() {
        let mut plotter = Plotter::new(Recorder::default());
        plotter.initialize(&PlotterInfo::with_colors(false, 1.0, 0.0, LineCap::Round));
        for offset in [0.0, 50.0] {
            assert!(!plotter.has_started_a_line());
            plotter.start_line();
            assert!(plotter.has_started_a_line());
            plotter.add_point_to_line(Point::new(offset, 0.0));
            plotter.add_point_to_line(Point::new(offset + 5.0, 0.0));
            plotter.end_line();
        }
        plotter.finalize();
        assert_eq!(plotter.lines_drawn(), 2);
        assert_eq!(plotter.points_drawn(), 4);

        let lines = plotter.backend().lines();
        assert_eq!(lines[1][0], Point::new(50.0, 0.0));
    }

    #[test]
    fn turn_angle_is_folded() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(turn_angle(a, b, Point::new(2.0, 0.0)).abs() < 1e-12);
        assert!((turn_angle(a, b, Point::new(0.0, 0.0)) - PI).abs() < 1e-12);
        // Crossing the atan2 branch cut still gives the small angle.
        let left = Point::new(-1.0, 0.0);
        let c = Point::new(-2.0, -0.01);
        assert!(turn_angle(Point::new(0.0, 0.0), left, c) < 0.011);
    }

    #[test]
    fn inverted_colors_swap_background_and_line() {
        let normal = PlotterInfo::with_colors(false, 2.0, 0.0, LineCap::Butt);
        let inverted = PlotterInfo::with_colors(true, 2.0, 0.0, LineCap::Butt);
        assert_eq!(normal.background, Color::WHITE);
        assert_eq!(inverted.background, Color::BLACK);
        assert_eq!(inverted.line_color, Color::WHITE);
        assert_eq!(Color::new(255, 0, 16).to_hex(), "#ff0010");
    }
}
