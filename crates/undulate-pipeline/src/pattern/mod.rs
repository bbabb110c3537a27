//! Pattern modulators: turn line walks into plotter calls driven by image
//! darkness.
//!
//! This module defines the [`PatternModulator`] trait and the [`Pattern`]
//! enum that selects a modulator from the [`PatternStyle`] of the current
//! [`RenderConfig`].
//!
//! Every modulator shares the same out-of-image handling: a sample whose
//! normalized coordinate leaves `[0, 1]²` ends the open plotter line, and
//! the next sample back inside opens a new one. Each
//! [`draw_line`](PatternModulator::draw_line) call leaves no line open.

mod dithering;
mod wave;

pub use dithering::{DITHERING_PATTERNS, DitheringPattern, LineSeeds, dithering_bucket};
pub use wave::{WavePattern, wave_function};

use crate::fitting::ImageFitting;
use crate::lines::LineFamily;
use crate::plotter::{Backend, Plotter, PlotterInfo};
use crate::sampler::ImageSampler;
use crate::types::{PatternStyle, Point, RenderConfig};

/// A strategy that draws one logical line at a time.
pub trait PatternModulator {
    /// Drawing parameters for the whole pass.
    fn plotter_info(&self) -> PlotterInfo;

    /// Walk `line_id` of `lines`, sample the image along it and emit the
    /// modulated result to `plotter`.
    fn draw_line<B: Backend>(
        &mut self,
        lines: &dyn LineFamily,
        line_id: usize,
        sampler: &ImageSampler,
        plotter: &mut Plotter<B>,
    );
}

/// Runtime selection of a pattern modulator.
#[derive(Debug)]
pub enum Pattern<'s> {
    /// Lateral wave displacement.
    Wave(WavePattern),
    /// Ordered on/off dashes.
    Dithering(DitheringPattern<'s>),
}

impl<'s> Pattern<'s> {
    /// Build the modulator selected by `config.pattern`.
    ///
    /// The dithering modulator borrows `seeds` for the duration of the
    /// pass; the wave modulator ignores it.
    #[must_use]
    pub fn choose(
        config: &RenderConfig,
        fitting: ImageFitting,
        spacing: f64,
        seeds: &'s mut LineSeeds,
    ) -> Self {
        match config.pattern {
            PatternStyle::Waves => Self::Wave(WavePattern::new(config, fitting, spacing)),
            PatternStyle::Dithering => {
                Self::Dithering(DitheringPattern::new(config, fitting, spacing, seeds))
            }
        }
    }
}

impl PatternModulator for Pattern<'_> {
    fn plotter_info(&self) -> PlotterInfo {
        match self {
            Self::Wave(pattern) => pattern.plotter_info(),
            Self::Dithering(pattern) => pattern.plotter_info(),
        }
    }

    fn draw_line<B: Backend>(
        &mut self,
        lines: &dyn LineFamily,
        line_id: usize,
        sampler: &ImageSampler,
        plotter: &mut Plotter<B>,
    ) {
        match self {
            Self::Wave(pattern) => pattern.draw_line(lines, line_id, sampler, plotter),
            Self::Dithering(pattern) => pattern.draw_line(lines, line_id, sampler, plotter),
        }
    }
}

/// How a sampled gray level becomes darkness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Darkness {
    /// `1 - v`: dark pixels drive the modulation.
    Plain,
    /// `v`: light pixels drive the modulation (light lines on black).
    Inverted,
    /// `sqrt(1.001 - v)`. The bias keeps the slope finite at full white.
    Compressed,
    /// `sqrt(v)`.
    CompressedInverted,
}

impl Darkness {
    /// Pick the mapping for the color flags of a render.
    #[must_use]
    pub const fn from_flags(invert_colors: bool, true_intensity: bool) -> Self {
        match (invert_colors, true_intensity) {
            (false, false) => Self::Plain,
            (true, false) => Self::Inverted,
            (false, true) => Self::Compressed,
            (true, true) => Self::CompressedInverted,
        }
    }

    /// Darkness of gray level `value` (0 is black).
    #[must_use]
    pub fn of(self, value: f64) -> f64 {
        match self {
            Self::Plain => 1.0 - value,
            Self::Inverted => value,
            Self::Compressed => (1.001 - value).sqrt(),
            Self::CompressedInverted => value.sqrt(),
        }
    }
}

/// Normalized and plotter coordinates of a local sample, or `None` when
/// it falls outside the image.
fn locate(fitting: &ImageFitting, local: Point) -> Option<(Point, Point)> {
    let relative = fitting.local_to_relative(local);
    ImageFitting::is_inside(relative).then(|| (relative, fitting.relative_to_absolute(relative)))
}

fn close_line<B: Backend>(plotter: &mut Plotter<B>) {
    if plotter.has_started_a_line() {
        plotter.end_line();
    }
}

fn extend_line<B: Backend>(plotter: &mut Plotter<B>, point: Point) {
    if !plotter.has_started_a_line() {
        plotter.start_line();
    }
    plotter.add_point_to_line(point);
}
