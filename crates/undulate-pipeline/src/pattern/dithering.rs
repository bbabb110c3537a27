//! Ordered dithering: lines are cut into dashes whose density follows the
//! image darkness.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Darkness, PatternModulator, close_line, extend_line, locate};
use crate::fitting::ImageFitting;
use crate::lines::LineFamily;
use crate::plotter::{Backend, LineCap, Plotter, PlotterInfo};
use crate::sampler::ImageSampler;
use crate::types::RenderConfig;

/// Number of slots in one dithering row.
const PATTERN_LENGTH: usize = 16;

/// Raw walk samples per dithering portion; darkness is read once per
/// portion.
const SAMPLES_PER_PORTION: usize = 4;

/// Portions per unit of zoom at `max_frequency = 0` and `= 1`.
const MIN_PORTIONS: f64 = 10.0;
const MAX_PORTIONS: f64 = 500.0;

const O: bool = false;
const X: bool = true;

/// On/off rows indexed by quantized darkness, from all-off to all-on.
#[rustfmt::skip]
pub const DITHERING_PATTERNS: [[bool; PATTERN_LENGTH]; 17] = [
    [O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O],
    [O, O, O, O, O, O, O, X, O, O, O, O, O, O, O, O],
    [O, O, O, X, O, O, O, O, O, O, O, X, O, O, O, O],
    [O, O, X, O, O, O, O, X, O, O, O, O, X, O, O, O],
    [O, X, O, O, O, X, O, O, O, X, O, O, O, X, O, O],
    [X, O, O, X, O, O, X, O, O, X, O, O, X, O, O, O],
    [X, O, O, X, O, X, O, O, X, O, O, X, O, O, X, O],
    [X, O, X, O, O, X, O, O, X, O, X, O, X, O, X, O],
    [X, O, X, O, X, O, X, O, X, O, X, O, X, O, X, O],
    [X, O, X, O, X, X, O, X, X, O, X, O, X, O, X, O],
    [X, O, X, X, O, X, O, X, X, O, X, X, O, X, X, O],
    [X, O, X, X, O, X, X, O, X, X, O, X, X, O, X, X],
    [X, X, O, X, X, X, O, X, X, X, O, X, X, X, O, X],
    [X, X, X, O, X, X, X, X, O, X, X, X, X, O, X, X],
    [X, X, X, X, O, X, X, X, X, X, X, X, O, X, X, X],
    [X, X, X, X, X, X, X, X, O, X, X, X, X, X, X, X],
    [X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X],
];

/// Row of [`DITHERING_PATTERNS`] for a darkness value.
///
/// Darkness is clamped to `[0, 1]`; 0 selects the all-off row and 1 the
/// all-on row.
#[must_use]
pub fn dithering_bucket(darkness: f64) -> usize {
    let clamped = if darkness.is_nan() {
        0.0
    } else {
        darkness.clamp(0.0, 1.0)
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bucket = (clamped * 0.99 * 17.0).floor() as usize;
    bucket.min(DITHERING_PATTERNS.len() - 1)
}

/// Per-line random offsets into the dithering rows.
///
/// Each logical line draws its offset once, on first use, and keeps it for
/// the lifetime of the cache. Repeated renders of the same line therefore
/// dash identically, while neighbouring lines stay out of phase.
#[derive(Debug, Clone)]
pub struct LineSeeds {
    rng: StdRng,
    seeds: HashMap<usize, usize>,
}

impl LineSeeds {
    /// A cache with a reproducible sequence of offsets.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seeds: HashMap::new(),
        }
    }

    /// Offset of `line_id`, in `0..16`.
    pub fn seed_for(&mut self, line_id: usize) -> usize {
        *self
            .seeds
            .entry(line_id)
            .or_insert_with(|| self.rng.random_range(0..PATTERN_LENGTH))
    }

    /// Number of lines with an offset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether no offset has been drawn yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl Default for LineSeeds {
    fn default() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seeds: HashMap::new(),
        }
    }
}

/// Dashed lines following an ordered dithering table.
///
/// Borrows the seed cache for the pass, so offsets drawn for new lines
/// stay with the owner.
#[derive(Debug)]
pub struct DitheringPattern<'s> {
    fitting: ImageFitting,
    darkness: Darkness,
    info: PlotterInfo,
    portion_length: f64,
    seeds: &'s mut LineSeeds,
}

impl<'s> DitheringPattern<'s> {
    /// Set up the modulator for one pass.
    #[must_use]
    pub fn new(
        config: &RenderConfig,
        fitting: ImageFitting,
        spacing: f64,
        seeds: &'s mut LineSeeds,
    ) -> Self {
        let thickness = (config.max_amplitude * spacing).max(1.0);
        let portions =
            (MAX_PORTIONS - MIN_PORTIONS).mul_add(config.max_frequency, MIN_PORTIONS);

        Self {
            fitting,
            darkness: Darkness::from_flags(config.invert_colors, false),
            info: PlotterInfo::with_colors(
                config.invert_colors,
                thickness,
                config.blur,
                LineCap::Butt,
            ),
            portion_length: fitting.zoom_factor / portions,
            seeds,
        }
    }

    /// Length of one dash slot in plotter pixels.
    #[must_use]
    pub const fn portion_length(&self) -> f64 {
        self.portion_length
    }
}

impl PatternModulator for DitheringPattern<'_> {
    fn plotter_info(&self) -> PlotterInfo {
        self.info
    }

    fn draw_line<B: Backend>(
        &mut self,
        lines: &dyn LineFamily,
        line_id: usize,
        sampler: &ImageSampler,
        plotter: &mut Plotter<B>,
    ) {
        if sampler.is_empty() {
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let step = self.portion_length / SAMPLES_PER_PORTION as f64;
        let seed = self.seeds.seed_for(line_id);
        let mut samples = 0_usize;
        let mut dark = false;

        lines.walk_on_line(line_id, step, &mut |point, _normal| {
            let Some((relative, absolute)) = locate(&self.fitting, point) else {
                close_line(plotter);
                return;
            };

            if samples % SAMPLES_PER_PORTION == 0 {
                let portion = samples / SAMPLES_PER_PORTION;
                let darkness = self.darkness.of(sampler.sample(relative));
                let row = &DITHERING_PATTERNS[dithering_bucket(darkness)];
                dark = row[(portion + seed) % PATTERN_LENGTH];
            }
            samples += 1;

            if dark {
                extend_line(plotter, absolute);
            } else if plotter.has_started_a_line() {
                plotter.add_point_to_line(absolute);
                plotter.end_line();
            }
        });

        close_line(plotter);
    }
}
