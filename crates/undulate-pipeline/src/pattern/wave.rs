//! Wave modulation: lines oscillate sideways, wider and faster where the
//! image is darker.

use super::{Darkness, PatternModulator, close_line, extend_line, locate};
use crate::fitting::ImageFitting;
use crate::lines::LineFamily;
use crate::plotter::{Backend, LineCap, Plotter, PlotterInfo};
use crate::sampler::ImageSampler;
use crate::types::{Point, RenderConfig};

/// Frequency (periods per unit of zoom) reached at full darkness with
/// `max_frequency = 1`.
const BASE_FREQUENCY: f64 = 2500.0;

/// Below this squareness the wave is a plain sine.
const SQUARENESS_EPSILON: f64 = 0.005;

/// Value of the wave at `phase` for a given amplitude.
///
/// A squareness under 0.005 gives exactly `amplitude * sin(phase)`.
/// Higher values flatten the crests towards a square wave through
/// `sign(sin φ)·|sin φ|^(1 - 0.99·squareness)`.
#[must_use]
pub fn wave_function(phase: f64, amplitude: f64, squareness: f64) -> f64 {
    let sin = phase.sin();
    if squareness < SQUARENESS_EPSILON {
        return amplitude * sin;
    }
    let sharpness = 0.99f64.mul_add(-squareness, 1.0);
    amplitude * sin.signum() * sin.abs().powf(sharpness)
}

/// Lateral wave displacement along the line normals.
#[derive(Debug, Clone)]
pub struct WavePattern {
    fitting: ImageFitting,
    darkness: Darkness,
    info: PlotterInfo,
    max_amplitude: f64,
    max_frequency: f64,
    step: f64,
    squareness: f64,
    /// Cosine and sine of the wave angle, pre-scaled by `1 / cos`.
    rotation: (f64, f64),
}

impl WavePattern {
    /// Set up the modulator for one pass.
    #[must_use]
    pub fn new(config: &RenderConfig, fitting: ImageFitting, spacing: f64) -> Self {
        let max_frequency = BASE_FREQUENCY * config.max_frequency / fitting.zoom_factor;
        let max_amplitude =
            (0.5 * (spacing - config.line_thickness) * config.max_amplitude).max(0.0);
        let step = 1.0 / (2.0 * max_frequency).max(1.0);

        let angle = if config.wave_angle.abs() < 90.0 {
            config.wave_angle.to_radians()
        } else {
            0.0
        };
        let (sin, cos) = angle.sin_cos();

        Self {
            fitting,
            darkness: Darkness::from_flags(config.invert_colors, config.true_intensity),
            info: PlotterInfo::with_colors(
                config.invert_colors,
                config.line_thickness,
                config.blur,
                LineCap::Round,
            ),
            max_amplitude: if max_amplitude.is_finite() {
                max_amplitude
            } else {
                0.0
            },
            max_frequency,
            step,
            squareness: config.wave_squareness,
            rotation: (1.0, sin / cos),
        }
    }

    /// Displacement at full darkness, in plotter pixels.
    #[must_use]
    pub const fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Phase advance per pixel at full darkness.
    #[must_use]
    pub const fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Walk step: two samples per period at the highest frequency, and at
    /// least one per pixel.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Rotate a normal by the wave angle and stretch it so the wave height
    /// measured along the original normal does not depend on the angle.
    fn rotate(&self, normal: Point) -> Point {
        let (cos, sin) = self.rotation;
        Point::new(
            cos.mul_add(normal.x, -sin * normal.y),
            sin.mul_add(normal.x, cos * normal.y),
        )
    }
}

impl PatternModulator for WavePattern {
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

        let mut phase = 0.0;

        lines.walk_on_line(line_id, self.step, &mut |point, normal| {
            let Some((relative, absolute)) = locate(&self.fitting, point) else {
                close_line(plotter);
                return;
            };

            let darkness = self.darkness.of(sampler.sample(relative));
            let height = wave_function(phase, darkness * self.max_amplitude, self.squareness);
            extend_line(plotter, absolute.offset(self.rotate(normal), height));

            phase += darkness * self.max_frequency * self.step;
        });

        close_line(plotter);
    }
}
