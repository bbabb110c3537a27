//! Render orchestration: one full pass from image to plotter.
//!
//! [`Renderer`] owns the state that outlives a single pass (the image
//! sampler and the dithering seeds) and drives every pass with a fresh
//! line family and pattern modulator built from the configuration.
//!
//! Each pass returns a [`RenderSummary`]. Durations are measured with the
//! `web-time` crate, which uses `performance.now()` on WASM and
//! `std::time::Instant` on native, and serialized as fractional seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fitting::{ImageFitting, fit_image};
use crate::lines::{LineFamily, Lines};
use crate::pattern::{LineSeeds, Pattern, PatternModulator};
use crate::plotter::{Backend, Plotter};
use crate::sampler::ImageSampler;
use crate::types::{RenderConfig, RgbaImage, Size};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom("duration seconds must be finite and non-negative")
        })
    }
}

/// What a render pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Logical lines walked.
    pub line_count: usize,
    /// Plotter lines emitted (out-of-image gaps and dithering split
    /// logical lines).
    pub plotter_lines: usize,
    /// Points forwarded to the backend after decimation.
    pub points: usize,
    /// Resolution of the sampled grayscale grid.
    pub grid_size: Size,
    /// Placement of the image on the plotter.
    pub fitting: ImageFitting,
    /// Wall-clock duration of the pass (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Drives render passes for one source image.
#[derive(Debug)]
pub struct Renderer {
    sampler: ImageSampler,
    seeds: LineSeeds,
}

impl Renderer {
    /// Create a renderer with randomly seeded dithering.
    #[must_use]
    pub fn new(image: RgbaImage) -> Self {
        Self::with_seeds(image, LineSeeds::default())
    }

    /// Create a renderer with an explicit dithering seed cache.
    #[must_use]
    pub fn with_seeds(image: RgbaImage, seeds: LineSeeds) -> Self {
        Self {
            sampler: ImageSampler::new(image),
            seeds,
        }
    }

    /// The image sampler, as resized by the last pass.
    #[must_use]
    pub const fn sampler(&self) -> &ImageSampler {
        &self.sampler
    }

    /// Run one full pass into `plotter`.
    ///
    /// Fits the image to the plotter, derives the line spacing from the
    /// zoom factor, builds the pattern and line family selected by
    /// `config`, resamples the image for that family and draws every
    /// logical line before finalizing the plotter.
    pub fn render<B: Backend>(
        &mut self,
        config: &RenderConfig,
        plotter: &mut Plotter<B>,
    ) -> RenderSummary {
        let start = web_time::Instant::now();

        let fitting = fit_image(plotter.size(), self.sampler.aspect_ratio());
        let spacing = fitting.zoom_factor / config.lines_count;

        let mut pattern = Pattern::choose(config, fitting, spacing, &mut self.seeds);
        plotter.initialize(&pattern.plotter_info());

        let lines = Lines::choose(config, fitting.size_in_plotter, spacing);
        self.sampler.resize(lines.suggested_image_size());

        let line_count = lines.line_count();
        for line_id in 0..line_count {
            log::trace!("draw line {line_id} of {line_count}");
            pattern.draw_line(&lines, line_id, &self.sampler, plotter);
        }
        plotter.finalize();

        let summary = RenderSummary {
            line_count,
            plotter_lines: plotter.lines_drawn(),
            points: plotter.points_drawn(),
            grid_size: self.sampler.size(),
            fitting,
            duration: start.elapsed(),
        };
        log::debug!(
            "rendered {:?}/{:?}: {} lines, {} plotter lines, {} points in {:.1}ms",
            config.line_style,
            config.pattern,
            summary.line_count,
            summary.plotter_lines,
            summary.points,
            summary.duration.as_secs_f64() * 1000.0,
        );
        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plotter::test_support::{Call, Recorder};
    use crate::types::{LineStyle, PatternStyle};

    fn gray_image(size: u32, gray: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, image::Rgba([gray, gray, gray, 255]))
    }

    #[test]
    fn mid_gray_straight_lines_are_continuous() {
        let mut renderer = Renderer::new(gray_image(100, 128));
        let mut plotter = Plotter::new(Recorder::with_size(100, 100));
        let config = RenderConfig {
            lines_count: 10.0,
            ..RenderConfig::default()
        };

        let summary = renderer.render(&config, &mut plotter);

        assert_eq!(summary.line_count, 11);
        assert_eq!(summary.plotter_lines, 11);
        // Horizontal lines only need one grid row per line.
        assert_eq!(summary.grid_size, Size::new(100, 11));

        let lines = plotter.backend().lines();
        assert_eq!(lines.len(), 11);
        for line in &lines {
            assert!(line.len() > 2, "a modulated line keeps its crests");
            let first = line.first().unwrap();
            let last = line.last().unwrap();
            assert!(first.x.abs() < 1e-9);
            assert!((last.x - 100.0).abs() < 1e-9);
            assert!(line.windows(2).all(|w| w[1].x > w[0].x));
        }
    }

    #[test]
    fn protocol_is_bracketed_by_initialize_and_finalize() {
        let mut renderer = Renderer::new(gray_image(40, 60));
        let mut plotter = Plotter::new(Recorder::with_size(80, 40));
        renderer.render(&RenderConfig::default(), &mut plotter);

        let calls = &plotter.backend().calls;
        assert!(matches!(calls.first(), Some(Call::Initialize(_))));
        assert_eq!(calls.last(), Some(&Call::Finalize));
        let begins = calls.iter().filter(|c| **c == Call::Begin).count();
        let ends = calls.iter().filter(|c| **c == Call::End).count();
        assert_eq!(begins, ends);
    }

    #[test]
    fn image_is_centered_on_a_wider_plotter() {
        let mut renderer = Renderer::new(gray_image(50, 0));
        let mut plotter = Plotter::new(Recorder::with_size(300, 100));
        let summary = renderer.render(&RenderConfig::default(), &mut plotter);

        assert_eq!(summary.fitting.size_in_plotter, Size::new(100, 100));
        for point in plotter.backend().lines().iter().flatten() {
            assert!(point.x >= 100.0 - 1e-9 && point.x <= 200.0 + 1e-9);
        }
    }

    #[test]
    fn every_style_renders_something_on_dark_input() {
        for line_style in [
            LineStyle::Straight,
            LineStyle::Spiral,
            LineStyle::Polygon,
            LineStyle::Sines,
        ] {
            for pattern in [PatternStyle::Waves, PatternStyle::Dithering] {
                let mut renderer = Renderer::with_seeds(gray_image(64, 20), LineSeeds::seeded(9));
                let mut plotter = Plotter::new(Recorder::with_size(128, 96));
                let config = RenderConfig {
                    line_style,
                    pattern,
                    lines_count: 20.0,
                    orientation: 15.0,
                    ..RenderConfig::default()
                };
                let summary = renderer.render(&config, &mut plotter);
                assert!(summary.plotter_lines > 0, "{line_style:?}/{pattern:?}");
                assert!(summary.points >= 2, "{line_style:?}/{pattern:?}");
            }
        }
    }

    #[test]
    fn dithering_is_stable_across_passes() {
        let mut renderer = Renderer::new(gray_image(60, 150));
        let config = RenderConfig {
            pattern: PatternStyle::Dithering,
            lines_count: 12.0,
            ..RenderConfig::default()
        };

        let mut first = Plotter::new(Recorder::with_size(60, 60));
        renderer.render(&config, &mut first);

        // A wave pass in between leaves the seeds alone.
        let mut waves = Plotter::new(Recorder::with_size(60, 60));
        renderer.render(&RenderConfig::default(), &mut waves);

        let mut second = Plotter::new(Recorder::with_size(60, 60));
        renderer.render(&config, &mut second);

        assert_eq!(first.backend().calls, second.backend().calls);
    }

    #[test]
    fn empty_image_draws_no_lines() {
        for pattern in [PatternStyle::Waves, PatternStyle::Dithering] {
            let mut renderer = Renderer::with_seeds(RgbaImage::new(0, 0), LineSeeds::seeded(2));
            let mut plotter = Plotter::new(Recorder::with_size(50, 50));
            let config = RenderConfig {
                pattern,
                ..RenderConfig::default()
            };
            let summary = renderer.render(&config, &mut plotter);

            assert_eq!(summary.plotter_lines, 0, "{pattern:?}");
            assert_eq!(summary.points, 0, "{pattern:?}");
            assert_eq!(summary.grid_size, Size::new(0, 0));
            let calls = &plotter.backend().calls;
            assert!(matches!(calls.first(), Some(Call::Initialize(_))));
            assert_eq!(calls.last(), Some(&Call::Finalize));
        }
    }

    #[test]
    fn summary_serializes_duration_as_seconds() {
        let mut renderer = Renderer::new(gray_image(10, 0));
        let mut plotter = Plotter::new(Recorder::with_size(10, 10));
        let mut summary = renderer.render(&RenderConfig::default(), &mut plotter);
        summary.duration = Duration::from_millis(1500);

        let json = serde_json::to_value(&summary).unwrap();
        assert!((json["duration"].as_f64().unwrap() - 1.5).abs() < 1e-12);
        let back: RenderSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back.duration, Duration::from_millis(1500));
        assert_eq!(back.line_count, summary.line_count);
    }
}
