//! Grayscale image sampling.
//!
//! [`ImageSampler`] keeps the decoded source image and a resampled
//! grayscale grid sized for the active line family. Line families ask for
//! a resolution close to their line spacing so that a line never skips
//! detail between its neighbours; the sampler only ever downsizes to
//! reach it.

use image::imageops::FilterType;
use image::{GrayImage, RgbaImage};

use crate::types::{Point, Size};

/// Owns the source image and the grayscale grid sampled by modulators.
#[derive(Debug, Clone)]
pub struct ImageSampler {
    source: RgbaImage,
    grid: GrayImage,
}

impl ImageSampler {
    /// Create a sampler for `source`.
    ///
    /// The grid is empty until the first [`resize`](Self::resize);
    /// sampling before that returns 0 everywhere.
    #[must_use]
    pub fn new(source: RgbaImage) -> Self {
        Self {
            source,
            grid: GrayImage::new(0, 0),
        }
    }

    /// Width divided by height of the source image.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = self.source.dimensions();
        if h == 0 {
            1.0
        } else {
            f64::from(w) / f64::from(h)
        }
    }

    /// Current grid size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.grid.width(), self.grid.height())
    }

    /// The current grayscale grid.
    #[must_use]
    pub const fn grid(&self) -> &GrayImage {
        &self.grid
    }

    /// Whether the grid holds no pixels, either before the first resize or
    /// because the source image itself is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.width() == 0 || self.grid.height() == 0
    }

    /// Resample the grid towards `target`.
    ///
    /// Each axis is capped at the source resolution (the grid is never
    /// upsized) and at least 1 pixel. The grid is only recomputed when the
    /// resulting size differs from the cached one. Gray levels are the mean
    /// of the red, green and blue channels. An empty source leaves the
    /// grid empty.
    pub fn resize(&mut self, target: Size) {
        let (src_w, src_h) = self.source.dimensions();
        if src_w == 0 || src_h == 0 {
            if !self.is_empty() {
                self.grid = GrayImage::new(0, 0);
            }
            return;
        }

        let wanted = Size::new(
            target.width.min(src_w).max(1),
            target.height.min(src_h).max(1),
        );

        if wanted == self.size() {
            return;
        }

        log::debug!(
            "resize image grid from {}x{} to {}x{}",
            self.grid.width(),
            self.grid.height(),
            wanted.width,
            wanted.height,
        );

        let resized = if (wanted.width, wanted.height) == (src_w, src_h) {
            self.source.clone()
        } else {
            image::imageops::resize(&self.source, wanted.width, wanted.height, FilterType::Triangle)
        };

        self.grid = GrayImage::from_fn(resized.width(), resized.height(), |x, y| {
            let [r, g, b, _] = resized.get_pixel(x, y).0;
            let sum = u16::from(r) + u16::from(g) + u16::from(b);
            #[allow(clippy::cast_possible_truncation)]
            image::Luma([(sum / 3) as u8])
        });
    }

    /// Sample the grid at a normalized position, returning a value in
    /// `[0, 1]` (0 is black).
    ///
    /// `(0, 0)` maps to the center of the top-left pixel and `(1, 1)` to
    /// the center of the bottom-right one. Values are bilinearly
    /// interpolated; neighbours outside the grid count as black, which
    /// fades the image out past its border instead of failing.
    #[must_use]
    pub fn sample(&self, normalized: Point) -> f64 {
        let (w, h) = self.grid.dimensions();
        if w == 0 || h == 0 {
            return 0.0;
        }

        let px = normalized.x * f64::from(w - 1);
        let py = normalized.y * f64::from(h - 1);

        let floor_x = px.floor();
        let floor_y = py.floor();
        let fract_x = px - floor_x;
        let fract_y = py - floor_y;

        #[allow(clippy::cast_possible_truncation)]
        let (ix, iy) = (floor_x as i64, floor_y as i64);

        let top = self
            .pixel(ix, iy)
            .mul_add(1.0 - fract_x, self.pixel(ix + 1, iy) * fract_x);
        let bottom = self
            .pixel(ix, iy + 1)
            .mul_add(1.0 - fract_x, self.pixel(ix + 1, iy + 1) * fract_x);

        top.mul_add(1.0 - fract_y, bottom * fract_y) / 255.0
    }

    /// Gray level at integer pixel coordinates, 0 outside the grid.
    fn pixel(&self, x: i64, y: i64) -> f64 {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return 0.0;
        };
        if x >= self.grid.width() || y >= self.grid.height() {
            return 0.0;
        }
        f64::from(self.grid.get_pixel(x, y).0[0])
    }
}
