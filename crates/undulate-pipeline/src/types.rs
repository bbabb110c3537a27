//! Shared types for the undulate rendering core.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can hand decoded images
/// to the renderer without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `GrayImage`, the sampler's internal grid type.
pub use image::GrayImage;

/// A 2D point (or direction vector) in plane coordinates.
///
/// Line families also use `Point` for their unit normals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    ///
    /// A coordinate shared by both ends is returned unchanged for every
    /// `t`, so walks along a border never leave it.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            (other.x - self.x).mul_add(t, self.x),
            (other.y - self.y).mul_add(t, self.y),
        )
    }

    /// Move `amount` units along `direction`.
    #[must_use]
    pub fn offset(self, direction: Self, amount: f64) -> Self {
        Self::new(
            direction.x.mul_add(amount, self.x),
            direction.y.mul_add(amount, self.y),
        )
    }

    /// Rotate around `center` by the angle whose cosine and sine are given.
    #[must_use]
    pub fn rotate_about(self, center: Self, cos: f64, sin: f64) -> Self {
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self::new(
            cos.mul_add(dx, -sin * dy) + center.x,
            sin.mul_add(dx, cos * dy) + center.y,
        )
    }

    /// Length of the point seen as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Integer size of an image, a plotter surface or a fitted rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the diagonal.
    #[must_use]
    pub fn diagonal(self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }

    /// Center of the `[0, width] x [0, height]` rectangle.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(0.5 * f64::from(self.width), 0.5 * f64::from(self.height))
    }
}

/// Which family of lines is walked across the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    /// Parallel straight lines at the configured orientation.
    #[default]
    Straight,
    /// A single interleaved spiral from the center outward.
    Spiral,
    /// A single concentric regular-polygon spiral.
    Polygon,
    /// Parallel sine-shaped carriers.
    Sines,
}

/// How each line is modulated by image darkness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternStyle {
    /// Lateral wave displacement; darker regions oscillate wider and faster.
    #[default]
    Waves,
    /// On/off dashes drawn from an ordered dithering table.
    Dithering,
}

/// Read-only parameter snapshot consumed by one render pass.
///
/// Every field has a default, and deserialization accepts partial JSON
/// objects (missing fields fall back to [`RenderConfig::default`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Line family to walk.
    pub line_style: LineStyle,

    /// Darkness modulation applied to every line.
    pub pattern: PatternStyle,

    /// Line density: how many line spacings fit in the fitted image's
    /// longer side. Must be positive.
    pub lines_count: f64,

    /// Orientation of the line family in degrees.
    pub orientation: f64,

    /// Number of sides of the polygon family. Must be at least 3.
    pub polygon_sides: u32,

    /// Amplitude of the sine carriers, as a fraction of `0.2 * max(w, h)`.
    pub sines_amplitude: f64,

    /// Number of sine periods along each carrier.
    pub sines_frequency: f64,

    /// Maximum modulation amplitude in `[0, 1]`.
    ///
    /// For waves this scales the lateral displacement; for dithering it
    /// scales the dash thickness.
    pub max_amplitude: f64,

    /// Maximum modulation frequency in `[0, 1]`.
    pub max_frequency: f64,

    /// Rotation of the wave displacement direction in degrees.
    /// Must lie strictly inside `(-90, 90)`.
    pub wave_angle: f64,

    /// Wave shape in `[0, 1]`: 0 is a pure sine, 1 is nearly square.
    pub wave_squareness: f64,

    /// Stroke thickness in plotter pixels.
    pub line_thickness: f64,

    /// Draw light lines on a dark background.
    pub invert_colors: bool,

    /// Square-root compress darkness so perceived intensity is closer to
    /// the source image.
    pub true_intensity: bool,

    /// Blur radius applied when displaying the result (0 disables).
    pub blur: f64,
}

impl RenderConfig {
    /// Default line density.
    pub const DEFAULT_LINES_COUNT: f64 = 50.0;
    /// Default line-family orientation in degrees.
    pub const DEFAULT_ORIENTATION: f64 = 0.0;
    /// Default polygon side count.
    pub const DEFAULT_POLYGON_SIDES: u32 = 6;
    /// Default sine carrier amplitude.
    pub const DEFAULT_SINES_AMPLITUDE: f64 = 0.1;
    /// Default sine carrier frequency.
    pub const DEFAULT_SINES_FREQUENCY: f64 = 3.0;
    /// Default modulation amplitude.
    pub const DEFAULT_MAX_AMPLITUDE: f64 = 1.0;
    /// Default modulation frequency.
    pub const DEFAULT_MAX_FREQUENCY: f64 = 0.2;
    /// Default wave angle in degrees.
    pub const DEFAULT_WAVE_ANGLE: f64 = 0.0;
    /// Default wave squareness.
    pub const DEFAULT_WAVE_SQUARENESS: f64 = 0.0;
    /// Default stroke thickness.
    pub const DEFAULT_LINE_THICKNESS: f64 = 1.0;
    /// Default blur radius.
    pub const DEFAULT_BLUR: f64 = 0.0;

    /// Check the invariants the renderer relies on for meaningful output.
    ///
    /// The renderer itself never fails on out-of-range values (degenerate
    /// geometry produces empty or minimal walks), so validation is left
    /// to front-ends that accept user input.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), RenderError> {
        fn check(ok: bool, message: &str) -> Result<(), RenderError> {
            if ok {
                Ok(())
            } else {
                Err(RenderError::InvalidConfig(message.to_string()))
            }
        }

        check(
            self.lines_count.is_finite() && self.lines_count > 0.0,
            "lines_count must be a positive number",
        )?;
        check(self.orientation.is_finite(), "orientation must be finite")?;
        check(self.polygon_sides >= 3, "polygon_sides must be at least 3")?;
        check(
            self.sines_amplitude.is_finite() && self.sines_amplitude >= 0.0,
            "sines_amplitude must be non-negative",
        )?;
        check(
            self.sines_frequency.is_finite() && self.sines_frequency >= 0.0,
            "sines_frequency must be non-negative",
        )?;
        check(
            (0.0..=1.0).contains(&self.max_amplitude),
            "max_amplitude must be within [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.max_frequency),
            "max_frequency must be within [0, 1]",
        )?;
        check(
            self.wave_angle.abs() < 90.0,
            "wave_angle must be strictly between -90 and 90 degrees",
        )?;
        check(
            (0.0..=1.0).contains(&self.wave_squareness),
            "wave_squareness must be within [0, 1]",
        )?;
        check(
            self.line_thickness.is_finite() && self.line_thickness > 0.0,
            "line_thickness must be positive",
        )?;
        check(
            self.blur.is_finite() && self.blur >= 0.0,
            "blur must be non-negative",
        )
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_style: LineStyle::default(),
            pattern: PatternStyle::default(),
            lines_count: Self::DEFAULT_LINES_COUNT,
            orientation: Self::DEFAULT_ORIENTATION,
            polygon_sides: Self::DEFAULT_POLYGON_SIDES,
            sines_amplitude: Self::DEFAULT_SINES_AMPLITUDE,
            sines_frequency: Self::DEFAULT_SINES_FREQUENCY,
            max_amplitude: Self::DEFAULT_MAX_AMPLITUDE,
            max_frequency: Self::DEFAULT_MAX_FREQUENCY,
            wave_angle: Self::DEFAULT_WAVE_ANGLE,
            wave_squareness: Self::DEFAULT_WAVE_SQUARENESS,
            line_thickness: Self::DEFAULT_LINE_THICKNESS,
            invert_colors: false,
            true_intensity: true,
            blur: Self::DEFAULT_BLUR,
        }
    }
}

/// Errors that can occur at the fallible edges of the renderer
/// (image decoding and configuration validation).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Render configuration is invalid.
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
}
