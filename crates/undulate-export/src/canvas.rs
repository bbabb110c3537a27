//! Raster plotter backend.
//!
//! Draws into a persistent [`tiny_skia::Pixmap`] sized for the logical
//! canvas times the device pixel ratio. The pixmap is only reallocated
//! when that physical size changes, so repeated renders into the same
//! canvas reuse the same buffer.
//!
//! Blur is display-only: [`CanvasBackend::display_image`] returns a
//! blurred copy while the pixmap itself stays sharp.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use tiny_skia::{Color as SkiaColor, LineJoin, Paint, PathBuilder, Pixmap, Stroke};
use undulate_pipeline::{Backend, Color, LineCap, Plotter, PlotterInfo, Point, Size};

use crate::ExportError;

/// A plotter drawing into a raster canvas.
pub type CanvasPlotter = Plotter<CanvasBackend>;

/// Backend rasterizing lines with `tiny-skia`.
#[derive(Debug)]
pub struct CanvasBackend {
    size: Size,
    device_pixel_ratio: f64,
    pixmap: Pixmap,
    path: PathBuilder,
    paint: Paint<'static>,
    stroke: Stroke,
    blur: f64,
}

fn physical_size(size: Size, device_pixel_ratio: f64) -> Size {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scale = |logical: u32| (f64::from(logical) * device_pixel_ratio).round() as u32;
    Size::new(scale(size.width), scale(size.height))
}

fn sanitize_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    }
}

fn allocate(physical: Size) -> Result<Pixmap, ExportError> {
    Pixmap::new(physical.width, physical.height).ok_or(ExportError::SurfaceAllocation {
        width: physical.width,
        height: physical.height,
    })
}

fn skia_color(color: Color) -> SkiaColor {
    SkiaColor::from_rgba8(color.r, color.g, color.b, 255)
}

impl CanvasBackend {
    /// Create a canvas of `size` logical pixels.
    ///
    /// A non-finite or non-positive `device_pixel_ratio` is treated as 1.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SurfaceAllocation`] when the physical size
    /// is empty or too large.
    pub fn new(size: Size, device_pixel_ratio: f64) -> Result<Self, ExportError> {
        let device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        let pixmap = allocate(physical_size(size, device_pixel_ratio))?;

        let mut paint = Paint::default();
        paint.anti_alias = true;

        Ok(Self {
            size,
            device_pixel_ratio,
            pixmap,
            path: PathBuilder::new(),
            paint,
            stroke: Stroke::default(),
            blur: 0.0,
        })
    }

    /// Convenience constructor for a ready-to-use [`CanvasPlotter`].
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn plotter(size: Size, device_pixel_ratio: f64) -> Result<CanvasPlotter, ExportError> {
        Self::new(size, device_pixel_ratio).map(Plotter::new)
    }

    /// Change the logical size or pixel ratio.
    ///
    /// The pixmap is kept when the physical size does not change.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SurfaceAllocation`] when a new pixmap is
    /// needed and cannot be allocated; the canvas is left unchanged.
    pub fn resize(&mut self, size: Size, device_pixel_ratio: f64) -> Result<(), ExportError> {
        let device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        let physical = physical_size(size, device_pixel_ratio);
        if physical != self.physical_size() {
            log::debug!(
                "reallocate canvas from {}x{} to {}x{}",
                self.pixmap.width(),
                self.pixmap.height(),
                physical.width,
                physical.height,
            );
            self.pixmap = allocate(physical)?;
        }
        self.size = size;
        self.device_pixel_ratio = device_pixel_ratio;
        Ok(())
    }

    /// Size of the pixmap in device pixels.
    #[must_use]
    pub fn physical_size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Device pixel ratio.
    #[must_use]
    pub const fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// The sharp raster surface.
    #[must_use]
    pub const fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Display blur radius in logical pixels, normally set by
    /// [`Backend::initialize`].
    pub const fn set_blur(&mut self, blur: f64) {
        self.blur = blur;
    }

    /// Copy of the surface as straight (non-premultiplied) RGBA.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let pixels = self.pixmap.pixels();
        RgbaImage::from_fn(width, height, |x, y| {
            let index = (y as usize) * (width as usize) + x as usize;
            pixels.get(index).map_or(Rgba([0, 0, 0, 0]), |p| {
                let c = p.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            })
        })
    }

    /// What the canvas shows: the surface blurred by the display blur.
    ///
    /// The blur sigma is scaled by the device pixel ratio. Each channel is
    /// blurred independently; the pixmap itself is not modified.
    #[must_use]
    pub fn display_image(&self) -> RgbaImage {
        let image = self.to_image();
        #[allow(clippy::cast_possible_truncation)]
        let sigma = (self.blur * self.device_pixel_ratio) as f32;
        if !(sigma.is_finite() && sigma > 0.0) {
            return image;
        }

        let (w, h) = image.dimensions();
        let channels: [GrayImage; 4] = std::array::from_fn(|c| {
            GrayImage::from_fn(w, h, |x, y| Luma([image.get_pixel(x, y).0[c]]))
        });
        let blurred: [GrayImage; 4] =
            std::array::from_fn(|c| imageproc::filter::gaussian_blur_f32(&channels[c], sigma));

        RgbaImage::from_fn(w, h, |x, y| {
            Rgba(std::array::from_fn(|c| blurred[c].get_pixel(x, y).0[0]))
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn device(&self, point: Point) -> (f32, f32) {
        (
            (point.x * self.device_pixel_ratio) as f32,
            (point.y * self.device_pixel_ratio) as f32,
        )
    }
}

impl Backend for CanvasBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn initialize(&mut self, info: &PlotterInfo) {
        self.pixmap.fill(skia_color(info.background));
        self.paint.set_color(skia_color(info.line_color));

        #[allow(clippy::cast_possible_truncation)]
        let width = (info.line_thickness * self.device_pixel_ratio) as f32;
        self.stroke = Stroke {
            width,
            line_cap: match info.line_cap {
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Butt => tiny_skia::LineCap::Butt,
            },
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.blur = info.blur;
    }

    fn finalize(&mut self) {}

    fn begin_line(&mut self) {
        self.path = PathBuilder::new();
    }

    fn move_to(&mut self, point: Point) {
        let (x, y) = self.device(point);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, point: Point) {
        let (x, y) = self.device(point);
        self.path.line_to(x, y);
    }

    fn end_line(&mut self) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        // A lone move_to has no segment to stroke.
        if let Some(path) = builder.finish() {
            self.pixmap.stroke_path(
                &path,
                &self.paint,
                &self.stroke,
                tiny_skia::Transform::identity(),
                None,
            );
        }
    }
}
