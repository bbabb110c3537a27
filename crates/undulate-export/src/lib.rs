//! undulate-export: Plotter backends.
//!
//! Implements the [`Backend`](undulate_pipeline::Backend) trait for the two
//! output surfaces of a render: an SVG document ([`SvgBackend`]) and a
//! raster canvas ([`CanvasBackend`]). Both receive the same decimated
//! point stream from [`Plotter`](undulate_pipeline::Plotter).

pub mod canvas;
pub mod svg;

pub use canvas::{CanvasBackend, CanvasPlotter};
pub use svg::{SVG_SIZE, SvgBackend, SvgMetadata, SvgPlotter};

/// Errors raised while preparing an output surface.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The raster surface could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    SurfaceAllocation {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },
}
