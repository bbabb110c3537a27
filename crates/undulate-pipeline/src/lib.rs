//! undulate-pipeline: Pure line-art rendering core (sans-IO).
//!
//! Turns a raster image into procedural line-art by walking a family of
//! lines across the image and modulating each line by the local darkness:
//! fit image -> choose pattern -> choose lines -> resample image ->
//! walk and modulate every line -> plot.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and emits draw calls to a [`Backend`]. Concrete backends (SVG
//! document, raster canvas) live in `undulate-export`.

pub mod decode;
pub mod fitting;
pub mod lines;
pub mod pattern;
pub mod plotter;
pub mod render;
pub mod sampler;
pub mod types;

pub use decode::load_image;
pub use fitting::{ImageFitting, fit_image};
pub use lines::{LineFamily, Lines};
pub use pattern::{LineSeeds, Pattern, PatternModulator};
pub use plotter::{Backend, Color, LineCap, Plotter, PlotterInfo};
pub use render::{RenderSummary, Renderer};
pub use sampler::ImageSampler;
pub use types::{
    GrayImage, LineStyle, PatternStyle, Point, RenderConfig, RenderError, RgbaImage, Size,
};
