//! SVG plotter backend.
//!
//! Serializes draw calls into an SVG document with a fixed
//! `1000 x 1000` `viewBox`. Every plotter line becomes one `<path>` whose
//! data reads `Mx,yLx,y x,y ...` with coordinates at 0.1 px precision.
//!
//! The document is accumulated as a list of string tokens and joined once
//! by [`SvgBackend::export`], so the cost of a render does not grow with
//! repeated concatenation.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>` and `<metadata>`
//! elements so exported files carry their name and render settings.

use undulate_pipeline::{Backend, LineCap, Plotter, PlotterInfo, Point, Size};

/// Logical width and height of every SVG document.
pub const SVG_SIZE: u32 = 1000;

/// Id of the blur filter definition.
const BLUR_FILTER_ID: &str = "gaussianBlur";

/// A plotter writing SVG.
pub type SvgPlotter = Plotter<SvgBackend>;

/// Metadata to embed in the SVG document.
///
/// Every field is optional. Text is XML-escaped.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the source image filename (without extension).
    pub title: Option<String>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<String>,

    /// Serialized render configuration, emitted inside `<metadata>` so
    /// exported files can be reproduced.
    pub config_json: Option<String>,
}

/// Escape the five XML special characters for safe embedding in element
/// text content and attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Backend building an SVG document string.
#[derive(Debug, Clone, Default)]
pub struct SvgBackend {
    metadata: SvgMetadata,
    parts: Vec<String>,
    has_blur: bool,
    points_in_line: usize,
}

impl SvgBackend {
    /// Backend without metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend embedding `metadata` in every document it writes.
    #[must_use]
    pub fn with_metadata(metadata: SvgMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Convenience constructor for a ready-to-use [`SvgPlotter`].
    #[must_use]
    pub fn plotter(metadata: SvgMetadata) -> SvgPlotter {
        Plotter::new(Self::with_metadata(metadata))
    }

    /// The document written by the last pass.
    #[must_use]
    pub fn export(&self) -> String {
        let start = web_time::Instant::now();
        let document = self.parts.concat();
        log::debug!(
            "joined {} SVG tokens ({} bytes) in {:?}",
            self.parts.len(),
            document.len(),
            start.elapsed(),
        );
        document
    }

    fn push_point(&mut self, command: &str, point: Point) {
        self.parts
            .push(format!("{command}{:.1},{:.1}", point.x, point.y));
    }
}

impl Backend for SvgBackend {
    fn size(&self) -> Size {
        Size::new(SVG_SIZE, SVG_SIZE)
    }

    fn initialize(&mut self, info: &PlotterInfo) {
        self.parts.clear();
        self.has_blur = info.blur > 0.0;
        self.points_in_line = 0;

        self.parts
            .push("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n".to_string());
        self.parts.push(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {SVG_SIZE} {SVG_SIZE}\">\n"
        ));

        if let Some(title) = &self.metadata.title {
            self.parts
                .push(format!("\t<title>{}</title>\n", xml_escape(title)));
        }
        if let Some(description) = &self.metadata.description {
            self.parts
                .push(format!("\t<desc>{}</desc>\n", xml_escape(description)));
        }
        if let Some(config_json) = &self.metadata.config_json {
            self.parts.push(format!(
                "\t<metadata><undulate:render xmlns:undulate=\"https://undulate.rs/ns/1\">{}</undulate:render></metadata>\n",
                xml_escape(config_json)
            ));
        }

        if self.has_blur {
            self.parts.push(format!(
                "\t<defs>\n\t\t<filter id=\"{BLUR_FILTER_ID}\" x=\"0\" y=\"0\">\n\t\t\t<feGaussianBlur in=\"SourceGraphic\" stdDeviation=\"{}\"/>\n\t\t</filter>\n\t</defs>\n",
                info.blur
            ));
            self.parts
                .push(format!("\t<g filter=\"url(#{BLUR_FILTER_ID})\">\n"));
        }

        self.parts.push(format!(
            "\t<rect fill=\"{}\" stroke=\"none\" x=\"0\" y=\"0\" width=\"{SVG_SIZE}\" height=\"{SVG_SIZE}\"/>\n",
            info.background.to_hex()
        ));
        let linecap = match info.line_cap {
            LineCap::Round => " stroke-linecap=\"round\"",
            LineCap::Butt => "",
        };
        self.parts.push(format!(
            "\t<g fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\"{linecap}>\n",
            info.line_color.to_hex(),
            info.line_thickness
        ));
    }

    fn finalize(&mut self) {
        self.parts.push("\t</g>\n".to_string());
        if self.has_blur {
            self.parts.push("\t</g>\n".to_string());
        }
        self.parts.push("</svg>\n".to_string());
    }

    fn begin_line(&mut self) {
        self.points_in_line = 0;
        self.parts.push("\t\t<path d=\"".to_string());
    }

    fn move_to(&mut self, point: Point) {
        self.points_in_line = 1;
        self.push_point("M", point);
    }

    fn line_to(&mut self, point: Point) {
        let command = if self.points_in_line == 1 { "L" } else { " " };
        self.points_in_line += 1;
        self.push_point(command, point);
    }

    fn end_line(&mut self) {
        self.parts.push("\"/>\n".to_string());
    }
}
