//! Renderers behind `--format`.

mod json;
mod text;

use trendline_core::Renderer;

use crate::cli::args::OutputFormat;

pub use json::JsonRenderer;
pub use text::TextRenderer;

/// A renderer that produces one document for stdout once every section is in.
pub trait Output: Renderer {
    fn as_renderer(&mut self) -> &mut dyn Renderer;

    fn finish(self: Box<Self>) -> anyhow::Result<String>;
}

pub fn for_format(format: OutputFormat) -> Box<dyn Output> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::default()),
        OutputFormat::Json => Box::new(JsonRenderer::default()),
    }
}
