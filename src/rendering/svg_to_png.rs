use crate::error::RenderError;
use resvg::usvg::{self, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Largest raster edge accepted, in pixels.
const MAX_EDGE: u32 = 16_384;

/// Rasterizes SVG figures to RGBA PNG.
///
/// The canvas keeps the document's intrinsic size multiplied by the
/// requested scale and stays transparent where nothing is drawn.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a renderer backed by the system fonts
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        tracing::debug!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Render SVG bytes to a PNG at `scale` times the intrinsic size.
    pub fn render_to_png(&self, svg_data: &[u8], scale: f32) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.rasterize_svg(svg_data, scale)?;
        encode_png(&pixmap)
    }

    /// Parse and rasterize SVG to an RGBA pixmap
    fn rasterize_svg(&self, svg_data: &[u8], scale: f32) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };

        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let width = (svg_size.width() * scale).ceil() as u32;
        let height = (svg_size.height() * scale).ceil() as u32;

        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(RenderError::UnsupportedDimensions { width, height });
        }

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;

        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        tracing::debug!(width, height, scale, "Rasterized SVG");
        Ok(pixmap)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a pixmap as 8-bit RGBA PNG. tiny-skia stores premultiplied
/// alpha, PNG expects straight alpha.
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
  <rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
</svg>"##;

    fn decode(png_bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(png_bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_render_scales_intrinsic_size() {
        let renderer = SvgRenderer::new();
        let png_bytes = renderer.render_to_png(SQUARE, 2.0).unwrap();
        let (info, _) = decode(&png_bytes);

        assert_eq!(info.width, 40);
        assert_eq!(info.height, 20);
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }

    #[test]
    fn test_render_keeps_transparency() {
        let renderer = SvgRenderer::new();
        let png_bytes = renderer.render_to_png(SQUARE, 1.0).unwrap();
        let (info, data) = decode(&png_bytes);

        let pixel = |x: usize, y: usize| {
            let i = (y * info.width as usize + x) * 4;
            [data[i], data[i + 1], data[i + 2], data[i + 3]]
        };
        assert_eq!(pixel(5, 5), [255, 0, 0, 255]);
        assert_eq!(pixel(15, 5)[3], 0);
    }

    #[test]
    fn test_invalid_svg() {
        let renderer = SvgRenderer::new();
        let err = renderer.render_to_png(b"not svg", 1.0).unwrap_err();
        assert!(matches!(err, RenderError::SvgParse(_)));
    }

    #[test]
    fn test_oversized_scale_rejected() {
        let renderer = SvgRenderer::new();
        let err = renderer.render_to_png(SQUARE, 10_000.0).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedDimensions { .. }));
    }
}
