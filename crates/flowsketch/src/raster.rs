//! SVG→PNG rasterisation via `resvg`/`usvg`/`tiny-skia`. Only PNG output is supported.

use thiserror::Error;

/// The default scale factor `generate` uses when `options.png` is set.
pub const DEFAULT_SCALE: f32 = 2.0;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

/// Rasterises an SVG document to PNG bytes at the given scale factor.
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, PngError> {
    let pixmap = svg_to_pixmap(svg, scale)?;
    pixmap.encode_png().map_err(|_| PngError::PngEncode)
}

fn parse_viewbox(svg: &str) -> Option<(f32, f32)> {
    let i = svg.find("viewBox=\"")?;
    let rest = &svg[i + "viewBox=\"".len()..];
    let end = rest.find('"')?;
    let mut it = rest[..end].split_whitespace();
    let _min_x = it.next()?.parse::<f32>().ok()?;
    let _min_y = it.next()?.parse::<f32>().ok()?;
    let width = it.next()?.parse::<f32>().ok()?;
    let height = it.next()?.parse::<f32>().ok()?;
    (width > 0.0 && height > 0.0).then_some((width, height))
}

fn svg_to_pixmap(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap, PngError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| PngError::SvgParse)?;
    let (width, height) = parse_viewbox(svg).unwrap_or_else(|| {
        let size = tree.size();
        (size.width(), size.height())
    });

    let width_px = (width * scale).ceil().max(1.0) as u32;
    let height_px = (height * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(PngError::PixmapAlloc)?;
    pixmap.fill(tiny_skia::Color::from_rgba8(255, 255, 255, 255));

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}
