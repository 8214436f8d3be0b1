use image::{Rgba, RgbaImage, imageops};

use crate::{
    assets::AssetLoader,
    compose::{compose_closeups, draw_comic},
    error::{PanelpressError, PanelpressResult},
    model::{GridSpec, WatermarkPolicy},
    output::RenderedOutput,
    resize::{resize_by_height, resize_by_width, resize_exact},
    watermark::WatermarkAssets,
};

/// Asset name of the strip header stamped above webtoon-style exports.
pub const WEBTOON_HEADER: &str = "webtoon-header.png";
/// Asset name of the strip footer appended after the last webtoon panel.
pub const WEBTOON_FOOTER: &str = "webtoon-footer.png";

const COVER_WIDTH: u32 = 1280;
const COVER_HEIGHT: u32 = 720;
const COVER_ACCENT: Rgba<u8> = Rgba([254, 195, 254, 255]);
// Accent ellipse bounding box is (-100, -200)..(660, 900); only the on-canvas
// part shows.
const COVER_ELLIPSE: (f64, f64, f64, f64) = (280.0, 350.0, 380.0, 550.0);

/// The panel sequences for each page variant, all sliced from the same
/// artwork and therefore equally long.
#[derive(Clone, Debug)]
pub struct VariantPanels {
    pub raw: Vec<RgbaImage>,
    pub sketch: Vec<RgbaImage>,
    pub lineart: Vec<RgbaImage>,
    pub no_text: Vec<RgbaImage>,
    pub no_text_no_bubble: Vec<RgbaImage>,
}

impl VariantPanels {
    /// Use one panel sequence for every variant slot.
    pub fn uniform(panels: Vec<RgbaImage>) -> Self {
        Self {
            sketch: panels.clone(),
            lineart: panels.clone(),
            no_text: panels.clone(),
            no_text_no_bubble: panels.clone(),
            raw: panels,
        }
    }

    fn validate(&self) -> PanelpressResult<usize> {
        let n = self.raw.len();
        if n == 0 {
            return Err(PanelpressError::validation(
                "publish needs at least one panel",
            ));
        }
        let all_equal = [
            self.sketch.len(),
            self.lineart.len(),
            self.no_text.len(),
            self.no_text_no_bubble.len(),
        ]
        .iter()
        .all(|&len| len == n);
        if !all_equal {
            return Err(PanelpressError::validation(
                "variant panel sequences must be equally long",
            ));
        }
        Ok(n)
    }
}

/// Canvas and padding table for the published output set. Defaults mirror
/// the tuned production sizes.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PublishOpts {
    /// Native panel edge length in the source artwork.
    pub panel_size: u32,
    pub padding: u32,
    pub closeup_canvas: u32,
    pub webtoon_canvas: u32,
    pub tapas_canvas: u32,
    pub webtoon_thumb: (u32, u32),
    pub tapas_thumb: (u32, u32),
}

impl Default for PublishOpts {
    fn default() -> Self {
        Self {
            panel_size: 1080,
            padding: 35,
            closeup_canvas: 1080,
            webtoon_canvas: 800,
            tapas_canvas: 900,
            webtoon_thumb: (160, 151),
            tapas_thumb: (300, 300),
        }
    }
}

/// Video cover plate: the panel scaled to the cover height and pinned to the
/// right edge of a white 1280x720 canvas, with the accent ellipse drawn over
/// the left side as a title backdrop.
pub fn video_cover(panel: &RgbaImage) -> PanelpressResult<RgbaImage> {
    let scaled = resize_by_height(panel, COVER_HEIGHT)?;
    let mut cover = RgbaImage::from_pixel(COVER_WIDTH, COVER_HEIGHT, Rgba([255, 255, 255, 255]));
    let x = i64::from(COVER_WIDTH) - i64::from(scaled.width());
    imageops::overlay(&mut cover, &scaled, x, 0);

    let (cx, cy, rx, ry) = COVER_ELLIPSE;
    for (px, py, pixel) in cover.enumerate_pixels_mut() {
        let dx = (f64::from(px) - cx) / rx;
        let dy = (f64::from(py) - cy) / ry;
        if dx * dx + dy * dy <= 1.0 {
            *pixel = COVER_ACCENT;
        }
    }
    Ok(cover)
}

/// Square-grid shape for a panel count, when one of the tuned layouts fits.
pub fn square_grid_for(panel_count: usize) -> Option<(u32, u32)> {
    match panel_count {
        2 => Some((1, 2)),
        3 | 4 => Some((2, 2)),
        5 | 6 => Some((3, 2)),
        8 | 9 => Some((3, 3)),
        _ => None,
    }
}

/// Render the full published output set for one comic page: closeups, the
/// webtoon and tapas strips with thumbnails, vertical and horizontal strips,
/// the square grid when a tuned shape exists, and the companion variant
/// grids. Persistence is the caller's job; this only returns the
/// variant-by-index mapping.
#[tracing::instrument(skip_all, fields(panels = sets.raw.len()))]
pub fn publish(
    sets: &VariantPanels,
    opts: &PublishOpts,
    watermark: Option<&WatermarkAssets>,
    assets: Option<&dyn AssetLoader>,
) -> PanelpressResult<Vec<RenderedOutput>> {
    let n = sets.validate()?;
    let n_u32 = u32::try_from(n)
        .map_err(|_| PanelpressError::validation("panel count exceeds u32 range"))?;
    let padding = opts.padding;
    let mut outputs = Vec::new();

    // Per-panel closeups, every panel stamped.
    let closeups = compose_closeups(
        &sets.raw,
        padding,
        opts.closeup_canvas,
        opts.closeup_canvas,
        WatermarkPolicy::Normal,
        watermark,
    )?;
    for (i, image) in closeups.into_iter().enumerate() {
        outputs.push(RenderedOutput::indexed("Closeup", i as u32 + 1, image));
    }

    // Webtoon strip: thumbnail, per-panel pages (only the last stamped), and
    // the fixed header/footer when an asset loader is supplied.
    outputs.push(RenderedOutput::single(
        "Webtoon-Thumbnail",
        resize_exact(
            &sets.no_text_no_bubble[0],
            opts.webtoon_thumb.0,
            opts.webtoon_thumb.1,
        )?,
    ));
    let webtoon = compose_closeups(
        &sets.raw,
        padding,
        opts.webtoon_canvas,
        opts.webtoon_canvas,
        WatermarkPolicy::Last,
        watermark,
    )?;
    for (i, image) in webtoon.into_iter().enumerate() {
        outputs.push(RenderedOutput::indexed("Webtoon", i as u32 + 1, image));
    }
    if let Some(loader) = assets {
        let header = loader.load_raster(WEBTOON_HEADER)?;
        let footer = loader.load_raster(WEBTOON_FOOTER)?;
        outputs.push(RenderedOutput::indexed(
            "Webtoon",
            0,
            resize_by_width(&header, opts.webtoon_canvas)?,
        ));
        outputs.push(RenderedOutput::indexed(
            "Webtoon",
            n_u32 + 1,
            resize_by_width(&footer, opts.webtoon_canvas)?,
        ));
    }

    // Tapas mirrors webtoon at its own canvas size, header only.
    outputs.push(RenderedOutput::single(
        "Tapas-Thumbnail",
        resize_exact(
            &sets.no_text_no_bubble[0],
            opts.tapas_thumb.0,
            opts.tapas_thumb.1,
        )?,
    ));
    let tapas = compose_closeups(
        &sets.raw,
        padding,
        opts.tapas_canvas,
        opts.tapas_canvas,
        WatermarkPolicy::Last,
        watermark,
    )?;
    for (i, image) in tapas.into_iter().enumerate() {
        outputs.push(RenderedOutput::indexed("Tapas", i as u32 + 1, image));
    }
    if let Some(loader) = assets {
        let header = loader.load_raster(WEBTOON_HEADER)?;
        outputs.push(RenderedOutput::indexed(
            "Tapas",
            0,
            resize_by_width(&header, opts.tapas_canvas)?,
        ));
    }

    // Video cover plate from the text-free first panel.
    outputs.push(RenderedOutput::single(
        "Video-Cover",
        video_cover(&sets.no_text_no_bubble[0])?,
    ));

    // Vertical and horizontal strips at native panel size.
    let ps = opts.panel_size;
    let vertical = GridSpec::new(
        ps + 2 * padding,
        ps * n_u32 + (n_u32 + 1) * padding,
        n_u32,
        1,
        padding,
    )?;
    outputs.push(RenderedOutput::single(
        "Vertical",
        draw_comic(&sets.raw, &vertical, watermark)?,
    ));
    let horizontal = GridSpec::new(
        ps * n_u32 + (n_u32 + 1) * padding,
        ps + 2 * padding,
        1,
        n_u32,
        padding,
    )?;
    outputs.push(RenderedOutput::single(
        "Horizontal",
        draw_comic(&sets.raw, &horizontal, watermark)?,
    ));

    // Square grid, when a tuned shape exists for this panel count.
    if let Some((rows, cols)) = square_grid_for(n) {
        let spec = GridSpec::new(opts.closeup_canvas, opts.closeup_canvas, rows, cols, padding)?;
        let name = if (rows, cols) == (3, 3) {
            "3x3-Square"
        } else {
            "Square"
        };
        outputs.push(RenderedOutput::single(
            name,
            draw_comic(&sets.raw, &spec, watermark)?,
        ));
    }

    // Companion variant set: strips for a 2-panel page, 2x2 grids otherwise
    // (when the square shape fits).
    match n {
        2 => {
            for (i, panels) in [
                &sets.raw,
                &sets.lineart,
                &sets.no_text_no_bubble,
                &sets.no_text,
            ]
            .into_iter()
            .enumerate()
            {
                outputs.push(RenderedOutput::indexed(
                    "Patreon",
                    i as u32 + 1,
                    draw_comic(panels, &horizontal, watermark)?,
                ));
            }
        }
        3 | 4 => {
            let spec = GridSpec::new(opts.closeup_canvas, opts.closeup_canvas, 2, 2, padding)?;
            for (i, panels) in [
                &sets.sketch,
                &sets.lineart,
                &sets.no_text_no_bubble,
                &sets.no_text,
            ]
            .into_iter()
            .enumerate()
            {
                outputs.push(RenderedOutput::indexed(
                    "Patreon",
                    i as u32 + 1,
                    draw_comic(panels, &spec, watermark)?,
                ));
            }
        }
        _ => {}
    }

    tracing::info!(outputs = outputs.len(), "published output set");
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn square_grid_table() {
        assert_eq!(square_grid_for(1), None);
        assert_eq!(square_grid_for(2), Some((1, 2)));
        assert_eq!(square_grid_for(3), Some((2, 2)));
        assert_eq!(square_grid_for(4), Some((2, 2)));
        assert_eq!(square_grid_for(5), Some((3, 2)));
        assert_eq!(square_grid_for(6), Some((3, 2)));
        assert_eq!(square_grid_for(7), None);
        assert_eq!(square_grid_for(8), Some((3, 3)));
        assert_eq!(square_grid_for(9), Some((3, 3)));
        assert_eq!(square_grid_for(10), None);
    }

    #[test]
    fn uniform_clones_every_slot() {
        let panels = vec![RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]))];
        let sets = VariantPanels::uniform(panels);
        assert_eq!(sets.validate().unwrap(), 1);
    }

    #[test]
    fn mismatched_set_lengths_rejected() {
        let p = RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]));
        let mut sets = VariantPanels::uniform(vec![p.clone(), p]);
        sets.lineart.pop();
        assert!(sets.validate().is_err());
    }

    #[test]
    fn video_cover_is_right_aligned_with_accent_backdrop() {
        let panel = RgbaImage::from_pixel(50, 360, Rgba([0, 200, 0, 255]));
        let cover = video_cover(&panel).unwrap();
        assert_eq!(cover.dimensions(), (1280, 720));

        // accent ellipse on the left, plain canvas in the middle, the scaled
        // panel (50x360 -> 100x720) against the right edge
        assert_eq!(cover.get_pixel(100, 350).0, [254, 195, 254, 255]);
        assert_eq!(cover.get_pixel(700, 360).0, [255, 255, 255, 255]);
        let panel_px = cover.get_pixel(1200, 360).0;
        assert!(panel_px[1] > 150 && panel_px[0] < 50 && panel_px[3] == 255);
        assert_eq!(cover.get_pixel(1179, 360).0, [255, 255, 255, 255]);
    }

    #[test]
    fn empty_set_rejected() {
        let sets = VariantPanels::uniform(vec![]);
        assert!(publish(&sets, &PublishOpts::default(), None, None).is_err());
    }
}
