use image::{Rgba, RgbaImage, imageops};

use crate::{
    error::PanelpressResult,
    grid::resize_panels,
    model::{GridSpec, WatermarkPolicy},
    watermark::{WatermarkAssets, add_watermark},
};

const CANVAS_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn blank_canvas(spec: &GridSpec) -> RgbaImage {
    RgbaImage::from_pixel(spec.canvas_width, spec.canvas_height, CANVAS_WHITE)
}

/// Whether the grid shape asks for more panels than supplied. Odd-sized sets
/// get one cell of slack so that shapes like 2x2 still accept 3 panels and
/// center the short final row.
fn insufficient_panels(count: usize, cells: u64) -> bool {
    let count = count as u64;
    if count % 2 == 0 {
        cells > count
    } else {
        cells - 1 > count
    }
}

/// Compose an ordered panel sequence onto a fresh canvas-sized composite.
///
/// Panels are rescaled for the grid, placed row-major with uniform padding,
/// and the whole block is centered when it underfills the canvas. A final row
/// holding fewer panels than `cols` is centered horizontally rather than
/// left-justified. When the grid shape exceeds the panel count (odd-sized
/// sets get one cell of slack) the result is a blank white canvas, not an
/// error.
pub fn draw_comic(
    panels: &[RgbaImage],
    spec: &GridSpec,
    watermark: Option<&WatermarkAssets>,
) -> PanelpressResult<RgbaImage> {
    spec.validate()?;

    if insufficient_panels(panels.len(), spec.cell_count()) {
        tracing::debug!(
            panels = panels.len(),
            rows = spec.rows,
            cols = spec.cols,
            "grid underfilled, emitting blank canvas"
        );
        return Ok(blank_canvas(spec));
    }

    let panels = resize_panels(
        panels,
        spec.padding,
        spec.canvas_width,
        spec.canvas_height,
        spec.rows,
        spec.cols,
    )?;

    // Every cell takes the first panel's post-resize footprint; panels with
    // odd aspect ratios inherit it rather than reflowing the grid.
    let (panel_width, panel_height) = panels[0].dimensions();
    let panel_width = i64::from(panel_width);
    let panel_height = i64::from(panel_height);
    let padding = i64::from(spec.padding);
    let (rows, cols) = (i64::from(spec.rows), i64::from(spec.cols));

    let footprint_width = panel_width * cols + (cols + 1) * padding;
    let footprint_height = panel_height * rows + (rows + 1) * padding;

    // Center only when there is slack; an overflowing grid stays pinned to
    // the top-left corner.
    let x_centering = ((i64::from(spec.canvas_width) - footprint_width) / 2).max(0);
    let y_centering = ((i64::from(spec.canvas_height) - footprint_height) / 2).max(0);

    let mut comic = blank_canvas(spec);
    let mut cursor = 0usize;

    for row in 0..rows {
        let remaining = (panels.len() - cursor) as i64;
        let y = row * panel_height + (row + 1) * padding + y_centering;

        if row == rows - 1 && remaining < cols {
            // Short final row: shift right by half the missing panel slots
            // and half their padding so the row reads as centered.
            let missing = cols - remaining;
            let shift = (panel_width * missing) / 2 + (padding * missing) / 2;
            for slot in 0..remaining {
                let x = shift + slot * panel_width + (slot + 1) * padding + x_centering;
                imageops::replace(&mut comic, &panels[cursor], x, y);
                cursor += 1;
            }
            break;
        }

        for col in 0..cols {
            let x = col * panel_width + (col + 1) * padding + x_centering;
            imageops::replace(&mut comic, &panels[cursor], x, y);
            cursor += 1;
        }
    }

    if let Some(assets) = watermark {
        add_watermark(&mut comic, spec.padding, x_centering, y_centering, assets)?;
    }

    Ok(comic)
}

/// Compose each panel as its own 1x1 composite, watermarking per `policy`.
pub fn compose_closeups(
    panels: &[RgbaImage],
    padding: u32,
    canvas_width: u32,
    canvas_height: u32,
    policy: WatermarkPolicy,
    assets: Option<&WatermarkAssets>,
) -> PanelpressResult<Vec<RgbaImage>> {
    let spec = GridSpec::single(canvas_width, canvas_height, padding)?;
    let mut out = Vec::with_capacity(panels.len());
    for (index, panel) in panels.iter().enumerate() {
        let stamp = if policy.applies(index, panels.len()) {
            assets
        } else {
            None
        };
        out.push(draw_comic(std::slice::from_ref(panel), &spec, stamp)?);
    }
    Ok(out)
}
