use image::{RgbaImage, imageops};

use crate::error::{PanelpressError, PanelpressResult};

/// Number of whole panels across a sheet (floor division).
pub fn panel_count(sheet_width: u32, panel_width: u32) -> PanelpressResult<u32> {
    if panel_width == 0 {
        return Err(PanelpressError::validation("panel width must be > 0"));
    }
    Ok(sheet_width / panel_width)
}

/// Slice a wide sheet into full-height panels at fixed-width steps. Every
/// panel is exactly `panel_width` wide: a trailing column narrower than that
/// keeps the full width with a transparent right margin, so downstream grid
/// cells scale it like any other panel instead of stretching a narrow slice.
pub fn slice_panels(sheet: &RgbaImage, panel_width: u32) -> PanelpressResult<Vec<RgbaImage>> {
    if panel_width == 0 {
        return Err(PanelpressError::validation("panel width must be > 0"));
    }

    let (width, height) = sheet.dimensions();
    let mut panels = Vec::new();
    let mut x = 0u32;
    while x < width {
        let slice_width = panel_width.min(width - x);
        let slice = imageops::crop_imm(sheet, x, 0, slice_width, height).to_image();
        if slice_width < panel_width {
            let mut padded = RgbaImage::new(panel_width, height);
            imageops::replace(&mut padded, &slice, 0, 0);
            panels.push(padded);
        } else {
            panels.push(slice);
        }
        x += panel_width;
    }
    Ok(panels)
}
