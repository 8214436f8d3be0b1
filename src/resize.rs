use image::{
    RgbaImage,
    imageops::{self, FilterType},
};

use crate::error::{PanelpressError, PanelpressResult};

/// Resample a panel to an exact target height, scaling the width to keep the
/// aspect ratio. The free axis is floor-rounded to whole pixels.
pub fn resize_by_height(panel: &RgbaImage, target_height: u32) -> PanelpressResult<RgbaImage> {
    let (width, height) = check_source(panel)?;
    if target_height == 0 {
        return Err(PanelpressError::validation(
            "resize target height must be > 0",
        ));
    }
    let scale = f64::from(target_height) / f64::from(height);
    // Degenerate aspect ratios clamp to a 1px free axis.
    let new_width = ((f64::from(width) * scale) as u32).max(1);
    Ok(imageops::resize(
        panel,
        new_width,
        target_height,
        FilterType::Lanczos3,
    ))
}

/// Resample a panel to an exact target width, scaling the height to keep the
/// aspect ratio.
pub fn resize_by_width(panel: &RgbaImage, target_width: u32) -> PanelpressResult<RgbaImage> {
    let (width, height) = check_source(panel)?;
    if target_width == 0 {
        return Err(PanelpressError::validation(
            "resize target width must be > 0",
        ));
    }
    let scale = f64::from(target_width) / f64::from(width);
    let new_height = ((f64::from(height) * scale) as u32).max(1);
    Ok(imageops::resize(
        panel,
        target_width,
        new_height,
        FilterType::Lanczos3,
    ))
}

/// Resample to exact dimensions without preserving aspect ratio. Used for
/// platform thumbnails with fixed pixel sizes.
pub fn resize_exact(panel: &RgbaImage, width: u32, height: u32) -> PanelpressResult<RgbaImage> {
    check_source(panel)?;
    if width == 0 || height == 0 {
        return Err(PanelpressError::validation(
            "resize target dimensions must be > 0",
        ));
    }
    Ok(imageops::resize(panel, width, height, FilterType::Lanczos3))
}

fn check_source(panel: &RgbaImage) -> PanelpressResult<(u32, u32)> {
    let (width, height) = panel.dimensions();
    if width == 0 || height == 0 {
        return Err(PanelpressError::validation("source panel must be non-empty"));
    }
    Ok((width, height))
}
