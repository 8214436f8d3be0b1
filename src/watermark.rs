use image::{RgbaImage, imageops};

use crate::{assets::AssetLoader, error::PanelpressResult, resize::resize_by_height};

/// Asset name of the name mark stamped bottom-right.
pub const NAME_MARK: &str = "watermark.png";
/// Asset name of the signature mark stamped bottom-left.
pub const SIGNATURE_MARK: &str = "signature.png";

/// The two fixed decorative marks. Loaded once and shared read-only across
/// compositions; fields are public so callers can inject synthetic marks.
#[derive(Clone, Debug)]
pub struct WatermarkAssets {
    pub name: RgbaImage,
    pub signature: RgbaImage,
}

impl WatermarkAssets {
    pub fn load(loader: &dyn AssetLoader) -> PanelpressResult<Self> {
        Ok(Self {
            name: loader.load_raster(NAME_MARK)?,
            signature: loader.load_raster(SIGNATURE_MARK)?,
        })
    }
}

/// Stamp both marks along the bottom edge of a finished composite.
///
/// Each mark is scaled to a height equal to `padding`, tying the watermark
/// density to the layout's padding. The name mark is inset from the right by
/// `padding + x_centering`, the signature from the left by the same amount,
/// and both sit `padding + y_centering` above the bottom edge. Marks are
/// blended with their own alpha, not pasted opaquely.
pub fn add_watermark(
    comic: &mut RgbaImage,
    padding: u32,
    x_centering: i64,
    y_centering: i64,
    assets: &WatermarkAssets,
) -> PanelpressResult<()> {
    let name = resize_by_height(&assets.name, padding)?;
    let signature = resize_by_height(&assets.signature, padding)?;

    let (comic_width, comic_height) = comic.dimensions();
    let padding = i64::from(padding);

    let name_x = i64::from(comic_width) - padding - i64::from(name.width()) - x_centering;
    let mark_y = i64::from(comic_height) - padding - y_centering;
    let signature_x = padding + x_centering;

    imageops::overlay(comic, &name, name_x, mark_y);
    imageops::overlay(comic, &signature, signature_x, mark_y);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn mark(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn marks_scale_to_padding_height() {
        let assets = WatermarkAssets {
            name: mark(70, 70, [255, 0, 0, 255]),
            signature: mark(35, 35, [0, 0, 255, 255]),
        };
        let mut comic = white(1080, 1080);
        add_watermark(&mut comic, 35, 0, 0, &assets).unwrap();

        // name: 70x70 scaled to 35x35, anchored at (1080-35-35, 1080-35)
        assert!(comic.get_pixel(1010, 1045).0[0] > 200);
        assert!(comic.get_pixel(1044, 1079).0[0] > 200);
        // one pixel left of the name mark is untouched white
        assert_eq!(comic.get_pixel(1009, 1045).0, [255, 255, 255, 255]);
        // signature anchored at (35, 1045)
        assert!(comic.get_pixel(35, 1045).0[2] > 200);
        assert_eq!(comic.get_pixel(34, 1045).0, [255, 255, 255, 255]);
    }

    #[test]
    fn transparent_mark_pixels_leave_canvas_alone() {
        let assets = WatermarkAssets {
            name: mark(35, 35, [255, 0, 0, 0]),
            signature: mark(35, 35, [0, 0, 255, 0]),
        };
        let mut comic = white(200, 200);
        let before = comic.clone();
        add_watermark(&mut comic, 35, 0, 0, &assets).unwrap();
        assert_eq!(comic.as_raw(), before.as_raw());
    }

    #[test]
    fn centering_shifts_insets_inward() {
        let assets = WatermarkAssets {
            name: mark(35, 35, [255, 0, 0, 255]),
            signature: mark(35, 35, [0, 0, 255, 255]),
        };
        let mut comic = white(400, 400);
        add_watermark(&mut comic, 35, 10, 20, &assets).unwrap();
        // signature at x = 35 + 10, y = 400 - 35 - 20
        assert!(comic.get_pixel(45, 345).0[2] > 200);
        assert_eq!(comic.get_pixel(44, 345).0, [255, 255, 255, 255]);
    }

    #[test]
    fn zero_padding_fails_fast() {
        let assets = WatermarkAssets {
            name: mark(35, 35, [0, 0, 0, 255]),
            signature: mark(35, 35, [0, 0, 0, 255]),
        };
        let mut comic = white(100, 100);
        assert!(add_watermark(&mut comic, 0, 0, 0, &assets).is_err());
    }
}
