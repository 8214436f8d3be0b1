use image::RgbaImage;

use crate::{
    error::{PanelpressError, PanelpressResult},
    resize::{resize_by_height, resize_by_width},
};

/// Base orientation of a panel set, decided once for the whole set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Classify a panel set's base orientation.
///
/// Every set is treated as horizontal: the square and strip layout tables
/// downstream are tuned to that choice, and changing it silently would shift
/// which axis drives the grid resize.
/// TODO: compare the first panel's width and height here once those layouts
/// are re-tuned for vertical panel sets.
pub(crate) fn classify_set(_panels: &[RgbaImage]) -> Orientation {
    Orientation::Horizontal
}

/// Interior cell size along one axis: the span minus the padding around and
/// between `slots` cells, floor-divided.
pub(crate) fn cell_size(span: u32, padding: u32, slots: u32) -> PanelpressResult<u32> {
    if slots == 0 {
        return Err(PanelpressError::validation("grid rows/cols must be > 0"));
    }
    let inner = i64::from(span) - i64::from(padding) * (i64::from(slots) + 1);
    let cell = inner / i64::from(slots);
    if cell <= 0 {
        return Err(PanelpressError::validation(format!(
            "padding {padding} leaves no room for {slots} cells across {span}px"
        )));
    }
    Ok(cell as u32)
}

/// Rescale every panel for a rows x cols grid on the given canvas.
///
/// The whole set shares one resize policy, picked from the set orientation
/// and the canvas/grid shape: horizontal sets resize by width only when the
/// canvas is landscape-or-square and the grid is wider than tall, otherwise
/// by height. Vertical sets mirror that rule.
pub fn resize_panels(
    panels: &[RgbaImage],
    padding: u32,
    canvas_width: u32,
    canvas_height: u32,
    rows: u32,
    cols: u32,
) -> PanelpressResult<Vec<RgbaImage>> {
    let cell_width = cell_size(canvas_width, padding, cols)?;
    let cell_height = cell_size(canvas_height, padding, rows)?;
    let orientation = classify_set(panels);

    let mut resized = Vec::with_capacity(panels.len());
    for panel in panels {
        let out = match orientation {
            Orientation::Horizontal => {
                if canvas_width >= canvas_height && cols > rows {
                    resize_by_width(panel, cell_width)?
                } else {
                    resize_by_height(panel, cell_height)?
                }
            }
            Orientation::Vertical => {
                if canvas_width <= canvas_height && cols < rows {
                    resize_by_height(panel, cell_height)?
                } else {
                    resize_by_width(panel, cell_width)?
                }
            }
        };
        resized.push(out);
    }
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn panel(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]))
    }

    #[test]
    fn cell_size_floors() {
        // (1080 - 35*3) / 2 = 487 (floor of 487.5)
        assert_eq!(cell_size(1080, 35, 2).unwrap(), 487);
        assert_eq!(cell_size(1080, 35, 3).unwrap(), 313);
    }

    #[test]
    fn cell_size_rejects_padding_overflow() {
        assert!(cell_size(100, 40, 2).is_err());
        assert!(cell_size(100, 0, 0).is_err());
    }

    #[test]
    fn square_canvas_square_grid_resizes_by_height() {
        // cols == rows, so the height rule wins even on a square canvas.
        let out = resize_panels(&vec![panel(1080, 1080); 4], 35, 1080, 1080, 2, 2).unwrap();
        assert_eq!(out.len(), 4);
        for p in &out {
            assert_eq!(p.dimensions(), (487, 487));
        }
    }

    #[test]
    fn wide_canvas_wide_grid_resizes_by_width() {
        // landscape canvas and cols > rows: width drives the scale.
        let out = resize_panels(&vec![panel(1080, 1350); 2], 35, 2000, 1000, 1, 2).unwrap();
        let cell_w = cell_size(2000, 35, 2).unwrap();
        for p in &out {
            assert_eq!(p.width(), cell_w);
            assert!(p.height() > p.width()); // ratio kept
        }
    }

    #[test]
    fn tall_set_still_classified_horizontal() {
        // Set classification ignores per-panel shape.
        assert_eq!(
            classify_set(&[panel(100, 400), panel(100, 400)]),
            Orientation::Horizontal
        );
    }

    #[test]
    fn order_is_preserved() {
        let a = RgbaImage::from_pixel(100, 100, Rgba([200, 0, 0, 255]));
        let b = RgbaImage::from_pixel(100, 100, Rgba([0, 200, 0, 255]));
        let out = resize_panels(&[a, b], 10, 230, 120, 1, 2).unwrap();
        assert!(out[0].get_pixel(10, 10).0[0] > 100);
        assert!(out[1].get_pixel(10, 10).0[1] > 100);
    }
}
