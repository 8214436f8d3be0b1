use image::{Rgba, RgbaImage, imageops};

use crate::error::{PanelpressError, PanelpressResult};

/// One rendered artwork layer together with its authoring name.
#[derive(Clone, Debug)]
pub struct NamedLayer {
    pub name: String,
    pub image: RgbaImage,
}

impl NamedLayer {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// How a matched layer contributes to a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerFill {
    /// Composite the layer as authored.
    Keep,
    /// Replace the layer's color with a flat RGB, keeping its alpha.
    Flat([u8; 3]),
}

impl Default for LayerFill {
    fn default() -> Self {
        Self::Keep
    }
}

/// Substring match over layer names. A layer contributes once per rule it
/// matches, in layer order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerRule {
    pub contains: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<String>,
    #[serde(default)]
    pub fill: LayerFill,
}

impl LayerRule {
    pub fn keep(contains: &str) -> Self {
        Self {
            contains: contains.to_string(),
            excludes: None,
            fill: LayerFill::Keep,
        }
    }

    pub fn flat(contains: &str, rgb: [u8; 3]) -> Self {
        Self {
            contains: contains.to_string(),
            excludes: None,
            fill: LayerFill::Flat(rgb),
        }
    }

    pub fn excluding(mut self, substring: &str) -> Self {
        self.excludes = Some(substring.to_string());
        self
    }

    pub fn matches(&self, layer_name: &str) -> bool {
        layer_name.contains(&self.contains)
            && self
                .excludes
                .as_deref()
                .is_none_or(|ex| !layer_name.contains(ex))
    }
}

/// A named variant: the rule table deciding which layers it is built from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VariantSpec {
    pub name: String,
    pub rules: Vec<LayerRule>,
}

impl VariantSpec {
    pub fn new(name: impl Into<String>, rules: Vec<LayerRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn validate(&self) -> PanelpressResult<()> {
        if self.name.trim().is_empty() {
            return Err(PanelpressError::validation("variant name must be non-empty"));
        }
        for rule in &self.rules {
            if rule.contains.is_empty() {
                return Err(PanelpressError::validation(format!(
                    "variant '{}' has a rule with an empty match substring",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Replace every pixel's color with a flat RGB while keeping its alpha.
pub fn fill_image(layer: &RgbaImage, rgb: [u8; 3]) -> RgbaImage {
    let mut out = layer.clone();
    for px in out.pixels_mut() {
        let alpha = px.0[3];
        *px = Rgba([rgb[0], rgb[1], rgb[2], alpha]);
    }
    out
}

/// Build one variant sheet by alpha-compositing every matching layer, in
/// order, onto a transparent canvas of the artwork size.
pub fn build_variant(
    layers: &[NamedLayer],
    spec: &VariantSpec,
    width: u32,
    height: u32,
) -> PanelpressResult<RgbaImage> {
    spec.validate()?;
    if width == 0 || height == 0 {
        return Err(PanelpressError::validation(
            "variant canvas dimensions must be > 0",
        ));
    }

    let mut canvas = RgbaImage::new(width, height);
    for layer in layers {
        for rule in &spec.rules {
            if !rule.matches(&layer.name) {
                continue;
            }
            match rule.fill {
                LayerFill::Keep => imageops::overlay(&mut canvas, &layer.image, 0, 0),
                LayerFill::Flat(rgb) => {
                    imageops::overlay(&mut canvas, &fill_image(&layer.image, rgb), 0, 0)
                }
            }
        }
    }
    Ok(canvas)
}

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// The standard page variants: raw artwork, sketch and lineart reductions,
/// and the text-free renditions used by reposting pipelines.
pub fn standard_variants() -> Vec<VariantSpec> {
    vec![
        VariantSpec::new(
            "raw",
            vec![
                LayerRule::keep("Layer"),
                LayerRule::keep("Text"),
                LayerRule::keep("Outline"),
                LayerRule::keep("Color"),
                LayerRule::keep("Border"),
                LayerRule::keep("Panel"),
            ],
        ),
        VariantSpec::new(
            "sketch",
            vec![
                LayerRule::flat("Sketch", BLACK),
                LayerRule::flat("Panel", WHITE),
            ],
        ),
        VariantSpec::new(
            "lineart",
            vec![
                LayerRule::flat("Text", BLACK),
                LayerRule::flat("Outline", BLACK),
                LayerRule::flat("Color", WHITE),
                LayerRule::flat("Panel", WHITE),
            ],
        ),
        VariantSpec::new(
            "no-text",
            vec![
                LayerRule::keep("Outline"),
                LayerRule::keep("Color"),
                LayerRule::keep("Panel"),
            ],
        ),
        VariantSpec::new(
            "no-text-no-bubble",
            vec![
                LayerRule::keep("Outline").excluding("Bubble"),
                LayerRule::keep("Color").excluding("Bubble"),
                LayerRule::keep("Panel"),
            ],
        ),
    ]
}

/// Per-concern layer stacks consumed by downstream video assembly: panel
/// plates, characters, speech bubbles, and effect layers.
pub fn video_variants() -> Vec<VariantSpec> {
    vec![
        VariantSpec::new("panel-plates", vec![LayerRule::keep("Panel")]),
        VariantSpec::new(
            "characters",
            vec![
                LayerRule::keep("Outline").excluding("Bubble"),
                LayerRule::keep("Color").excluding("Bubble"),
            ],
        ),
        VariantSpec::new(
            "bubbles",
            vec![
                LayerRule::keep("Text"),
                LayerRule::keep("BubbleOutline"),
                LayerRule::keep("BubbleColor"),
            ],
        ),
        VariantSpec::new("effects", vec![LayerRule::keep("Layer")]),
    ]
}

/// Stroke a black square outline around one panel slot of a sheet. The
/// outline region is `panel_width` on a side, inset `border_width` deep.
pub fn add_panel_borders(
    sheet: &mut RgbaImage,
    panel_width: u32,
    border_width: u32,
    panel_index: u32,
) -> PanelpressResult<()> {
    if panel_width == 0 || border_width == 0 {
        return Err(PanelpressError::validation(
            "panel and border widths must be > 0",
        ));
    }

    let x0 = panel_index * panel_width;
    let x1 = ((panel_index + 1) * panel_width).min(sheet.width());
    let y1 = panel_width.min(sheet.height());
    if x0 >= x1 || y1 == 0 {
        return Ok(());
    }

    let black = Rgba([0, 0, 0, 255]);
    for y in 0..y1 {
        for x in x0..x1 {
            let inset_x = (x - x0).min(x1 - 1 - x);
            let inset_y = y.min(y1 - 1 - y);
            if inset_x < border_width || inset_y < border_width {
                sheet.put_pixel(x, y, black);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, rgba: [u8; 4]) -> NamedLayer {
        NamedLayer::new(name, RgbaImage::from_pixel(4, 4, Rgba(rgba)))
    }

    #[test]
    fn rule_matching_with_excludes() {
        let rule = LayerRule::keep("Outline").excluding("Bubble");
        assert!(rule.matches("CharacterOutline"));
        assert!(!rule.matches("BubbleOutline"));
        assert!(!rule.matches("Color"));
    }

    #[test]
    fn fill_keeps_alpha_replaces_rgb() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 77]));
        let out = fill_image(&src, BLACK);
        for px in out.pixels() {
            assert_eq!(px.0, [0, 0, 0, 77]);
        }
    }

    #[test]
    fn build_variant_composites_matching_layers_in_order() {
        let layers = vec![
            layer("Panel 1", [255, 255, 255, 255]),
            layer("CharacterColor", [0, 200, 0, 255]),
            layer("BubbleColor", [200, 0, 0, 255]),
        ];
        let specs = standard_variants();
        let no_bubble = specs
            .iter()
            .find(|s| s.name == "no-text-no-bubble")
            .unwrap();

        let out = build_variant(&layers, no_bubble, 4, 4).unwrap();
        // bubble layer excluded: top color is the character green
        assert_eq!(out.get_pixel(0, 0).0, [0, 200, 0, 255]);
    }

    #[test]
    fn sketch_variant_flattens_to_black_on_white() {
        let layers = vec![
            layer("Panel 1", [128, 128, 128, 255]),
            layer("Sketch", [90, 40, 10, 255]),
        ];
        let specs = standard_variants();
        let sketch = specs.iter().find(|s| s.name == "sketch").unwrap();
        let out = build_variant(&layers, sketch, 4, 4).unwrap();
        // sketch strokes become black, panel plate white underneath
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn unmatched_layers_leave_canvas_transparent() {
        let layers = vec![layer("Reference", [1, 2, 3, 255])];
        let spec = VariantSpec::new("only-text", vec![LayerRule::keep("Text")]);
        let out = build_variant(&layers, &spec, 4, 4).unwrap();
        assert!(out.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn empty_variant_name_rejected() {
        let spec = VariantSpec::new("  ", vec![]);
        assert!(build_variant(&[], &spec, 4, 4).is_err());
    }

    #[test]
    fn rule_table_json_roundtrip() {
        let specs = standard_variants();
        let s = serde_json::to_string(&specs).unwrap();
        let de: Vec<VariantSpec> = serde_json::from_str(&s).unwrap();
        assert_eq!(de, specs);
    }

    #[test]
    fn panel_borders_stroke_the_slot_edges() {
        let mut sheet = RgbaImage::from_pixel(20, 10, Rgba([255, 255, 255, 255]));
        add_panel_borders(&mut sheet, 10, 2, 1).unwrap();

        // second slot (x 10..20) stroked, first untouched
        assert_eq!(sheet.get_pixel(10, 0).0, [0, 0, 0, 255]);
        assert_eq!(sheet.get_pixel(19, 9).0, [0, 0, 0, 255]);
        assert_eq!(sheet.get_pixel(15, 5).0, [255, 255, 255, 255]);
        assert_eq!(sheet.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }
}
