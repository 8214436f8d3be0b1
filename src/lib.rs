//! Panelpress composes comic-page panels into finished layouts.
//!
//! The core is a deterministic batch compositor: an ordered sequence of panel
//! rasters plus a [`GridSpec`] produce exactly one composite, with uniform
//! padding, centering, irregular-last-row handling, and optional watermark
//! stamping. Around it sit the collaborator seams:
//!
//! - Slice a wide sheet into panels with [`slice_panels`]
//! - Build per-variant sheets from named layers with [`build_variant`]
//! - Compose grids and closeups with [`draw_comic`] / [`compose_closeups`]
//! - Render the full published output set with [`publish`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod compose;
pub mod error;
pub mod grid;
pub mod model;
pub mod output;
pub mod publish;
pub mod resize;
pub mod slicer;
pub mod variants;
pub mod watermark;

pub use assets::{AssetLoader, FsAssetLoader};
pub use compose::{compose_closeups, draw_comic};
pub use error::{PanelpressError, PanelpressResult};
pub use grid::{Orientation, resize_panels};
pub use model::{GridSpec, WatermarkPolicy};
pub use output::{FsSink, OutputSink, RenderedOutput, save_all};
pub use publish::{PublishOpts, VariantPanels, publish, square_grid_for, video_cover};
pub use resize::{resize_by_height, resize_by_width, resize_exact};
pub use slicer::{panel_count, slice_panels};
pub use variants::{
    LayerFill, LayerRule, NamedLayer, VariantSpec, add_panel_borders, build_variant, fill_image,
    standard_variants, video_variants,
};
pub use watermark::{WatermarkAssets, add_watermark};
