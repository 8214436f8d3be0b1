use std::path::PathBuf;

use anyhow::Context as _;
use image::RgbaImage;

use crate::error::{PanelpressError, PanelpressResult};

/// Resolves fixed decorative assets (watermark marks, platform headers) into
/// rasters with alpha. Implementations own path resolution; the core only
/// asks by asset name.
pub trait AssetLoader {
    fn load_raster(&self, name: &str) -> PanelpressResult<RgbaImage>;
}

/// Loads assets from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load_raster(&self, name: &str) -> PanelpressResult<RgbaImage> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(PanelpressError::asset(format!(
                "asset '{}' not found",
                path.display()
            )));
        }
        let img =
            image::open(&path).with_context(|| format!("decode asset '{}'", path.display()))?;
        Ok(img.to_rgba8())
    }
}
