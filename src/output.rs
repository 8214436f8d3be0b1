use std::path::PathBuf;

use anyhow::Context as _;
use image::RgbaImage;

use crate::error::PanelpressResult;

/// One finished composite keyed by variant name and an optional sequence
/// index. Filesystem naming stays with the persistence collaborator; the
/// core only hands out stable stems.
#[derive(Clone, Debug)]
pub struct RenderedOutput {
    pub variant: String,
    pub index: Option<u32>,
    pub image: RgbaImage,
}

impl RenderedOutput {
    pub fn single(variant: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            variant: variant.into(),
            index: None,
            image,
        }
    }

    pub fn indexed(variant: impl Into<String>, index: u32, image: RgbaImage) -> Self {
        Self {
            variant: variant.into(),
            index: Some(index),
            image,
        }
    }

    /// `Closeup-3` for indexed outputs, plain `Closeup` otherwise.
    pub fn file_stem(&self) -> String {
        match self.index {
            Some(i) => format!("{}-{}", self.variant, i),
            None => self.variant.clone(),
        }
    }
}

/// Where finished composites go. The core never touches the filesystem
/// directly; callers pick a sink.
pub trait OutputSink {
    fn save(&mut self, stem: &str, image: &RgbaImage) -> PanelpressResult<()>;
}

/// Writes composites as PNG files under a root directory.
#[derive(Clone, Debug)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn save(&mut self, stem: &str, image: &RgbaImage) -> PanelpressResult<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create output dir '{}'", self.root.display()))?;
        let path = self.root.join(format!("{stem}.png"));
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote composite");
        Ok(())
    }
}

/// Persist every output through the sink, in order.
pub fn save_all(outputs: &[RenderedOutput], sink: &mut dyn OutputSink) -> PanelpressResult<()> {
    for output in outputs {
        sink.save(&output.file_stem(), &output.image)?;
    }
    Ok(())
}
