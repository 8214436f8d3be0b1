use crate::error::{PanelpressError, PanelpressResult};

/// Layout parameters for one composite: canvas size, grid shape, and the
/// uniform padding applied on all sides and between panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub rows: u32,
    pub cols: u32,
    pub padding: u32,
}

impl GridSpec {
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        rows: u32,
        cols: u32,
        padding: u32,
    ) -> PanelpressResult<Self> {
        let spec = Self {
            canvas_width,
            canvas_height,
            rows,
            cols,
            padding,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// 1x1 grid used for closeup exports.
    pub fn single(canvas_width: u32, canvas_height: u32, padding: u32) -> PanelpressResult<Self> {
        Self::new(canvas_width, canvas_height, 1, 1, padding)
    }

    pub fn validate(&self) -> PanelpressResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PanelpressError::validation(
                "canvas width/height must be > 0",
            ));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(PanelpressError::validation("grid rows/cols must be > 0"));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

/// Which panels of a closeup sequence receive the watermark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkPolicy {
    /// Every panel.
    Normal,
    /// Only the final panel of the sequence.
    Last,
    /// No panel.
    None,
}

impl WatermarkPolicy {
    /// Whether panel `index` out of `total` gets stamped.
    pub fn applies(self, index: usize, total: usize) -> bool {
        match self {
            Self::Normal => true,
            Self::Last => index + 1 == total,
            Self::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_dimensions() {
        assert!(GridSpec::new(0, 100, 1, 1, 0).is_err());
        assert!(GridSpec::new(100, 0, 1, 1, 0).is_err());
        assert!(GridSpec::new(100, 100, 0, 1, 0).is_err());
        assert!(GridSpec::new(100, 100, 1, 0, 0).is_err());
        assert!(GridSpec::new(100, 100, 1, 1, 0).is_ok());
    }

    #[test]
    fn single_is_one_by_one() {
        let spec = GridSpec::single(800, 800, 35).unwrap();
        assert_eq!((spec.rows, spec.cols), (1, 1));
        assert_eq!(spec.cell_count(), 1);
    }

    #[test]
    fn policy_applies() {
        assert!(WatermarkPolicy::Normal.applies(0, 3));
        assert!(WatermarkPolicy::Normal.applies(2, 3));
        assert!(!WatermarkPolicy::Last.applies(0, 3));
        assert!(WatermarkPolicy::Last.applies(2, 3));
        assert!(!WatermarkPolicy::None.applies(2, 3));
    }

    #[test]
    fn json_roundtrip() {
        let spec = GridSpec::new(1080, 1080, 2, 2, 35).unwrap();
        let s = serde_json::to_string(&spec).unwrap();
        let de: GridSpec = serde_json::from_str(&s).unwrap();
        assert_eq!(de, spec);

        let p: WatermarkPolicy = serde_json::from_str("\"last\"").unwrap();
        assert_eq!(p, WatermarkPolicy::Last);
    }
}
