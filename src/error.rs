pub type PanelpressResult<T> = Result<T, PanelpressError>;

#[derive(thiserror::Error, Debug)]
pub enum PanelpressError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanelpressError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}
