pub type PaintResult<T> = Result<T, PaintError>;

#[derive(thiserror::Error, Debug)]
pub enum PaintError {
    /// A canvas mutation named a section that is not registered.
    #[error("section not found: '{0}'")]
    SectionNotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// Draw mode that is declared in the model but intentionally not painted.
    #[error("unsupported draw mode: {0}")]
    Unsupported(String),

    #[error("resource load failure: {0}")]
    ResourceLoad(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaintError {
    pub fn section_not_found(name: impl Into<String>) -> Self {
        Self::SectionNotFound(name.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }
}
