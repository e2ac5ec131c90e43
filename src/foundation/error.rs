pub type MorphclipResult<T> = Result<T, MorphclipError>;

#[derive(thiserror::Error, Debug)]
pub enum MorphclipError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphclipError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether this error is one of the two user-recoverable kinds (a slot
    /// left empty or a file that failed to decode). UI glue surfaces these as
    /// a notice and keeps the tool usable.
    pub fn is_user_notice(&self) -> bool {
        matches!(self, Self::MissingInput(_) | Self::Decode(_))
    }
}
