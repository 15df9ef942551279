pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] narwhal_core::Error),

    /// A camera cannot exist without a render target.
    #[error("camera requires a viewport element to render into")]
    MissingViewport,

    #[error("auto-resize requested without a resize event source")]
    MissingResizeSource,

    #[error("invalid camera options: {message}")]
    InvalidOptions { message: String },
}
