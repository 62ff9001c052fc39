#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Surface dimensions are zero or above the supported maximum.
    #[error("invalid drawing surface {width}x{height} (each side must be 1..={max})")]
    InvalidSurface { width: u32, height: u32, max: u32 },

    /// Surface dimensions exceed what the caller accepts.
    #[error("drawing surface {width}x{height} exceeds {max_width}x{max_height}")]
    SurfaceTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("stroke set has {count} points (limit {max})")]
    TooManyPoints { count: usize, max: usize },

    /// A coordinate was NaN or infinite.
    #[error("invalid point ({x}, {y})")]
    InvalidPoint { x: f32, y: f32 },

    #[error("could not encode signature image: {0}")]
    Encode(#[from] image::ImageError),

    /// An encoded image string was not valid base64.
    #[error("invalid encoded image: {0}")]
    Decode(#[from] base64::DecodeError),
}
