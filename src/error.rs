use thiserror::Error;

/// Why an image was rejected before quantization started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageDefect {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("stride {stride} is smaller than the row length {min} bytes")]
    StrideTooSmall { stride: usize, min: usize },

    #[error("pixel buffer length {len} is shorter than the {required} bytes the layout needs")]
    BufferTooSmall { len: usize, required: usize },

    #[error("{width}x{height} exceeds the 65535x65535 GIF limit")]
    TooLargeForGif { width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageDefect),

    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("strategy produced {0} palette entries, at most 256 are allowed")]
    PaletteOverflow(usize),

    #[error("palette must contain at least one entry")]
    EmptyPalette,

    #[error("strategy mapped a pixel to index {index}, palette has {len} entries")]
    IndexOutOfPalette { index: u8, len: usize },

    #[error("gray levels must be between 2 and 256, got {0}")]
    InvalidLevels(u32),

    #[error("max_colors must be between 1 and 255, got {0}")]
    InvalidMaxColors(u32),

    #[error("max_color_bits must be between 1 and 8, got {0}")]
    InvalidColorBits(u32),

    #[error("frame is {width}x{height}, canvas is {canvas_width}x{canvas_height}")]
    FrameSizeMismatch {
        width: usize,
        height: usize,
        canvas_width: usize,
        canvas_height: usize,
    },

    #[cfg(feature = "gif")]
    #[error("gif encoding failed: {0}")]
    Encoding(#[from] gif::EncodingError),
}
