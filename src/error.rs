use miniz_oxide::inflate::TINFLStatus;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("file is missing or empty")]
    MissingOrEmptyFile,

    #[error("PNG signature does not match")]
    InvalidSignature,

    #[error("byte window {start}..{end} exceeds buffer of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("byte window of {width} bytes does not fit in a u64")]
    WindowTooWide { width: usize },

    #[error("chunk stream ended without an IEND chunk")]
    UnterminatedChunkStream,

    #[error("chunk stream exceeded the limit of {limit} chunks")]
    TooManyChunks { limit: usize },

    #[error("chunk CRC does not match its contents")]
    IncorrectChunkCrc,

    #[error("decompression failed: {0:?}")]
    Decompress(TINFLStatus),

    #[error("scanline data is {actual} bytes, expected {expected}")]
    MalformedScanlineData { expected: usize, actual: usize },

    #[error("invalid filter type {0}")]
    InvalidFilterType(u8),

    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u8),

    #[error("unsupported color type {0}")]
    UnsupportedColorType(u8),

    #[error("invalid compression method {0}")]
    InvalidCompressionMethod(u8),

    #[error("invalid filter method {0}")]
    InvalidFilterMethod(u8),

    #[error("unsupported interlace method {0}")]
    UnsupportedInterlaceMethod(u8),

    // The width/height specified in the image contains too many
    // bytes to address with a usize on this platform.
    #[error("image dimensions overflow the address space")]
    IntegerOverflow,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("channel selector {0} is not 1 (red), 2 (green) or 3 (blue)")]
    InvalidChannelSelector(u8),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("row {row} has {actual} pixels, expected {expected}")]
    RaggedRows { row: usize, expected: usize, actual: usize },

    #[error("image dimensions do not fit in a PNG header")]
    IntegerOverflow,

    #[error("chunk data of {len} bytes exceeds the PNG chunk limit")]
    ChunkTooLarge { len: usize },
}
