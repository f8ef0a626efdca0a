#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod chunk;
pub mod cursor;
mod error;
#[cfg(feature = "std")]
mod file;
pub mod filter;
pub mod header;
pub mod pixels;
pub mod writer;

pub use error::{DecodeError, EncodeError};
#[cfg(feature = "std")]
pub use file::{load, save_channel, LoadedFile, SaveError};
pub use header::{parse_header, validate_signature, PngHeader};
pub use pixels::{recombine, Channel, Image, Rgb};

use alloc::vec::Vec;
use filter::FilterType;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Strip trailing zero bytes from the collected IDAT data before
    /// decompressing. Some encoders pad the final IDAT chunk with zeros.
    pub strip_trailing_zeros: bool,

    /// Check the CRC of every chunk walked.
    pub verify_crc: bool,

    /// Upper bound on the number of chunks walked after IHDR.
    pub max_chunks: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions { strip_trailing_zeros: false, verify_crc: false, max_chunks: 1 << 20 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EncodeOptions {
    /// miniz_oxide compression level, 0 to 10.
    pub compression_level: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { compression_level: 6 }
    }
}

pub fn decode(bytes: &[u8]) -> Result<(PngHeader, Image), DecodeError> {
    decode_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<(PngHeader, Image), DecodeError> {
    let header = parse_header(bytes)?;
    header.validate_profile()?;

    let compressed_data = chunk::read_chunks(bytes, options)?;

    // Inflating fails once the output runs past the expected length. The one
    // spare byte lets `reconstruct_scanlines` report a slightly long stream
    // as malformed scanline data.
    let output_limit = filter::scanline_data_len(header.width, header.height)?.saturating_add(1);
    let scanline_data =
        miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(&compressed_data, output_limit)
            .map_err(DecodeError::Decompress)?;

    log::debug!(
        "decompressed {} bytes into {} bytes of scanline data",
        compressed_data.len(),
        scanline_data.len()
    );

    let scanlines = filter::reconstruct_scanlines(&scanline_data, header.width, header.height)?;

    Ok((header, Image::from_scanlines(&scanlines)))
}

/// Encodes `image` as an RGB PNG in which only the channel picked by
/// `selector` (1 = red, 2 = green, 3 = blue) keeps its values.
pub fn encode_channel(image: &Image, selector: u8) -> Result<Vec<u8>, EncodeError> {
    encode_channel_with_options(image, selector, &EncodeOptions::default())
}

pub fn encode_channel_with_options(
    image: &Image,
    selector: u8,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let channel = Channel::from_selector(selector)?;
    let (width, height) = image.checked_dimensions()?;

    let rows = image.flatten_channel(channel);
    let scanline_data = filter::filter_scanlines(&rows, FilterType::None);
    let compressed_data =
        miniz_oxide::deflate::compress_to_vec_zlib(&scanline_data, options.compression_level);

    let output = writer::write_png(&PngHeader::rgb8(width, height), &compressed_data)?;

    log::debug!("encoded {}x{} {:?} channel into {} bytes", width, height, channel, output.len());

    Ok(output)
}
