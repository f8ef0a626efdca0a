use crate::{
    chunk::{chunk_crc, ChunkType},
    header::{PngHeader, PNG_MAGIC_BYTES},
    EncodeError,
};
use alloc::vec::Vec;
use core::convert::TryFrom;

/// Appends one framed chunk: length, type, data and CRC32 of type and data.
pub fn write_chunk(
    output: &mut Vec<u8>,
    chunk_type: &[u8; 4],
    data: &[u8],
) -> Result<(), EncodeError> {
    let length =
        u32::try_from(data.len()).map_err(|_| EncodeError::ChunkTooLarge { len: data.len() })?;

    output.extend_from_slice(&length.to_be_bytes());
    output.extend_from_slice(chunk_type);
    output.extend_from_slice(data);
    output.extend_from_slice(&chunk_crc(chunk_type, data).to_be_bytes());

    Ok(())
}

/// Signature, IHDR, a single IDAT holding `compressed_data`, and an empty
/// IEND.
pub fn write_png(header: &PngHeader, compressed_data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut output = Vec::with_capacity(PNG_MAGIC_BYTES.len() + 3 * 12 + 13 + compressed_data.len());

    output.extend_from_slice(PNG_MAGIC_BYTES);
    write_chunk(&mut output, &ChunkType::ImageHeader.to_bytes(), &header.to_bytes())?;
    write_chunk(&mut output, &ChunkType::ImageData.to_bytes(), compressed_data)?;
    write_chunk(&mut output, &ChunkType::ImageEnd.to_bytes(), &[])?;

    Ok(output)
}
