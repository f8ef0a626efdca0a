use crate::{
    cursor::ByteCursor,
    header::{check_signature, declared_header_length, PNG_MAGIC_BYTES},
    DecodeError, DecodeOptions,
};
use alloc::vec::Vec;
use crc32fast::Hasher;

// length bytes + chunk type bytes + crc bytes
const CHUNK_FRAMING: usize = 4 + 4 + 4;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ChunkType {
    ImageHeader,
    ImageData,
    ImageEnd,
    Unknown([u8; 4]),
}

impl ChunkType {
    pub fn from_bytes(bytes: &[u8; 4]) -> Self {
        match bytes {
            b"IHDR" => ChunkType::ImageHeader,
            b"IDAT" => ChunkType::ImageData,
            b"IEND" => ChunkType::ImageEnd,
            unknown_chunk_type => ChunkType::Unknown(*unknown_chunk_type),
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkType::ImageHeader => *b"IHDR",
            ChunkType::ImageData => *b"IDAT",
            ChunkType::ImageEnd => *b"IEND",
            ChunkType::Unknown(bytes) => bytes,
        }
    }
}

#[derive(Debug)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub data: &'a [u8],
    pub crc: u32,
}

impl<'a> Chunk<'a> {
    pub fn byte_size(&self) -> usize {
        CHUNK_FRAMING + self.data.len()
    }

    pub fn computed_crc(&self) -> u32 {
        chunk_crc(&self.chunk_type.to_bytes(), self.data)
    }
}

pub(crate) fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum ReadState {
    Length { offset: usize },
    Type { offset: usize, length: usize },
    Done,
}

// Running off the end of the buffer can only mean IEND never showed up.
fn read_window(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], DecodeError> {
    let end = start.checked_add(len).ok_or(DecodeError::IntegerOverflow)?;
    ByteCursor::at(start, end).read_bytes(bytes).map_err(|_| DecodeError::UnterminatedChunkStream)
}

fn read_u32_at(bytes: &[u8], start: usize) -> Result<u32, DecodeError> {
    let window = read_window(bytes, start, 4)?;
    Ok(u32::from_be_bytes([window[0], window[1], window[2], window[3]]))
}

fn read_chunk_type(bytes: &[u8], type_offset: usize) -> Result<ChunkType, DecodeError> {
    let tag = read_window(bytes, type_offset, 4)?;
    Ok(ChunkType::from_bytes(&[tag[0], tag[1], tag[2], tag[3]]))
}

/// Reads the data and CRC of a chunk whose type tag starts at `type_offset`.
fn read_chunk_body(
    bytes: &[u8],
    chunk_type: ChunkType,
    type_offset: usize,
    length: usize,
) -> Result<Chunk<'_>, DecodeError> {
    let data = read_window(bytes, type_offset + 4, length)?;
    let crc = read_u32_at(bytes, type_offset + 4 + length)?;

    Ok(Chunk { chunk_type, data, crc })
}

/// Walks the chunks following IHDR and returns the concatenated IDAT
/// payloads.
///
/// The walk stops at the first IEND chunk. Every other chunk type is skipped
/// without being interpreted. The walk fails with `UnterminatedChunkStream`
/// if the buffer runs out before IEND, and with `TooManyChunks` once more
/// than `options.max_chunks` chunks have been visited.
pub fn read_chunks(bytes: &[u8], options: &DecodeOptions) -> Result<Vec<u8>, DecodeError> {
    check_signature(bytes)?;

    let header_length = declared_header_length(bytes)? as usize;
    let first_offset = header_length
        .checked_add(PNG_MAGIC_BYTES.len() + CHUNK_FRAMING)
        .ok_or(DecodeError::IntegerOverflow)?;

    let mut compressed_data = Vec::new();
    let mut chunk_count = 0usize;
    let mut state = ReadState::Length { offset: first_offset };

    loop {
        state = match state {
            ReadState::Length { offset } => {
                if chunk_count >= options.max_chunks {
                    return Err(DecodeError::TooManyChunks { limit: options.max_chunks });
                }
                chunk_count += 1;

                let length = read_u32_at(bytes, offset)? as usize;
                ReadState::Type { offset: offset + 4, length }
            },
            ReadState::Type { offset, length } => {
                let chunk_type = read_chunk_type(bytes, offset)?;
                log::trace!("chunk {:?} with {} data bytes", chunk_type, length);

                // IEND ends the walk as soon as its tag is seen. Its length
                // and CRC are only looked at when CRCs are being verified.
                if chunk_type == ChunkType::ImageEnd && !options.verify_crc {
                    ReadState::Done
                } else {
                    let chunk = read_chunk_body(bytes, chunk_type, offset, length)?;

                    if options.verify_crc && chunk.crc != chunk.computed_crc() {
                        return Err(DecodeError::IncorrectChunkCrc);
                    }

                    match chunk.chunk_type {
                        ChunkType::ImageEnd => ReadState::Done,
                        ChunkType::ImageData => {
                            compressed_data.extend_from_slice(chunk.data);
                            ReadState::Length { offset: offset - 4 + chunk.byte_size() }
                        },
                        _ => ReadState::Length { offset: offset - 4 + chunk.byte_size() },
                    }
                }
            },
            ReadState::Done => break,
        };
    }

    if options.strip_trailing_zeros {
        strip_trailing_zeros(&mut compressed_data);
    }

    log::debug!(
        "walked {} chunks, collected {} compressed bytes",
        chunk_count,
        compressed_data.len()
    );

    Ok(compressed_data)
}

/// Drops zero padding that some encoders leave after the zlib stream.
///
/// This is lossy for a stream that legitimately ends in zero bytes (an
/// Adler-32 checksum can), so it only runs when asked for.
pub fn strip_trailing_zeros(data: &mut Vec<u8>) {
    let kept = data.iter().rposition(|byte| *byte != 0).map_or(0, |idx| idx + 1);

    if kept < data.len() {
        log::warn!("stripping {} trailing zero bytes from image data", data.len() - kept);
        data.truncate(kept);
    }
}
