use crate::{cursor::ByteCursor, DecodeError};
use core::convert::TryFrom;
use num_enum::TryFromPrimitive;

pub const PNG_MAGIC_BYTES: &[u8] = &[137, 80, 78, 71, 13, 10, 26, 10];

/// Length of the IHDR payload.
pub const HEADER_LENGTH: u32 = 13;

// Signature (8) + IHDR length (4) + IHDR type (4).
const HEADER_DATA_OFFSET: usize = 16;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum BitDepth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum ColorType {
    Grayscale = 0,
    Rgb = 2,
    Palette = 3,
    GrayscaleAlpha = 4,
    RgbAlpha = 6,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum CompressionMethod {
    Deflate = 0,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum FilterMethod {
    Adaptive = 0,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum InterlaceMethod {
    None = 0,
    Adam7 = 1,
}

/// The IHDR fields exactly as stored in the file.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter_method: u8,
    pub interlace: u8,
}

impl PngHeader {
    /// Header for an 8-bit RGB, non-interlaced image of the given size.
    pub fn rgb8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BitDepth::Eight as u8,
            color_type: ColorType::Rgb as u8,
            compression: CompressionMethod::Deflate as u8,
            filter_method: FilterMethod::Adaptive as u8,
            interlace: InterlaceMethod::None as u8,
        }
    }

    /// Checks that the header describes the only layout this crate can
    /// reconstruct: 8 bits per channel, RGB, deflate, adaptive filtering and
    /// no interlacing.
    pub fn validate_profile(&self) -> Result<(), DecodeError> {
        let bit_depth = BitDepth::try_from(self.bit_depth)
            .map_err(|_| DecodeError::UnsupportedBitDepth(self.bit_depth))?;
        if bit_depth != BitDepth::Eight {
            return Err(DecodeError::UnsupportedBitDepth(self.bit_depth));
        }

        let color_type = ColorType::try_from(self.color_type)
            .map_err(|_| DecodeError::UnsupportedColorType(self.color_type))?;
        if color_type != ColorType::Rgb {
            return Err(DecodeError::UnsupportedColorType(self.color_type));
        }

        CompressionMethod::try_from(self.compression)
            .map_err(|_| DecodeError::InvalidCompressionMethod(self.compression))?;
        FilterMethod::try_from(self.filter_method)
            .map_err(|_| DecodeError::InvalidFilterMethod(self.filter_method))?;

        match InterlaceMethod::try_from(self.interlace) {
            Ok(InterlaceMethod::None) => Ok(()),
            _ => Err(DecodeError::UnsupportedInterlaceMethod(self.interlace)),
        }
    }

    /// The 13-byte IHDR payload for this header.
    pub fn to_bytes(&self) -> [u8; HEADER_LENGTH as usize] {
        let mut bytes = [0u8; HEADER_LENGTH as usize];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8] = self.bit_depth;
        bytes[9] = self.color_type;
        bytes[10] = self.compression;
        bytes[11] = self.filter_method;
        bytes[12] = self.interlace;
        bytes
    }
}

pub fn validate_signature(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_MAGIC_BYTES.len() && &bytes[..PNG_MAGIC_BYTES.len()] == PNG_MAGIC_BYTES
}

/// Fails early with `MissingOrEmptyFile` or `InvalidSignature` so no later
/// stage ever looks at a buffer that is not a PNG.
pub(crate) fn check_signature(bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::MissingOrEmptyFile);
    }

    if !validate_signature(bytes) {
        return Err(DecodeError::InvalidSignature);
    }

    Ok(())
}

pub fn parse_header(bytes: &[u8]) -> Result<PngHeader, DecodeError> {
    check_signature(bytes)?;

    let width = ByteCursor::at(HEADER_DATA_OFFSET, HEADER_DATA_OFFSET + 4);
    let height = width.advance(4)?;
    let fields = ByteCursor::at(height.end, height.end + 5).read_bytes(bytes)?;

    let header = PngHeader {
        width: width.read_u32(bytes)?,
        height: height.read_u32(bytes)?,
        bit_depth: fields[0],
        color_type: fields[1],
        compression: fields[2],
        filter_method: fields[3],
        interlace: fields[4],
    };

    log::debug!("read header {:?}", header);

    Ok(header)
}

/// The IHDR payload length as declared in the file. The first chunk after
/// IHDR starts at `8 + 12 + declared_length`.
pub(crate) fn declared_header_length(bytes: &[u8]) -> Result<u32, DecodeError> {
    ByteCursor::at(PNG_MAGIC_BYTES.len(), PNG_MAGIC_BYTES.len() + 4).read_u32(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(fields: [u8; 5]) -> alloc::vec::Vec<u8> {
        let mut bytes = PNG_MAGIC_BYTES.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&640u32.to_be_bytes());
        bytes.extend_from_slice(&480u32.to_be_bytes());
        bytes.extend_from_slice(&fields);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn signature_is_checked() {
        assert!(validate_signature(PNG_MAGIC_BYTES));
        assert!(!validate_signature(&[137, 80, 78, 71]));
        assert!(!validate_signature(b"GIF89a\0\0\0\0"));
    }

    #[test]
    fn parses_header_fields() {
        let bytes = header_bytes([8, 2, 0, 0, 0]);
        let header = parse_header(&bytes).unwrap();

        assert_eq!(header, PngHeader::rgb8(640, 480));
        assert_eq!(declared_header_length(&bytes).unwrap(), 13);
        assert!(header.validate_profile().is_ok());
    }

    #[test]
    fn header_round_trips_through_bytes() {
        let header = PngHeader::rgb8(3, 7);
        let mut bytes = PNG_MAGIC_BYTES.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&header.to_bytes());

        assert_eq!(parse_header(&bytes).unwrap(), header);
    }

    #[test]
    fn invalid_signature_stops_parsing() {
        let mut bytes = header_bytes([8, 2, 0, 0, 0]);
        bytes[1] = b'Q';
        assert_eq!(parse_header(&bytes), Err(DecodeError::InvalidSignature));
        assert_eq!(parse_header(&[]), Err(DecodeError::MissingOrEmptyFile));
    }

    #[test]
    fn truncated_header_is_out_of_bounds() {
        let bytes = header_bytes([8, 2, 0, 0, 0]);
        assert!(matches!(parse_header(&bytes[..22]), Err(DecodeError::OutOfBounds { .. })));
    }

    #[test]
    fn profile_rejects_other_formats() {
        let rejects = |fields: [u8; 5]| parse_header(&header_bytes(fields)).unwrap().validate_profile();

        assert_eq!(rejects([16, 2, 0, 0, 0]), Err(DecodeError::UnsupportedBitDepth(16)));
        assert_eq!(rejects([7, 2, 0, 0, 0]), Err(DecodeError::UnsupportedBitDepth(7)));
        assert_eq!(rejects([8, 6, 0, 0, 0]), Err(DecodeError::UnsupportedColorType(6)));
        assert_eq!(rejects([8, 2, 1, 0, 0]), Err(DecodeError::InvalidCompressionMethod(1)));
        assert_eq!(rejects([8, 2, 0, 1, 0]), Err(DecodeError::InvalidFilterMethod(1)));
        assert_eq!(rejects([8, 2, 0, 0, 1]), Err(DecodeError::UnsupportedInterlaceMethod(1)));
    }
}
