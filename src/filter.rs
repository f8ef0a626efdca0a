//! Scanline filtering for 8-bit RGB rows.
//!
//! Filters work on bytes, but the "left" neighbor of a byte is the same
//! channel of the previous pixel, `BYTES_PER_PIXEL` bytes earlier. Bytes
//! outside the image (left of the first pixel, above the first row) count
//! as zero.

use crate::DecodeError;
use alloc::{vec, vec::Vec};
use core::convert::{TryFrom, TryInto};
use num_enum::TryFromPrimitive;

pub const BYTES_PER_PIXEL: usize = 3;

pub const ALL_FILTER_TYPES: [FilterType; 5] =
    [FilterType::None, FilterType::Sub, FilterType::Up, FilterType::Average, FilterType::Paeth];

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, TryFromPrimitive)]
pub enum FilterType {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

/// Picks whichever of `left`, `above` and `upper_left` is closest to
/// `left + above - upper_left`, preferring `left` and then `above` on ties.
#[inline(always)]
pub fn paeth_predictor(left: u8, above: u8, upper_left: u8) -> u8 {
    let (a, b, c) = (left as i16, above as i16, upper_left as i16);
    let estimate = a + b - c;
    let dist_left = (estimate - a).abs();
    let dist_above = (estimate - b).abs();
    let dist_upper_left = (estimate - c).abs();

    let pick_left = dist_left <= dist_above && dist_left <= dist_upper_left;
    let pick_above = !pick_left && dist_above <= dist_upper_left;
    let pick_upper_left = !pick_left && !pick_above;

    // All ones for the chosen input, zero for the other two.
    let mask = |picked: bool| picked as u8 * 0xFF;
    (mask(pick_left) & left) | (mask(pick_above) & above) | (mask(pick_upper_left) & upper_left)
}

#[inline(always)]
fn average(left: u8, above: u8) -> u8 {
    ((left as u16 + above as u16) / 2) as u8
}

/// The value a filter subtracts from (or adds back to) the byte at `x`.
///
/// `row` must already hold reconstructed bytes for every index before `x`.
#[inline(always)]
fn predict(filter_type: FilterType, row: &[u8], last_row: &[u8], x: usize) -> u8 {
    let left = if x >= BYTES_PER_PIXEL { row[x - BYTES_PER_PIXEL] } else { 0 };
    let above = last_row[x];

    match filter_type {
        FilterType::None => 0,
        FilterType::Sub => left,
        FilterType::Up => above,
        FilterType::Average => average(left, above),
        FilterType::Paeth => {
            let upper_left = if x >= BYTES_PER_PIXEL { last_row[x - BYTES_PER_PIXEL] } else { 0 };
            paeth_predictor(left, above, upper_left)
        },
    }
}

/// Reverses `filter_type` on `current_scanline` in place.
///
/// `last_scanline` is the already reconstructed row above, or all zeros for
/// the first row. Bytes are processed left to right because each one depends
/// on the reconstructed byte one pixel to its left.
pub fn defilter_row(filter_type: FilterType, current_scanline: &mut [u8], last_scanline: &[u8]) {
    debug_assert_eq!(current_scanline.len(), last_scanline.len());

    if filter_type == FilterType::None {
        return;
    }

    for x in 0..current_scanline.len() {
        let predictor = predict(filter_type, current_scanline, last_scanline, x);
        current_scanline[x] = current_scanline[x].wrapping_add(predictor);
    }
}

/// Applies `filter_type` to a raw row, the exact inverse of [`defilter_row`].
pub fn filter_row(filter_type: FilterType, raw_scanline: &[u8], last_scanline: &[u8]) -> Vec<u8> {
    debug_assert_eq!(raw_scanline.len(), last_scanline.len());

    (0..raw_scanline.len())
        .map(|x| {
            raw_scanline[x].wrapping_sub(predict(filter_type, raw_scanline, last_scanline, x))
        })
        .collect()
}

/// Bytes in one unfiltered row of `width` RGB pixels.
pub fn bytes_per_scanline(width: u32) -> Result<usize, DecodeError> {
    let bytes = width as u64 * BYTES_PER_PIXEL as u64;
    bytes.try_into().map_err(|_| DecodeError::IntegerOverflow)
}

/// Exact length of the decompressed data for a `width` by `height` image:
/// one filter type byte plus the row bytes, per row.
pub fn scanline_data_len(width: u32, height: u32) -> Result<usize, DecodeError> {
    let record_len = bytes_per_scanline(width)?.checked_add(1).ok_or(DecodeError::IntegerOverflow)?;
    record_len.checked_mul(height as usize).ok_or(DecodeError::IntegerOverflow)
}

/// Splits decompressed image data into rows and reconstructs each one.
///
/// The data must be exactly `height` records of one filter type byte
/// followed by `width * 3` row bytes.
pub fn reconstruct_scanlines(
    scanline_data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<Vec<u8>>, DecodeError> {
    let bytes_per_scanline = bytes_per_scanline(width)?;
    let record_len = bytes_per_scanline + 1;
    let expected = scanline_data_len(width, height)?;

    if scanline_data.len() != expected {
        return Err(DecodeError::MalformedScanlineData { expected, actual: scanline_data.len() });
    }

    let zero_scanline = vec![0u8; bytes_per_scanline];
    let mut rows: Vec<Vec<u8>> = Vec::with_capacity(height as usize);

    for record in scanline_data.chunks_exact(record_len) {
        let filter_type = FilterType::try_from(record[0])
            .map_err(|_| DecodeError::InvalidFilterType(record[0]))?;

        let mut current_scanline = record[1..].to_vec();
        let last_scanline = rows.last().unwrap_or(&zero_scanline);
        defilter_row(filter_type, &mut current_scanline, last_scanline);

        rows.push(current_scanline);
    }

    log::debug!("reconstructed {} rows of {} bytes", rows.len(), bytes_per_scanline);

    Ok(rows)
}

/// Filters every row with `filter_type` and prefixes each with its filter
/// type byte, ready for compression.
pub fn filter_scanlines(rows: &[Vec<u8>], filter_type: FilterType) -> Vec<u8> {
    let total: usize = rows.iter().map(|row| row.len() + 1).sum();
    let mut scanline_data = Vec::with_capacity(total);

    let zero_scanline = vec![0u8; rows.iter().map(Vec::len).max().unwrap_or(0)];
    let mut last_scanline: &[u8] = &[];

    for row in rows {
        // The first row, or a row whose predecessor has a different length,
        // is filtered against zeros.
        let above = if last_scanline.len() == row.len() {
            last_scanline
        } else {
            &zero_scanline[..row.len()]
        };

        scanline_data.push(filter_type as u8);
        if filter_type == FilterType::None {
            scanline_data.extend_from_slice(row);
        } else {
            scanline_data.extend(filter_row(filter_type, row, above));
        }

        last_scanline = row;
    }

    scanline_data
}
