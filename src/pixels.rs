use crate::{filter::BYTES_PER_PIXEL, EncodeError};
use alloc::vec::Vec;
use core::convert::TryFrom;
use num_enum::TryFromPrimitive;

/// One pixel as `[red, green, blue]`.
pub type Rgb = [u8; BYTES_PER_PIXEL];

/// Selects the channel that survives a single-channel export.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive)]
pub enum Channel {
    Red = 1,
    Green = 2,
    Blue = 3,
}

impl Channel {
    pub fn from_selector(selector: u8) -> Result<Self, EncodeError> {
        Channel::try_from(selector).map_err(|_| EncodeError::InvalidChannelSelector(selector))
    }

    /// Position of this channel within a pixel.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

/// A decoded image: `height` rows of `width` RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub rows: Vec<Vec<Rgb>>,
}

impl Image {
    /// Groups reconstructed scanlines into pixels. Any trailing bytes that do
    /// not make up a whole pixel are dropped.
    pub fn from_scanlines(scanlines: &[Vec<u8>]) -> Self {
        let rows = scanlines
            .iter()
            .map(|scanline| {
                scanline
                    .chunks_exact(BYTES_PER_PIXEL)
                    .map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect()
            })
            .collect();

        Image { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Pixel count of the first row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Checks that the image has pixels and every row is as wide as the first.
    pub fn checked_dimensions(&self) -> Result<(u32, u32), EncodeError> {
        let width = self.width();
        if width == 0 {
            return Err(EncodeError::EmptyImage);
        }

        if let Some((row, pixels)) =
            self.rows.iter().enumerate().find(|(_, pixels)| pixels.len() != width)
        {
            return Err(EncodeError::RaggedRows { row, expected: width, actual: pixels.len() });
        }

        let width = u32::try_from(width).map_err(|_| EncodeError::IntegerOverflow)?;
        let height = u32::try_from(self.height()).map_err(|_| EncodeError::IntegerOverflow)?;
        Ok((width, height))
    }

    /// A copy of the image where only `channel` keeps its value.
    pub fn channel_plane(&self, channel: Channel) -> Image {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|pixel| mask_pixel(*pixel, channel)).collect())
            .collect();

        Image { rows }
    }

    /// Flattens every row back to bytes, zeroing all but `channel`.
    pub fn flatten_channel(&self, channel: Channel) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().flat_map(|pixel| mask_pixel(*pixel, channel)).collect())
            .collect()
    }
}

fn mask_pixel(pixel: Rgb, channel: Channel) -> Rgb {
    let mut masked = [0u8; BYTES_PER_PIXEL];
    masked[channel.index()] = pixel[channel.index()];
    masked
}

/// Merges three single-channel images, taking red from `red`, green from
/// `green` and blue from `blue`. The output has the shape of `red`; missing
/// pixels in the other two read as zero.
pub fn recombine(red: &Image, green: &Image, blue: &Image) -> Image {
    let rows = red
        .rows
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, pixel)| {
                    let g = green.pixel(x, y).map_or(0, |p| p[Channel::Green.index()]);
                    let b = blue.pixel(x, y).map_or(0, |p| p[Channel::Blue.index()]);
                    [pixel[Channel::Red.index()], g, b]
                })
                .collect()
        })
        .collect();

    Image { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> Image {
        Image { rows: vec![vec![[10, 20, 30], [40, 50, 60]], vec![[1, 2, 3], [4, 5, 6]]] }
    }

    #[test]
    fn groups_bytes_into_pixels() {
        let image = Image::from_scanlines(&[vec![10, 20, 30, 40, 50, 60], vec![1, 2, 3, 4, 5, 6]]);
        assert_eq!(image, sample());
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixel(1, 0), Some([40, 50, 60]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn selector_maps_to_channel() {
        assert_eq!(Channel::from_selector(1), Ok(Channel::Red));
        assert_eq!(Channel::from_selector(2), Ok(Channel::Green));
        assert_eq!(Channel::from_selector(3), Ok(Channel::Blue));
        assert_eq!(Channel::from_selector(0), Err(EncodeError::InvalidChannelSelector(0)));
        assert_eq!(Channel::from_selector(4), Err(EncodeError::InvalidChannelSelector(4)));
    }

    #[test]
    fn flatten_keeps_one_channel() {
        let image = sample();
        assert_eq!(
            image.flatten_channel(Channel::Green),
            [vec![0, 20, 0, 0, 50, 0], vec![0, 2, 0, 0, 5, 0]]
        );
        assert_eq!(image.flatten_channel(Channel::Blue)[0], [0, 0, 30, 0, 0, 60]);
    }

    #[test]
    fn planes_recombine_to_original() {
        let image = sample();
        let red = image.channel_plane(Channel::Red);
        let green = image.channel_plane(Channel::Green);
        let blue = image.channel_plane(Channel::Blue);

        assert_eq!(red.rows[1], [[1, 0, 0], [4, 0, 0]]);
        assert_eq!(recombine(&red, &green, &blue), image);
    }

    #[test]
    fn dimensions_are_checked() {
        assert_eq!(sample().checked_dimensions(), Ok((2, 2)));
        assert_eq!(Image::default().checked_dimensions(), Err(EncodeError::EmptyImage));

        let ragged = Image { rows: vec![vec![[0; 3]; 2], vec![[0; 3]; 1]] };
        assert_eq!(
            ragged.checked_dimensions(),
            Err(EncodeError::RaggedRows { row: 1, expected: 2, actual: 1 })
        );
    }
}
