use crate::{
    decode_with_options, encode_channel, DecodeError, DecodeOptions, EncodeError, Image,
    PngHeader,
};
use alloc::vec::Vec;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// The result of reading a PNG file from disk.
///
/// A file that does not exist is not an error at load time. It becomes
/// `DecodeError::MissingOrEmptyFile` once something tries to decode it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedFile {
    Loaded { path: PathBuf, data: Vec<u8> },
    NotFound,
}

impl LoadedFile {
    pub fn data(&self) -> &[u8] {
        match self {
            LoadedFile::Loaded { data, .. } => data,
            LoadedFile::NotFound => &[],
        }
    }

    pub fn decode(&self) -> Result<(PngHeader, Image), DecodeError> {
        self.decode_with_options(&DecodeOptions::default())
    }

    pub fn decode_with_options(
        &self,
        options: &DecodeOptions,
    ) -> Result<(PngHeader, Image), DecodeError> {
        decode_with_options(self.data(), options)
    }
}

pub fn load(path: impl AsRef<Path>) -> io::Result<LoadedFile> {
    let path = path.as_ref();

    match fs::read(path) {
        Ok(data) => {
            log::debug!("loaded {} bytes from {}", data.len(), path.display());
            Ok(LoadedFile::Loaded { path: path.to_path_buf(), data })
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} not found", path.display());
            Ok(LoadedFile::NotFound)
        },
        Err(err) => Err(err),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to write PNG file: {0}")]
    Io(#[from] io::Error),
}

/// Writes `image` to `path` keeping only the channel picked by `selector`.
pub fn save_channel(path: impl AsRef<Path>, image: &Image, selector: u8) -> Result<(), SaveError> {
    let png_bytes = encode_channel(image, selector)?;
    fs::write(path, png_bytes)?;
    Ok(())
}
