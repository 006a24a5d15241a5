use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::ImageIoError;
use crate::shared::frame::Frame;

/// Reads image files with the `image` crate, always producing 3-channel
/// color frames (grayscale sources are expanded).
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, ImageIoError> {
        let img = image::open(path).map_err(|source| ImageIoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Frame::from_rgb(img.to_rgb8()))
    }
}
