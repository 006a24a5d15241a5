use std::path::Path;

use crate::imaging::domain::ImageIoError;
use crate::shared::frame::Frame;

/// Decodes an image source into a [`Frame`].
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, ImageIoError>;
}
