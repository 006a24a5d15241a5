use std::path::Path;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::imaging::domain::ImageIoError;
use crate::shared::frame::Frame;

/// Writes a frame to an image file using the `image` crate. The format is
/// chosen from the file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), ImageIoError> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ImageIoError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let img = frame.to_rgb().ok_or(ImageIoError::InvalidBuffer {
            width: frame.width(),
            height: frame.height(),
            channels: frame.channels(),
        })?;

        img.save(path).map_err(|source| ImageIoError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[r, g, b]);
        }
        Frame::new(data, width, height, 3)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(100, 80, 50, 100, 200))
            .unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(50, 50, 50, 100, 200))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(4, 4, 1, 2, 3))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_extension_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknownext");
        let err = ImageFileWriter::new()
            .write(&path, &make_frame(4, 4, 0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, ImageIoError::Encode { .. }));
    }
}
