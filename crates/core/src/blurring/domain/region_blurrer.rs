use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

#[derive(Error, Debug, PartialEq)]
pub enum BlurError {
    #[error("blur region {region} lies outside the {width}x{height} frame")]
    OutOfFrame {
        region: Rect,
        width: u32,
        height: u32,
    },
    #[error("blur kernel size must be a positive odd integer, got {0}")]
    InvalidKernelSize(usize),
}

/// Applies a blur to one rectangular region of a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and leave
/// every pixel outside the region untouched.
pub trait RegionBlurrer: Send {
    fn blur(&self, frame: &mut Frame, region: &Rect) -> Result<(), BlurError>;
}
