//! Intensity conversion, inversion and noise-suppression thresholding.
//!
//! The input image gets a thresholded binary copy of both its grayscale and
//! inverted forms for matching; masks are only converted and inverted. The
//! un-thresholded forms are kept for similarity scoring.

use image::GrayImage;

use crate::matching::orientation::Orientation;
use crate::shared::constants::THRESHOLD_ON_VALUE;
use crate::shared::frame::Frame;

/// One orientation of the input image.
#[derive(Clone, Debug)]
pub struct IntensityPair {
    /// Un-thresholded intensity, used for scoring.
    pub gray: GrayImage,
    /// Thresholded intensity, used for searching.
    pub binary: GrayImage,
}

/// The input image in both orientations.
#[derive(Clone, Debug)]
pub struct PreparedInput {
    normal: IntensityPair,
    inverted: IntensityPair,
}

impl PreparedInput {
    pub fn variant(&self, orientation: Orientation) -> &IntensityPair {
        match orientation {
            Orientation::Normal => &self.normal,
            Orientation::Inverted => &self.inverted,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.normal.gray.dimensions()
    }
}

/// A mask in both orientations.
#[derive(Clone, Debug)]
pub struct PreparedMask {
    normal: GrayImage,
    inverted: GrayImage,
}

impl PreparedMask {
    pub fn variant(&self, orientation: Orientation) -> &GrayImage {
        match orientation {
            Orientation::Normal => &self.normal,
            Orientation::Inverted => &self.inverted,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.normal.dimensions()
    }
}

/// Converts a frame to single-channel intensity. Frames with an unsupported
/// channel layout yield `None`.
pub fn to_grayscale(frame: &Frame) -> Option<GrayImage> {
    frame.to_gray()
}

/// `255 - value` for every sample.
pub fn invert(gray: &GrayImage) -> GrayImage {
    let mut out = gray.clone();
    image::imageops::invert(&mut out);
    out
}

/// Binary threshold: samples strictly above `threshold` become `on_value`,
/// everything else becomes 0.
pub fn threshold_binary(gray: &GrayImage, threshold: f64, on_value: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if f64::from(p.0[0]) > threshold {
            on_value
        } else {
            0
        };
    }
    out
}

pub fn prepare_input(frame: &Frame, threshold: f64) -> Option<PreparedInput> {
    let gray = to_grayscale(frame)?;
    let inverted = invert(&gray);
    let pair = |gray: GrayImage| IntensityPair {
        binary: threshold_binary(&gray, threshold, THRESHOLD_ON_VALUE),
        gray,
    };
    Some(PreparedInput {
        normal: pair(gray),
        inverted: pair(inverted),
    })
}

pub fn prepare_mask(frame: &Frame) -> Option<PreparedMask> {
    let normal = to_grayscale(frame)?;
    let inverted = invert(&normal);
    Some(PreparedMask { normal, inverted })
}
