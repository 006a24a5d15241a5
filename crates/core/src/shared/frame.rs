use image::{GrayImage, RgbImage};

use crate::shared::constants::{LUMA_B_WEIGHT, LUMA_G_WEIGHT, LUMA_R_WEIGHT, LUMA_SHIFT};

/// An image held in memory: contiguous interleaved bytes in row-major order,
/// either 3-channel color or 1-channel intensity.
///
/// Format conversion happens at I/O boundaries only; the matching core
/// works on [`GrayImage`] views derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 3)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Single-channel intensity version of the frame, using BT.601 luma
    /// weights for color data.
    pub fn to_gray(&self) -> Option<GrayImage> {
        match self.channels {
            1 => GrayImage::from_raw(self.width, self.height, self.data.clone()),
            3 => {
                let luma = self.data.chunks_exact(3).map(|px| luma_bt601(px[0], px[1], px[2]));
                GrayImage::from_raw(self.width, self.height, luma.collect())
            }
            _ => None,
        }
    }

    /// Three-channel version of the frame, replicating intensity if needed.
    pub fn to_rgb(&self) -> Option<RgbImage> {
        match self.channels {
            3 => RgbImage::from_raw(self.width, self.height, self.data.clone()),
            1 => GrayImage::from_raw(self.width, self.height, self.data.clone())
                .map(|gray| image::DynamicImage::ImageLuma8(gray).to_rgb8()),
            _ => None,
        }
    }
}

/// Fixed-point BT.601 luma, rounded to nearest. Neutral colors map to
/// themselves since the weights sum to `1 << LUMA_SHIFT`.
fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let weighted =
        r as u32 * LUMA_R_WEIGHT + g as u32 * LUMA_G_WEIGHT + b as u32 * LUMA_B_WEIGHT;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}
