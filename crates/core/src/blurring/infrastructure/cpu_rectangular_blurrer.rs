use std::cell::RefCell;

use crate::blurring::domain::region_blurrer::{BlurError, RegionBlurrer};
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

use super::gaussian::{self, RoiRect};

/// CPU rectangular blurrer using a separable Gaussian blur.
///
/// Pixels within half a kernel of the region are read so the blur blends
/// into its surroundings; only pixels inside the region are written.
pub struct CpuRectangularBlurrer {
    kernel: Vec<f32>,
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
}

impl CpuRectangularBlurrer {
    /// `kernel_size` must be odd; a `deviation` of `0` derives sigma from it.
    pub fn new(kernel_size: u32, deviation: u32) -> Result<Self, BlurError> {
        Ok(Self {
            kernel: gaussian::gaussian_kernel_1d(kernel_size as usize, deviation as f64)?,
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
        })
    }
}

impl RegionBlurrer for CpuRectangularBlurrer {
    fn blur(&self, frame: &mut Frame, region: &Rect) -> Result<(), BlurError> {
        if region.is_empty() {
            return Ok(());
        }
        let (fw, fh) = (frame.width() as usize, frame.height() as usize);
        if region.x < 0
            || region.y < 0
            || region.right() > fw as i64
            || region.bottom() > fh as i64
        {
            return Err(BlurError::OutOfFrame {
                region: *region,
                width: frame.width(),
                height: frame.height(),
            });
        }

        let inner = RoiRect {
            x: region.x as usize,
            y: region.y as usize,
            w: region.width as usize,
            h: region.height as usize,
        };
        let half = self.kernel.len() / 2;
        let (x0, y0) = (inner.x.saturating_sub(half), inner.y.saturating_sub(half));
        let x1 = (inner.x + inner.w + half).min(fw);
        let y1 = (inner.y + inner.h + half).min(fh);
        let outer = RoiRect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        };
        let channels = frame.channels() as usize;

        let mut roi = self.roi_buf.borrow_mut();
        let mut temp = self.blur_temp.borrow_mut();
        gaussian::extract_roi(frame.data(), fw, channels, outer, &mut roi);
        gaussian::separable_gaussian_blur_with_kernel(
            &mut roi,
            outer.w,
            outer.h,
            channels,
            &self.kernel,
            &mut temp,
        );
        gaussian::write_roi_back(frame.data_mut(), &roi, fw, channels, outer, inner);

        Ok(())
    }
}
