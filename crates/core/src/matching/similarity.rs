use image::GrayImage;
use ndarray::{s, ArrayView2, ArrayView3, Axis};

use crate::blurring::infrastructure::gaussian::{gaussian_weights, smooth_plane};
use crate::shared::constants::{
    SSIM_C1, SSIM_C2, SSIM_MAX_CHANNELS, SSIM_SIGMA, SSIM_WINDOW_SIZE,
};
use crate::shared::rect::Rect;

/// Scores how alike two equally sized patches are, shaped
/// `(height, width, channels)`.
///
/// Returns `None` when the shapes differ or the patches are empty.
pub trait SimilarityScorer: Send {
    fn score(&self, a: ArrayView3<'_, u8>, b: ArrayView3<'_, u8>) -> Option<f64>;
}

/// Whole single-channel image as a `(height, width, 1)` view.
pub fn gray_view(img: &GrayImage) -> ArrayView3<'_, u8> {
    let shape = (img.height() as usize, img.width() as usize, 1);
    let len = shape.0 * shape.1;
    ArrayView3::from_shape(shape, &img.as_raw()[..len])
        .expect("GrayImage buffer length must match its dimensions")
}

/// View of `rect` inside `img`, or `None` unless it lies fully inside.
pub fn gray_window<'a>(img: &'a GrayImage, rect: &Rect) -> Option<ArrayView3<'a, u8>> {
    if rect.is_empty() || rect.clamp_to(img.width(), img.height()) != Some(*rect) {
        return None;
    }
    let (x, y) = (rect.x as usize, rect.y as usize);
    let (w, h) = (rect.width as usize, rect.height as usize);
    Some(gray_view(img).slice_move(s![y..y + h, x..x + w, ..]))
}

/// Mean structural similarity (MSSIM) with Gaussian-weighted local
/// statistics (11-tap window, sigma 1.5).
///
/// Each channel's SSIM map is averaged spatially; the result is the mean
/// over at most three channels. Identical patches score 1.0 and the score
/// is symmetric in its arguments.
pub struct GaussianSsimScorer {
    kernel: Vec<f32>,
}

impl GaussianSsimScorer {
    pub fn new() -> Self {
        Self {
            kernel: gaussian_weights(SSIM_WINDOW_SIZE, SSIM_SIGMA),
        }
    }

    fn channel_ssim(&self, a: ArrayView2<'_, u8>, b: ArrayView2<'_, u8>) -> Option<f64> {
        let i1 = a.mapv(f32::from);
        let i2 = b.mapv(f32::from);

        let mu1 = smooth_plane(i1.view(), &self.kernel);
        let mu2 = smooth_plane(i2.view(), &self.kernel);
        let mu1_2 = &mu1 * &mu1;
        let mu2_2 = &mu2 * &mu2;
        let mu1_mu2 = &mu1 * &mu2;

        let sigma1_2 = smooth_plane((&i1 * &i1).view(), &self.kernel) - &mu1_2;
        let sigma2_2 = smooth_plane((&i2 * &i2).view(), &self.kernel) - &mu2_2;
        let sigma12 = smooth_plane((&i1 * &i2).view(), &self.kernel) - &mu1_mu2;

        let numerator = (mu1_mu2 * 2.0 + SSIM_C1) * (sigma12 * 2.0 + SSIM_C2);
        let denominator = (mu1_2 + mu2_2 + SSIM_C1) * (sigma1_2 + sigma2_2 + SSIM_C2);
        let ssim_map = numerator / denominator;

        ssim_map.mapv(f64::from).mean()
    }
}

impl Default for GaussianSsimScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer for GaussianSsimScorer {
    fn score(&self, a: ArrayView3<'_, u8>, b: ArrayView3<'_, u8>) -> Option<f64> {
        if a.shape() != b.shape() || a.is_empty() {
            return None;
        }
        let channels = a.len_of(Axis(2)).min(SSIM_MAX_CHANNELS);
        let total = (0..channels)
            .map(|c| self.channel_ssim(a.index_axis(Axis(2), c), b.index_axis(Axis(2), c)))
            .sum::<Option<f64>>()?;
        Some(total / channels as f64)
    }
}
