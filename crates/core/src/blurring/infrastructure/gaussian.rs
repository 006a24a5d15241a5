use ndarray::{Array2, ArrayView2};

use crate::blurring::domain::region_blurrer::BlurError;

/// ROI rectangle within a frame, used to pass region coordinates without many arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Sigma used when none is given: `kernel_size / 6`.
pub fn default_sigma(kernel_size: usize) -> f64 {
    kernel_size as f64 / 6.0
}

/// Precompute a normalized 1D Gaussian kernel.
///
/// `kernel_size` must be odd and >= 1. A non-positive `sigma` falls back to
/// [`default_sigma`].
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Result<Vec<f32>, BlurError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(BlurError::InvalidKernelSize(kernel_size));
    }
    Ok(gaussian_weights(kernel_size, sigma))
}

/// Normalized weights for an odd `kernel_size`; `sigma <= 0` derives one.
pub(crate) fn gaussian_weights(kernel_size: usize, sigma: f64) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        default_sigma(kernel_size)
    };
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Index of the `k`-th kernel tap around `pos`, replicated at the borders.
fn tap(pos: usize, k: usize, half: usize, len: usize) -> usize {
    (pos as isize + k as isize - half as isize).clamp(0, len as isize - 1) as usize
}

/// Apply a separable Gaussian blur to interleaved 8-bit data, reusing `temp`.
pub fn separable_gaussian_blur_with_kernel(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size / 2;

    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = tap(x, k, half, width);
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = tap(y, k, half, height);
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Gaussian-weighted local mean of a single-channel float plane.
pub fn smooth_plane(src: ArrayView2<'_, f32>, kernel: &[f32]) -> Array2<f32> {
    let (height, width) = src.dim();
    if kernel.len() <= 1 || width == 0 || height == 0 {
        return src.to_owned();
    }
    let half = kernel.len() / 2;

    let horizontal = Array2::from_shape_fn((height, width), |(y, x)| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, &w)| src[[y, tap(x, k, half, width)]] * w)
            .sum::<f32>()
    });
    Array2::from_shape_fn((height, width), |(y, x)| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, &w)| horizontal[[tap(y, k, half, height), x]] * w)
            .sum::<f32>()
    })
}

/// Extract a rectangular ROI from frame data into a reusable buffer.
pub fn extract_roi(
    data: &[u8],
    frame_width: usize,
    channels: usize,
    rect: RoiRect,
    roi: &mut Vec<u8>,
) {
    roi.resize(rect.w * rect.h * channels, 0);
    for row in 0..rect.h {
        let src_offset = ((rect.y + row) * frame_width + rect.x) * channels;
        let dst_offset = row * rect.w * channels;
        roi[dst_offset..dst_offset + rect.w * channels]
            .copy_from_slice(&data[src_offset..src_offset + rect.w * channels]);
    }
}

/// Copy the `inner` part of a blurred buffer covering `outer` back into
/// frame data. `inner` must lie within `outer`.
pub fn write_roi_back(
    data: &mut [u8],
    roi: &[u8],
    frame_width: usize,
    channels: usize,
    outer: RoiRect,
    inner: RoiRect,
) {
    let (dx, dy) = (inner.x - outer.x, inner.y - outer.y);
    for row in 0..inner.h {
        let dst_offset = ((inner.y + row) * frame_width + inner.x) * channels;
        let src_offset = ((dy + row) * outer.w + dx) * channels;
        data[dst_offset..dst_offset + inner.w * channels]
            .copy_from_slice(&roi[src_offset..src_offset + inner.w * channels]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn blur(data: &mut [u8], w: usize, h: usize, c: usize, size: usize, sigma: f64) {
        let kernel = gaussian_kernel_1d(size, sigma).unwrap();
        let mut temp = Vec::new();
        separable_gaussian_blur_with_kernel(data, w, h, c, &kernel, &mut temp);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_1d(11, 1.5).unwrap();
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let k = gaussian_kernel_1d(7, 0.0).unwrap();
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let k = gaussian_kernel_1d(7, 2.0).unwrap();
        for (i, &v) in k.iter().enumerate() {
            if i != 3 {
                assert!(k[3] >= v);
            }
        }
    }

    #[test]
    fn test_large_sigma_flattens_small_kernel() {
        // sigma=10 over 3 taps is close to a box filter
        let k = gaussian_kernel_1d(3, 10.0).unwrap();
        assert!((k[0] - k[1]).abs() < 0.01);
    }

    #[test]
    fn test_non_positive_sigma_uses_default() {
        let derived = gaussian_kernel_1d(9, default_sigma(9)).unwrap();
        assert_eq!(gaussian_kernel_1d(9, 0.0).unwrap(), derived);
        assert_eq!(gaussian_kernel_1d(9, -3.0).unwrap(), derived);
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(10)]
    fn test_even_or_zero_kernel_size_is_rejected(#[case] size: usize) {
        assert_eq!(
            gaussian_kernel_1d(size, 1.0),
            Err(BlurError::InvalidKernelSize(size))
        );
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        blur(&mut data, 10, 10, 3, 5, 0.0);
        assert!(data.iter().all(|&v| (v as i32 - 128).abs() <= 1));
    }

    #[test]
    fn test_blur_spreads_single_bright_pixel() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let cx = 5 * 10 + 5;
        data[cx * 3..cx * 3 + 3].fill(255);

        blur(&mut data, 10, 10, 3, 5, 1.0);

        assert!(data[cx * 3] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..75).map(|v| v as u8).collect();
        let original = data.clone();
        blur(&mut data, 5, 5, 3, 1, 0.0);
        assert_eq!(data, original);
    }

    #[test]
    fn test_smooth_plane_preserves_constant() {
        let plane = Array2::from_elem((6, 9), 42.0f32);
        let out = smooth_plane(plane.view(), &gaussian_kernel_1d(11, 1.5).unwrap());
        for &v in out.iter() {
            assert_relative_eq!(v, 42.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_smooth_plane_preserves_mass_away_from_borders() {
        let mut plane = Array2::<f32>::zeros((21, 21));
        plane[[10, 10]] = 100.0;
        let out = smooth_plane(plane.view(), &gaussian_kernel_1d(11, 1.5).unwrap());
        assert_relative_eq!(out.sum(), 100.0, epsilon = 1e-2);
        assert!(out[[10, 10]] < 100.0);
        assert!(out[[10, 11]] > 0.0);
    }

    #[test]
    fn test_extract_and_write_back_roundtrip() {
        let mut frame: Vec<u8> = (0..(6 * 4 * 3)).map(|v| v as u8).collect();
        let original = frame.clone();
        let rect = RoiRect {
            x: 1,
            y: 1,
            w: 3,
            h: 2,
        };
        let mut roi = Vec::new();
        extract_roi(&frame, 6, 3, rect, &mut roi);
        assert_eq!(roi.len(), 3 * 2 * 3);
        assert_eq!(&roi[..3], &original[(6 + 1) * 3..(6 + 1) * 3 + 3]);

        roi.fill(0);
        write_roi_back(&mut frame, &roi, 6, 3, rect, rect);
        assert_eq!(&frame[..18], &original[..18]);
        assert_eq!(&frame[(6 + 1) * 3..(6 + 4) * 3], &[0u8; 9]);
    }

    #[test]
    fn test_write_back_copies_only_inner_rect() {
        let mut frame = vec![7u8; 6 * 4];
        let outer = RoiRect {
            x: 0,
            y: 0,
            w: 6,
            h: 4,
        };
        let inner = RoiRect {
            x: 2,
            y: 1,
            w: 2,
            h: 2,
        };
        let roi: Vec<u8> = (0..24).collect();

        write_roi_back(&mut frame, &roi, 6, 1, outer, inner);

        assert_eq!(&frame[6 + 2..6 + 4], &[8, 9]);
        assert_eq!(&frame[12 + 2..12 + 4], &[14, 15]);
        assert_eq!(frame.iter().filter(|&&v| v == 7).count(), 20);
    }
}
