/// Default noise suppression cutoff applied to the input before matching.
pub const DEFAULT_THRESHOLD: f64 = 80.0;
/// Value assigned to samples above the threshold.
pub const THRESHOLD_ON_VALUE: u8 = 255;

pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 3;
pub const DEFAULT_BLUR_DEVIATION: u32 = 10;

/// BT.601 luma weights in 14-bit fixed point; they sum to `1 << LUMA_SHIFT`.
pub const LUMA_R_WEIGHT: u32 = 4899;
pub const LUMA_G_WEIGHT: u32 = 9617;
pub const LUMA_B_WEIGHT: u32 = 1868;
pub const LUMA_SHIFT: u32 = 14;

/// Minimum similarity a match must exceed before the image is edited.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.1;

/// Gaussian window used by the similarity scorer. Independent of the
/// redaction blur settings.
pub const SSIM_WINDOW_SIZE: usize = 11;
pub const SSIM_SIGMA: f64 = 1.5;
/// Stabilizing constants for 8-bit samples: `(0.01 * 255)^2`, `(0.03 * 255)^2`.
pub const SSIM_C1: f32 = 6.5025;
pub const SSIM_C2: f32 = 58.5225;
/// Channels beyond this count are ignored by the scorer.
pub const SSIM_MAX_CHANNELS: usize = 3;

/// Stand-in extent for a non-positive ROI width or height.
pub const UNBOUNDED_EXTENT: i32 = 1_000_000;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
