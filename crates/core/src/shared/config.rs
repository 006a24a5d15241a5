use std::path::PathBuf;
use std::time::Duration;

use crate::shared::blur_margin::BlurMargin;
use crate::shared::constants::{
    DEFAULT_BLUR_DEVIATION, DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_MIN_SIMILARITY, DEFAULT_THRESHOLD,
};
use crate::shared::error::RedactError;
use crate::shared::roi::Roi;

/// Immutable settings for one redaction run.
#[derive(Clone, Debug, PartialEq)]
pub struct RedactionConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Searched in order; earlier masks win ties.
    pub mask_paths: Vec<PathBuf>,
    pub threshold: f64,
    pub blur_kernel_size: u32,
    /// Gaussian sigma for the redaction blur; `0` derives it from the kernel size.
    pub blur_deviation: u32,
    pub roi: Roi,
    pub blur_margin: BlurMargin,
    pub min_similarity: f64,
    pub dry_run: bool,
    /// Checked between masks.
    pub deadline: Option<Duration>,
}

impl RedactionConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        mask_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            mask_paths,
            threshold: DEFAULT_THRESHOLD,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            blur_deviation: DEFAULT_BLUR_DEVIATION,
            roi: Roi::whole_image(),
            blur_margin: BlurMargin::default(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
            dry_run: false,
            deadline: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_blur(mut self, kernel_size: u32, deviation: u32) -> Self {
        self.blur_kernel_size = kernel_size;
        self.blur_deviation = deviation;
        self
    }

    pub fn with_roi(mut self, roi: Roi) -> Self {
        self.roi = roi;
        self
    }

    pub fn with_blur_margin(mut self, margin: BlurMargin) -> Self {
        self.blur_margin = margin;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn validate(&self) -> Result<(), RedactError> {
        if self.mask_paths.is_empty() {
            return Err(RedactError::Configuration(
                "at least one mask image is required".into(),
            ));
        }
        if !self.threshold.is_finite() || !(0.0..=255.0).contains(&self.threshold) {
            return Err(RedactError::Configuration(format!(
                "threshold must be between 0 and 255, got {}",
                self.threshold
            )));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(RedactError::Configuration(format!(
                "blur kernel size must be a positive odd integer, got {}",
                self.blur_kernel_size
            )));
        }
        if !self.min_similarity.is_finite() || !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(RedactError::Configuration(format!(
                "minimum similarity must be between 0.0 and 1.0, got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}
