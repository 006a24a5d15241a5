use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::blurring::domain::region_blurrer::BlurError;
use crate::imaging::domain::ImageIoError;
use crate::matching::orientation::Orientation;
use crate::shared::rect::Rect;

/// Fatal conditions: the run aborts and no output is written.
#[derive(Error, Debug)]
pub enum RedactError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to read input image {path}: {source}")]
    InputDecode {
        path: PathBuf,
        #[source]
        source: ImageIoError,
    },
    #[error("no valid mask images among {count} provided")]
    NoValidMasks { count: usize },
    #[error("unable to find a good matching pattern (best similarity {}, required above {min_similarity})", fmt_score(.best))]
    NoConfidentMatch {
        best: Option<f64>,
        min_similarity: f64,
    },
    #[error("failed to blur matched region: {0}")]
    Blur(#[from] BlurError),
    #[error("failed to save to file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: ImageIoError,
    },
    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl RedactError {
    /// Process exit code for this failure. A search that legitimately found
    /// nothing is distinguished from broken inputs.
    pub fn exit_code(&self) -> i32 {
        match self {
            RedactError::NoConfidentMatch { .. } => 1,
            _ => 2,
        }
    }
}

fn fmt_score(best: &Option<f64>) -> String {
    best.map_or_else(|| "none".to_string(), |s| format!("{s:.6}"))
}

/// Recoverable conditions: logged, recorded in the report, and skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchWarning {
    #[error("skipping empty/invalid mask image {path}: {reason}")]
    MaskDecode { path: PathBuf, reason: String },
    #[error("ROI {roi} is out of bounds for mask #{mask_index} ({input:?} input, {mask:?} mask), skipping")]
    EmptyRoi {
        mask_index: usize,
        input: Orientation,
        mask: Orientation,
        roi: Rect,
    },
    #[error("mask #{mask_index} ({mask_width}x{mask_height}) does not fit ROI {roi}, skipping")]
    NeedleTooLarge {
        mask_index: usize,
        mask_width: u32,
        mask_height: u32,
        roi: Rect,
    },
    #[error("matched window {rect} for mask #{mask_index} could not be scored, skipping")]
    UnscorableWindow { mask_index: usize, rect: Rect },
}
