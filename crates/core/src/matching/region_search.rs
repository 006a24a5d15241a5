use image::GrayImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

use crate::shared::rect::Rect;
use crate::shared::roi::Roi;

/// Best alignment of a needle inside a searched window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchHit {
    /// The clamped ROI that was searched, in image coordinates.
    pub window: Rect,
    /// Top-left of the best match relative to `window`.
    pub offset: (u32, u32),
}

impl SearchHit {
    /// The matched rectangle in full-image coordinates.
    pub fn absolute_rect(&self, needle_width: u32, needle_height: u32) -> Rect {
        Rect::new(
            self.offset.0 as i32,
            self.offset.1 as i32,
            needle_width as i32,
            needle_height as i32,
        )
        .offset_by(&self.window)
    }
}

/// Why a search produced no candidate. Neither case is fatal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchMiss {
    /// The ROI does not overlap the image.
    EmptyRoi { anchored: Rect },
    /// The needle does not fit inside the clamped ROI.
    NeedleTooLarge { window: Rect },
}

/// Locates a needle image inside a region of a haystack image.
pub trait TemplateSearcher: Send {
    fn search(
        &self,
        haystack: &GrayImage,
        roi: &Roi,
        needle: &GrayImage,
    ) -> Result<SearchHit, SearchMiss>;
}

/// Exhaustive sum-of-squared-differences search over the ROI.
///
/// The correlation surface is min-max normalized to `[0, 1]` and the first
/// minimum in row-major order is the best alignment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqDiffSearcher;

impl SqDiffSearcher {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSearcher for SqDiffSearcher {
    fn search(
        &self,
        haystack: &GrayImage,
        roi: &Roi,
        needle: &GrayImage,
    ) -> Result<SearchHit, SearchMiss> {
        let (width, height) = haystack.dimensions();
        let window = roi.resolve(width, height).ok_or(SearchMiss::EmptyRoi {
            anchored: roi.anchored(width, height),
        })?;

        let (win_w, win_h) = (window.width as u32, window.height as u32);
        if needle.width() == 0
            || needle.height() == 0
            || needle.width() > win_w
            || needle.height() > win_h
        {
            return Err(SearchMiss::NeedleTooLarge { window });
        }

        let region =
            image::imageops::crop_imm(haystack, window.x as u32, window.y as u32, win_w, win_h)
                .to_image();
        let mut surface = match_template(&region, needle, MatchTemplateMethod::SumOfSquaredErrors);

        let extremes = find_extremes(&surface);
        let range = extremes.max_value - extremes.min_value;
        if range > 0.0 {
            for p in surface.pixels_mut() {
                p.0[0] = (p.0[0] - extremes.min_value) / range;
            }
        }
        let best = find_extremes(&surface).min_value_location;

        log::trace!(
            "SQDIFF surface {}x{} over window {window}: min {} at {:?}",
            surface.width(),
            surface.height(),
            extremes.min_value,
            best
        );

        Ok(SearchHit {
            window,
            offset: best,
        })
    }
}
