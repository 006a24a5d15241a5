//! Locates a known mask image inside a larger image and blurs the match.
//!
//! Every mask is searched in four intensity orientations over a thresholded
//! copy of the input, each hit is scored with a windowed structural
//! similarity index, and the single best match above a confidence floor is
//! blurred in place. See [`pipeline::redact_image_use_case`] for the entry
//! point.

pub mod blurring;
pub mod imaging;
pub mod matching;
pub mod pipeline;
pub mod preprocessing;
pub mod shared;

#[cfg(test)]
mod test_utils;
