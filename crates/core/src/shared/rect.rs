use std::fmt;

use crate::shared::blur_margin::BlurMargin;

/// Integer rectangle in image coordinates.
///
/// May temporarily hold negative origins or extents past the image edge;
/// [`Rect::clamp_to`] turns it into a region that is safe to index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full extent of a `width` x `height` image.
    pub fn of_image(width: u32, height: u32) -> Self {
        Self::new(0, 0, to_i32(width), to_i32(height))
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlap of two rectangles, or `None` when they do not share any pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = (self.x as i64).max(other.x as i64);
        let y1 = (self.y as i64).max(other.y as i64);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Rect::new(
            x1 as i32,
            y1 as i32,
            (x2 - x1) as i32,
            (y2 - y1) as i32,
        ))
    }

    /// Clips the rectangle to a `width` x `height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        self.intersect(&Rect::of_image(width, height))
    }

    /// Grows the rectangle outward by the given margins. The result is not
    /// clamped.
    pub fn expand(&self, margin: &BlurMargin) -> Rect {
        Rect::new(
            self.x.saturating_sub(to_i32(margin.left)),
            self.y.saturating_sub(to_i32(margin.top)),
            self.width
                .saturating_add(to_i32(margin.left))
                .saturating_add(to_i32(margin.right)),
            self.height
                .saturating_add(to_i32(margin.top))
                .saturating_add(to_i32(margin.bottom)),
        )
    }

    /// Translates a rectangle expressed relative to `origin`.
    pub fn offset_by(&self, origin: &Rect) -> Rect {
        Rect::new(
            origin.x.saturating_add(self.x),
            origin.y.saturating_add(self.y),
            self.width,
            self.height,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
