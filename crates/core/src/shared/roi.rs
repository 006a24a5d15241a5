use std::fmt;
use std::str::FromStr;

use crate::shared::constants::UNBOUNDED_EXTENT;
use crate::shared::rect::Rect;

/// User-declared region of interest.
///
/// A negative `x`/`y` counts back from the right/bottom edge of the image
/// (`effective = dimension + value`). A non-positive width or height means
/// "unbounded".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Covers the whole image regardless of its size.
    pub const fn whole_image() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Applies the edge-relative and unbounded semantics for an image of the
    /// given size, without clipping.
    pub fn anchored(&self, image_width: u32, image_height: u32) -> Rect {
        let x = anchor(self.x, image_width);
        let y = anchor(self.y, image_height);
        let width = if self.width <= 0 {
            UNBOUNDED_EXTENT
        } else {
            self.width
        };
        let height = if self.height <= 0 {
            UNBOUNDED_EXTENT
        } else {
            self.height
        };
        Rect::new(x, y, width, height)
    }

    /// The searchable window inside the image, or `None` when the ROI has no
    /// overlap with it.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> Option<Rect> {
        self.anchored(image_width, image_height)
            .clamp_to(image_width, image_height)
    }
}

fn anchor(value: i32, dimension: u32) -> i32 {
    if value < 0 {
        i32::try_from(dimension)
            .unwrap_or(i32::MAX)
            .saturating_add(value)
    } else {
        value
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Parses `x,y,width,height`. Trailing components may be omitted and keep
/// their defaults.
impl FromStr for Roi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_int_list::<i32>(s, 4, "ROI")?;
        let mut roi = Roi::whole_image();
        let fields = [&mut roi.x, &mut roi.y, &mut roi.width, &mut roi.height];
        for (field, value) in fields.into_iter().zip(values) {
            *field = value;
        }
        Ok(roi)
    }
}

/// Splits a comma-separated list of at most `max` integers.
pub(crate) fn parse_int_list<T: FromStr>(s: &str, max: usize, what: &str) -> Result<Vec<T>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() > max {
        return Err(format!(
            "{what} accepts at most {max} comma-separated values, got {}",
            parts.len()
        ));
    }
    parts
        .into_iter()
        .map(|p| {
            p.parse::<T>()
                .map_err(|_| format!("invalid {what} component '{p}' in '{s}'"))
        })
        .collect()
}
