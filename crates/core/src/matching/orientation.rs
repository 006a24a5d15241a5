/// Whether an image is used as-is or bitwise inverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Normal,
    Inverted,
}

/// `(input, mask)` combinations evaluated per mask, in search order.
pub const ORIENTATION_PAIRS: [(Orientation, Orientation); 4] = [
    (Orientation::Normal, Orientation::Normal),
    (Orientation::Normal, Orientation::Inverted),
    (Orientation::Inverted, Orientation::Normal),
    (Orientation::Inverted, Orientation::Inverted),
];

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Normal => "normal",
            Orientation::Inverted => "inverted",
        }
    }
}
