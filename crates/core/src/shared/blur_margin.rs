use std::fmt;
use std::str::FromStr;

use crate::shared::roi::parse_int_list;

/// Extra pixels blurred around the matched rectangle, per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BlurMargin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl fmt::Display for BlurMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Parses `top,right,bottom,left`; omitted trailing values stay `0`.
impl FromStr for BlurMargin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_int_list::<u32>(s, 4, "blur margin")?;
        let mut margin = BlurMargin::default();
        let fields = [
            &mut margin.top,
            &mut margin.right,
            &mut margin.bottom,
            &mut margin.left,
        ];
        for (field, value) in fields.into_iter().zip(values) {
            *field = value;
        }
        Ok(margin)
    }
}
