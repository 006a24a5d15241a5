pub mod blur_margin;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod rect;
pub mod roi;
