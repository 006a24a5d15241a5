pub mod cpu_rectangular_blurrer;
pub(crate) mod gaussian;
