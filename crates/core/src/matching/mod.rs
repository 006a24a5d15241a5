pub mod orientation;
pub mod region_search;
pub mod selector;
pub mod similarity;
