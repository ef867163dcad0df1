pub mod patterns;
pub mod region;

pub use region::{Classification, RegionClassifier};
