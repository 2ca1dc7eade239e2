//! Rules module - violation detectors and the scanner that runs them

pub mod detectors;
pub mod engine;
pub mod patterns;
pub mod results;

pub use engine::ViolationScanner;
pub use results::{Category, ScanHit, Severity};
