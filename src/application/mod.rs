//! Application services: detection, scoring, the scan funnel and outcome
//! tracking.

pub mod analyzer;
pub mod detector;
pub mod scan_loop;
pub mod scanner;
pub mod scorer;
pub mod tracker;

pub use analyzer::{Analysis, DeepAnalyzer};
pub use detector::{Detector, DetectorConfig, DetectorRegistry};
pub use scan_loop::ScanLoop;
pub use scanner::{CycleReport, Scanner, ScannerConfig};
pub use scorer::Scorer;
pub use tracker::{OutcomeTracker, TrackerConfig};
