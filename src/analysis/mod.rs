pub mod engine;
pub mod grading;
pub mod metrics;
pub mod streaks;
pub mod tags;
pub mod time_windows;
pub mod trends;

pub use engine::{AnalysisError, Analyzer};
pub use metrics::LifetimeMetrics;
pub use time_windows::{GoldenHour, GridCell, HourBucket, WindowStat};
pub use trends::TrendSnapshot;
