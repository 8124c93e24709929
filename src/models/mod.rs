pub mod report;
pub mod tags;
pub mod trade;

pub use report::{
    AnalysisResult, GradeLetter, Insight, InsightTopic, KeyMetrics, Observation, PerformanceGrade,
    Streak, StreakImpact, StreakKind, TagPerformance, TagStat,
};
pub use tags::{TagCategory, TagKey, TradeTags};
pub use trade::{sorted_chronologically, Trade, TradeType};
