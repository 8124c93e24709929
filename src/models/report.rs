use serde::{Deserialize, Serialize};

/// Per-tag aggregate, recomputed on every analysis call and never persisted.
///
/// `tag` is the category-qualified interchange form (`"strategy:Breakout"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStat {
    pub tag: String,
    pub total_pnl: f64,
    pub trade_count: usize,
    pub win_count: usize,
    pub win_rate: f64,
}

/// Top profitable / unprofitable tag lists for the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagPerformance {
    pub profitable: Vec<TagStat>,
    pub unprofitable: Vec<TagStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakImpact {
    High,
    Low,
}

/// A maximal trailing run of same-sign-outcome trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTopic {
    Strategy,
    Risk,
    Performance,
    Timing,
}

/// One actionable insight: an observed pattern and what to do about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub pattern: String,
    pub recommendation: String,
    #[serde(default)]
    pub related_tags: Vec<String>,
    pub topic: InsightTopic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub text: String,
    pub topic: InsightTopic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeLetter {
    A,
    B,
    C,
    D,
}

impl GradeLetter {
    /// Canned summary string shown alongside the letter.
    pub fn summary(&self) -> &'static str {
        match self {
            GradeLetter::A => {
                "Excellent performance. Your edge is holding up across metrics; \
                 keep sizing steady and protect what is working."
            }
            GradeLetter::B => {
                "Solid performance with room to tighten up. One of your core \
                 metrics is lagging the others."
            }
            GradeLetter::C => {
                "Mixed results. Your account is roughly treading water; review \
                 your losing setups before adding size."
            }
            GradeLetter::D => {
                "Underperforming. Cut size, go back to your best setups, and \
                 focus on capital preservation."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGrade {
    pub letter: GradeLetter,
    pub summary: String,
}

/// The authoritative numeric metrics. Never overwritten by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub consistency_score: u8,
    pub profit_factor: f64,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub trade_count: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
}

/// The complete performance report. Constructed fresh on every analysis
/// invocation and never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub actionable_insights: Vec<Insight>,
    pub key_observations: Vec<Observation>,
    pub performance_grade: PerformanceGrade,
    pub key_metrics: KeyMetrics,
    pub tag_performance: TagPerformance,
}
