pub mod fields;
pub mod statement;
pub mod workbook;

use thiserror::Error;

use crate::models::Trade;

pub use statement::{parse_statement, parse_statement_bytes};
pub use workbook::{parse_report, parse_report_bytes};

/// User-correctable problems with an imported report. None of these are
/// internal faults; the fix is always a different or corrected file.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No trade table found in this file. Make sure it is an account statement export.")]
    NoTableFound,

    #[error("Found a trade table but required columns are missing: {0}")]
    MissingColumns(String),

    #[error("No \"Positions\" section found. Make sure this is a trade history report.")]
    NoPositionsSection,

    #[error("No valid trades found in this file.")]
    NoTrades,

    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    #[error("Failed to parse report markup: {0}")]
    Parse(String),
}

/// Result of a successful import: the normalized trades plus a row-level
/// ledger of everything that was skipped along the way.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub trades: Vec<Trade>,
    pub skipped: Vec<String>,
}

impl ImportOutcome {
    pub fn imported(&self) -> usize {
        self.trades.len()
    }
}
