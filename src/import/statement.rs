// ─── Markup account-statement import ─────────────────────────────────────────
// Broker statements exported as an HTML report: one large table whose header
// row carries the open-time / type / symbol / profit columns, followed by one
// row per order. Non-trade ledger rows (deposits, credits, balance lines)
// share the table and are filtered out by their type cell.

use regex::Regex;

use crate::models::{Trade, TradeTags, TradeType};

use super::fields;
use super::{ImportError, ImportOutcome};

const OPEN_TIME_ALIASES: [&str; 4] = ["open time", "open date", "time", "date"];
const TYPE_ALIASES: [&str; 3] = ["type", "side", "direction"];
const SYMBOL_ALIASES: [&str; 4] = ["symbol", "item", "instrument", "pair"];
const PROFIT_ALIASES: [&str; 3] = ["profit", "p/l", "pnl"];

struct ColumnMap {
    open_time: usize,
    trade_type: usize,
    symbol: usize,
    profit: usize,
}

/// Parse an HTML account statement into trades.
///
/// Fails with a user-facing error when no qualifying table exists, when the
/// header is missing required columns, or when no valid trade rows survive.
pub fn parse_statement(html: &str) -> Result<ImportOutcome, ImportError> {
    let rows = extract_rows(html)?;
    if rows.is_empty() {
        return Err(ImportError::NoTableFound);
    }

    let (header_idx, columns) = locate_header(&rows)?;

    let mut outcome = ImportOutcome::default();
    for (row_num, cells) in rows.iter().enumerate().skip(header_idx + 1) {
        match parse_row(cells, &columns) {
            Ok(Some(trade)) => outcome.trades.push(trade),
            Ok(None) => {} // non-trade or deliberately excluded row
            Err(reason) => {
                log::warn!("Skipping statement row {}: {}", row_num + 1, reason);
                outcome.skipped.push(format!("Row {}: {}", row_num + 1, reason));
            }
        }
    }

    if outcome.trades.is_empty() {
        return Err(ImportError::NoTrades);
    }
    Ok(outcome)
}

/// Parse an HTML account statement from raw bytes (lossy UTF-8).
pub fn parse_statement_bytes(bytes: &[u8]) -> Result<ImportOutcome, ImportError> {
    parse_statement(&String::from_utf8_lossy(bytes))
}

/// All `<tr>` rows in the document as plain-text cell lists.
fn extract_rows(html: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let row_re = Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>")
        .map_err(|e| ImportError::Parse(e.to_string()))?;
    let cell_re = Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>")
        .map_err(|e| ImportError::Parse(e.to_string()))?;
    let tag_re = Regex::new(r"(?s)<[^>]*>").map_err(|e| ImportError::Parse(e.to_string()))?;

    let rows = row_re
        .captures_iter(html)
        .map(|row| {
            cell_re
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[1], &tag_re))
                .collect()
        })
        .collect();
    Ok(rows)
}

fn cell_text(raw: &str, tag_re: &Regex) -> String {
    let no_tags = tag_re.replace_all(raw, "");
    let decoded = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_column(cells: &[String], aliases: &[&str], claimed: &[usize]) -> Option<usize> {
    for alias in aliases {
        for (idx, cell) in cells.iter().enumerate() {
            if claimed.contains(&idx) {
                continue;
            }
            if cell.to_lowercase().contains(alias) {
                return Some(idx);
            }
        }
    }
    None
}

/// Find the header row: the first row where all four canonical columns are
/// present. A row matching at least three of four marks a candidate table,
/// so the error distinguishes "wrong file" from "incomplete header".
fn locate_header(rows: &[Vec<String>]) -> Result<(usize, ColumnMap), ImportError> {
    let mut best_matches = 0;
    let mut best_missing: Vec<&str> = Vec::new();

    for (idx, cells) in rows.iter().enumerate() {
        let mut claimed: Vec<usize> = Vec::new();
        let mut missing: Vec<&str> = Vec::new();
        let mut resolved: Vec<usize> = Vec::new();

        for (name, aliases) in [
            ("open time", &OPEN_TIME_ALIASES[..]),
            ("type", &TYPE_ALIASES[..]),
            ("symbol", &SYMBOL_ALIASES[..]),
            ("profit", &PROFIT_ALIASES[..]),
        ] {
            match find_column(cells, aliases, &claimed) {
                Some(col) => {
                    claimed.push(col);
                    resolved.push(col);
                }
                None => missing.push(name),
            }
        }

        let matched = 4 - missing.len();
        if matched == 4 {
            return Ok((
                idx,
                ColumnMap {
                    open_time: resolved[0],
                    trade_type: resolved[1],
                    symbol: resolved[2],
                    profit: resolved[3],
                },
            ));
        }
        if matched > best_matches {
            best_matches = matched;
            best_missing = missing;
        }
    }

    if best_matches >= 3 {
        Err(ImportError::MissingColumns(best_missing.join(", ")))
    } else {
        Err(ImportError::NoTableFound)
    }
}

/// One data row. `Ok(None)` means the row is not a trade (ledger entries,
/// zero P&L, blank symbol); `Err` means it looked like a trade but failed to
/// parse.
fn parse_row(cells: &[String], columns: &ColumnMap) -> Result<Option<Trade>, String> {
    let max_col = columns
        .open_time
        .max(columns.trade_type)
        .max(columns.symbol)
        .max(columns.profit);
    if cells.len() <= max_col {
        // Summary and spacer rows are shorter than the trade grid.
        return Ok(None);
    }

    // Only buy/sell rows are trades; deposits, credits and balance rows
    // carry other labels in the same column.
    let trade_type = match cells[columns.trade_type].to_lowercase().as_str() {
        "buy" => TradeType::Long,
        "sell" => TradeType::Short,
        _ => return Ok(None),
    };

    let symbol = cells[columns.symbol].trim().to_string();
    if symbol.is_empty() {
        return Ok(None);
    }

    let raw_time = &cells[columns.open_time];
    let (date, time) = fields::parse_timestamp(raw_time)
        .ok_or_else(|| format!("Invalid open time: {}", raw_time))?;

    let raw_profit = &cells[columns.profit];
    let pnl = fields::parse_amount(raw_profit)
        .ok_or_else(|| format!("Invalid profit value: {}", raw_profit))?;
    if pnl == 0.0 {
        return Ok(None);
    }

    Ok(Some(Trade {
        id: Trade::generate_id(),
        date,
        time,
        pair: symbol.to_uppercase(),
        pnl,
        trade_type: Some(trade_type),
        tags: TradeTags::default(),
        rating: None,
        notes: String::new(),
        photos: Vec::new(),
    }))
}
