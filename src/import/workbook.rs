// ─── Spreadsheet report import ───────────────────────────────────────────────
// Broker history exported as an xlsx workbook: a "Positions" section in the
// first column, bounded by the next Orders/Deals/Summary section, with its
// own header row. Balance operations share the sheet and are filtered out.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::models::{Trade, TradeTags, TradeType};

use super::fields;
use super::{ImportError, ImportOutcome};

const TIME_ALIASES: [&str; 2] = ["time", "date"];
const SYMBOL_ALIASES: [&str; 2] = ["symbol", "instrument"];
const TYPE_ALIASES: [&str; 2] = ["type", "direction"];
const PROFIT_ALIASES: [&str; 2] = ["profit", "p/l"];

const SECTION_TERMINATORS: [&str; 3] = ["orders", "deals", "summary"];
const BALANCE_MARKERS: [&str; 3] = ["balance", "deposit", "withdrawal"];

struct ColumnMap {
    time: usize,
    symbol: usize,
    trade_type: usize,
    profit: usize,
    comment: Option<usize>,
}

/// Parse an xlsx trade-history report from disk.
pub fn parse_report(path: &Path) -> Result<ImportOutcome, ImportError> {
    let mut workbook: Xlsx<std::io::BufReader<std::fs::File>> =
        open_workbook(path).map_err(|e: calamine::XlsxError| ImportError::Workbook(e.to_string()))?;
    parse_workbook(&mut workbook)
}

/// Parse an xlsx trade-history report already loaded into memory.
pub fn parse_report_bytes(bytes: &[u8]) -> Result<ImportOutcome, ImportError> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| ImportError::Workbook(e.to_string()))?;
    parse_workbook(&mut workbook)
}

fn parse_workbook<R>(workbook: &mut Xlsx<R>) -> Result<ImportOutcome, ImportError>
where
    R: std::io::Read + std::io::Seek,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Workbook("no sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    parse_rows(&rows)
}

/// Pure core over the cell grid; the tests drive this directly.
pub(crate) fn parse_rows(rows: &[Vec<Data>]) -> Result<ImportOutcome, ImportError> {
    let section_start = rows
        .iter()
        .position(|row| first_cell(row).eq_ignore_ascii_case("positions"))
        .ok_or(ImportError::NoPositionsSection)?;

    let section_end = rows
        .iter()
        .enumerate()
        .skip(section_start + 1)
        .find(|(_, row)| {
            let label = first_cell(row).to_lowercase();
            SECTION_TERMINATORS.iter().any(|t| label.contains(t))
        })
        .map(|(idx, _)| idx)
        .unwrap_or(rows.len());

    let section = &rows[section_start + 1..section_end];
    let (header_idx, columns) = locate_header(section)?;

    let mut outcome = ImportOutcome::default();
    for (offset, row) in section.iter().enumerate().skip(header_idx + 1) {
        let row_num = section_start + 1 + offset + 1; // 1-based sheet row
        match parse_row(row, &columns) {
            Ok(Some(trade)) => outcome.trades.push(trade),
            Ok(None) => {}
            Err(reason) => {
                log::warn!("Skipping workbook row {}: {}", row_num, reason);
                outcome.skipped.push(format!("Row {}: {}", row_num, reason));
            }
        }
    }

    if outcome.trades.is_empty() {
        return Err(ImportError::NoTrades);
    }
    Ok(outcome)
}

fn first_cell(row: &[Data]) -> String {
    row.first().map(data_str).unwrap_or_default()
}

/// Extract a display string from a cell.
fn data_str(d: &Data) -> String {
    match d {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Extract a numeric value from a cell, falling back to money-string parsing.
fn data_amount(d: &Data) -> Option<f64> {
    match d {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => fields::parse_amount(s),
        _ => None,
    }
}

fn find_column(row: &[Data], aliases: &[&str], claimed: &[usize]) -> Option<usize> {
    for alias in aliases {
        for (idx, cell) in row.iter().enumerate() {
            if claimed.contains(&idx) {
                continue;
            }
            if data_str(cell).to_lowercase().contains(alias) {
                return Some(idx);
            }
        }
    }
    None
}

/// Header row inside the Positions section: all four canonical columns must
/// be present.
fn locate_header(section: &[Vec<Data>]) -> Result<(usize, ColumnMap), ImportError> {
    let mut best_missing: Option<Vec<&str>> = None;

    for (idx, row) in section.iter().enumerate() {
        let mut claimed: Vec<usize> = Vec::new();
        let mut missing: Vec<&str> = Vec::new();
        let mut resolved: Vec<usize> = Vec::new();

        for (name, aliases) in [
            ("time", &TIME_ALIASES[..]),
            ("symbol", &SYMBOL_ALIASES[..]),
            ("type", &TYPE_ALIASES[..]),
            ("profit", &PROFIT_ALIASES[..]),
        ] {
            match find_column(row, aliases, &claimed) {
                Some(col) => {
                    claimed.push(col);
                    resolved.push(col);
                }
                None => missing.push(name),
            }
        }

        if missing.is_empty() {
            let comment = find_column(row, &["comment"], &claimed);
            return Ok((
                idx,
                ColumnMap {
                    time: resolved[0],
                    symbol: resolved[1],
                    trade_type: resolved[2],
                    profit: resolved[3],
                    comment,
                },
            ));
        }

        let better = best_missing
            .as_ref()
            .map(|prev| missing.len() < prev.len())
            .unwrap_or(true);
        if better {
            best_missing = Some(missing);
        }
    }

    match best_missing {
        Some(missing) if missing.len() == 1 => {
            Err(ImportError::MissingColumns(missing.join(", ")))
        }
        _ => Err(ImportError::NoPositionsSection),
    }
}

fn parse_row(row: &[Data], columns: &ColumnMap) -> Result<Option<Trade>, String> {
    let max_col = columns
        .time
        .max(columns.symbol)
        .max(columns.trade_type)
        .max(columns.profit);
    if row.len() <= max_col {
        return Ok(None);
    }

    let type_cell = data_str(&row[columns.trade_type]).to_lowercase();
    let comment_cell = columns
        .comment
        .and_then(|c| row.get(c))
        .map(data_str)
        .unwrap_or_default()
        .to_lowercase();
    if BALANCE_MARKERS
        .iter()
        .any(|m| type_cell.contains(m) || comment_cell.contains(m))
    {
        return Ok(None);
    }

    let trade_type = match type_cell.as_str() {
        "buy" => TradeType::Long,
        "sell" => TradeType::Short,
        _ => return Ok(None),
    };

    let symbol = data_str(&row[columns.symbol]);
    if symbol.is_empty() {
        return Ok(None);
    }

    let raw_time = data_str(&row[columns.time]);
    let (date, time) = fields::parse_timestamp(&raw_time)
        .ok_or_else(|| format!("Invalid position time: {}", raw_time))?;

    let pnl = data_amount(&row[columns.profit])
        .ok_or_else(|| format!("Invalid profit value: {}", data_str(&row[columns.profit])))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn f(v: f64) -> Data {
        Data::Float(v)
    }

    fn report_rows() -> Vec<Vec<Data>> {
        vec![
            vec![s("Trade History Report")],
            vec![s("Account:"), s("12345")],
            vec![s("Positions")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Volume"), s("Profit"), s("Comment")],
            vec![s("2024.02.01 10:15:00"), s("eurusd"), s("buy"), f(0.5), f(210.50), s("")],
            vec![s("2024.02.02 11:00:00"), s("gbpusd"), s("sell"), f(1.0), f(-75.25), s("")],
            vec![s("2024.02.03 09:00:00"), s(""), s("buy"), f(1.0), f(50.0), s("")],
            vec![s("2024.02.04 12:00:00"), s("usdjpy"), s("balance"), f(0.0), f(500.0), s("deposit")],
            vec![s("Orders")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Volume"), s("Price")],
        ]
    }

    #[test]
    fn parses_positions_section_only() {
        let outcome = parse_rows(&report_rows()).unwrap();
        assert_eq!(outcome.trades.len(), 2);

        let first = &outcome.trades[0];
        assert_eq!(first.pair, "EURUSD");
        assert_eq!(first.trade_type, Some(TradeType::Long));
        assert_eq!(first.pnl, 210.50);
        assert_eq!(first.date.to_string(), "2024-02-01");
        assert_eq!(first.time.unwrap().to_string(), "10:15:00");

        assert_eq!(outcome.trades[1].pnl, -75.25);
    }

    #[test]
    fn missing_positions_label_is_an_error() {
        let rows = vec![
            vec![s("Trade History Report")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Profit")],
        ];
        assert!(matches!(
            parse_rows(&rows),
            Err(ImportError::NoPositionsSection)
        ));
    }

    #[test]
    fn header_must_appear_before_next_section() {
        // Positions section exists but its header sits below the Orders
        // terminator, so it is out of reach.
        let rows = vec![
            vec![s("Positions")],
            vec![s("Orders")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Profit")],
        ];
        assert!(matches!(
            parse_rows(&rows),
            Err(ImportError::NoPositionsSection)
        ));
    }

    #[test]
    fn incomplete_header_reports_missing_column() {
        let rows = vec![
            vec![s("Positions")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Volume")],
            vec![s("2024.02.01 10:15:00"), s("eurusd"), s("buy"), f(0.5)],
        ];
        match parse_rows(&rows) {
            Err(ImportError::MissingColumns(missing)) => assert_eq!(missing, "profit"),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn balance_rows_by_comment_are_excluded() {
        let mut rows = report_rows();
        rows.insert(
            8,
            vec![
                s("2024.02.05 16:30:00"),
                s("eurusd"),
                s("buy"),
                f(1.0),
                f(100.0),
                s("Withdrawal adjustment"),
            ],
        );
        let outcome = parse_rows(&rows).unwrap();
        assert_eq!(outcome.trades.len(), 2);
    }

    #[test]
    fn string_profit_cells_parse_with_mixed_separators() {
        let rows = vec![
            vec![s("Positions")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Profit")],
            vec![s("2024.02.01 10:15:00"), s("xauusd"), s("sell"), s("1 234,56")],
        ];
        let outcome = parse_rows(&rows).unwrap();
        assert_eq!(outcome.trades[0].pnl, 1234.56);
    }

    #[test]
    fn zero_surviving_rows_is_an_error() {
        let rows = vec![
            vec![s("Positions")],
            vec![s("Time"), s("Symbol"), s("Type"), s("Profit")],
            vec![s("2024.02.01 10:15:00"), s("eurusd"), s("buy"), f(0.0)],
        ];
        assert!(matches!(parse_rows(&rows), Err(ImportError::NoTrades)));
    }
}
