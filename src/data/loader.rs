use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::{Column, Holdings, Institution, TitleDataset, TitleRecord};
use crate::error::LoadError;

/// Columns present in the processed CSV that nothing downstream reads.
pub const DROPPED_COLUMNS: [&str; 6] = [
    "oa",
    "discontinued",
    "upload_date",
    "authors",
    "sub_discipline",
    "link",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the processed title CSV from disk.
pub fn load_csv(path: &Path) -> Result<TitleDataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(file)?;
    log::info!(
        "Loaded {} titles from {} (upload years {}..={})",
        dataset.len(),
        path.display(),
        dataset.min_year,
        dataset.max_year
    );
    Ok(dataset)
}

/// Parse the processed title CSV from any reader.
///
/// Layout: header row, one title per row. Identifier-like fields (`doi`,
/// `isbn`, `eisbn`) stay text so leading zeros survive; holding counts,
/// flags and `print_pubdate` are integers; `TRLN_dup_pct` is a float in
/// `[0, 1]`. `upload_date` is reduced to `upload_year` and dropped together
/// with the other [`DROPPED_COLUMNS`]. Columns not named here are carried
/// through untouched.
pub fn read_csv<R: Read>(reader: R) -> Result<TitleDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_no + 1;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let invalid = |idx: usize, reason: &'static str| LoadError::InvalidValue {
            row,
            column: headers[idx].clone(),
            value: cell(idx).to_string(),
            reason,
        };

        let mut holdings = Holdings::default();
        for &(inst, print_idx, online_idx, flag_idx) in &index.holdings {
            let holding = holdings.get_mut(inst);
            holding.print = parse_count(cell(print_idx)).map_err(|r| invalid(print_idx, r))?;
            holding.online = parse_count(cell(online_idx)).map_err(|r| invalid(online_idx, r))?;
            holding.duplicate = parse_flag(cell(flag_idx)).map_err(|r| invalid(flag_idx, r))?;
        }

        records.push(TitleRecord {
            doi: cell(index.doi).to_string(),
            module: cell(index.module).to_string(),
            press: cell(index.press).to_string(),
            print_pubdate: parse_int(cell(index.print_pubdate))
                .map_err(|r| invalid(index.print_pubdate, r))?,
            isbn: cell(index.isbn).to_string(),
            eisbn: cell(index.eisbn).to_string(),
            upload_year: parse_year(cell(index.upload_date))
                .map_err(|r| invalid(index.upload_date, r))?,
            holdings,
            trln_dup_flag: parse_flag(cell(index.trln_dup_flag))
                .map_err(|r| invalid(index.trln_dup_flag, r))?,
            trln_dup_pct: parse_pct(cell(index.trln_dup_pct))
                .map_err(|r| invalid(index.trln_dup_pct, r))?,
            extra: index.extra.iter().map(|&i| cell(i).to_string()).collect(),
        });
    }

    let extra_columns = index.extra.iter().map(|&i| headers[i].clone()).collect();
    TitleDataset::new(records, index.columns, extra_columns).ok_or(LoadError::Empty)
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

struct ColumnIndex {
    doi: usize,
    upload_date: usize,
    module: usize,
    press: usize,
    print_pubdate: usize,
    isbn: usize,
    eisbn: usize,
    /// (institution, print, online, dup flag)
    holdings: Vec<(Institution, usize, usize, usize)>,
    trln_dup_flag: usize,
    trln_dup_pct: usize,
    /// Pass-through columns, in header order.
    extra: Vec<usize>,
    /// Retained columns in output order.
    columns: Vec<Column>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        for name in DROPPED_COLUMNS {
            find(name)?;
        }

        let holdings = Institution::ALL
            .iter()
            .map(|&inst| {
                Ok((
                    inst,
                    find(inst.print_column())?,
                    find(inst.online_column())?,
                    find(inst.dup_flag_column())?,
                ))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        let mut index = ColumnIndex {
            doi: find("doi")?,
            upload_date: find("upload_date")?,
            module: find("module")?,
            press: find("press")?,
            print_pubdate: find("print_pubdate")?,
            isbn: find("isbn")?,
            eisbn: find("eisbn")?,
            holdings,
            trln_dup_flag: find("TRLN_dup_flag")?,
            trln_dup_pct: find("TRLN_dup_pct")?,
            extra: Vec::new(),
            columns: Vec::new(),
        };

        for (i, name) in headers.iter().enumerate() {
            if DROPPED_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            // First occurrence wins for repeated headers.
            if headers[..i].contains(name) {
                continue;
            }
            let column = match index.known_column(i) {
                Some(column) => column,
                None => {
                    index.extra.push(i);
                    Column::Extra(index.extra.len() - 1)
                }
            };
            index.columns.push(column);
        }
        index.columns.push(Column::UploadYear);

        Ok(index)
    }

    fn known_column(&self, i: usize) -> Option<Column> {
        let column = match i {
            _ if i == self.doi => Column::Doi,
            _ if i == self.module => Column::Module,
            _ if i == self.press => Column::Press,
            _ if i == self.print_pubdate => Column::PrintPubdate,
            _ if i == self.isbn => Column::Isbn,
            _ if i == self.eisbn => Column::Eisbn,
            _ if i == self.trln_dup_flag => Column::TrlnDupFlag,
            _ if i == self.trln_dup_pct => Column::TrlnDupPct,
            _ => {
                return self.holdings.iter().find_map(|&(inst, p, o, f)| {
                    if i == p {
                        Some(Column::Print(inst))
                    } else if i == o {
                        Some(Column::Online(inst))
                    } else if i == f {
                        Some(Column::DupFlag(inst))
                    } else {
                        None
                    }
                });
            }
        };
        Some(column)
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Integer cell; integral floats such as `2012.0` are accepted.
fn parse_int(s: &str) -> Result<i32, &'static str> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i32>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(f as i32),
        _ => Err("is not an integer"),
    }
}

fn parse_count(s: &str) -> Result<u32, &'static str> {
    let n = parse_int(s)?;
    u32::try_from(n).map_err(|_| "is not a non-negative count")
}

fn parse_flag(s: &str) -> Result<bool, &'static str> {
    match parse_int(s) {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        _ => Err("is not a 0/1 flag"),
    }
}

fn parse_pct(s: &str) -> Result<f64, &'static str> {
    match s.trim().parse::<f64>() {
        Ok(f) if (0.0..=1.0).contains(&f) => Ok(f),
        Ok(_) => Err("is outside [0, 1]"),
        Err(_) => Err("is not a number"),
    }
}

/// Calendar year of an ISO-8601 date or timestamp.
fn parse_year(s: &str) -> Result<i32, &'static str> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.year());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.year());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.year())
        .map_err(|_| "is not an ISO-8601 date")
}
