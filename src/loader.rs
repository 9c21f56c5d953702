// Input loading for delimited text and spreadsheet workbooks.
//
// Both loaders skip exactly one leading row before the column header row;
// the upstream export prepends a one-line banner above the real header.
use crate::errors::ReportError;
use crate::types::RawRow;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 4] = ["Route", "Revenue", "ASP", "Occupancy"];

/// Load the raw schedule table from `path`.
///
/// Dispatches on the file extension: `.csv` is read as delimited text,
/// anything else is handed to the workbook reader.
pub fn load_table(path: &str) -> Result<Vec<RawRow>, ReportError> {
    if path.trim().is_empty() {
        return Err(ReportError::MissingInput(
            "no input file supplied".to_string(),
        ));
    }
    let p = Path::new(path);
    if !p.exists() {
        return Err(ReportError::MissingInput(format!(
            "input file '{path}' not found"
        )));
    }
    if p.extension().and_then(|e| e.to_str()) == Some("csv") {
        load_csv(File::open(p)?)
    } else {
        load_workbook(p)
    }
}

/// Read a delimited table from any reader.
pub fn load_csv<R: Read>(input: R) -> Result<Vec<RawRow>, ReportError> {
    let mut buf = BufReader::new(input);
    // Banner row above the header.
    let mut skipped = String::new();
    buf.read_line(&mut skipped)?;

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(buf);
    let headers = rdr.headers()?.clone();
    require_columns(headers.iter())?;

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Read the first worksheet of an Excel workbook.
fn load_workbook(path: &Path) -> Result<Vec<RawRow>, ReportError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::MissingInput("workbook has no sheets".to_string()))??;

    let mut rows = range.rows().skip(1);
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| ReportError::MissingInput("workbook has no header row".to_string()))?
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    require_columns(header.iter().map(|h| h.as_str()))?;

    let idx = |name: &str| header.iter().position(|h| h == name);
    let route_i = idx("Route");
    let cancelled_i = idx("Cancelled");
    let revenue_i = idx("Revenue");
    let asp_i = idx("ASP");
    let occupancy_i = idx("Occupancy");

    let mut out = Vec::new();
    for row in rows {
        let cell = |i: Option<usize>| i.and_then(|i| row.get(i)).and_then(cell_text);
        out.push(RawRow {
            route: cell(route_i),
            cancelled: cell(cancelled_i),
            revenue: cell(revenue_i),
            asp: cell(asp_i),
            occupancy: cell(occupancy_i),
        });
    }
    Ok(out)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => {
            let s = other.to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        }
    }
}

/// Check the required columns are present, case-sensitive and exact.
fn require_columns<'a, I>(headers: I) -> Result<(), ReportError>
where
    I: Iterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.collect();
    for col in REQUIRED_COLUMNS {
        if !present.iter().any(|h| *h == col) {
            return Err(ReportError::missing_column(col));
        }
    }
    Ok(())
}
