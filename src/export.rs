//! Export encodings of the loaded records (always the full list, never the filtered view)

use crate::error::{HorariosError, HorariosResult};
use crate::types::{ParseResult, ShiftRecord};
use crate::view::collect_date_keys;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::Deserialize;

pub const JSON_FILE_NAME: &str = "horarios.json";
pub const CSV_FILE_NAME: &str = "horarios.csv";

const CSV_SUBGROUP_HEADER: &str = "Subcargo";
const CSV_NAME_HEADER: &str = "Nombre";

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILE_NAME,
            ExportFormat::Csv => CSV_FILE_NAME,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn encode(self, records: &[ShiftRecord]) -> HorariosResult<String> {
        match self {
            ExportFormat::Json => to_json(records),
            ExportFormat::Csv => to_csv(records),
        }
    }
}

/// Structured encoding: the record list, pretty-printed, keys in stable order
pub fn to_json(records: &[ShiftRecord]) -> HorariosResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Tabular-text encoding.
///
/// Header `Subcargo, Nombre, <sorted date keys>`, one row per record, every
/// field quoted with embedded quotes doubled, rows joined by `\n`.
pub fn to_csv(records: &[ShiftRecord]) -> HorariosResult<String> {
    let dates = collect_date_keys(records);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec![CSV_SUBGROUP_HEADER, CSV_NAME_HEADER];
    header.extend(dates.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.subgroup.as_str(), record.name.as_str()];
        row.extend(dates.iter().map(|d| record.shift_on(d)));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HorariosError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| HorariosError::Validation(format!("CSV output is not UTF-8: {}", e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Read records back from the tabular-text encoding.
///
/// Column 0 is the subgroup, column 1 the name, the remaining header cells
/// are the date keys.
pub fn from_csv(text: &str) -> HorariosResult<Vec<ShiftRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let dates: Vec<String> = reader
        .headers()?
        .iter()
        .skip(2)
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = ShiftRecord::new(
            row.get(0).unwrap_or_default(),
            row.get(1).unwrap_or_default(),
        );
        for (idx, date) in dates.iter().enumerate() {
            record
                .shifts
                .insert(date.clone(), row.get(idx + 2).unwrap_or_default().to_string());
        }
        records.push(record);
    }
    Ok(records)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Result(ParseResult),
    Records(Vec<ShiftRecord>),
}

/// Read records from JSON: either a bare record list (the JSON export) or a
/// full parse result (the parse endpoint body / cache slot).
pub fn from_json(text: &str) -> HorariosResult<ParseResult> {
    let payload: JsonPayload = serde_json::from_str(text)?;
    Ok(match payload {
        JsonPayload::Result(result) => result,
        JsonPayload::Records(records) => ParseResult {
            records,
            ..ParseResult::default()
        },
    })
}
