//! Workbook → ParseResult integration tests against real .xlsx files

mod common;

use horarios::error::HorariosError;
use horarios::types::ShiftRecord;
use horarios::workbook::{ParserConfig, WorkbookParser};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HAPPY PATH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_workbook() {
    let result = WorkbookParser::default()
        .parse_bytes(&common::scenario_bytes(), None)
        .unwrap();

    assert_eq!(result.sheet_name, "OPS FEB");
    assert_eq!(result.available_sheets, vec!["OPS FEB".to_string()]);
    assert_eq!(
        result.records,
        vec![
            ShiftRecord::new("OPS", "Ana")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-02", "PM"),
            ShiftRecord::new("OPS", "Luis")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-02", ""),
        ]
    );
}

#[test]
fn test_parse_from_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("turnos.xlsx");
    std::fs::write(&path, common::scenario_bytes()).unwrap();

    let result = WorkbookParser::default().parse_path(&path, None).unwrap();
    assert_eq!(result.records.len(), 2);
}

#[test]
fn test_date_formatted_and_serial_headers() {
    let result = WorkbookParser::default()
        .parse_bytes(&common::dated_header_bytes(), None)
        .unwrap();

    assert_eq!(result.records.len(), 1);
    let ana = &result.records[0];
    let keys: Vec<_> = ana.shifts.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["2026-02-01", "2026-02-02", "2026-02-03", "2026-02-04"]
    );
    assert_eq!(ana.shift_on("2026-02-02"), "LIBRE");
    assert_eq!(ana.shift_on("2026-02-04"), "FULL");
}

// ═══════════════════════════════════════════════════════════════════════════
// SHEET SELECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_preferred_sheet_wins_over_first() {
    let other: &[&[&str]] = &[&["", "", "2026-01-01"], &[], &["X", "Otro", "am"]];
    let bytes = common::workbook_bytes(&[("Enero", other), ("OPS FEB", common::SCENARIO)]);

    let result = WorkbookParser::default().parse_bytes(&bytes, None).unwrap();
    assert_eq!(result.sheet_name, "OPS FEB");
    assert_eq!(
        result.available_sheets,
        vec!["Enero".to_string(), "OPS FEB".to_string()]
    );
    assert_eq!(result.records[0].name, "Ana");
}

#[test]
fn test_first_sheet_without_preferred() {
    let other: &[&[&str]] = &[&["", "", "2026-01-01"], &[], &["X", "Otro", "am"]];
    let bytes = common::workbook_bytes(&[("Enero", other), ("Febrero", common::SCENARIO)]);

    let result = WorkbookParser::default().parse_bytes(&bytes, None).unwrap();
    assert_eq!(result.sheet_name, "Enero");
    assert_eq!(result.records[0].name, "Otro");
}

#[test]
fn test_configured_preferred_sheet() {
    let other: &[&[&str]] = &[&["", "", "2026-01-01"], &[], &["X", "Otro", "am"]];
    let bytes = common::workbook_bytes(&[("OPS FEB", common::SCENARIO), ("Enero", other)]);

    let parser = WorkbookParser::new(ParserConfig {
        preferred_sheet: "Enero".to_string(),
    });
    assert_eq!(parser.parse_bytes(&bytes, None).unwrap().sheet_name, "Enero");
}

#[test]
fn test_requested_sheet() {
    let other: &[&[&str]] = &[&["", "", "2026-01-01"], &[], &["X", "Otro", "am"]];
    let bytes = common::workbook_bytes(&[("OPS FEB", common::SCENARIO), ("Enero", other)]);

    let result = WorkbookParser::default()
        .parse_bytes(&bytes, Some("Enero"))
        .unwrap();
    assert_eq!(result.sheet_name, "Enero");

    let err = WorkbookParser::default()
        .parse_bytes(&bytes, Some("Marzo"))
        .unwrap_err();
    assert!(matches!(err, HorariosError::SheetNotFound(_)));
}

#[test]
fn test_sheet_names() {
    let bytes = common::workbook_bytes(&[("A", common::SCENARIO), ("B", common::SCENARIO)]);
    let names = WorkbookParser::default().sheet_names(&bytes).unwrap();
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_two_row_sheet_is_invalid_format() {
    let rows: &[&[&str]] = &[&["", "", "2026-02-01"], &["OPS", "Ana", "am"]];
    let bytes = common::workbook_bytes(&[("OPS FEB", rows)]);

    let err = WorkbookParser::default().parse_bytes(&bytes, None).unwrap_err();
    assert!(matches!(err, HorariosError::InvalidFormat(_)));
    assert_eq!(err.to_string(), "Formato inválido");
}

#[test]
fn test_empty_sheet_is_invalid_format() {
    let empty: &[&[&str]] = &[];
    let bytes = common::workbook_bytes(&[("OPS FEB", empty)]);
    let err = WorkbookParser::default().parse_bytes(&bytes, None).unwrap_err();
    assert!(matches!(err, HorariosError::InvalidFormat(_)));
}

#[test]
fn test_not_a_workbook_is_decode_failure() {
    let err = WorkbookParser::default()
        .parse_bytes(b"PK\x03\x04 truncated", None)
        .unwrap_err();
    assert!(matches!(err, HorariosError::Decode(_)));
}
