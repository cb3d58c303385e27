//! Shared .xlsx fixtures for integration tests
#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

/// The reference roster: two dated columns, a blank sub-header, a trailing blank row
pub const SCENARIO: &[&[&str]] = &[
    &["", "", "2026-02-01", "2026-02-02"],
    &["", "", "", ""],
    &["OPS", "Ana", "am", "pm"],
    &["OPS", "Luis", "am", ""],
    &["", "", "", " "],
];

fn write_rows(worksheet: &mut Worksheet, rows: &[&[&str]]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(r as u32, c as u16, *value)
                .expect("write cell");
        }
    }
}

/// Build an in-memory workbook with one sheet per `(name, rows)` pair
pub fn workbook_bytes(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name");
        write_rows(worksheet, rows);
    }
    workbook.save_to_buffer().expect("xlsx buffer")
}

/// Scenario roster in a single sheet called `OPS FEB`
pub fn scenario_bytes() -> Vec<u8> {
    workbook_bytes(&[("OPS FEB", SCENARIO)])
}

/// Roster whose date header cells are real date-formatted cells, not text
pub fn dated_header_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("OPS FEB").expect("sheet name");

    for (offset, day) in [1u8, 2, 3].iter().enumerate() {
        let date = ExcelDateTime::from_ymd(2026, 2, *day).expect("date");
        worksheet
            .write_datetime_with_format(0, 2 + offset as u16, &date, &date_format)
            .expect("write date");
    }
    // Plain serial number, no date format
    worksheet.write_number(0, 5, 46057.0).expect("write serial");

    write_rows(
        worksheet,
        &[
            &[],
            &["Subcargo", "Nombre"],
            &["OPS", "Ana", "am", "libre", "vac", "full"],
        ],
    );
    workbook.save_to_buffer().expect("xlsx buffer")
}
