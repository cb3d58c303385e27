//! Workbook decoding: .xlsx bytes → sheet list → grid → [`ParseResult`]

use crate::error::{HorariosError, HorariosResult};
use crate::grid::{grid_from_range, Grid};
use crate::normalizer::{self, PREFERRED_SHEET};
use crate::types::ParseResult;
use calamine::{Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

/// Parser settings
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Sheet chosen when the caller does not ask for one and it exists
    pub preferred_sheet: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            preferred_sheet: PREFERRED_SHEET.to_string(),
        }
    }
}

/// Decodes uploaded workbooks and runs the sheet normalizer on the chosen sheet
#[derive(Debug, Clone, Default)]
pub struct WorkbookParser {
    config: ParserConfig,
}

impl WorkbookParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an in-memory .xlsx upload
    pub fn parse_bytes(&self, bytes: &[u8], requested: Option<&str>) -> HorariosResult<ParseResult> {
        let mut workbook = open_bytes(bytes)?;
        self.parse_workbook(&mut workbook, requested)
    }

    /// Parse an .xlsx file on disk
    pub fn parse_path(&self, path: &Path, requested: Option<&str>) -> HorariosResult<ParseResult> {
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes, requested)
    }

    /// Sheet names of an upload, in workbook order
    pub fn sheet_names(&self, bytes: &[u8]) -> HorariosResult<Vec<String>> {
        Ok(open_bytes(bytes)?.sheet_names())
    }

    /// Which sheet would be parsed for `sheets` without an explicit request
    pub fn default_sheet(&self, sheets: &[String]) -> HorariosResult<String> {
        normalizer::select_sheet(sheets, None, &self.config.preferred_sheet)
    }

    fn parse_workbook<RS: Read + Seek>(
        &self,
        workbook: &mut Xlsx<RS>,
        requested: Option<&str>,
    ) -> HorariosResult<ParseResult> {
        let sheets = workbook.sheet_names();
        let sheet_name =
            normalizer::select_sheet(&sheets, requested, &self.config.preferred_sheet)?;
        debug!(sheet = %sheet_name, available = sheets.len(), "sheet selected");

        let grid = read_grid(workbook, &sheet_name)?;
        let result = normalizer::normalize_sheet(&grid, &sheet_name, &sheets)?;

        info!(
            sheet = %result.sheet_name,
            records = result.records.len(),
            "workbook parsed"
        );
        Ok(result)
    }
}

fn open_bytes(bytes: &[u8]) -> HorariosResult<Xlsx<Cursor<Vec<u8>>>> {
    Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| HorariosError::Decode(format!("Failed to read Excel data: {}", e)))
}

fn read_grid<RS: Read + Seek>(workbook: &mut Xlsx<RS>, sheet_name: &str) -> HorariosResult<Grid> {
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| HorariosError::Decode(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;
    Ok(grid_from_range(&range))
}
