//! Horarios - shift roster parsing and viewing
//!
//! Turns an uploaded roster workbook (dates across row 1, one person per row
//! from row 3) into per-person shift records, and derives the grouped,
//! filtered views, companion lookups and exports built on them.
//!
//! # Example
//!
//! ```no_run
//! use horarios::types::{FilterMode, ViewState};
//! use horarios::view::build_view;
//! use horarios::workbook::WorkbookParser;
//! use std::path::Path;
//!
//! let result = WorkbookParser::default().parse_path(Path::new("turnos.xlsx"), None)?;
//! println!("Sheet: {} ({} people)", result.sheet_name, result.records.len());
//!
//! let view = build_view(&result.records, &ViewState::new("", FilterMode::VacFull));
//! for group in &view.groups {
//!     println!("{}: {} personas", group.label, group.rows.len());
//! }
//! # Ok::<(), horarios::error::HorariosError>(())
//! ```

pub mod api;
pub mod cache;
pub mod cli;
pub mod error;
pub mod export;
pub mod grid;
pub mod normalizer;
pub mod types;
pub mod view;
pub mod workbook;

// Re-export commonly used types
pub use error::{HorariosError, HorariosResult};
pub use types::{FilterMode, ParseResult, SelectedCell, ShiftRecord, ViewState};
