//! View model builder: filtering, grouping and companion lookup over parsed records.
//!
//! Everything here is a pure function of the records and the [`ViewState`];
//! callers recompute on every change.
//!
//! Two predicates are kept apart:
//! - row inclusion: the name matches the search AND any date column passes the filter
//! - cell visibility: this cell's code passes the filter
//!
//! so an included row may still render most of its cells as placeholders.

use crate::types::{FilterMode, SelectedCell, ShiftCode, ShiftRecord, ViewState};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeSet;

/// Group label for records without a subgroup
pub const UNGROUPED_LABEL: &str = "Sin subcargo";

/// Rendered in place of empty or filtered-out cells
pub const PLACEHOLDER: &str = "—";

/// Union of date keys across all records, ascending.
///
/// Lexical order: correct for `YYYY-MM-DD` keys, best-effort for pass-through labels.
pub fn collect_date_keys(records: &[ShiftRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.shifts.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Case-insensitive substring match on the name; empty search matches all
pub fn name_matches(record: &ShiftRecord, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || record.name.to_lowercase().contains(&needle)
}

pub fn row_included(
    record: &ShiftRecord,
    dates: &[String],
    search: &str,
    filter: FilterMode,
) -> bool {
    if !name_matches(record, search) {
        return false;
    }
    filter == FilterMode::All || dates.iter().any(|d| filter.matches(record.shift_on(d)))
}

pub fn cell_visible(code: &str, filter: FilterMode) -> bool {
    filter.matches(code)
}

/// Stable partition by subgroup, groups in first-seen order
pub fn group_by_subgroup<'a, I>(records: I) -> Vec<(String, Vec<&'a ShiftRecord>)>
where
    I: IntoIterator<Item = &'a ShiftRecord>,
{
    let mut groups: Vec<(String, Vec<&'a ShiftRecord>)> = Vec::new();
    for record in records {
        let label = if record.subgroup.is_empty() {
            UNGROUPED_LABEL
        } else {
            record.subgroup.as_str()
        };
        match groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((label.to_string(), vec![record])),
        }
    }
    groups
}

/// Everyone else in the selected person's subgroup with the same shift that day.
///
/// The selected person is excluded by name, so namesakes are excluded too.
pub fn companions<'a>(records: &'a [ShiftRecord], selected: &SelectedCell) -> Vec<&'a ShiftRecord> {
    records
        .iter()
        .filter(|r| r.subgroup == selected.subgroup)
        .filter(|r| r.name != selected.name)
        .filter(|r| r.shifts.get(&selected.date) == Some(&selected.shift_code))
        .collect()
}

/// Selection for a cell; only non-empty cells visible under `filter` are selectable
pub fn select_cell(record: &ShiftRecord, date: &str, filter: FilterMode) -> Option<SelectedCell> {
    let code = record.shift_on(date);
    if code.is_empty() || !cell_visible(code, filter) {
        return None;
    }
    Some(SelectedCell {
        date: date.to_string(),
        shift_code: code.to_string(),
        subgroup: record.subgroup.clone(),
        name: record.name.clone(),
    })
}

/// Short Spanish label (`dom, 01/02`) for calendar dates; other keys verbatim
pub fn format_date_label(key: &str) -> String {
    match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        Ok(date) => format!(
            "{}, {:02}/{:02}",
            weekday_short_es(date.weekday()),
            date.day(),
            date.month()
        ),
        Err(_) => key.to_string(),
    }
}

fn weekday_short_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mié",
        Weekday::Thu => "jue",
        Weekday::Fri => "vie",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

//==============================================================================
// Rendered view
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub date: String,
    pub shift_code: String,
    pub visible: bool,
    pub selectable: bool,
    /// Code when visible and non-empty, otherwise [`PLACEHOLDER`]
    pub display: String,
    #[serde(skip)]
    pub style: ShiftCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub subgroup: String,
    pub name: String,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub label: String,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub dates: Vec<String>,
    pub filter: FilterMode,
    pub search: String,
    pub groups: Vec<GroupView>,
    pub companions: Vec<ShiftRecord>,
}

impl ViewModel {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Build the whole derived view for the current state
pub fn build_view(records: &[ShiftRecord], state: &ViewState) -> ViewModel {
    let dates = collect_date_keys(records);
    let included = records
        .iter()
        .filter(|r| row_included(r, &dates, &state.search, state.filter));

    let groups = group_by_subgroup(included)
        .into_iter()
        .map(|(label, rows)| GroupView {
            label,
            rows: rows
                .into_iter()
                .map(|record| render_row(record, &dates, state.filter))
                .collect(),
        })
        .collect();

    let companions = state
        .selected
        .as_ref()
        .map(|sel| companions(records, sel).into_iter().cloned().collect())
        .unwrap_or_default();

    ViewModel {
        dates,
        filter: state.filter,
        search: state.search.clone(),
        groups,
        companions,
    }
}

fn render_row(record: &ShiftRecord, dates: &[String], filter: FilterMode) -> RowView {
    let cells = dates
        .iter()
        .map(|date| {
            let code = record.shift_on(date);
            let visible = cell_visible(code, filter);
            let display = if visible && !code.is_empty() {
                code.to_string()
            } else {
                PLACEHOLDER.to_string()
            };
            CellView {
                date: date.clone(),
                shift_code: code.to_string(),
                visible,
                selectable: visible && !code.is_empty(),
                display,
                style: ShiftCode::classify(code),
            }
        })
        .collect();

    RowView {
        subgroup: record.subgroup.clone(),
        name: record.name.clone(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roster() -> Vec<ShiftRecord> {
        vec![
            ShiftRecord::new("OPS", "Ana")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-02", "PM"),
            ShiftRecord::new("SUP", "Berta")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-02", "LIBRE"),
            ShiftRecord::new("OPS", "Luis")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-02", ""),
            ShiftRecord::new("", "Carla")
                .with_shift("2026-02-01", "VAC")
                .with_shift("2026-02-02", "FULL"),
        ]
    }

    #[test]
    fn test_collect_date_keys_sorted_union() {
        let records = vec![
            ShiftRecord::new("A", "x").with_shift("2026-02-03", "AM"),
            ShiftRecord::new("A", "y")
                .with_shift("2026-02-01", "AM")
                .with_shift("2026-02-03", "PM"),
        ];
        assert_eq!(collect_date_keys(&records), vec!["2026-02-01", "2026-02-03"]);
        assert!(collect_date_keys(&[]).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let record = ShiftRecord::new("OPS", "María José");
        assert!(name_matches(&record, ""));
        assert!(name_matches(&record, "  "));
        assert!(name_matches(&record, "maría"));
        assert!(name_matches(&record, " JOSÉ "));
        assert!(!name_matches(&record, "pedro"));
    }

    #[test]
    fn test_row_inclusion_any_column() {
        let records = roster();
        let dates = collect_date_keys(&records);
        assert!(row_included(&records[1], &dates, "", FilterMode::Libre));
        assert!(!row_included(&records[0], &dates, "", FilterMode::Libre));
        assert!(row_included(&records[3], &dates, "", FilterMode::VacFull));
        assert!(!row_included(&records[3], &dates, "ana", FilterMode::All));
        // Empty cells never satisfy a specific filter
        assert!(!row_included(&records[2], &dates, "", FilterMode::Pm));
    }

    #[test]
    fn test_cell_visibility_all_is_total() {
        for record in roster() {
            for code in record.shifts.values() {
                assert!(cell_visible(code, FilterMode::All));
            }
        }
    }

    #[test]
    fn test_vac_full_filter_includes_row_but_hides_am_cells() {
        let records = vec![ShiftRecord::new("OPS", "Ana")
            .with_shift("2026-02-01", "AM")
            .with_shift("2026-02-02", "VAC")
            .with_shift("2026-02-03", "AM")];
        let view = build_view(&records, &ViewState::new("", FilterMode::VacFull));

        assert_eq!(view.groups.len(), 1);
        let row = &view.groups[0].rows[0];
        assert_eq!(row.name, "Ana");
        let displays: Vec<_> = row.cells.iter().map(|c| c.display.as_str()).collect();
        assert_eq!(displays, vec![PLACEHOLDER, "VAC", PLACEHOLDER]);
        assert!(!row.cells[0].visible);
        assert!(row.cells[1].visible);
        assert!(row.cells[1].selectable);
    }

    #[test]
    fn test_grouping_first_seen_order_and_stable_rows() {
        let records = roster();
        let groups = group_by_subgroup(&records);
        let labels: Vec<_> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["OPS", "SUP", UNGROUPED_LABEL]);
        let ops: Vec<_> = groups[0].1.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(ops, vec!["Ana", "Luis"]);
    }

    #[test]
    fn test_companions_same_subgroup_same_shift() {
        let records = roster();
        let selected = select_cell(&records[0], "2026-02-01", FilterMode::All).unwrap();
        let names: Vec<_> = companions(&records, &selected)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        // Berta has AM too but is in another subgroup
        assert_eq!(names, vec!["Luis"]);
    }

    #[test]
    fn test_companions_exclude_namesakes() {
        let records = vec![
            ShiftRecord::new("OPS", "Ana").with_shift("2026-02-01", "AM"),
            ShiftRecord::new("OPS", "Ana").with_shift("2026-02-01", "AM"),
            ShiftRecord::new("OPS", "Eva").with_shift("2026-02-01", "AM"),
        ];
        let selected = select_cell(&records[0], "2026-02-01", FilterMode::All).unwrap();
        let found = companions(&records, &selected);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Eva");
    }

    #[test]
    fn test_select_cell_rules() {
        let records = roster();
        assert!(select_cell(&records[2], "2026-02-02", FilterMode::All).is_none());
        assert!(select_cell(&records[0], "2026-02-01", FilterMode::Pm).is_none());
        let sel = select_cell(&records[0], "2026-02-02", FilterMode::Pm).unwrap();
        assert_eq!(sel.shift_code, "PM");
        assert_eq!(sel.subgroup, "OPS");
    }

    #[test]
    fn test_build_view_with_selection() {
        let records = roster();
        let selected = select_cell(&records[2], "2026-02-01", FilterMode::All).unwrap();
        let state = ViewState::new("", FilterMode::All).with_selection(selected);
        let view = build_view(&records, &state);

        assert_eq!(view.row_count(), 4);
        assert_eq!(view.dates, vec!["2026-02-01", "2026-02-02"]);
        assert_eq!(view.companions.len(), 1);
        assert_eq!(view.companions[0].name, "Ana");
    }

    #[test]
    fn test_build_view_search_and_empty_placeholder() {
        let view = build_view(&roster(), &ViewState::new("lu", FilterMode::All));
        assert_eq!(view.row_count(), 1);
        let cell = &view.groups[0].rows[0].cells[1];
        assert!(cell.visible);
        assert!(!cell.selectable);
        assert_eq!(cell.display, PLACEHOLDER);
    }

    #[test]
    fn test_format_date_label() {
        assert_eq!(format_date_label("2026-02-01"), "dom, 01/02");
        assert_eq!(format_date_label("2026-02-04"), "mié, 04/02");
        assert_eq!(format_date_label("Lunes 1"), "Lunes 1");
    }
}
