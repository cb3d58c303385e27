use crate::cache::ScheduleCache;
use crate::error::{HorariosError, HorariosResult};
use crate::export::{self, ExportFormat};
use crate::types::{FilterMode, ParseResult, ShiftCode, ViewState};
use crate::view::{self, format_date_label, ViewModel};
use crate::workbook::WorkbookParser;
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::{Path, PathBuf};

/// Width of one rendered shift cell
const CELL_WIDTH: usize = 6;

/// Load the schedule to work on: an explicit input file, else the cache.
///
/// `.xlsx` inputs are parsed, `.json` may be an export or a parse result,
/// `.csv` must be in the export layout.
pub fn load_schedule(
    input: Option<&Path>,
    cache: &dyn ScheduleCache,
    parser: &WorkbookParser,
) -> HorariosResult<ParseResult> {
    let Some(path) = input else {
        return cache.load()?.ok_or_else(|| {
            HorariosError::Validation(
                "No schedule loaded yet. Run 'horarios parse <file.xlsx>' first".to_string(),
            )
        });
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => parser.parse_path(path, None),
        "json" => export::from_json(&fs::read_to_string(path)?),
        "csv" => Ok(ParseResult {
            records: export::from_csv(&fs::read_to_string(path)?)?,
            ..ParseResult::default()
        }),
        other => Err(HorariosError::Validation(format!(
            "Unsupported input '{}': expected .xlsx, .json or .csv",
            if other.is_empty() { path.display().to_string() } else { other.to_string() }
        ))),
    }
}

/// Execute the parse command
pub fn parse(
    file: PathBuf,
    sheet: Option<String>,
    no_cache: bool,
    cache: &dyn ScheduleCache,
    parser: &WorkbookParser,
) -> HorariosResult<ParseResult> {
    println!("{}", "🗓️  Horarios - Parsing workbook".bold().green());
    println!("   File: {}", file.display());
    if let Some(ref s) = sheet {
        println!("   Sheet: {}", s.bright_yellow().bold());
    }
    println!();

    let result = parser.parse_path(&file, sheet.as_deref())?;
    let dates = view::collect_date_keys(&result.records);

    println!("{}", "✅ Parseado OK".bold().green());
    println!("   Sheet:   {}", result.sheet_name.bright_blue().bold());
    println!("   Sheets:  {}", result.available_sheets.join(", "));
    println!("   People:  {}", result.records.len());
    println!("   Dates:   {}", dates.len());
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!("   Range:   {} → {}", first, last);
    }
    println!();

    if no_cache {
        println!("{}", "📋 --no-cache: result not stored".yellow());
    } else {
        cache.save(&result)?;
        println!("{}", "💾 Schedule cached for show/companions/export".cyan());
    }

    Ok(result)
}

/// Execute the sheets command
pub fn sheets(file: PathBuf, parser: &WorkbookParser) -> HorariosResult<Vec<String>> {
    let bytes = fs::read(&file)?;
    let names = parser.sheet_names(&bytes)?;
    let selected = parser.default_sheet(&names).ok();

    println!("{}", "📑 Sheets".bold().green());
    for name in &names {
        if Some(name) == selected.as_ref() {
            println!("   {} {}", "▶".green(), name.bright_blue().bold());
        } else {
            println!("     {}", name);
        }
    }
    Ok(names)
}

/// Execute the show command
pub fn show(
    input: Option<PathBuf>,
    search: String,
    filter: FilterMode,
    cache: &dyn ScheduleCache,
    parser: &WorkbookParser,
) -> HorariosResult<ViewModel> {
    let schedule = load_schedule(input.as_deref(), cache, parser)?;
    let view = view::build_view(&schedule.records, &ViewState::new(search, filter));

    println!("{}", "🗓️  Horarios".bold().green());
    if !schedule.sheet_name.is_empty() {
        println!("   Sheet: {}", schedule.sheet_name);
    }
    println!("   Filter: {}", filter.label());
    if !view.search.trim().is_empty() {
        println!("   Search: {}", view.search.bright_yellow());
    }
    println!();

    if view.groups.is_empty() {
        println!("{}", "No matching people".yellow());
        return Ok(view);
    }

    print!("{}", render_view(&view));
    Ok(view)
}

/// Plain-layout rendering of a view model, one block per subgroup
fn render_view(view: &ViewModel) -> String {
    let name_width = view
        .groups
        .iter()
        .flat_map(|g| g.rows.iter().map(|r| r.name.chars().count()))
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = String::new();
    let header: String = view
        .dates
        .iter()
        .map(|d| pad(&short_label(d), CELL_WIDTH + 4))
        .collect();

    for group in &view.groups {
        out.push_str(&format!(
            "{} {}\n",
            group.label.bold(),
            format!("({} personas)", group.rows.len()).dimmed()
        ));
        out.push_str(&format!("   {}  {}\n", pad("", name_width), header.dimmed()));
        for row in &group.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| {
                    let text = pad(&cell.display, CELL_WIDTH + 4);
                    if cell.visible && !cell.shift_code.is_empty() {
                        styled(&text, cell.style).to_string()
                    } else {
                        text.dimmed().to_string()
                    }
                })
                .collect();
            out.push_str(&format!("   {}  {}\n", pad(&row.name, name_width), cells.join("")));
        }
        out.push('\n');
    }
    out
}

fn short_label(date: &str) -> String {
    // "dom, 01/02" is wider than a cell; keep the day/month part for headers
    let label = format_date_label(date);
    match label.split_once(", ") {
        Some((_, dm)) => dm.to_string(),
        None => label,
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

fn styled(text: &str, code: ShiftCode) -> ColoredString {
    let (r, g, b) = code.color();
    if code.is_known() {
        text.truecolor(r, g, b).bold()
    } else {
        text.truecolor(r, g, b)
    }
}

/// Execute the companions command
pub fn companions(
    input: Option<PathBuf>,
    date: String,
    name: String,
    subgroup: Option<String>,
    cache: &dyn ScheduleCache,
    parser: &WorkbookParser,
) -> HorariosResult<Vec<String>> {
    let schedule = load_schedule(input.as_deref(), cache, parser)?;

    let person = schedule
        .records
        .iter()
        .find(|r| r.name == name && subgroup.as_ref().map_or(true, |s| &r.subgroup == s))
        .ok_or_else(|| HorariosError::Validation(format!("Person '{}' not found", name)))?;

    let Some(selected) = view::select_cell(person, &date, FilterMode::All) else {
        println!(
            "{} {} has no shift on {}",
            "ℹ️ ".yellow(),
            person.name.bold(),
            format_date_label(&date)
        );
        return Ok(Vec::new());
    };

    let found = view::companions(&schedule.records, &selected);

    println!(
        "{}",
        format!("👥 Compañeros en tu turno ({})", selected.shift_code)
            .bold()
            .green()
    );
    println!(
        "   {} · {}",
        selected.subgroup,
        format_date_label(&selected.date)
    );
    println!("   Turno: {}\n", styled(&selected.shift_code, ShiftCode::classify(&selected.shift_code)));

    if found.is_empty() {
        println!("   {}", "No hay compañeros en este turno.".dimmed());
    } else {
        for companion in &found {
            println!("   • {} {}", companion.name.bold(), companion.subgroup.dimmed());
        }
    }

    Ok(found.into_iter().map(|r| r.name.clone()).collect())
}

/// Execute the export command
///
/// Always exports every loaded record, independent of any filter.
pub fn export(
    input: Option<PathBuf>,
    format: ExportFormat,
    output: Option<PathBuf>,
    cache: &dyn ScheduleCache,
    parser: &WorkbookParser,
) -> HorariosResult<Option<PathBuf>> {
    let schedule = load_schedule(input.as_deref(), cache, parser)?;

    if schedule.is_empty() {
        println!("{}", "⚠️  Nothing to export: no records loaded".yellow());
        return Ok(None);
    }

    let output = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
    let body = format.encode(&schedule.records)?;
    fs::write(&output, body)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Records: {}", schedule.records.len());
    println!("   File:    {}", output.display());

    Ok(Some(output))
}
