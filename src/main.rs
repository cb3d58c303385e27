use clap::{Parser, Subcommand};
use horarios::cache::FileCache;
use horarios::cli;
use horarios::error::HorariosError;
use horarios::export::ExportFormat;
use horarios::types::FilterMode;
use horarios::workbook::{ParserConfig, WorkbookParser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "horarios")]
#[command(about = "View, filter and export shift rosters parsed from .xlsx workbooks")]
#[command(long_about = "Horarios - shift roster viewer

Workbook layout: row 1 holds dates from column C on, row 2 is a sub-header,
every following row is [subgroup, name, shift per date...].

COMMANDS:
  parse       - Parse a workbook and cache the result
  sheets      - List the sheets of a workbook
  show        - Grouped view with search and shift filter
  companions  - Who shares a person's shift on a date
  export      - Write horarios.json or horarios.csv

EXAMPLES:
  horarios parse turnos.xlsx
  horarios show --filter vac-full
  horarios show --search ana
  horarios companions --date 2026-02-01 --name Ana
  horarios export --format csv")]
#[command(version)]
struct Cli {
    /// Cache file holding the last parsed schedule
    #[arg(long, global = true, env = "HORARIOS_CACHE_FILE")]
    cache_file: Option<PathBuf>,

    /// Sheet parsed when none is requested and the workbook has it
    #[arg(long, global = true, default_value = horarios::normalizer::PREFERRED_SHEET, env = "HORARIOS_SHEET")]
    preferred_sheet: String,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an .xlsx workbook and cache the schedule
    Parse {
        /// Path to the workbook (.xlsx)
        file: PathBuf,

        /// Sheet to parse (defaults to the preferred sheet, else the first)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Do not overwrite the cached schedule
        #[arg(long)]
        no_cache: bool,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Path to the workbook (.xlsx)
        file: PathBuf,
    },

    /// Show the schedule grouped by subgroup
    Show {
        /// Read from this file (.xlsx, .json or .csv) instead of the cache
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Shift filter
        #[arg(short, long, value_enum, default_value = "all")]
        filter: FilterMode,
    },

    /// List people sharing a person's shift on a date
    Companions {
        /// Date key (e.g. 2026-02-01)
        #[arg(short, long)]
        date: String,

        /// Person's name, exactly as in the roster
        #[arg(short, long)]
        name: String,

        /// Disambiguate people with the same name
        #[arg(long)]
        subgroup: Option<String>,

        /// Read from this file (.xlsx, .json or .csv) instead of the cache
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Export every loaded record as JSON or CSV
    Export {
        /// Output encoding
        #[arg(short, long, value_enum)]
        format: ExportFormat,

        /// Output path (defaults to horarios.json / horarios.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read from this file (.xlsx, .json or .csv) instead of the cache
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "horarios=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cache_path = cli
        .cache_file
        .or_else(FileCache::default_path)
        .ok_or_else(|| {
            HorariosError::Validation(
                "Cannot determine a cache directory; pass --cache-file".to_string(),
            )
        })?;
    let cache = FileCache::new(cache_path);
    let parser = WorkbookParser::new(ParserConfig {
        preferred_sheet: cli.preferred_sheet,
    });

    match cli.command {
        Commands::Parse {
            file,
            sheet,
            no_cache,
        } => cli::parse(file, sheet, no_cache, &cache, &parser).map(|_| ())?,

        Commands::Sheets { file } => cli::sheets(file, &parser).map(|_| ())?,

        Commands::Show {
            input,
            search,
            filter,
        } => cli::show(input, search, filter, &cache, &parser).map(|_| ())?,

        Commands::Companions {
            date,
            name,
            subgroup,
            input,
        } => cli::companions(input, date, name, subgroup, &cache, &parser).map(|_| ())?,

        Commands::Export {
            format,
            output,
            input,
        } => cli::export(input, format, output, &cache, &parser).map(|_| ())?,
    }

    Ok(())
}
