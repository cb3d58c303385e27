//! Horarios API Server binary
//!
//! Accepts .xlsx roster uploads and serves the parsed schedule.

use clap::Parser;
use horarios::api::{run_api_server, ApiConfig};
use horarios::normalizer::PREFERRED_SHEET;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "horarios-server")]
#[command(version)]
#[command(about = "Horarios API Server - parse shift roster workbooks over HTTP")]
#[command(long_about = r#"
Horarios API Server

Endpoints:
  - POST /api/parse-horarios - Parse an .xlsx upload (multipart field 'file',
                               optional field 'sheet')
  - GET  /api/horarios       - Last parsed schedule
  - GET  /api/horarios/view  - Grouped view (?search=&filter=&date=&shift=&subgroup=&name=)
  - GET  /api/export/json    - Download horarios.json
  - GET  /api/export/csv     - Download horarios.csv

Additional endpoints:
  - GET  /health             - Health check
  - GET  /version            - Server version info
  - GET  /                   - API documentation

Example usage:
  horarios-server                           # Start on localhost:8080
  horarios-server --host 0.0.0.0 --port 3000

  curl -F file=@turnos.xlsx http://localhost:8080/api/parse-horarios
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "HORARIOS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "HORARIOS_PORT")]
    port: u16,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "10", env = "HORARIOS_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Sheet parsed when the upload does not name one
    #[arg(long, default_value = PREFERRED_SHEET, env = "HORARIOS_SHEET")]
    preferred_sheet: String,

    /// Persist the last parsed schedule to this file (in-memory otherwise)
    #[arg(long, env = "HORARIOS_CACHE_FILE")]
    cache_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let max_upload_bytes = args
        .max_upload_mb
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("--max-upload-mb {} is too large", args.max_upload_mb))?;

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes,
        preferred_sheet: args.preferred_sheet,
        cache_file: args.cache_file,
    };

    run_api_server(config).await
}
