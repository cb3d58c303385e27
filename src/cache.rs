//! Persistent slot holding the last successful parse.
//!
//! One slot per store, fully overwritten on every save (last writer wins).

use crate::error::HorariosResult;
use crate::types::ParseResult;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Fixed, version-tagged storage key of the slot
pub const STORAGE_KEY: &str = "horarios:data:v1";

/// Store for the last [`ParseResult`], injected wherever it is needed
pub trait ScheduleCache: Send + Sync {
    /// `Ok(None)` when nothing usable is stored
    fn load(&self) -> HorariosResult<Option<ParseResult>>;

    fn save(&self, result: &ParseResult) -> HorariosResult<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<platform cache dir>/horarios/horarios-data-v1.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("horarios").join(storage_file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_file_name() -> String {
    format!("{}.json", STORAGE_KEY.replace(':', "-"))
}

impl ScheduleCache for FileCache {
    fn load(&self) -> HorariosResult<Option<ParseResult>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no cached schedule");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<ParseResult>(&content) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable cache slot");
                Ok(None)
            }
        }
    }

    fn save(&self, result: &ParseResult) -> HorariosResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write beside the slot then rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(result)?)?;
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            records = result.records.len(),
            "schedule cached"
        );
        Ok(())
    }
}

/// Process-local slot, used by the server when no cache file is configured
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RwLock<Option<ParseResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleCache for MemoryCache {
    fn load(&self) -> HorariosResult<Option<ParseResult>> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, result: &ParseResult) -> HorariosResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(result.clone());
        Ok(())
    }
}
