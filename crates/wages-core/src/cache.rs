use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use wages_parser::ReportLayout;

use crate::error::Result;
use crate::loader::{hash_source, load_from_bytes, read_source, LoadedTable};

/// Holds the most recently parsed table and re-parses only when the source bytes change.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    layout: ReportLayout,
    current: Option<Arc<LoadedTable>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>, layout: ReportLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            current: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the table for the current source contents.
    ///
    /// The source is read on every call; parsing is skipped when its hash matches the
    /// cached table. On failure the previously cached table is kept.
    pub fn get(&mut self) -> Result<Arc<LoadedTable>> {
        let bytes = read_source(&self.path)?;
        let hash = hash_source(&bytes);

        if let Some(current) = &self.current {
            if current.source_hash == hash {
                debug!(path = %self.path.display(), hash = %hash, "wage table cache hit");
                return Ok(Arc::clone(current));
            }
        }

        info!(path = %self.path.display(), hash = %hash, "wage table cache miss");
        let loaded = Arc::new(load_from_bytes(&self.path, &bytes, &self.layout)?);
        self.current = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
