//! Append-only JSON-lines review store.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{ReviewStore, StoreError};
use crate::types::{ReviewCategory, ReviewResult};

/// One [`ReviewResult`] per line in a single file.
///
/// Each record is serialized in full before the file is touched and written
/// with one `write_all`, so a failed run leaves no partial line.
#[derive(Debug)]
pub struct JsonLinesReviewStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in file order (oldest first). A missing file is empty.
    fn read_all(&self) -> Result<Vec<ReviewResult>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                    line: index + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

impl ReviewStore for JsonLinesReviewStore {
    fn save(&self, result: &ReviewResult) -> Result<(), StoreError> {
        let mut record = serde_json::to_string(result)?;
        record.push('\n');

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.flush()?;

        tracing::debug!(
            review_id = %result.id,
            path = %self.path.display(),
            "Appended review record"
        );
        Ok(())
    }

    fn latest_by_category(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<Option<ReviewResult>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .find(|r| r.proposal_id == proposal_id && r.category == category))
    }

    fn all_for_proposal(&self, proposal_id: &str) -> Result<Vec<ReviewResult>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|r| r.proposal_id == proposal_id)
            .collect())
    }
}
