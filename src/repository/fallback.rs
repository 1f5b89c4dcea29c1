//! Local fallback sink
//!
//! When the primary store rejects a write the record is appended here as one JSON
//! line tagged `storage: "fallback"`. Nothing syncs these records back to the
//! primary store; they stay in the file until an operator replays them.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::{
    fs::OpenOptions,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::Mutex,
};
use uuid::Uuid;

use super::StoreResult;
use crate::models::contact::{FallbackRecord, StorageTag, Submission};

pub struct FallbackSink {
    path: PathBuf,
    // serializes appends so concurrent lines never interleave
    write_lock: Mutex<()>,
}

impl FallbackSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a submission, returning the record as written
    pub async fn write(&self, submission: &Submission) -> StoreResult<FallbackRecord> {
        let record = FallbackRecord {
            id: format!("fallback-{}", Uuid::new_v4()),
            storage: StorageTag::Fallback,
            created_at: Utc::now(),
            submission: submission.clone(),
        };

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::info!(
            id = %record.id,
            kind = submission.kind(),
            path = %self.path.display(),
            "Submission written to fallback sink"
        );

        Ok(record)
    }

    /// Read every record; a missing file means no records
    pub async fn read_all(&self) -> StoreResult<Vec<FallbackRecord>> {
        let file = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }

        Ok(records)
    }
}
