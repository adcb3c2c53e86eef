use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

pub const DEFAULT_STORE_PATH: &str = "transactions.json";

/// A JSON array of records kept in a single file.
///
/// Appends from one process are serialized; separate processes writing the
/// same file are not coordinated.
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record. A missing file is an empty store; anything
    /// else that is not a JSON array is an error.
    pub async fn load(&self) -> Result<Vec<Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store: {:?}", self.path));
            }
        };

        let records: Vec<Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store: {:?}", self.path))?;

        Ok(records)
    }

    /// Append one record and rewrite the file. Returns the new record count.
    pub async fn append<T: Serialize>(&self, record: &T) -> Result<usize> {
        let record = serde_json::to_value(record).context("Failed to serialize record")?;

        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        records.push(record);
        self.write_all(&records).await?;

        info!(path = ?self.path, total = records.len(), "Saved transaction to JSON");
        Ok(records.len())
    }

    async fn write_all(&self, records: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(records).context("Failed to serialize store")?;

        // Write beside the target and rename so a crash never leaves a
        // truncated store behind.
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write file: {:?}", tmp_path))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to replace store: {:?}", self.path));
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_STORE_PATH.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
