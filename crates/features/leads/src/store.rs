//! One JSON file per lead under `<root>/leads/`.
//!
//! Writes go through a unique temp file that is synced before being renamed over the
//! target, so a crash never leaves a half-written record behind.

use crate::error::{LeadError, LeadErrorExt};
use crate::record::LeadRecord;
use abect_kernel::security::resource::ResourceGuard;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const LEADS_DIR: &str = "leads";
const TMP_MARKER: &str = ".abecttmp.";

#[derive(Debug)]
struct LeadStoreInner {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

/// Durable lead storage. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LeadStore {
    inner: Arc<LeadStoreInner>,
}

impl LeadStore {
    /// Opens (and creates) the lead directory below `root`, dropping temp files left by an
    /// interrupted write.
    ///
    /// # Errors
    /// If the directory cannot be created or listed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, LeadError> {
        let dir = root.as_ref().join(LEADS_DIR);
        fs::create_dir_all(&dir)
            .await
            .context(format!("Failed to create lead directory {}", dir.display()))?;

        let store =
            Self { inner: Arc::new(LeadStoreInner { dir, tmp_counter: AtomicU64::new(0) }) };
        store.purge_tmp().await?;

        info!(dir = %store.dir().display(), "Lead store opened");
        Ok(store)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Writes `record` atomically, replacing an earlier version with the same id.
    ///
    /// # Errors
    /// On an invalid id, encoding failure or I/O failure.
    pub async fn save(&self, record: &LeadRecord) -> Result<(), LeadError> {
        let target = self.path_for(&record.id)?;
        let data = serde_json::to_vec_pretty(record).context("Encoding lead")?;
        let temp = self.tmp_path(&record.id);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(LeadError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                        .into(),
                ),
            });
        }

        self.sync_dir().await;
        debug!(id = %record.id, path = %target.display(), "Lead saved atomically");
        Ok(())
    }

    /// # Errors
    /// [`LeadError::NotFound`] for an unknown id, [`LeadError::Id`] for an id that could not
    /// have been issued by this store.
    pub async fn get(&self, id: &str) -> Result<LeadRecord, LeadError> {
        let path = self.path_for(id)?;
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LeadError::NotFound { message: id.to_owned().into(), context: None });
            },
            Err(err) => {
                return Err(LeadError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        serde_json::from_slice(&data).context(format!("Decoding lead {id}"))
    }

    /// All readable records, oldest first. Unreadable files are skipped with a warning.
    ///
    /// # Errors
    /// If the lead directory cannot be listed.
    pub async fn list(&self) -> Result<Vec<LeadRecord>, LeadError> {
        let mut entries = fs::read_dir(self.dir()).await.context("Listing leads")?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await.context("Listing leads")? {
            let path = entry.path();
            let Some(id) = record_id(&path) else {
                continue;
            };
            match self.get(id).await {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable lead"),
            }
        }

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, LeadError> {
        let id = ResourceGuard::verify(id)?;
        Ok(self.dir().join(format!("{id}.json")))
    }

    fn tmp_path(&self, id: &str) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.dir().join(format!("{id}.json{TMP_MARKER}{counter}"))
    }

    async fn purge_tmp(&self) -> Result<(), LeadError> {
        let mut entries = fs::read_dir(self.dir()).await.context("Scanning for temp files")?;
        let mut removed = 0usize;

        while let Some(entry) = entries.next_entry().await.context("Scanning for temp files")? {
            let path = entry.path();
            let is_tmp =
                path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(TMP_MARKER));
            if !is_tmp {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temp file"),
            }
        }

        if removed > 0 {
            info!(removed, "Cleaned up temporary lead files");
        }
        Ok(())
    }

    async fn sync_dir(&self) {
        match fs::File::open(self.dir()).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    warn!(path = %self.dir().display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                warn!(path = %self.dir().display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn record_id(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem().and_then(|s| s.to_str())
}
