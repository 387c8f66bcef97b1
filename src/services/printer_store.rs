//! Persistent store for the selected printer.
//!
//! The store is a small JSON document on local disk. It is read concurrently
//! by print requests and written by configuration updates; writes are
//! serialized and the last completed write wins.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Key under which the selected printer is persisted.
pub const SELECTED_PRINTER_KEY: &str = "selectedPrinter";

const STORE_FILE: &str = "config.json";

/// Errors raised by the printer configuration store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid configuration document: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode configuration document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Read/write access to the selected printer name.
#[async_trait]
pub trait PrinterStore: Send + Sync {
    /// Currently selected printer, if any.
    async fn get(&self) -> Result<Option<String>, StoreError>;

    /// Replace the selected printer.
    async fn set(&self, printer_name: &str) -> Result<(), StoreError>;
}

/// [`PrinterStore`] backed by a JSON file in a configuration directory.
pub struct FilePrinterStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
    write_lock: Mutex<()>,
}

impl FilePrinterStore {
    /// Open the store in `dir`, creating the directory if needed.
    ///
    /// An existing document is loaded eagerly so a corrupt file is reported at
    /// start-up instead of on the first print.
    pub async fn open(dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

        let path = dir.join(STORE_FILE);
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        info!("Printer configuration loaded from {}", path.display());

        Ok(Self {
            path,
            values: RwLock::new(values),
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        match self.values.read() {
            Ok(values) => values.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Write the document next to its final location and rename it into place.
    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(values).map_err(StoreError::Encode)?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl PrinterStore for FilePrinterStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.snapshot().remove(SELECTED_PRINTER_KEY))
    }

    async fn set(&self, printer_name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut values = self.snapshot();
        values.insert(SELECTED_PRINTER_KEY.to_string(), printer_name.to_string());
        self.persist(&values).await?;

        match self.values.write() {
            Ok(mut current) => *current = values,
            Err(poisoned) => *poisoned.into_inner() = values,
        }

        debug!(printer = %printer_name, "selected printer persisted");
        Ok(())
    }
}
