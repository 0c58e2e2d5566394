pub mod utils;

use std::{
    fs,
    path::{Path, PathBuf},
};

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;
use log::{info, warn};

use crate::{
    error::StorageError,
    repos::file::utils::{hashing_composite_key, receipt_extension},
};

pub const RECEIPT_DIR: &str = "receipt_images";

/// Disk-backed store for receipt images, addressed by a path relative to `root`.
#[derive(Clone, Debug)]
pub struct ReceiptStore {
    root: PathBuf,
    url_prefix: String,
}

impl ReceiptStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> ReceiptStore {
        let mut url_prefix = url_prefix.into();
        if !url_prefix.ends_with('/') {
            url_prefix.push('/');
        }

        ReceiptStore {
            root: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Copies the upload under a generated name and returns its relative path.
    ///
    /// Blocking, so callers run it off the async workers.
    pub fn save(&self, upload: TempFile) -> Result<String, StorageError> {
        let directory = self.root.join(RECEIPT_DIR);
        fs::create_dir_all(&directory)?;

        let original_name = upload.file_name.clone().unwrap_or_default();
        let nanos = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string();
        let file_name = format!(
            "{}.{}",
            hashing_composite_key(&[nanos.as_str(), original_name.as_str()]),
            receipt_extension(upload.file_name.as_deref())
        );

        // copy instead of persist, the temp dir may live on another filesystem
        fs::copy(upload.file.path(), directory.join(&file_name))?;

        let relative_path = format!("{RECEIPT_DIR}/{file_name}");
        info!("Stored receipt {relative_path} ({} bytes)", upload.size);
        Ok(relative_path)
    }

    /// Best effort cleanup after a failed insert
    pub fn remove(&self, relative_path: &str) {
        if let Err(e) = fs::remove_file(self.root.join(relative_path)) {
            warn!("Couldn't remove orphaned receipt {relative_path}: {e}");
        }
    }

    pub fn url_for(&self, relative_path: &str) -> Option<String> {
        if relative_path.is_empty() {
            return None;
        }

        Some(format!("{}{}", self.url_prefix, relative_path))
    }
}
