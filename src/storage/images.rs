//! Stored receipt images
//!
//! Scanned images are copied under `receipts/` in the data root so a
//! receipt record keeps working after the original photo is moved or
//! deleted. Records store the path relative to the data root.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::SpendscanError;
use crate::models::ReceiptId;
use crate::scan::ReceiptImage;

const RECEIPTS_SUBDIR: &str = "receipts";

pub struct ReceiptImageStore {
    base_dir: PathBuf,
}

impl ReceiptImageStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Copy an image into the store, returning its relative path
    pub fn store(&self, id: ReceiptId, image: &ReceiptImage) -> Result<String, SpendscanError> {
        let relative = format!(
            "{}/{}.{}",
            RECEIPTS_SUBDIR,
            id.as_uuid().simple(),
            image.extension()
        );
        let target = self.base_dir.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SpendscanError::Storage(format!("Failed to create receipts directory: {}", e))
            })?;
        }

        fs::copy(image.path(), &target).map_err(|e| {
            SpendscanError::Storage(format!(
                "Failed to store receipt image {}: {}",
                image.path().display(),
                e
            ))
        })?;

        debug!(receipt = %id, path = %relative, "stored receipt image");
        Ok(relative)
    }

    /// Absolute location of a stored image
    pub fn locate(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }

    /// Delete a stored image; a missing file is not an error
    pub fn remove(&self, relative: &str) -> Result<(), SpendscanError> {
        let path = self.locate(relative);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SpendscanError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
