//! Persistence of listing photos.
//!
//! This is the server-side caller of the reducer, backing
//! `POST /api/products/{id}/upload-photo`. A photo is reduced first and only
//! written once reduction succeeded, so a rejected upload leaves neither a
//! file nor a `photo_filename` for the listing row. Stored files are served
//! back as `/uploads/{filename}`.

mod config;

pub use config::{ConfigError, PhotoStoreConfig, CEILING_VAR, UPLOAD_DIR_VAR};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::mime::ImageMime;
use crate::reduce::{self, ReduceError, ReduceOptions, ReduceOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Empty upload")]
    EmptyUpload,

    #[error(transparent)]
    Reduce(#[from] ReduceError),

    #[error("Invalid photo filename: {0}")]
    InvalidFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// HTTP status the router should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Reduce(ReduceError::UnsupportedMediaType(_)) => 415,
            StoreError::Reduce(_) | StoreError::EmptyUpload | StoreError::InvalidFilename(_) => {
                400
            }
            StoreError::Io(_) => 500,
        }
    }

    /// Message for the `detail` field of the error body. I/O details are
    /// not exposed to clients.
    pub fn detail(&self) -> String {
        match self {
            StoreError::Reduce(ReduceError::UnsupportedMediaType(ct)) => format!(
                "Unsupported file type {ct:?}; allowed: {}",
                crate::mime::ALLOWED_CONTENT_TYPES.join(", ")
            ),
            StoreError::Io(_) => "Failed to store photo".to_string(),
            other => other.to_string(),
        }
    }
}

/// A photo written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Name to record as the listing's `photo_filename`.
    pub filename: String,
    pub path: PathBuf,
    pub len: usize,
    pub content_type: ImageMime,
    pub outcome: ReduceOutcome,
}

/// Upload directory for listing photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
    options: ReduceOptions,
}

impl PhotoStore {
    /// Open the store, creating the upload directory if needed.
    pub fn open(config: PhotoStoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.upload_dir)?;
        info!(dir = %config.upload_dir.display(), ceiling = config.ceiling, "photo store ready");
        Ok(Self {
            dir: config.upload_dir,
            options: ReduceOptions::with_ceiling(config.ceiling),
        })
    }

    /// Replace the reducer options, e.g. to use a different ladder.
    pub fn with_options(mut self, options: ReduceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ceiling(&self) -> usize {
        self.options.ceiling
    }

    /// Reduce and persist a photo for `product_id`.
    ///
    /// The filename is `product-{id}-{uuid}.{ext}`, where `ext` is `jpg`
    /// whenever the reducer re-encoded and the declared type's extension
    /// otherwise. Nothing is written if reduction fails. An unsupported
    /// content type is reported as such even for an empty upload.
    pub fn save(
        &self,
        product_id: i64,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredPhoto, StoreError> {
        if ImageMime::from_content_type(content_type).is_none() {
            return Err(ReduceError::UnsupportedMediaType(content_type.to_string()).into());
        }
        if bytes.is_empty() {
            return Err(StoreError::EmptyUpload);
        }

        let report = reduce::reduce_with_report(bytes, content_type, &self.options)?;
        if !report.fits_ceiling() {
            warn!(
                product_id,
                len = report.bytes.len(),
                ceiling = report.ceiling,
                "storing photo above ceiling"
            );
        }

        let filename = format!(
            "product-{product_id}-{}.{}",
            Uuid::new_v4().simple(),
            report.content_type.extension()
        );
        let path = self.dir.join(&filename);
        write_atomically(&path, &report.bytes)?;

        info!(product_id, %filename, len = report.bytes.len(), outcome = ?report.outcome, "photo stored");
        Ok(StoredPhoto {
            filename,
            path,
            len: report.bytes.len(),
            content_type: report.content_type,
            outcome: report.outcome,
        })
    }

    /// Resolve a stored filename to its path inside the upload directory.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, StoreError> {
        validate_filename(filename)?;
        Ok(self.dir.join(filename))
    }

    /// Delete a stored photo. Returns whether a file was removed; a missing
    /// file is not an error, so deleting a listing twice is harmless.
    pub fn remove(&self, filename: &str) -> Result<bool, StoreError> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%filename, "photo removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_filename(filename: &str) -> Result<(), StoreError> {
    let bad = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\', '\0'])
        || filename.contains("..");
    if bad {
        return Err(StoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Write via a temporary sibling and rename, so readers never observe a
/// partially written photo under its final name.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::{encode_as, noisy_rgb};
    use image::{DynamicImage, ImageFormat};
    use tempfile::TempDir;

    fn store_with_ceiling(ceiling: usize) -> (TempDir, PhotoStore) {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::open(PhotoStoreConfig {
            upload_dir: dir.path().join("uploads"),
            ceiling,
        })
        .unwrap();
        (dir, store)
    }

    fn files_in(store: &PhotoStore) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_directory() {
        let (_tmp, store) = store_with_ceiling(1024);
        assert!(store.dir().is_dir());
        assert_eq!(store.ceiling(), 1024);
    }

    #[test]
    fn test_small_upload_keeps_format() {
        let (_tmp, store) = store_with_ceiling(1 << 20);
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(10, 10)), ImageFormat::Png);

        let stored = store.save(7, &png, "image/png").unwrap();

        assert!(stored.filename.starts_with("product-7-"));
        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.outcome, ReduceOutcome::Unchanged);
        assert_eq!(fs::read(&stored.path).unwrap(), png);
        assert_eq!(files_in(&store), vec![stored.filename.clone()]);
    }

    #[test]
    fn test_large_upload_is_stored_as_jpeg() {
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(48, 48)), ImageFormat::Png);
        let (_tmp, store) = store_with_ceiling(png.len() - 1);

        let stored = store.save(3, &png, "image/png").unwrap();

        assert!(stored.filename.ends_with(".jpg"));
        assert_eq!(stored.content_type, ImageMime::Jpeg);
        assert!(stored.outcome.is_reencoded());
        let written = fs::read(&stored.path).unwrap();
        assert_eq!(written.len(), stored.len);
        assert_eq!(&written[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_filenames_are_unique() {
        let (_tmp, store) = store_with_ceiling(1 << 20);
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(4, 4)), ImageFormat::Png);

        let a = store.save(1, &png, "image/png").unwrap();
        let b = store.save(1, &png, "image/png").unwrap();
        assert_ne!(a.filename, b.filename);
        assert_eq!(files_in(&store).len(), 2);
    }

    #[test]
    fn test_rejected_upload_writes_nothing() {
        let (_tmp, store) = store_with_ceiling(4);

        let err = store.save(1, b"GIF89a-but-not-really", "image/gif").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Reduce(ReduceError::InvalidImageData(_))
        ));
        assert_eq!(err.status_code(), 400);

        let err = store.save(1, b"BM....", "image/bmp").unwrap_err();
        assert_eq!(err.status_code(), 415);
        assert!(err.detail().contains("image/jpeg"));

        assert!(files_in(&store).is_empty());
    }

    #[test]
    fn test_empty_upload_rejected() {
        let (_tmp, store) = store_with_ceiling(1024);
        let err = store.save(1, &[], "image/png").unwrap_err();
        assert!(matches!(err, StoreError::EmptyUpload));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_empty_upload_of_unsupported_type_is_415() {
        let (_tmp, store) = store_with_ceiling(1024);
        let err = store.save(1, &[], "image/bmp").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Reduce(ReduceError::UnsupportedMediaType(_))
        ));
        assert_eq!(err.status_code(), 415);
    }

    #[test]
    fn test_save_uses_custom_options() {
        let (_tmp, store) = store_with_ceiling(1 << 20);
        let store = store.with_options(ReduceOptions {
            ceiling: 1,
            scale_ladder_tenths: vec![],
            ..ReduceOptions::default()
        });
        assert_eq!(store.ceiling(), 1);

        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(24, 24)), ImageFormat::Png);
        let stored = store.save(5, &png, "image/png").unwrap();

        // Quality ladder exhausted, no scale steps to try
        assert_eq!(
            stored.outcome,
            ReduceOutcome::BestEffort {
                scale_tenths: 10,
                quality: 15
            }
        );
        assert!(stored.filename.ends_with(".jpg"));
        let written = image::load_from_memory(&fs::read(&stored.path).unwrap()).unwrap();
        assert_eq!((written.width(), written.height()), (24, 24));
    }

    #[test]
    fn test_remove_photo() {
        let (_tmp, store) = store_with_ceiling(1 << 20);
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(4, 4)), ImageFormat::Png);
        let stored = store.save(9, &png, "image/png").unwrap();

        assert!(store.remove(&stored.filename).unwrap());
        assert!(!stored.path.exists());
        // Second delete is a no-op
        assert!(!store.remove(&stored.filename).unwrap());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (_tmp, store) = store_with_ceiling(1024);
        for name in ["../etc/passwd", "a/b.jpg", "..", ".hidden", "", "x\\y.png"] {
            let err = store.remove(name).unwrap_err();
            assert!(matches!(err, StoreError::InvalidFilename(_)), "{name:?}");
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_io_errors_hide_details() {
        let err = StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "Failed to store photo");
    }
}
