//! File selection and staged-image lifetime management.
//!
//! A selection produces an ephemeral [`SelectedImage`] handle over the chosen
//! bytes, valid for the current session only. The selector owns exactly one
//! active handle at a time: selecting again releases the previous one. Clones
//! handed out earlier (for example to a render that is still using the image)
//! remain valid until they are dropped, so replacing a selection never pulls
//! the bytes out from under an ongoing render.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::{Error, Result};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// An ephemeral handle to the bytes of a chosen file.
///
/// Cheap to clone; each clone keeps the underlying bytes alive independently
/// of the selector that produced it. No validation is performed on the
/// contents — zero-byte or non-image data is accepted here and handled by the
/// renderer.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    id: u64,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// Session-unique identifier of this selection
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Raw bytes of the selected file
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the selected file in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Stages user-chosen files as [`SelectedImage`] handles.
///
/// Acquire-on-select, release-on-replace: the handle of the previous
/// selection is dropped the moment a new one is staged, and the current one
/// is dropped with the selector.
#[derive(Debug, Default)]
pub struct FileSelector {
    current: Option<SelectedImage>,
}

impl FileSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage raw file bytes as the active selection, replacing any previous
    /// one. Returns a clone of the new handle.
    pub fn select(&mut self, bytes: impl Into<Vec<u8>>) -> SelectedImage {
        let image = SelectedImage {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            bytes: Arc::from(bytes.into().into_boxed_slice()),
        };
        if let Some(prev) = self.current.replace(image.clone()) {
            debug!(
                "selection {} replaced by {} ({} bytes)",
                prev.id(),
                image.id(),
                image.len()
            );
        } else {
            debug!("selection {} staged ({} bytes)", image.id(), image.len());
        }
        image
    }

    /// Read a file from disk and stage it. I/O failures are reported as
    /// [`Error::Selection`] and leave the current selection untouched.
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> Result<SelectedImage> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Selection(format!("failed to read {}: {}", path.display(), e)))?;
        Ok(self.select(bytes))
    }

    /// The active selection, if any
    pub fn current(&self) -> Option<&SelectedImage> {
        self.current.as_ref()
    }

    /// Drop the active selection without staging a new one
    pub fn clear(&mut self) {
        if let Some(prev) = self.current.take() {
            debug!("selection {} released", prev.id());
        }
    }
}
