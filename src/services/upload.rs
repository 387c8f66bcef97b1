//! Upload receiver for print requests.
//!
//! Streams the `file` part of a multipart body to a uniquely named file in the
//! temporary uploads location and picks up the optional `copies` field.
//! Only metadata is kept in memory, not file contents.

use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::cleanup::{Removal, TempUpload};

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the copy count.
pub const COPIES_FIELD: &str = "copies";

/// Longest `copies` value read; anything beyond is discarded.
const MAX_COPIES_FIELD_LEN: usize = 64;

/// Where uploads go and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub dir: PathBuf,
    pub max_size: usize,
}

/// A document stored in the temporary uploads location.
///
/// Owned by exactly one request. The backing file is removed by
/// [`UploadedDocument::release`] or, if the document is dropped first, by the
/// underlying [`TempUpload`] guard.
#[derive(Debug)]
pub struct UploadedDocument {
    file: TempUpload,
    original_name: String,
    size: u64,
}

impl UploadedDocument {
    pub(crate) fn new(file: TempUpload, original_name: String, size: u64) -> Self {
        Self {
            file,
            original_name,
            size,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name as sent by the client. Metadata only, never used as a path.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Remove the stored file.
    pub async fn release(self) -> Option<Removal> {
        self.file.release().await
    }
}

/// Everything extracted from a print request body.
#[derive(Debug)]
pub struct PrintUpload {
    pub document: UploadedDocument,
    /// Raw `copies` value, parsed later by the print workflow.
    pub copies: Option<String>,
}

/// Read a print request body.
///
/// Fails with `MissingInput` when no file part is present (nothing is stored in
/// that case) and with `PayloadTooLarge` as soon as the file exceeds the limit.
/// A partially written file is removed before any error is returned.
///
/// A `file` part with an empty filename is what browsers send when no file was
/// chosen; it is drained and counts as absent.
pub async fn receive_print_upload(
    payload: &mut Multipart,
    limits: &UploadLimits,
) -> AppResult<PrintUpload> {
    let mut document: Option<UploadedDocument> = None;
    let mut copies: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;

        let disposition = field.content_disposition().map(|cd| {
            (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            )
        });
        let Some((name, filename)) = disposition else {
            drain_field(&mut field).await;
            continue;
        };

        match (name.as_str(), filename) {
            (FILE_FIELD, Some(original_name))
                if document.is_none() && !original_name.is_empty() =>
            {
                document = Some(store_file(&mut field, original_name, limits).await?);
            }
            (COPIES_FIELD, None) => {
                copies = Some(read_text_field(&mut field).await?);
            }
            _ => {
                debug!(field = %name, "ignoring multipart field");
                drain_field(&mut field).await;
            }
        }
    }

    let document =
        document.ok_or_else(|| AppError::MissingInput("No file uploaded".to_string()))?;

    info!(
        file = %document.original_name(),
        size = document.size(),
        "Received upload"
    );

    Ok(PrintUpload { document, copies })
}

/// Stream one file part to disk under a generated name.
async fn store_file(
    field: &mut Field,
    original_name: String,
    limits: &UploadLimits,
) -> AppResult<UploadedDocument> {
    tokio::fs::create_dir_all(&limits.dir).await.map_err(|e| {
        AppError::Internal(format!("Failed to create upload directory: {}", e))
    })?;

    // Guard first, so an error anywhere below removes what was written.
    let file = TempUpload::new(limits.dir.join(Uuid::new_v4().to_string()));

    let mut out = tokio::fs::File::create(file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;

    let mut size: usize = 0;
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len();
        if size > limits.max_size {
            return Err(AppError::PayloadTooLarge {
                limit: limits.max_size,
            });
        }
        out.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write temp file: {}", e)))?;
    }
    out.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write temp file: {}", e)))?;

    Ok(UploadedDocument::new(file, original_name, size as u64))
}

/// Read a short text field, keeping at most [`MAX_COPIES_FIELD_LEN`] bytes.
async fn read_text_field(field: &mut Field) -> AppResult<String> {
    let mut value = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        let room = MAX_COPIES_FIELD_LEN.saturating_sub(value.len());
        value.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(String::from_utf8_lossy(&value).into_owned())
}

/// Drain a multipart field without saving.
async fn drain_field(field: &mut Field) {
    while let Some(chunk) = field.next().await {
        let _ = chunk;
    }
}
