//! Print submission workflow.
//!
//! Received -> Validated -> ConfigurationResolved -> Executed -> Interpreted.
//! Whatever state a request stops in, the uploaded document is released
//! exactly once by [`submit_print_job`] before the outcome is returned.

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::printer_store::PrinterStore;
use crate::services::spooler::{PrintCommand, Spooler};
use crate::services::upload::{PrintUpload, UploadedDocument};

/// Copy count used when the field is absent or not a number.
pub const DEFAULT_COPIES: u32 = 1;

/// Largest accepted copy count.
pub const MAX_COPIES: u32 = 999;

/// Job identifier reported when the spooler output carries none.
pub const UNKNOWN_JOB_ID: &str = "unknown";

/// Marker `lp` prints in front of the job identifier.
const REQUEST_ID_MARKER: &str = "request id is ";

/// Successful submission, returned to the client as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSubmission {
    pub success: bool,
    pub message: String,
    pub job_id: String,
    pub printer: String,
    pub copies: u32,
    pub file_name: String,
}

/// Run one print request to completion and release its upload.
pub async fn submit_print_job(
    upload: PrintUpload,
    store: &dyn PrinterStore,
    spooler: &dyn Spooler,
) -> AppResult<PrintSubmission> {
    let PrintUpload { document, copies } = upload;

    let outcome = print_document(&document, copies.as_deref(), store, spooler).await;
    document.release().await;

    if let Err(ref e) = outcome {
        warn!(error = %e, "Print request failed");
    }
    outcome
}

async fn print_document(
    document: &UploadedDocument,
    copies: Option<&str>,
    store: &dyn PrinterStore,
    spooler: &dyn Spooler,
) -> AppResult<PrintSubmission> {
    let copies = parse_copies(copies)?;

    let printer = store
        .get()
        .await?
        .filter(|name| !name.trim().is_empty())
        .ok_or(AppError::NotConfigured)?;

    let command = PrintCommand {
        printer,
        copies,
        file: document.path().to_path_buf(),
    };
    let output = spooler.submit(&command).await?;

    if !output.stderr.trim().is_empty() {
        warn!(stderr = %output.stderr.trim(), "print command wrote to stderr");
    }

    let job_id = parse_job_id(&output.stdout).unwrap_or_else(|| UNKNOWN_JOB_ID.to_string());

    info!(
        job_id = %job_id,
        printer = %command.printer,
        copies,
        file = %document.original_name(),
        "Print job submitted"
    );

    Ok(PrintSubmission {
        success: true,
        message: "Print job submitted successfully".to_string(),
        job_id,
        printer: command.printer,
        copies,
        file_name: document.original_name().to_string(),
    })
}

/// Parse the `copies` field.
///
/// Reads a leading integer the way form values are usually interpreted:
/// surrounding whitespace and trailing text are ignored. No digits at all
/// means [`DEFAULT_COPIES`]; any number outside `1..=MAX_COPIES` is rejected.
pub fn parse_copies(raw: Option<&str>) -> AppResult<u32> {
    match raw.and_then(leading_integer) {
        None => Ok(DEFAULT_COPIES),
        Some(Ok(n)) if (1..=i64::from(MAX_COPIES)).contains(&n) => Ok(n as u32),
        Some(_) => Err(AppError::InvalidCopies),
    }
}

/// `None` when `s` does not start with a (signed) integer.
fn leading_integer(s: &str) -> Option<Result<i64, std::num::ParseIntError>> {
    let s = s.trim();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let digits = unsigned.len()
        - unsigned
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .len();
    if digits == 0 {
        return None;
    }
    let end = s.len() - unsigned.len() + digits;
    Some(s[..end].parse::<i64>())
}

/// Extract the job identifier from `lp` output.
///
/// Best effort: the output format is not a stable contract, so a missing
/// marker yields `None` rather than an error. A marker followed only by
/// whitespace also yields `None`, reported as [`UNKNOWN_JOB_ID`] rather than an
/// empty identifier.
pub fn parse_job_id(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let start = line.find(REQUEST_ID_MARKER)? + REQUEST_ID_MARKER.len();
        let id = line[start..].trim();
        (!id.is_empty()).then(|| id.to_string())
    })
}
