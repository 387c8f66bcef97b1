//! Print submission endpoint.
//!
//! POST /api/print
//! Content-Type: multipart/form-data
//! Fields: `file` (required), `copies` (optional, 1-999, default 1)

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use utoipa::ToSchema;

use crate::error::{AppResult, ErrorResponse};
use crate::services::print_job::{PrintSubmission, submit_print_job};
use crate::services::upload::receive_print_upload;
use crate::services::{PrinterStore, Spooler, UploadLimits};

/// Multipart form accepted by `POST /api/print` (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PrintForm {
    /// Document to print.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Number of copies, 1-999.
    copies: Option<u32>,
}

/// Print an uploaded document on the configured printer.
#[utoipa::path(
    post,
    path = "/api/print",
    tag = "Print",
    request_body(content = PrintForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Job submitted", body = PrintSubmission),
        (status = 400, description = "No file, invalid copies or no printer configured", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Print command failed", body = ErrorResponse)
    )
)]
#[post("/print")]
pub async fn print_document(
    mut payload: Multipart,
    limits: web::Data<UploadLimits>,
    store: web::Data<dyn PrinterStore>,
    spooler: web::Data<dyn Spooler>,
) -> AppResult<HttpResponse> {
    let upload = receive_print_upload(&mut payload, &limits).await?;
    let submission = submit_print_job(upload, store.get_ref(), spooler.get_ref()).await?;

    Ok(HttpResponse::Ok().json(submission))
}

/// Configure print routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(print_document);
}
