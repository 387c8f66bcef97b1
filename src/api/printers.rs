//! Printer listing endpoint.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::services::Spooler;
use crate::services::printers::{PrinterInfo, parse_lpstat};

/// Printers known to the spooler.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrintersResponse {
    pub printers: Vec<PrinterInfo>,
}

/// Listing failure; `printers` is always empty so clients can render it as-is.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrintersErrorResponse {
    pub error: String,
    pub message: String,
    pub printers: Vec<PrinterInfo>,
}

/// List the printers reported by `lpstat -p`.
#[utoipa::path(
    get,
    path = "/api/printers",
    tag = "Printers",
    responses(
        (status = 200, description = "Printer list", body = PrintersResponse),
        (status = 500, description = "Spooler unavailable", body = PrintersErrorResponse)
    )
)]
#[get("/printers")]
pub async fn list_printers(spooler: web::Data<dyn Spooler>) -> HttpResponse {
    match spooler.status_listing().await {
        Ok(output) => HttpResponse::Ok().json(PrintersResponse {
            printers: parse_lpstat(&output),
        }),
        Err(e) => {
            // lpstat exits non-zero when CUPS is down or no printers exist
            error!(error = %e, "Error fetching printers");
            HttpResponse::InternalServerError().json(PrintersErrorResponse {
                error: "Failed to retrieve printers".to_string(),
                message: e.to_string(),
                printers: Vec::new(),
            })
        }
    }
}

/// Configure printer listing routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_printers);
}
