//! Selected printer configuration endpoints.

use actix_web::{Either, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::services::PrinterStore;

/// Current printer configuration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrinterConfigResponse {
    pub configured: bool,
    pub printer_name: Option<String>,
}

/// Body of `POST /api/config`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePrinterConfigRequest {
    #[serde(default)]
    pub printer_name: Option<String>,
}

/// Result of saving the printer configuration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePrinterConfigResponse {
    pub success: bool,
    pub message: String,
    pub printer_name: String,
}

/// Get the currently selected printer.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "Configuration",
    responses(
        (status = 200, description = "Current configuration", body = PrinterConfigResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[get("/config")]
pub async fn get_config(store: web::Data<dyn PrinterStore>) -> AppResult<HttpResponse> {
    let printer_name = store.get().await?;

    Ok(HttpResponse::Ok().json(PrinterConfigResponse {
        configured: printer_name.is_some(),
        printer_name,
    }))
}

/// Select the printer used for print jobs.
///
/// Accepts a JSON body or an url-encoded form with the same field.
#[utoipa::path(
    post,
    path = "/api/config",
    tag = "Configuration",
    request_body = SavePrinterConfigRequest,
    responses(
        (status = 200, description = "Printer saved", body = SavePrinterConfigResponse),
        (status = 400, description = "printerName missing", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[post("/config")]
pub async fn save_config(
    store: web::Data<dyn PrinterStore>,
    body: Either<web::Json<SavePrinterConfigRequest>, web::Form<SavePrinterConfigRequest>>,
) -> AppResult<HttpResponse> {
    let body = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    let printer_name = body
        .printer_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidInput("printerName is required".to_string()))?;

    store.set(&printer_name).await?;
    info!(printer = %printer_name, "Printer configuration saved");

    Ok(HttpResponse::Ok().json(SavePrinterConfigResponse {
        success: true,
        message: format!("Printer \"{}\" saved successfully", printer_name),
        printer_name,
    }))
}

/// Configure printer configuration routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_config).service(save_config);
}
