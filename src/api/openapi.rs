//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PrintRelay",
        description = "Local network relay that prints uploaded documents on the host's CUPS printers"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        api::health::health,
        api::printer_config::get_config,
        api::printer_config::save_config,
        api::printers::list_printers,
        api::print::print_document,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            // Configuration
            api::printer_config::PrinterConfigResponse,
            api::printer_config::SavePrinterConfigRequest,
            api::printer_config::SavePrinterConfigResponse,
            // Printers
            services::printers::PrinterState,
            services::printers::PrinterInfo,
            api::printers::PrintersResponse,
            api::printers::PrintersErrorResponse,
            // Print
            api::print::PrintForm,
            services::print_job::PrintSubmission,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Configuration", description = "Selected printer"),
        (name = "Printers", description = "Printers known to the spooler"),
        (name = "Print", description = "Print job submission")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure documentation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
