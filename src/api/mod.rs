//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod print;
pub mod printer_config;
pub mod printers;

use crate::error::{AppError, AppResult};

pub use health::configure_health_routes;
pub use openapi::{ApiDoc, configure_routes as configure_openapi_routes};
pub use print::configure_routes as configure_print_routes;
pub use printer_config::configure_routes as configure_config_routes;
pub use printers::configure_routes as configure_printer_routes;

/// JSON 404 for unknown paths under `/api`, so they never fall through to the web client.
pub async fn not_found(req: actix_web::HttpRequest) -> AppResult<actix_web::HttpResponse> {
    Err(AppError::NotFound(format!("No API route for {}", req.path())))
}
