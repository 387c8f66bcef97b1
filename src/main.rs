//! PrintRelay server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware, and
//! advertises it on the local network.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use printrelay_lib::api::{self, health::StartedAt};
use printrelay_lib::config::Config;
use printrelay_lib::error::{AppError, json_error_handler};
use printrelay_lib::middleware;
use printrelay_lib::services::{
    CupsSpooler, FilePrinterStore, PrinterStore, ServiceAdvertiser, Spooler, UploadLimits,
};

/// Directory of the built web client.
#[derive(Clone)]
struct StaticDir(PathBuf);

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<StaticDir>>()
        .ok_or_else(|| AppError::NotFound(req.path().to_string()))?;
    Ok(NamedFile::open(static_dir.0.join("index.html"))?)
}

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    match Config::from_env() {
        Ok(config) => FilePrinterStore::open(&config.config_dir).await.is_ok(),
        Err(_) => false,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - PRINTRELAY_UPLOAD_DIR must be an absolute path");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  PrintRelay Server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - CORS allows the local dev client");
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        error!(
            "Failed to create upload directory {}: {}",
            config.upload_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let store = match FilePrinterStore::open(&config.config_dir).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open printer configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Prepare shared state
    let store: Arc<dyn PrinterStore> = Arc::new(store);
    let spooler: Arc<dyn Spooler> = Arc::new(CupsSpooler::new(config.spooler.clone()));
    let started_at = StartedAt::now();
    let upload_limits = UploadLimits {
        dir: config.upload_dir.clone(),
        max_size: config.max_upload_size,
    };
    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();

    info!(
        "Uploads: {}MB max size, staged in {}",
        config.max_upload_size / 1024 / 1024,
        config.upload_dir.display()
    );
    match config.spooler.timeout {
        Some(limit) => info!(
            "Print command: {} (timeout {}s)",
            config.spooler.lp_command,
            limit.as_secs()
        ),
        None => info!("Print command: {}", config.spooler.lp_command),
    }

    match &static_dir {
        Some(dir) => info!("Static file serving enabled from {:?}", dir),
        None => info!("No web client directory found, serving API only"),
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:5173")
                .allowed_origin("http://127.0.0.1:5173")
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            .wrap(cors)
            .wrap(middleware::RequestLogger)
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(spooler.clone()))
            .app_data(web::Data::new(started_at))
            .app_data(web::Data::new(upload_limits.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(4096)
                    .error_handler(json_error_handler),
            )
            .service(
                web::scope("/api")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_config_routes)
                    .configure(api::configure_printer_routes)
                    .configure(api::configure_print_routes)
                    .configure(api::configure_openapi_routes)
                    .default_service(web::to(api::not_found)),
            );

        // Serve the web client when a build is available
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(StaticDir(dir.clone())))
                .service(
                    Files::new("/", dir.clone())
                        .index_file("index.html")
                        .prefer_utf8(true)
                        .default_handler(web::to(spa_fallback)),
                );
        }

        app
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run();

    let advertiser = if config.advertise.enabled {
        match ServiceAdvertiser::register(&config.advertise.service_name, config.port) {
            Ok(advertiser) => Some(advertiser),
            Err(e) => {
                warn!("mDNS advertisement unavailable: {}", e);
                None
            }
        }
    } else {
        info!("mDNS advertisement disabled");
        None
    };

    let result = server.await;

    if let Some(advertiser) = advertiser {
        advertiser.shutdown();
    }
    info!("Server stopped");

    result
}
