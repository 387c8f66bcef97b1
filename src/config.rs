//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default values used when a variable is not set.
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 5000;
    pub const STATIC_DIR: &str = "dist";
    pub const UPLOAD_SUBDIR: &str = "printer-uploads";
    pub const CONFIG_DIR: &str = "./printer-config";
    pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024; // 50MB per document
    pub const LP_COMMAND: &str = "lp";
    pub const LPSTAT_COMMAND: &str = "lpstat";
    pub const SERVICE_NAME: &str = "PrintRelay";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Print spooler commands.
#[derive(Debug, Clone)]
pub struct SpoolerSettings {
    /// Program used to submit jobs (`lp`)
    pub lp_command: String,
    /// Program used to list printers (`lpstat`)
    pub lpstat_command: String,
    /// Upper bound on a single submission; `None` waits for the process to exit
    pub timeout: Option<Duration>,
}

/// mDNS advertisement settings.
#[derive(Debug, Clone)]
pub struct AdvertiseSettings {
    pub enabled: bool,
    pub service_name: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the built web client
    pub static_dir: Option<PathBuf>,
    /// Temporary uploads location
    pub upload_dir: PathBuf,
    /// Directory of the printer configuration store
    pub config_dir: PathBuf,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
    pub spooler: SpoolerSettings,
    pub advertise: AdvertiseSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `PRINTRELAY_HOST`: Server host (default: 0.0.0.0)
    /// - `PRINTRELAY_PORT` or `PORT`: Server port (default: 5000)
    /// - `PRINTRELAY_STATIC_DIR`: Web client directory (default: `dist` if present)
    /// - `PRINTRELAY_UPLOAD_DIR`: Temporary uploads (default: `$TMPDIR/printer-uploads`)
    /// - `PRINTRELAY_CONFIG_DIR`: Printer configuration store (default: ./printer-config)
    /// - `PRINTRELAY_MAX_UPLOAD_SIZE`: Max upload size in bytes (default: 50MB)
    /// - `PRINTRELAY_LP_COMMAND`: Submission program (default: lp)
    /// - `PRINTRELAY_LPSTAT_COMMAND`: Status program (default: lpstat)
    /// - `PRINTRELAY_PRINT_TIMEOUT_SECS`: Submission timeout (default: none)
    /// - `PRINTRELAY_MDNS`: Advertise over mDNS (default: true)
    /// - `PRINTRELAY_SERVICE_NAME`: Advertised name (default: PrintRelay)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("PRINTRELAY_HOST").unwrap_or_else(|_| defaults::HOST.to_string());

        let port = env::var("PRINTRELAY_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| defaults::PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PRINTRELAY_PORT must be a valid port number"))?;

        let static_dir = env::var("PRINTRELAY_STATIC_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let dir = PathBuf::from(defaults::STATIC_DIR);
                dir.is_dir().then_some(dir)
            });

        let upload_dir = env::var("PRINTRELAY_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join(defaults::UPLOAD_SUBDIR));

        let config_dir = PathBuf::from(
            env::var("PRINTRELAY_CONFIG_DIR").unwrap_or_else(|_| defaults::CONFIG_DIR.to_string()),
        );

        let max_upload_size = env::var("PRINTRELAY_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("PRINTRELAY_MAX_UPLOAD_SIZE must be a valid number")
            })?;

        let timeout = match env::var("PRINTRELAY_PRINT_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("PRINTRELAY_PRINT_TIMEOUT_SECS must be a valid number")
            })?)),
            Err(_) => None,
        };

        let spooler = SpoolerSettings {
            lp_command: env::var("PRINTRELAY_LP_COMMAND")
                .unwrap_or_else(|_| defaults::LP_COMMAND.to_string()),
            lpstat_command: env::var("PRINTRELAY_LPSTAT_COMMAND")
                .unwrap_or_else(|_| defaults::LPSTAT_COMMAND.to_string()),
            timeout,
        };

        let advertise = AdvertiseSettings {
            enabled: match env::var("PRINTRELAY_MDNS") {
                Ok(raw) => parse_bool(&raw)
                    .ok_or(ConfigError::InvalidValue("PRINTRELAY_MDNS must be true or false"))?,
                Err(_) => true,
            },
            service_name: env::var("PRINTRELAY_SERVICE_NAME")
                .unwrap_or_else(|_| defaults::SERVICE_NAME.to_string()),
        };

        let config = Config {
            environment,
            host,
            port,
            static_dir,
            upload_dir,
            config_dir,
            max_upload_size,
            spooler,
            advertise,
        };

        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make the relay unable to accept or print uploads.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.max_upload_size == 0 {
            errors.push("PRINTRELAY_MAX_UPLOAD_SIZE must be greater than zero".to_string());
        }

        if !self.upload_dir.is_absolute() {
            errors.push(format!(
                "PRINTRELAY_UPLOAD_DIR must be an absolute path, got '{}'",
                self.upload_dir.display()
            ));
        }

        if self.spooler.lp_command.trim().is_empty() {
            errors.push("PRINTRELAY_LP_COMMAND must not be empty".to_string());
        }

        if self.spooler.timeout == Some(Duration::ZERO) {
            errors.push("PRINTRELAY_PRINT_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}
