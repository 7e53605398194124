//! Environment variable validation and configuration module for Link Archive
//!
//! This module provides centralized validation and configuration management
//! for all environment variables read by the service. Configuration is read
//! once at start-up and never changes for the lifetime of the process.
//!
//! # Supported Environment Variables
//!
//! ## Deployment
//! - `LINKARCHIVE_ENV`: Deployment environment (default: "production").
//!   `development` serves static assets from `LINKARCHIVE_STATIC_DIR`, any other
//!   value serves the bundle embedded in the binary.
//! - `LINKARCHIVE_STATIC_DIR`: Asset directory used in development (default: "./public")
//!
//! ## Server Configuration
//! - `LINKARCHIVE_HOST`: Server bind address (default: "0.0.0.0")
//! - `LINKARCHIVE_PORT`: Server port (default: "8080")
//!
//! ## Logging Configuration
//! - `LINKARCHIVE_LOG_LEVEL`: Application log filter, takes precedence over `RUST_LOG`
//! - `RUST_LOG`: Standard Rust logging configuration
//!
//! # Usage
//!
//! ```rust,no_run
//! use linkarchive::env::validate_environment;
//!
//! match validate_environment() {
//!     Ok(config) => println!("Server will bind to {}", config.bind_address),
//!     Err(errors) => {
//!         for error in errors {
//!             eprintln!("Environment validation error: {}: {}", error.variable, error.message);
//!         }
//!         std::process::exit(1);
//!     }
//! }
//! ```

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "./public";
pub const DEFAULT_LOG_LEVEL: &str = "linkarchive=info,tower_http=debug";
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Environment validation errors
#[derive(Debug, Clone)]
pub struct EnvValidationError {
    pub variable: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Severity level for environment validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    /// Critical errors that prevent application startup
    Critical,
    /// Warnings about suboptimal configurations
    Warning,
    /// Informational messages about default values being used
    Info,
}

/// Deployment environment of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    /// Any other value, kept verbatim for logging.
    Other(String),
}

impl Environment {
    /// Only the exact value `development` selects development.
    pub fn parse(value: &str) -> Self {
        if value == "development" {
            Environment::Development
        } else {
            Environment::Other(value.to_string())
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Other(name) => f.write_str(name),
        }
    }
}

/// Validated application configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Deployment
    pub environment: Environment,
    pub static_dir: PathBuf,

    // Server
    pub host: String,
    pub port: u16,
    pub bind_address: SocketAddr,

    // Logging
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Other(DEFAULT_ENVIRONMENT.to_string()),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Validate all environment variables of the process
pub fn validate_environment() -> Result<AppConfig, Vec<EnvValidationError>> {
    validate_with(|name| env::var(name).ok())
}

/// Validate configuration using `lookup` to read variables
pub fn validate_with<F>(lookup: F) -> Result<AppConfig, Vec<EnvValidationError>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Deployment configuration
    let environment = match lookup("LINKARCHIVE_ENV") {
        Some(value) if !value.trim().is_empty() => Environment::parse(&value),
        _ => {
            warnings.push(EnvValidationError {
                variable: "LINKARCHIVE_ENV".to_string(),
                message: format!("Using default environment '{}'", DEFAULT_ENVIRONMENT),
                severity: ErrorSeverity::Info,
            });
            Environment::Other(DEFAULT_ENVIRONMENT.to_string())
        }
    };

    let static_dir = PathBuf::from(lookup("LINKARCHIVE_STATIC_DIR").unwrap_or_else(|| {
        if environment.is_development() {
            warnings.push(EnvValidationError {
                variable: "LINKARCHIVE_STATIC_DIR".to_string(),
                message: format!("Using default static directory '{}'", DEFAULT_STATIC_DIR),
                severity: ErrorSeverity::Info,
            });
        }
        DEFAULT_STATIC_DIR.to_string()
    }));

    if environment.is_development() && !static_dir.is_dir() {
        warnings.push(EnvValidationError {
            variable: "LINKARCHIVE_STATIC_DIR".to_string(),
            message: format!(
                "Static directory '{}' does not exist, /static/ requests will return 404",
                static_dir.display()
            ),
            severity: ErrorSeverity::Warning,
        });
    }

    // Server configuration
    let host = lookup("LINKARCHIVE_HOST").unwrap_or_else(|| {
        warnings.push(EnvValidationError {
            variable: "LINKARCHIVE_HOST".to_string(),
            message: format!("Using default host '{}'", DEFAULT_HOST),
            severity: ErrorSeverity::Info,
        });
        DEFAULT_HOST.to_string()
    });

    let ip = match IpAddr::from_str(&host) {
        Ok(ip) => Some(ip),
        Err(_) => {
            errors.push(EnvValidationError {
                variable: "LINKARCHIVE_HOST".to_string(),
                message: format!("Invalid IP address: {}", host),
                severity: ErrorSeverity::Critical,
            });
            None
        }
    };

    let port = match lookup("LINKARCHIVE_PORT") {
        Some(port_str) => match port_str.parse::<u16>() {
            Ok(port) => {
                if port < 1024 && port != 0 {
                    warnings.push(EnvValidationError {
                        variable: "LINKARCHIVE_PORT".to_string(),
                        message: format!(
                            "Using privileged port {}, may require root privileges",
                            port
                        ),
                        severity: ErrorSeverity::Warning,
                    });
                }
                port
            }
            Err(_) => {
                errors.push(EnvValidationError {
                    variable: "LINKARCHIVE_PORT".to_string(),
                    message: format!("Invalid port number: {}", port_str),
                    severity: ErrorSeverity::Critical,
                });
                DEFAULT_PORT
            }
        },
        None => {
            warnings.push(EnvValidationError {
                variable: "LINKARCHIVE_PORT".to_string(),
                message: format!("Using default port {}", DEFAULT_PORT),
                severity: ErrorSeverity::Info,
            });
            DEFAULT_PORT
        }
    };

    let bind_address = SocketAddr::new(
        ip.unwrap_or(IpAddr::from([0, 0, 0, 0])),
        port,
    );

    // Logging configuration
    let log_level = lookup("LINKARCHIVE_LOG_LEVEL")
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| {
            warnings.push(EnvValidationError {
                variable: "RUST_LOG/LINKARCHIVE_LOG_LEVEL".to_string(),
                message: format!("Using default log level '{}'", DEFAULT_LOG_LEVEL),
                severity: ErrorSeverity::Info,
            });
            DEFAULT_LOG_LEVEL.to_string()
        });

    // Add all warnings to errors for reporting
    errors.extend(warnings);

    if errors.iter().any(|e| e.severity == ErrorSeverity::Critical) {
        return Err(errors);
    }

    // Log non-critical issues
    for error in &errors {
        match error.severity {
            ErrorSeverity::Warning => warn!("{}: {}", error.variable, error.message),
            ErrorSeverity::Info => info!("{}: {}", error.variable, error.message),
            ErrorSeverity::Critical => {} // Already handled above
        }
    }

    Ok(AppConfig {
        environment,
        static_dir,
        host,
        port,
        bind_address,
        log_level,
    })
}

/// Print environment validation results in a user-friendly format
pub fn print_validation_results(result: &Result<AppConfig, Vec<EnvValidationError>>) {
    match result {
        Ok(config) => {
            println!("Environment validation successful");
            println!("Configuration:");
            println!("  Environment: {}", config.environment);
            println!("  Server: {}", config.bind_address);
            println!("  Log Level: {}", config.log_level);
            if config.environment.is_development() {
                println!("  Static Assets: directory {}", config.static_dir.display());
            } else {
                println!("  Static Assets: embedded bundle");
            }
        }
        Err(errors) => {
            let critical_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Critical)
                .count();
            let warning_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Warning)
                .count();

            eprintln!(
                "Environment validation failed with {} critical error(s), {} warning(s):",
                critical_count, warning_count
            );

            for error in errors {
                let prefix = match error.severity {
                    ErrorSeverity::Critical => "CRITICAL",
                    ErrorSeverity::Warning => "WARNING",
                    ErrorSeverity::Info => "INFO",
                };
                eprintln!("  {} - {}: {}", prefix, error.variable, error.message);
            }
        }
    }
}

/// Generate example environment configuration file
pub fn generate_env_example() -> String {
    format!(
        r#"# Link Archive Environment Configuration
# Copy this file to .env and customize the values for your deployment

# =============================================================================
# Deployment
# =============================================================================

# Deployment environment
# Default: {environment}
# "development" serves /static/ from LINKARCHIVE_STATIC_DIR so edits are live,
# any other value serves the asset bundle compiled into the binary.
LINKARCHIVE_ENV={environment}

# Static asset directory (development only)
# Default: {static_dir}
LINKARCHIVE_STATIC_DIR={static_dir}

# =============================================================================
# Server Configuration
# =============================================================================

# Server bind address
# Default: {host}
# Examples:
#   LINKARCHIVE_HOST=0.0.0.0    # All interfaces
#   LINKARCHIVE_HOST=127.0.0.1  # Localhost only
LINKARCHIVE_HOST={host}

# Server port
# Default: {port}
# Note: Ports below 1024 may require root privileges
LINKARCHIVE_PORT={port}

# =============================================================================
# Logging Configuration
# =============================================================================

# Log filter
# Default: {log_level}
# Examples:
#   RUST_LOG=debug                                # Everything at debug level
#   LINKARCHIVE_LOG_LEVEL=linkarchive=debug       # Override for this service only
RUST_LOG={log_level}
"#,
        environment = DEFAULT_ENVIRONMENT,
        static_dir = DEFAULT_STATIC_DIR,
        host = DEFAULT_HOST,
        port = DEFAULT_PORT,
        log_level = DEFAULT_LOG_LEVEL,
    )
}
