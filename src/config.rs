//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and handed to the
//! router as an immutable value shared by all requests.
//!
//! ## Optional Variables
//!
//! - `PORT` - Listening port on all interfaces (default: `8080`)
//! - `ASSETS_DIR` - Directory containing the flyer images (default: `assets`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! Store domains, QR parameters and the flyer layout are compiled-in
//! defaults (see [`LinkSettings`], [`QrSettings`] and [`FlyerLayout`]).

use anyhow::{Context, Result};
use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::domain::LinkSettings;
use crate::rendering::{FlyerLayout, QrSettings};

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
    /// Root directory for flyer images referenced by [`FlyerLayout`].
    pub assets_dir: PathBuf,
    pub links: LinkSettings,
    pub qr: QrSettings,
    pub flyer: FlyerLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            assets_dir: PathBuf::from("assets"),
            links: LinkSettings::default(),
            qr: QrSettings::default(),
            flyer: FlyerLayout::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(v) if !v.is_empty() => v
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{v}'"))?,
            _ => defaults.port,
        };

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);
        let assets_dir = env::var("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.assets_dir);

        Ok(Self {
            port,
            log_level,
            log_format,
            assets_dir,
            ..defaults
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `port` is 0
    /// - `log_format` is not `text` or `json`
    /// - a store domain is not a bare host name
    /// - the QR size or flyer layout is degenerate
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be between 1 and 65535");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        self.links.validate().map_err(anyhow::Error::msg)?;

        if self.qr.size_px == 0 {
            anyhow::bail!("QR size must be greater than 0");
        }

        self.flyer.validate().map_err(anyhow::Error::msg)?;

        Ok(())
    }

    /// Address the server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr());
        tracing::info!("  Partner domain: {}", self.links.partner_domain);
        tracing::info!("  Project domain: {}", self.links.project_domain);
        tracing::info!("  Assets directory: {}", self.assets_dir.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        for placement in [&self.flyer.teaser, &self.flyer.logo] {
            let path = self.assets_dir.join(&placement.file);
            if !path.is_file() {
                tracing::warn!("  Flyer asset missing: {}", path.display());
            }
        }
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
