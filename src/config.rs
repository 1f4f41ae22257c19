use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4";

#[derive(Debug, Parser)]
#[command(name = "sheet-relay", about = "Validating HTTP relay for Google Sheets writes")]
pub struct CliArgs {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "SHEET_RELAY_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Base URL of the Google Sheets v4 API.
    #[arg(long, env = "SHEET_RELAY_SHEETS_ENDPOINT", default_value = DEFAULT_SHEETS_ENDPOINT)]
    pub sheets_endpoint: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub sheets_endpoint: String,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let bind_address: SocketAddr = args
            .bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", args.bind))?;

        Ok(Self {
            bind_address,
            sheets_endpoint: args.sheets_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Config pointing at a non-default Sheets endpoint (integration tests).
    pub fn with_endpoint(sheets_endpoint: impl Into<String>) -> Self {
        Self {
            bind_address: DEFAULT_BIND.parse().expect("default bind parses"),
            sheets_endpoint: sheets_endpoint.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_endpoint(DEFAULT_SHEETS_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_args_parses_bind_address() {
        let args = CliArgs {
            bind: "0.0.0.0:9090".to_string(),
            sheets_endpoint: DEFAULT_SHEETS_ENDPOINT.to_string(),
        };
        let config = ServerConfig::from_args(args).unwrap();
        assert_eq!(config.bind_address.port(), 9090);
        assert_eq!(config.sheets_endpoint, "https://sheets.googleapis.com/v4");
    }

    #[test]
    fn from_args_rejects_garbage_bind() {
        let args = CliArgs {
            bind: "not-an-address".to_string(),
            sheets_endpoint: DEFAULT_SHEETS_ENDPOINT.to_string(),
        };
        assert!(ServerConfig::from_args(args).is_err());
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let config = ServerConfig::with_endpoint("http://127.0.0.1:1234/v4/");
        assert_eq!(config.sheets_endpoint, "http://127.0.0.1:1234/v4");
    }
}
