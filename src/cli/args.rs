//! Command-line argument parsing for rag-chain
//!
//! Provides clap-based CLI with settings overrides and verbosity control.

use clap::Parser;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::config::Settings;

/// rag-chain - Answer questions about the lease contract from its indexed fragments
#[derive(Parser, Debug)]
#[command(name = "rag-chain")]
#[command(version)]
#[command(about = "RAG over a lease contract (Qdrant + OpenAI)", long_about = None)]
pub struct Args {
    /// Settings file path (defaults to ~/.rag-chain/config.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind host, overrides the settings file
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides the settings file
    #[arg(long)]
    pub port: Option<u16>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Apply command-line overrides on top of loaded settings
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        settings
    }
}

/// Socket address for the configured host and port.
///
/// Accepts hostnames and bare IPv6 literals as well as IPv4 addresses.
pub fn bind_addr(settings: &Settings) -> Result<SocketAddr, String> {
    let invalid = |reason: String| {
        format!(
            "Invalid bind address {}:{}: {}",
            settings.host, settings.port, reason
        )
    };

    (settings.host.as_str(), settings.port)
        .to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("host resolved to no addresses".to_string()))
}

impl Verbosity {
    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info,rag_chain=debug",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rag-chain").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&[]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_overrides_apply() {
        let args = parse(&["--host", "0.0.0.0", "--port", "9100"]);
        let settings = args.apply(Settings::default());
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.collection, "contrato_arriendo_pablo");
    }

    #[test]
    fn test_no_overrides_keep_settings() {
        let settings = parse(&[]).apply(Settings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_bind_addr() {
        let addr = bind_addr(&Settings::default()).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");

        let bad = Settings {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(bind_addr(&bad).is_err());
    }

    #[test]
    fn test_bind_addr_hostname_and_ipv6() {
        let named = Settings {
            host: "localhost".to_string(),
            ..Default::default()
        };
        let addr = bind_addr(&named).unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8000);

        let v6 = Settings {
            host: "::1".to_string(),
            port: 9100,
            ..Default::default()
        };
        assert_eq!(bind_addr(&v6).unwrap().to_string(), "[::1]:9100");
    }

    #[test]
    fn test_log_filters() {
        assert_eq!(Verbosity::Quiet.log_filter(), "warn");
        assert_eq!(Verbosity::Normal.log_filter(), "info,rag_chain=debug");
        assert_eq!(Verbosity::Verbose.log_filter(), "debug");
        assert_eq!(Verbosity::VeryVerbose.log_filter(), "trace");
    }
}
