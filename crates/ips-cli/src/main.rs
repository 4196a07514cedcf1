//! IPS converter command-line tools.
//!
//! Provides the `ips` binary with two subcommands:
//! - `serve` runs one of the services, taking `IPS_*` environment variables
//!   as defaults and flags as overrides
//! - `convert` posts a JSON file to an echo endpoint and prints the response,
//!   the same request the web client sends

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use ips_core::{EchoRequest, EchoResponse, Payload};
use ips_server::config::{
    join_code_ttl_from_secs, normalize_prefix, room_ttl_from_secs, ServerConfig, ServiceKind,
};

/// IPS converter services and tools.
#[derive(Parser)]
#[command(name = "ips", about = "IPS converter services and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run a service.
    Serve {
        /// Service kind: convert, converter, share or signal.
        #[arg(short, long)]
        service: Option<String>,

        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default depends on the service).
        #[arg(short, long)]
        port: Option<u16>,

        /// Path prefix for service routes, e.g. /api/v1/convert.
        #[arg(long)]
        prefix: Option<String>,

        /// Room lifetime in seconds.
        #[arg(long)]
        room_ttl: Option<u64>,

        /// Join-code lifetime and rotation period in seconds.
        #[arg(long)]
        join_code_ttl: Option<u64>,
    },

    /// Send a JSON file to an echo endpoint.
    Convert {
        /// JSON file holding an object.
        file: PathBuf,

        /// Endpoint URL.
        #[arg(short, long, default_value = "http://127.0.0.1:8000/ips")]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Serve {
            service,
            host,
            port,
            prefix,
            room_ttl,
            join_code_ttl,
        } => {
            ips_server::init_tracing();
            let overrides = ServeOverrides {
                service,
                host,
                port,
                prefix,
                room_ttl,
                join_code_ttl,
            };
            run_serve(overrides).await
        }
        Commands::Convert { file, url } => run_convert(&file, &url).await,
    };
    process::exit(exit_code);
}

struct ServeOverrides {
    service: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    prefix: Option<String>,
    room_ttl: Option<u64>,
    join_code_ttl: Option<u64>,
}

/// Execute the serve subcommand.
///
/// Returns exit code: 0 = clean shutdown, 1 = server error,
/// 2 = invalid configuration.
async fn run_serve(overrides: ServeOverrides) -> i32 {
    let config = match resolve_config(overrides) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    match ips_server::serve(config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("server error: {}", e);
            1
        }
    }
}

/// Layers flag overrides on top of the environment.
fn resolve_config(overrides: ServeOverrides) -> Result<ServerConfig, String> {
    let mut config = ServerConfig::from_env().map_err(|e| e.to_string())?;

    if let Some(raw) = overrides.service {
        let kind = raw.parse::<ServiceKind>().map_err(|e| e.to_string())?;
        // Re-derive the default port unless one was given explicitly.
        if kind != config.kind && std::env::var("IPS_PORT").is_err() {
            config.port = kind.default_port();
        }
        config.kind = kind;
    }
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(prefix) = overrides.prefix {
        config.route_prefix = normalize_prefix(&prefix).map_err(|e| e.to_string())?;
    }
    if let Some(secs) = overrides.room_ttl {
        config.room_ttl = room_ttl_from_secs(secs).map_err(|e| e.to_string())?;
    }
    if let Some(secs) = overrides.join_code_ttl {
        config.join_code_ttl = join_code_ttl_from_secs(secs).map_err(|e| e.to_string())?;
    }
    Ok(config)
}

/// Execute the convert subcommand.
///
/// Returns exit code: 0 = success, 1 = request or server error,
/// 2 = file is not a JSON object, 3 = I/O error.
async fn run_convert(file: &Path, url: &str) -> i32 {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return 3;
        }
    };

    let data: Payload = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: '{}' is not a JSON object: {}", file.display(), e);
            return 2;
        }
    };

    let response = match reqwest::Client::new()
        .post(url)
        .json(&EchoRequest { data })
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: request to {} failed: {}", url, e);
            return 1;
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        eprintln!("Error: {} returned {}: {}", url, status, body);
        return 1;
    }

    match response.json::<EchoResponse>().await {
        Ok(echo) => {
            let json = serde_json::to_string_pretty(&echo).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize response: {}\"}}", e)
            });
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: unexpected response body: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> ServeOverrides {
        ServeOverrides {
            service: None,
            host: None,
            port: None,
            prefix: None,
            room_ttl: None,
            join_code_ttl: None,
        }
    }

    #[test]
    fn flags_override_environment_defaults() {
        let config = resolve_config(ServeOverrides {
            service: Some("share".to_string()),
            port: Some(9001),
            prefix: Some("/api/v1/share".to_string()),
            room_ttl: Some(30),
            ..no_overrides()
        })
        .unwrap();
        assert_eq!(config.kind, ServiceKind::Share);
        assert_eq!(config.port, 9001);
        assert_eq!(config.route_prefix.as_deref(), Some("/api/v1/share"));
        assert_eq!(config.room_ttl, std::time::Duration::from_secs(30));
    }

    #[test]
    fn invalid_flags_are_rejected() {
        assert!(resolve_config(ServeOverrides {
            service: Some("uploader".to_string()),
            ..no_overrides()
        })
        .is_err());
        assert!(resolve_config(ServeOverrides {
            join_code_ttl: Some(0),
            ..no_overrides()
        })
        .is_err());
        assert!(resolve_config(ServeOverrides {
            room_ttl: Some(u64::MAX),
            ..no_overrides()
        })
        .is_err());
        assert!(resolve_config(ServeOverrides {
            join_code_ttl: Some(u64::MAX),
            ..no_overrides()
        })
        .is_err());
        assert!(resolve_config(ServeOverrides {
            prefix: Some("api".to_string()),
            ..no_overrides()
        })
        .is_err());
    }
}
