//! Binary entrypoint for an IPS service.
//!
//! Configuration comes from `IPS_*` environment variables; see
//! [`ips_server::config`].

use std::process;

use ips_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    ips_server::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {}", err);
            process::exit(2);
        }
    };

    if let Err(err) = ips_server::serve(config).await {
        tracing::error!("server error: {}", err);
        process::exit(1);
    }
}
