use clap::Parser;
use rawws::{Server, ServerConfig, DEFAULT_PLAIN_BODY, DEFAULT_PORT};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    process::ExitCode,
    time::Duration,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Echoes every JSON message a websocket client sends back to it
#[derive(Parser, Debug)]
#[command(name = "echo-server", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "RAWWS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "RAWWS_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Close a connection whose read stalls for this many milliseconds
    #[arg(long = "read-timeout-ms", env = "RAWWS_READ_TIMEOUT_MS")]
    read_timeout_ms: Option<u64>,

    /// Body returned to plain HTTP requests
    #[arg(long = "plain-body", env = "RAWWS_PLAIN_BODY", default_value = DEFAULT_PLAIN_BODY)]
    plain_body: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            read_timeout: self.read_timeout_ms.map(Duration::from_millis),
            plain_body: self.plain_body,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = cli.into_config();
    tracing::info!(addr = %config.addr, "starting echo server");

    match Server::new((), config).start() {
        Ok(()) => {
            tracing::info!("server exited");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "server stopped");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_config() {
        let config = Cli::parse_from(["echo-server"]).into_config();
        let default = ServerConfig::default();

        assert_eq!(config.addr, default.addr);
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.plain_body, "hey");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Cli::parse_from([
            "echo-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9001",
            "--read-timeout-ms",
            "250",
        ])
        .into_config();

        assert_eq!(config.addr, "127.0.0.1:9001".parse().unwrap());
        assert_eq!(config.read_timeout, Some(Duration::from_millis(250)));
    }
}
