use anyhow::Context;
use perpdex_provider::config::{ProviderConfig, SigningMode};
use perpdex_provider::mcp::ExchangeServer;
use perpdex_provider::transport::TransportMode;
use tracing_subscriber::EnvFilter;

/// Parsed command-line options
#[derive(Debug, PartialEq)]
struct Args {
    mode: TransportMode,
    port: u16,
    signing: Option<SigningMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(1);
        }
    };

    // stdout is reserved for the stdio MCP transport
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let mut config = ProviderConfig::from_env().context("failed to load configuration")?;
    if let Some(signing) = args.signing {
        config = config.with_signing_mode(signing);
    }

    tracing::info!(
        mode = %args.mode,
        signing = %config.signing_mode,
        base_url = %config.base_url,
        "Starting perpdex provider"
    );

    match (config.signing_mode, config.identity.as_ref()) {
        (SigningMode::Local, Some(identity)) => {
            tracing::info!(address = identity.address(), "Signing identity loaded");
        }
        (SigningMode::Local, None) => {
            tracing::warn!("PERPDEX_SECRET_KEY not set - only read-only tools will work");
        }
        (SigningMode::PreSigned, Some(_)) => {
            tracing::warn!("PERPDEX_SECRET_KEY is ignored in pre-signed mode");
        }
        (SigningMode::PreSigned, None) => {
            tracing::info!("Pre-signed mode: callers supply account and signature");
        }
    }

    let server = ExchangeServer::new(config)?;

    match args.mode {
        TransportMode::Stdio => {
            perpdex_provider::transport::stdio::run_stdio_server(server).await?
        }
        TransportMode::Sse => run_sse_server(server, args.port).await?,
    }

    Ok(())
}

#[cfg(feature = "sse")]
async fn run_sse_server(server: ExchangeServer, port: u16) -> anyhow::Result<()> {
    perpdex_provider::transport::sse::run_sse_server(server, port).await
}

#[cfg(not(feature = "sse"))]
async fn run_sse_server(_server: ExchangeServer, _port: u16) -> anyhow::Result<()> {
    tracing::error!("SSE mode not available - compile with 'sse' feature");
    anyhow::bail!("SSE mode not available")
}

/// Log filter from `RUST_LOG`, falling back to `info` when unset or invalid
fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Parses command-line arguments
///
/// Returns `Ok(None)` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut mode = TransportMode::default();
    let mut port = None;
    let mut signing = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                let value = args.get(i + 1).ok_or("--mode requires a value")?;
                mode = value.parse()?;
                i += 1;
            }
            "--stdio" => mode = TransportMode::Stdio,
            "--sse" => mode = TransportMode::Sse,
            "--port" => {
                let value = args.get(i + 1).ok_or("--port requires a value")?;
                port = Some(
                    value
                        .parse::<u16>()
                        .map_err(|_| format!("Invalid port: {}", value))?,
                );
                i += 1;
            }
            "--signing" => {
                let value = args.get(i + 1).ok_or("--signing requires a value")?;
                signing = Some(value.parse::<SigningMode>().map_err(|e| e.to_string())?);
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Some(Args {
        mode,
        port: port.filter(|p| *p != 0).unwrap_or_else(|| mode.default_port()),
        signing,
    }))
}

/// Print usage information
fn print_usage() {
    println!("perpdex-provider - MCP server for a perpetuals exchange REST API");
    println!();
    println!("USAGE:");
    println!("    perpdex-provider [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --mode <MODE>         Transport mode: stdio or sse (default: stdio)");
    println!("    --stdio               Shortcut for --mode stdio");
    println!("    --sse                 Shortcut for --mode sse");
    println!("    --port <PORT>         Port for SSE mode (default: 8000)");
    println!("    --signing <MODE>      local or presigned (overrides PERPDEX_SIGNING_MODE)");
    println!("    --help, -h            Print this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    PERPDEX_BASE_URL      Exchange REST base URL (required)");
    println!("    PERPDEX_ADDRESS       Sender address (default: derived from secret key)");
    println!("    PERPDEX_SECRET_KEY    Base58 Ed25519 secret key (local signing)");
    println!("    PERPDEX_SIGNING_MODE  local or presigned (default: local)");
    println!("    PERPDEX_TIMEOUT_SECS  Request timeout in seconds (default: 10)");
    println!("    RUST_LOG              Logging level (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("    # Test environment, server signs orders");
    println!("    PERPDEX_SECRET_KEY=... perpdex-provider --stdio");
    println!();
    println!("    # Production, callers sign orders themselves");
    println!("    perpdex-provider --sse --port 8080 --signing presigned");
}
