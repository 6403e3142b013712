use std::error::Error;
use std::net::SocketAddr;

use clap::Parser;
use opendata_mcp::config::OpenDataConfig;
use opendata_mcp::service::OpenDataService;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(version, about = "MCP SSE server for weather, GitHub, and Indian Rail lookups")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080u16)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = OpenDataConfig::from_env()?;
    log_startup_notes(&config);

    let service = OpenDataService::new(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let sse_config = SseServerConfig {
        bind: addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: CancellationToken::new(),
        sse_keep_alive: None,
    };
    let (sse_server, router) = SseServer::new(sse_config);

    let listener = tokio::net::TcpListener::bind(sse_server.config.bind).await?;
    tracing::info!(%addr, "listening");

    let server_ct = sse_server.config.ct.child_token();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        server_ct.cancelled().await;
    });
    tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!(error = %e, "http server stopped with error");
        }
    });

    let ct = sse_server.with_service(move || service.clone());

    tokio::signal::ctrl_c().await?;
    ct.cancel();
    eprintln!("MCP server stopped: interrupted");

    Ok(())
}

fn log_startup_notes(config: &OpenDataConfig) {
    tracing::info!("Weather tools: get_alerts, get_forecast");
    tracing::info!(
        "GitHub tools (read-only): get_github_user, get_github_repos, get_github_repo_info, \
         search_github_repos, get_github_issues, get_github_commits"
    );
    tracing::info!(
        "Indian Rail tools: station_name_to_code, get_train_schedule_indian_rail, \
         get_all_trains_on_station"
    );

    if config.github_token.is_some() {
        tracing::info!("GITHUB_TOKEN found; using authenticated API with higher rate limits");
    } else {
        tracing::info!("no GITHUB_TOKEN set; using public API with lower rate limits");
    }

    if config.rail_api_key.is_some() {
        tracing::info!("INDIAN_RAIL_API_KEY found; Indian Rail tools are available");
    } else {
        tracing::info!("INDIAN_RAIL_API_KEY not set; Indian Rail tools will not work");
    }
}
