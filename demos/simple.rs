use std::{net::SocketAddr, sync::Arc};

use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wallet_pass_for_warp::{
    build_api_route_filter, handle_pass_errors, HttpMailer, InMemoryDirectory, MailRelaySettings,
    Pass, PassConfig, PassSettings,
};
use warp::Filter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wallet_pass_for_warp=debug")),
        )
        .init();

    let settings = PassSettings::from_env()?;
    let mailer = HttpMailer::new(reqwest::Client::new(), MailRelaySettings::from_env()?);

    let config = PassConfig {
        settings,
        directory: Arc::new(Mutex::new(InMemoryDirectory::new())),
        mailer: Arc::new(mailer),
    };

    let pass = Pass::new(config)?;

    let health = warp::path!("health").map(|| "ok");

    let all_routes = health
        .or(build_api_route_filter(&pass))
        .recover(handle_pass_errors)
        .with(warp::trace::request());

    let addr: SocketAddr = "127.0.0.1:4000".parse()?;
    tracing::info!(%addr, "serving wallet pass API");
    warp::serve(all_routes).run(addr).await;

    Ok(())
}
