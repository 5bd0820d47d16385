use anyhow::{bail, Context, Result};
use log::{error, info};
use std::net::{IpAddr, TcpListener};
use std::sync::Arc;
use warp::Filter;

use stayhub::config::{Backend, Config};
use stayhub::handlers_api::build_api_routes;
use stayhub::handlers_health::build_health_routes;
use stayhub::handlers_pages::build_page_routes;
use stayhub::handlers_static::build_static_routes;
use stayhub::remote_repository::RemoteRepository;
use stayhub::repository::InMemoryRepository;
use stayhub::warp_helpers::{cors, handle_rejection, SharedRepository};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let port = config.port;
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("STAYHUB_HOST '{}' is not an IP address", config.host))?;

    info!("Starting StayHub on {}:{}", host, port);
    info!("Listing backend: {:?}", config.backend);

    if !is_port_available(host, port) {
        error!(
            "Port {} is already in use. Stop the other StayHub instance or set STAYHUB_PORT.",
            port
        );
        error!("You can check what's using the port with: lsof -i :{}", port);
        bail!("Port {} is already in use", port);
    }

    let repository = build_repository(&config)?;

    let routes = build_health_routes(repository.clone())
        .or(build_api_routes(repository.clone()))
        .or(build_page_routes(repository))
        .or(build_static_routes())
        .with(cors())
        .with(warp::log("stayhub"))
        .recover(handle_rejection);

    info!(
        "Server started successfully, listening on http://localhost:{}",
        port
    );

    warp::serve(routes).run((host, port)).await;

    Ok(())
}

fn is_port_available(host: IpAddr, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}

fn build_repository(config: &Config) -> Result<SharedRepository> {
    match config.backend {
        Backend::Memory => {
            let repository = match &config.seed_path {
                Some(path) => InMemoryRepository::from_json_file(path)
                    .with_context(|| format!("Failed to load seed file {}", path.display()))?,
                None => InMemoryRepository::with_seed_data(),
            };
            info!("Serving {} listings from memory", repository.len());
            Ok(Arc::new(repository))
        }
        Backend::Remote => {
            let repository = RemoteRepository::new(&config.api_base_url, config.api_timeout)
                .context("Failed to configure the listings API client")?;
            info!(
                "Fetching listings from {} (timeout {:?})",
                config.api_base_url, config.api_timeout
            );
            Ok(Arc::new(repository))
        }
    }
}
